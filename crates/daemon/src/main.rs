// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ciqd - continuous-integration dispatch daemon.
//!
//! Loads configuration, wires the dispatch core to its adapters, and
//! runs the worker pool until a shutdown signal arrives. No HTTP or
//! websocket listener is started here; this binary exists to host the
//! `ciq-engine` library, not to be a complete deployable service.

mod config;

use std::path::PathBuf;

use ciq_adapters::execution::FakeExecutionAdapter;
use ciq_adapters::hosting::FakeHostingAdapter;
use ciq_core::SystemClock;
use ciq_engine::Dispatcher;
use ciq_storage::JsonFilePersistence;
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

use crate::config::Config;

type Daemon = Dispatcher<FakeHostingAdapter, FakeExecutionAdapter, JsonFilePersistence, SystemClock>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("CIQ_CONFIG_PATH").ok().map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;

    setup_logging(&config.log_level);
    info!(num_workers = config.dispatcher.num_workers, "starting ciqd");

    // Fakes stand in for a real source-hosting and build-execution backend;
    // a production deployment wires its own `HostingAdapter`/`ExecutionAdapter`
    // implementations in their place (spec §6, DESIGN.md Open Questions).
    let hosting = FakeHostingAdapter::new();
    let execution = FakeExecutionAdapter::new();
    let persistence = JsonFilePersistence::new(config.persistence_dir.clone());

    let dispatcher: std::sync::Arc<Daemon> =
        Dispatcher::new(hosting, execution, persistence, SystemClock, config.dispatcher.clone()).await?;

    let _workers = dispatcher.spawn_workers();

    wait_for_shutdown_signal().await?;
    info!("shutdown requested");

    dispatcher.shutdown().await?;
    info!("ciqd stopped");
    Ok(())
}

async fn wait_for_shutdown_signal() -> Result<(), std::io::Error> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM"),
        _ = sigint.recv() => info!("received SIGINT"),
    }
    Ok(())
}

fn setup_logging(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
