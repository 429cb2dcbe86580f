// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide configuration: a TOML file on disk, overridable by
//! environment variables for the handful of values an operator most
//! commonly needs to flip without editing it (§12).

use std::path::{Path, PathBuf};

use ciq_core::DispatcherConfig;
use serde::Deserialize;
use thiserror::Error;

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to parse config file {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
    #[error("numWorkers must be at least 1, got {0}")]
    InvalidNumWorkers(usize),
}

/// On-disk shape of the TOML config file. Every field is optional so a
/// partial file only overrides what it names; anything absent falls back
/// to `DispatcherConfig::default()` and then to an environment override.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawConfig {
    num_workers: Option<usize>,
    cancel_on_update: Option<bool>,
    base_url: Option<String>,
    work_dir: Option<String>,
    ready_label: Option<String>,
    fasttrack_label: Option<String>,
    persistence_dir: Option<String>,
    log_level: Option<String>,
}

/// Fully resolved process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Options consumed directly by `ciq_engine::Dispatcher::new`.
    pub dispatcher: DispatcherConfig,
    /// Directory the `JsonFilePersistence` adapter writes finished jobs to.
    pub persistence_dir: PathBuf,
    /// `RUST_LOG`-compatible default filter directive (§10).
    pub log_level: String,
}

impl Config {
    /// Load configuration from `path` if it exists (a missing path is not
    /// an error — every field then comes from defaults/env), apply
    /// `CIQ_*` environment overrides, and validate the result.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let raw = match path {
            Some(path) if path.exists() => {
                let text = std::fs::read_to_string(path)
                    .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
                toml::from_str(&text)
                    .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?
            }
            _ => RawConfig::default(),
        };

        let defaults = DispatcherConfig::default();
        let dispatcher = DispatcherConfig {
            num_workers: env_usize("CIQ_NUM_WORKERS").unwrap_or(raw.num_workers.unwrap_or(defaults.num_workers)),
            cancel_on_update: env_bool("CIQ_CANCEL_ON_UPDATE")
                .unwrap_or(raw.cancel_on_update.unwrap_or(defaults.cancel_on_update)),
            base_url: env_string("CIQ_BASE_URL").or(raw.base_url).unwrap_or(defaults.base_url),
            work_dir: env_string("CIQ_WORK_DIR").or(raw.work_dir).unwrap_or(defaults.work_dir),
            ready_label: env_string("CIQ_READY_LABEL").or(raw.ready_label).or(defaults.ready_label),
            fasttrack_label: env_string("CIQ_FASTTRACK_LABEL")
                .or(raw.fasttrack_label)
                .or(defaults.fasttrack_label),
        };

        if dispatcher.num_workers < 1 {
            return Err(ConfigError::InvalidNumWorkers(dispatcher.num_workers));
        }

        let persistence_dir = env_string("CIQ_STATE_DIR")
            .or(raw.persistence_dir)
            .unwrap_or_else(|| "./ciqd-data".to_string());
        let log_level = env_string("CIQ_LOG_LEVEL").or(raw.log_level).unwrap_or_else(|| "info".to_string());

        Ok(Self { dispatcher, persistence_dir: PathBuf::from(persistence_dir), log_level })
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_usize(key: &str) -> Option<usize> {
    env_string(key).and_then(|s| s.parse().ok())
}

fn env_bool(key: &str) -> Option<bool> {
    env_string(key).and_then(|s| s.parse().ok())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
