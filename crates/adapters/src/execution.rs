// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build-execution adapter: runs a job on the host and reports
//! progress/outcome (spec §6, consumed interface).

use async_trait::async_trait;
use ciq_core::{Job, JobResult};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ExecutionCall, FakeExecutionAdapter};

/// Errors from the execution adapter's `execute` call.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("execution failed: {0}")]
    Failed(String),
}

/// A live-progress update emitted by the execution adapter while a
/// job runs; routed to `Dispatcher::handle_job_status_data`.
#[derive(Debug, Clone)]
pub struct JobStatusUpdate {
    pub uid: String,
    pub status: serde_json::Value,
}

/// Adapter that actually runs a build.
#[async_trait]
pub trait ExecutionAdapter: Clone + Send + Sync + 'static {
    /// Run `job` to completion. Progress updates are sent on
    /// `status_tx` as they arrive. `stop` is cancelled by
    /// `stopRunningJob` (spec §4.6); on cancellation this call must
    /// return promptly with `Ok(JobResult::Stopped)`. An execution
    /// failure is surfaced as `Err`; the worker maps that to
    /// `JobResult::Errored` (spec §7) rather than propagating it.
    async fn execute(
        &self,
        job: &Job,
        status_tx: mpsc::UnboundedSender<JobStatusUpdate>,
        stop: CancellationToken,
    ) -> Result<JobResult, ExecutionError>;

    /// Remove a job's working directory from disk.
    async fn remove_dir(&self, path: &str) -> Result<(), ExecutionError>;
}

#[cfg(test)]
#[path = "execution_tests.rs"]
mod tests;
