// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-only `ExecutionAdapter` with scriptable outcomes per job.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use ciq_core::{Job, JobResult};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{ExecutionAdapter, ExecutionError, JobStatusUpdate};

/// One recorded call made through a [`FakeExecutionAdapter`].
#[derive(Debug, Clone)]
pub enum ExecutionCall {
    Execute(String),
    RemoveDir(String),
}

/// Scripted outcome for one job, keyed by `job.uid`.
#[derive(Clone)]
enum Outcome {
    Result(JobResult),
    Error(String),
    /// Never resolves on its own; only returns when `stop` fires.
    HangUntilStopped,
}

#[derive(Default)]
struct Inner {
    outcomes: HashMap<String, Outcome>,
    calls: Vec<ExecutionCall>,
}

/// In-memory `ExecutionAdapter` for tests. By default every job
/// passes; call [`FakeExecutionAdapter::script`] to override.
#[derive(Clone, Default)]
pub struct FakeExecutionAdapter {
    inner: Arc<Mutex<Inner>>,
}

impl FakeExecutionAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_result(&self, uid: impl Into<String>, result: JobResult) {
        self.inner.lock().outcomes.insert(uid.into(), Outcome::Result(result));
    }

    pub fn script_error(&self, uid: impl Into<String>, message: impl Into<String>) {
        self.inner.lock().outcomes.insert(uid.into(), Outcome::Error(message.into()));
    }

    /// The job's `execute` call blocks until its `stop` token fires,
    /// then resolves `Stopped` — used to test `stopRunningJob`.
    pub fn script_hang_until_stopped(&self, uid: impl Into<String>) {
        self.inner.lock().outcomes.insert(uid.into(), Outcome::HangUntilStopped);
    }

    pub fn calls(&self) -> Vec<ExecutionCall> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl ExecutionAdapter for FakeExecutionAdapter {
    async fn execute(
        &self,
        job: &Job,
        _status_tx: mpsc::UnboundedSender<JobStatusUpdate>,
        stop: CancellationToken,
    ) -> Result<JobResult, ExecutionError> {
        let uid = job.uid.to_string();
        self.inner.lock().calls.push(ExecutionCall::Execute(uid.clone()));

        let outcome: Option<Outcome> = self.inner.lock().outcomes.get(&uid).cloned();
        match outcome {
            Some(Outcome::Result(result)) => Ok(result),
            Some(Outcome::Error(message)) => Err(ExecutionError::Failed(message)),
            Some(Outcome::HangUntilStopped) => {
                stop.cancelled().await;
                Ok(JobResult::Stopped)
            }
            None => Ok(JobResult::Passed),
        }
    }

    async fn remove_dir(&self, path: &str) -> Result<(), ExecutionError> {
        self.inner.lock().calls.push(ExecutionCall::RemoveDir(path.to_string()));
        Ok(())
    }
}
