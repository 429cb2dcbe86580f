// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker Pool: a fixed set of cooperative tasks that pull from the
//! waiting lanes and drive the Execution adapter (spec §4.4).

use std::sync::Arc;

use ciq_adapters::{ExecutionAdapter, HostingAdapter};
use ciq_core::{Clock, JobId, JobResult};
use ciq_storage::PersistenceAdapter;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::dispatcher::Dispatcher;
use crate::error::EngineError;

impl<H, E, P, C> Dispatcher<H, E, P, C>
where
    H: HostingAdapter,
    E: ExecutionAdapter,
    P: PersistenceAdapter,
    C: Clock + 'static,
{
    /// Launch exactly `numWorkers` worker tasks (spec §4.4). Each
    /// runs until `shutdown` is cancelled.
    pub fn spawn_workers(self: &Arc<Self>) -> Vec<JoinHandle<()>> {
        (0..self.config.num_workers)
            .map(|_| {
                let this = Arc::clone(self);
                tokio::spawn(async move { this.worker_loop().await })
            })
            .collect()
    }

    /// Wake one idle worker blocked on an empty normal lane. Call
    /// this whenever the normal lane transitions from empty to
    /// non-empty.
    pub(crate) fn wake_one_worker(&self) {
        self.idle_notify.notify_one();
    }

    async fn worker_loop(self: Arc<Self>) {
        loop {
            let uid = tokio::select! {
                _ = self.shutdown.cancelled() => None,
                uid = self.next_job() => uid,
            };
            let Some(uid) = uid else {
                break;
            };
            if let Err(err) = Arc::clone(&self).process_job(uid.clone()).await {
                tracing::warn!(%uid, error = %err, "worker failed to process job");
            }
        }
    }

    /// Dequeue the next job id: fast-track head non-blocking, else
    /// block-wait on the normal lane (spec §4.4 steps 1-2).
    async fn next_job(&self) -> Option<JobId> {
        loop {
            if let Some(uid) = self.state.lock().dequeue_next() {
                return Some(uid);
            }
            tokio::select! {
                _ = self.idle_notify.notified() => continue,
                _ = self.shutdown.cancelled() => return None,
            }
        }
    }

    /// Run one dequeued job end to end (spec §4.4 `processJob`).
    pub(crate) async fn process_job(self: Arc<Self>, uid: JobId) -> Result<(), EngineError> {
        let canceled = self.state.lock().get(&uid).map(|j| j.canceled).unwrap_or(true);
        if canceled {
            return Ok(());
        }

        let stop = self.prepare(&uid).await?;
        let job_snapshot = self
            .state
            .lock()
            .get(&uid)
            .cloned()
            .ok_or_else(|| ciq_core::DispatchError::JobNotFound(uid.to_string()))?;

        let (status_tx, mut status_rx) = mpsc::unbounded_channel();
        let forwarder = {
            let this = Arc::clone(&self);
            tokio::spawn(async move {
                while let Some(update) = status_rx.recv().await {
                    this.handle_job_status_data(&update.uid, update.status);
                }
            })
        };

        let result = self.execution.execute(&job_snapshot, status_tx, stop).await;
        let _ = forwarder.await;

        let job_result = match result {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(%uid, error = %err, "execution adapter reported failure");
                JobResult::Errored
            }
        };

        if let Some(job) = self.state.lock().get_mut(&uid) {
            job.result = job_result;
        }

        self.finalize(&uid).await
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
