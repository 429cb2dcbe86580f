// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job Lifecycle: transitions a job through queued → running →
//! finished, synchronizing status callbacks and observer
//! notifications with the state mutation that caused them (spec
//! §4.5, §4.6).

use ciq_adapters::{CommitState, CommitStatusUpdate, ExecutionAdapter, HostingAdapter};
use ciq_core::{Clock, JobId, JobPhase, JobResult};
use ciq_storage::{should_persist, PersistenceAdapter};
use tokio_util::sync::CancellationToken;

use crate::dispatcher::Dispatcher;
use crate::error::EngineError;

impl<H, E, P, C> Dispatcher<H, E, P, C>
where
    H: HostingAdapter,
    E: ExecutionAdapter,
    P: PersistenceAdapter,
    C: Clock + 'static,
{
    /// Move `uid` from the waiting set into a running slot and
    /// announce the start (spec §4.5). Returns the stop token the
    /// caller must pass to `ExecutionAdapter::execute`.
    pub(crate) async fn prepare(&self, uid: &JobId) -> Result<CancellationToken, EngineError> {
        let sha = {
            let mut state = self.state.lock();
            state.occupy_slot(uid.clone());
            let job = state.get_mut(uid).ok_or_else(|| {
                ciq_core::DispatchError::JobNotFound(uid.to_string())
            })?;
            job.start_time_epoch_ms = Some(self.clock.epoch_ms());
            job.status.phase = JobPhase::Working;
            job.commit.sha.clone()
        };

        let stop = CancellationToken::new();
        self.running_stops.lock().insert(uid.clone(), stop.clone());

        self.hosting
            .set_commit_status(
                &sha,
                CommitStatusUpdate::pending("The build has started")
                    .with_target_url(self.config.base_url.clone()),
            )
            .await?;
        self.observers.reload_jobs();

        Ok(stop)
    }

    /// Retire a finished-executing job: vacate its running slot,
    /// post the terminal commit status and PR comment, persist if
    /// eligible, and broadcast the final reload (spec §4.5).
    pub(crate) async fn finalize(&self, uid: &JobId) -> Result<(), EngineError> {
        self.running_stops.lock().remove(uid);

        let job = {
            let mut state = self.state.lock();
            state.vacate_slot(uid);
            let job = state
                .get_mut(uid)
                .ok_or_else(|| ciq_core::DispatchError::JobNotFound(uid.to_string()))?;
            job.stop_time_epoch_ms = Some(self.clock.epoch_ms());
            if job.status.phase == JobPhase::Working {
                job.status.phase = JobPhase::Finished;
            }
            job.clone()
        };

        if job.result != JobResult::Stopped {
            let commit_state = match job.result {
                JobResult::Passed => CommitState::Success,
                _ => CommitState::Failure,
            };
            let description = format!("The build {} in {}.", job.result, job.runtime_human());
            self.hosting
                .set_commit_status(&job.commit.sha, CommitStatusUpdate::terminal(commit_state, description))
                .await?;

            if job.pull_request().is_some() && job.config.pr.enable_comments {
                self.hosting.comment_on_pr(&job).await?;
            }

            if should_persist(&job) {
                self.persistence.insert_job(&job).await?;
            }
        }

        self.observers.reload_jobs();
        Ok(())
    }

    /// Cancel a still-waiting job (spec §4.3): flag it and drop it
    /// from the waiting set. A job already dequeued by a worker but
    /// not yet prepared is still reachable here and is discarded by
    /// the worker on the `canceled` check (invariant 4).
    pub async fn cancel_queued_job(&self, uid: &JobId) -> Result<(), EngineError> {
        let (removed, sha) = {
            let mut state = self.state.lock();
            let removed = state.cancel_queued(uid);
            let sha = state.get(uid).map(|j| j.commit.sha.clone());
            (removed, sha)
        };

        if removed {
            if let Some(sha) = sha {
                self.hosting.set_commit_status(&sha, CommitStatusUpdate::pending("Canceled")).await?;
            }
            self.observers.reload_jobs();
        }
        Ok(())
    }

    /// Stop a running job (spec §4.6): ask the Execution adapter to
    /// return early via its stop token and post the pending
    /// "Stopped" status. The running slot itself is released by
    /// `finalize` once `execute` actually returns.
    pub async fn stop_running_job(&self, uid: &JobId) -> Result<(), EngineError> {
        let token = self.running_stops.lock().get(uid).cloned();
        let Some(token) = token else {
            return Ok(());
        };
        token.cancel();

        let sha = self.state.lock().get(uid).map(|j| j.commit.sha.clone());
        if let Some(sha) = sha {
            self.hosting.set_commit_status(&sha, CommitStatusUpdate::pending("Stopped")).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
