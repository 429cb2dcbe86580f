// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler: decides whether an arriving job supersedes in-flight
//! jobs, then enqueues it (spec §4.2).

use ciq_adapters::{CommitStatusUpdate, ExecutionAdapter, HostingAdapter};
use ciq_core::{Clock, Job, JobId};
use ciq_storage::PersistenceAdapter;

use crate::dispatcher::Dispatcher;
use crate::error::EngineError;

impl<H, E, P, C> Dispatcher<H, E, P, C>
where
    H: HostingAdapter,
    E: ExecutionAdapter,
    P: PersistenceAdapter,
    C: Clock + 'static,
{
    /// Enqueue `job`, first disabling any in-flight job it
    /// supersedes if `cancelOnUpdate` is enabled (spec §4.2).
    pub async fn schedule(&self, job: Job) -> Result<JobId, EngineError> {
        if self.config.cancel_on_update {
            self.disable_jobs_matching(&job).await?;
        }

        let sha = job.commit.sha.clone();
        let uid = self.state.lock().enqueue(job);
        self.wake_one_worker();

        self.hosting
            .set_commit_status(&sha, CommitStatusUpdate::pending("The build has been queued"))
            .await?;
        self.observers.reload_jobs();

        Ok(uid)
    }

    /// Cancel every waiting job and stop every running job that
    /// shares `job`'s PR number or ref (spec §4.2, §4.1 step 5/7).
    ///
    /// Applying this twice in a row to the same `job` is a no-op the
    /// second time: the matching jobs are already gone from the
    /// waiting/running sets after the first pass.
    pub async fn disable_jobs_matching(&self, job: &Job) -> Result<(), EngineError> {
        let (waiting, running) = {
            let state = self.state.lock();
            if let Some(number) = job.pr_number() {
                (state.search_by_pr(number), state.running_by_pr(number))
            } else if let Some(ref_name) = job.ref_name() {
                (state.search_by_ref(ref_name), state.running_by_ref(ref_name))
            } else {
                (Vec::new(), Vec::new())
            }
        };

        for uid in waiting {
            self.cancel_queued_job(&uid).await?;
        }
        for uid in running {
            self.stop_running_job(&uid).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
