// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The dispatch core's public facade: wires the Event Handler,
//! Scheduler, Queue Manager, Worker Pool, Job Lifecycle, and Observer
//! Fan-out together over one piece of shared state (spec §2, §5).

use std::collections::HashMap;
use std::sync::Arc;

use ciq_adapters::{ExecutionAdapter, HostingAdapter};
use ciq_core::{Clock, DispatchError, DispatcherConfig, Job, JobId, ObserverId};
use ciq_storage::{JobQuery, PersistenceAdapter};
use ciq_wire::ObserverMessage;
use parking_lot::Mutex;
use tokio::sync::{mpsc, Notify};
use tokio_util::sync::CancellationToken;

use crate::error::EngineError;
use crate::observer::ObserverRegistry;
use crate::state::DispatchState;

/// The dispatch core. Generic over the three external collaborators
/// it consumes (spec §6) and the clock, so tests can substitute
/// fakes and a controllable clock without touching this type.
pub struct Dispatcher<H, E, P, C> {
    pub(crate) state: Mutex<DispatchState>,
    pub(crate) observers: ObserverRegistry,
    /// One cancellation token per currently running job, used by
    /// `stop_running_job` to ask the Execution adapter's `execute`
    /// call to return early (spec §4.6).
    pub(crate) running_stops: Mutex<HashMap<JobId, CancellationToken>>,
    /// Wakes an idle worker when the normal lane transitions from
    /// empty to non-empty (fast-track wakeups are opportunistic and
    /// don't need this — a worker already checks it first each loop).
    pub(crate) idle_notify: Arc<Notify>,
    pub(crate) shutdown: CancellationToken,
    pub(crate) hosting: H,
    pub(crate) execution: E,
    pub(crate) persistence: P,
    pub(crate) clock: C,
    pub(crate) config: DispatcherConfig,
}

impl<H, E, P, C> Dispatcher<H, E, P, C>
where
    H: HostingAdapter,
    E: ExecutionAdapter,
    P: PersistenceAdapter,
    C: Clock + 'static,
{
    pub async fn new(
        hosting: H,
        execution: E,
        persistence: P,
        clock: C,
        config: DispatcherConfig,
    ) -> Result<Arc<Self>, EngineError> {
        persistence.init().await?;
        Ok(Arc::new(Self {
            state: Mutex::new(DispatchState::new(config.num_workers)),
            observers: ObserverRegistry::new(),
            running_stops: Mutex::new(HashMap::new()),
            idle_notify: Arc::new(Notify::new()),
            shutdown: CancellationToken::new(),
            hosting,
            execution,
            persistence,
            clock,
            config,
        }))
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn subscribe(&self, id: ObserverId, tx: mpsc::UnboundedSender<ObserverMessage>) {
        self.observers.subscribe(id, tx);
    }

    pub fn unsubscribe(&self, id: &ObserverId) {
        self.observers.unsubscribe(id);
    }

    pub fn get_job(&self, uid: &JobId) -> Option<Job> {
        self.state.lock().get(uid).cloned()
    }

    /// Waiting jobs, ordered fast-track first then normal (spec
    /// §4.8: fast-tracked last per the stable sort applied to the
    /// *queued* view — fast-track jobs run first but are reported
    /// after normal ones in this listing).
    pub fn queued_jobs(&self, query: &JobQuery) -> Vec<Job> {
        let state = self.state.lock();
        let mut normal: Vec<Job> = Vec::new();
        let mut fasttrack: Vec<Job> = Vec::new();
        for job in state.waiting_jobs() {
            if job.fasttracked {
                fasttrack.push(job.clone());
            } else {
                normal.push(job.clone());
            }
        }
        normal.extend(fasttrack);
        apply_query(normal, query)
    }

    pub fn running_jobs(&self, query: &JobQuery) -> Vec<Job> {
        let jobs = self.state.lock().running_jobs().into_iter().cloned().collect();
        apply_query(jobs, query)
    }

    pub fn all_jobs(&self, query: &JobQuery) -> Vec<Job> {
        let jobs = self.state.lock().all_jobs().into_iter().cloned().collect();
        apply_query(jobs, query)
    }

    /// Report live progress from the Execution adapter (spec §4.7).
    /// A no-op unless `status` is truthy (not `null`/`false`) and a
    /// running job with `uid` exists; otherwise the update is
    /// merged into `job.status.extra` and broadcast verbatim.
    pub fn handle_job_status_data(&self, uid: &str, status: serde_json::Value) {
        if matches!(status, serde_json::Value::Null | serde_json::Value::Bool(false)) {
            return;
        }
        let job_id = JobId::from_string(uid);
        let updated = {
            let mut state = self.state.lock();
            if !state.is_running(&job_id) {
                false
            } else if let Some(job) = state.get_mut(&job_id) {
                if let serde_json::Value::Object(map) = &status {
                    job.status.extra.extend(map.clone());
                }
                true
            } else {
                false
            }
        };
        if updated {
            self.observers.notify(ObserverMessage::status(uid.to_string(), status));
        }
    }

    /// Re-fetch a finished job's build configuration and reschedule
    /// it under a fresh id (spec §4.8).
    pub async fn restart(&self, uid: &JobId) -> Result<(), EngineError> {
        let found = self
            .persistence
            .find_job(uid)
            .await?
            .ok_or_else(|| DispatchError::JobNotFound(uid.to_string()))?;

        let config = self.hosting.fetch_build_config(&found.commit.sha).await?;
        let new_job = Job::new(found.commit.clone(), found.trigger.clone(), config, found.fasttracked);
        self.schedule(new_job).await?;
        Ok(())
    }

    /// Delete matched finished jobs from Persistence and their
    /// working directories from disk (spec §4.8).
    pub async fn remove_finished_jobs(&self, query: &JobQuery) -> Result<(), EngineError> {
        let deleted = self.persistence.delete_jobs(query).await?;
        for job in &deleted {
            let path = format!("{}/{}", self.config.work_dir, job.uid.as_str());
            if let Err(err) = self.execution.remove_dir(&path).await {
                tracing::warn!(uid = %job.uid, error = %err, "failed to remove job working directory");
            }
        }
        self.observers.reload_jobs();
        Ok(())
    }

    /// Graceful shutdown (spec §5): mark every queued job cancelled,
    /// stop every running job, close the persistence connection,
    /// drop observer handles.
    pub async fn shutdown(&self) -> Result<(), EngineError> {
        self.shutdown.cancel();

        let waiting: Vec<JobId> = {
            let state = self.state.lock();
            state.waiting_jobs().into_iter().map(|j| j.uid.clone()).collect()
        };
        for uid in waiting {
            self.cancel_queued_job(&uid).await?;
        }

        let running: Vec<JobId> = {
            let state = self.state.lock();
            state.running_jobs().into_iter().map(|j| j.uid.clone()).collect()
        };
        for uid in running {
            self.stop_running_job(&uid).await?;
        }

        self.persistence.close().await?;
        Ok(())
    }
}

fn apply_query(mut jobs: Vec<Job>, query: &JobQuery) -> Vec<Job> {
    jobs.retain(|job| {
        (query.pr_number.is_none() || job.pr_number() == query.pr_number)
            && (query.ref_name.is_none() || job.ref_name() == query.ref_name.as_deref())
    });
    if let Some(limit) = query.limit {
        jobs.truncate(limit);
    }
    jobs
}
