// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence adapter: stores finished jobs (spec §6, consumed
//! interface). Queued/running state is explicitly ephemeral (spec
//! §1 Non-goals); only jobs that reach `result ∈ {passed, errored}`
//! are ever written here (spec §8 invariant 5).

use async_trait::async_trait;
use ciq_core::{Job, JobId, JobResult};
use thiserror::Error;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakePersistenceAdapter;

pub mod json_file;
pub use json_file::JsonFilePersistence;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Filter used by `findJobs`/`countJobs`/`deleteJobs`.
#[derive(Debug, Clone, Default)]
pub struct JobQuery {
    pub pr_number: Option<u64>,
    pub ref_name: Option<String>,
    pub limit: Option<usize>,
}

impl JobQuery {
    fn matches(&self, job: &Job) -> bool {
        if let Some(n) = self.pr_number {
            if job.pr_number() != Some(n) {
                return false;
            }
        }
        if let Some(r) = &self.ref_name {
            if job.ref_name() != Some(r.as_str()) {
                return false;
            }
        }
        true
    }
}

/// Adapter for storing and querying finished jobs.
#[async_trait]
pub trait PersistenceAdapter: Send + Sync + 'static {
    async fn init(&self) -> Result<(), PersistenceError>;
    async fn close(&self) -> Result<(), PersistenceError>;
    async fn insert_job(&self, job: &Job) -> Result<(), PersistenceError>;
    async fn find_job(&self, uid: &JobId) -> Result<Option<Job>, PersistenceError>;
    async fn find_jobs(&self, query: &JobQuery) -> Result<Vec<Job>, PersistenceError>;
    async fn count_jobs(&self, query: &JobQuery) -> Result<usize, PersistenceError>;
    async fn delete_jobs(&self, query: &JobQuery) -> Result<Vec<Job>, PersistenceError>;
}

/// True iff `finalize` should persist this job (spec §8 invariant 5).
pub fn should_persist(job: &Job) -> bool {
    matches!(job.result, JobResult::Passed | JobResult::Errored)
}

#[cfg(test)]
#[path = "persistence_tests.rs"]
mod tests;
