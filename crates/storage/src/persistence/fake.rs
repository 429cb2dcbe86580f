// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-only in-memory `PersistenceAdapter`.

use std::sync::Arc;

use async_trait::async_trait;
use ciq_core::{Job, JobId};
use parking_lot::Mutex;

use super::{JobQuery, PersistenceAdapter, PersistenceError};

#[derive(Clone, Default)]
pub struct FakePersistenceAdapter {
    jobs: Arc<Mutex<Vec<Job>>>,
}

impl FakePersistenceAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.jobs.lock().clone()
    }
}

#[async_trait]
impl PersistenceAdapter for FakePersistenceAdapter {
    async fn init(&self) -> Result<(), PersistenceError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), PersistenceError> {
        Ok(())
    }

    async fn insert_job(&self, job: &Job) -> Result<(), PersistenceError> {
        self.jobs.lock().push(job.clone());
        Ok(())
    }

    async fn find_job(&self, uid: &JobId) -> Result<Option<Job>, PersistenceError> {
        Ok(self.jobs.lock().iter().find(|j| &j.uid == uid).cloned())
    }

    async fn find_jobs(&self, query: &JobQuery) -> Result<Vec<Job>, PersistenceError> {
        let mut jobs: Vec<Job> =
            self.jobs.lock().iter().filter(|j| query.matches(j)).cloned().collect();
        if let Some(limit) = query.limit {
            jobs.truncate(limit);
        }
        Ok(jobs)
    }

    async fn count_jobs(&self, query: &JobQuery) -> Result<usize, PersistenceError> {
        Ok(self.find_jobs(query).await?.len())
    }

    async fn delete_jobs(&self, query: &JobQuery) -> Result<Vec<Job>, PersistenceError> {
        let matched = self.find_jobs(query).await?;
        let matched_uids: Vec<_> = matched.iter().map(|j| j.uid).collect();
        self.jobs.lock().retain(|j| !matched_uids.contains(&j.uid));
        Ok(matched)
    }
}
