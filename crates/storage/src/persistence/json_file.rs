// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A finished-job store: one JSON file per job under a directory.
//! Grounded on the teacher's `serde_json` + `tracing::warn!`-on-
//! failure persistence idiom, trimmed to a narrow finished-job-only
//! store since durable queue state is explicitly a non-goal.

use std::path::PathBuf;

use async_trait::async_trait;
use ciq_core::{Job, JobId};
use tracing::warn;

use super::{JobQuery, PersistenceAdapter, PersistenceError};

/// Persists finished jobs as `{dir}/{uid}.json` files.
pub struct JsonFilePersistence {
    dir: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, uid: &str) -> PathBuf {
        self.dir.join(format!("{uid}.json"))
    }

    async fn read_all(&self) -> Result<Vec<Job>, PersistenceError> {
        let mut jobs = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(jobs),
            Err(err) => return Err(err.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match tokio::fs::read(&path).await {
                Ok(bytes) => match serde_json::from_slice::<Job>(&bytes) {
                    Ok(job) => jobs.push(job),
                    Err(err) => warn!(path = %path.display(), %err, "failed to decode finished job"),
                },
                Err(err) => warn!(path = %path.display(), %err, "failed to read finished job"),
            }
        }
        Ok(jobs)
    }
}

#[async_trait]
impl PersistenceAdapter for JsonFilePersistence {
    async fn init(&self) -> Result<(), PersistenceError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), PersistenceError> {
        Ok(())
    }

    async fn insert_job(&self, job: &Job) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec_pretty(job)?;
        let path = self.path_for(job.uid.as_str());
        if let Err(err) = tokio::fs::write(&path, bytes).await {
            warn!(uid = %job.uid, %err, "failed to persist finished job");
            return Err(err.into());
        }
        Ok(())
    }

    async fn find_job(&self, uid: &JobId) -> Result<Option<Job>, PersistenceError> {
        let path = self.path_for(uid.as_str());
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_jobs(&self, query: &JobQuery) -> Result<Vec<Job>, PersistenceError> {
        let mut jobs: Vec<Job> = self.read_all().await?.into_iter().filter(|j| query.matches(j)).collect();
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
        for job in &matched {
            let path = self.path_for(job.uid.as_str());
            if let Err(err) = tokio::fs::remove_file(&path).await {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!(uid = %job.uid, %err, "failed to delete finished job");
                }
            }
        }
        Ok(matched)
    }
}

#[cfg(test)]
#[path = "json_file_tests.rs"]
mod tests;
