// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-only `HostingAdapter` recording every call it receives.

use std::sync::Arc;

use async_trait::async_trait;
use ciq_core::{BuildConfig, Commit, Job};
use parking_lot::Mutex;

use super::{CommitStatusUpdate, HostingAdapter, HostingError};

/// One recorded call made through a [`FakeHostingAdapter`].
#[derive(Debug, Clone)]
pub enum HostingCall {
    FetchCommitInfo(String),
    FetchBuildConfig(String),
    SetCommitStatus(String, CommitStatusUpdate),
    CommentOnPr(String),
}

#[derive(Default)]
struct Inner {
    commits: std::collections::HashMap<String, Commit>,
    configs: std::collections::HashMap<String, BuildConfig>,
    calls: Vec<HostingCall>,
}

/// In-memory `HostingAdapter` for tests: commits and configs are
/// seeded up front, every call is recorded for assertion.
#[derive(Clone, Default)]
pub struct FakeHostingAdapter {
    inner: Arc<Mutex<Inner>>,
}

impl FakeHostingAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_commit(&self, sha: impl Into<String>, commit: Commit) {
        self.inner.lock().commits.insert(sha.into(), commit);
    }

    pub fn seed_config(&self, sha: impl Into<String>, config: BuildConfig) {
        self.inner.lock().configs.insert(sha.into(), config);
    }

    pub fn calls(&self) -> Vec<HostingCall> {
        self.inner.lock().calls.clone()
    }

    pub fn statuses_for(&self, sha: &str) -> Vec<CommitStatusUpdate> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                HostingCall::SetCommitStatus(s, update) if s == sha => Some(update.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl HostingAdapter for FakeHostingAdapter {
    async fn fetch_commit_info(&self, sha: &str) -> Result<Option<Commit>, HostingError> {
        let mut inner = self.inner.lock();
        inner.calls.push(HostingCall::FetchCommitInfo(sha.to_string()));
        Ok(inner.commits.get(sha).cloned())
    }

    async fn fetch_build_config(&self, sha: &str) -> Result<BuildConfig, HostingError> {
        let mut inner = self.inner.lock();
        inner.calls.push(HostingCall::FetchBuildConfig(sha.to_string()));
        Ok(inner.configs.get(sha).cloned().unwrap_or_default())
    }

    async fn set_commit_status(
        &self,
        sha: &str,
        update: CommitStatusUpdate,
    ) -> Result<(), HostingError> {
        self.inner
            .lock()
            .calls
            .push(HostingCall::SetCommitStatus(sha.to_string(), update));
        Ok(())
    }

    async fn comment_on_pr(&self, job: &Job) -> Result<(), HostingError> {
        self.inner.lock().calls.push(HostingCall::CommentOnPr(job.uid.to_string()));
        Ok(())
    }
}
