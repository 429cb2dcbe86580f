// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Source-hosting adapter: commit metadata, build configuration, and
//! status/comment callbacks (spec §6, consumed interface).

use async_trait::async_trait;
use ciq_core::{BuildConfig, Commit, Job};
use thiserror::Error;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeHostingAdapter, HostingCall};

/// Errors from hosting-adapter operations.
#[derive(Debug, Error)]
pub enum HostingError {
    #[error("commit not found: {0}")]
    CommitNotFound(String),
    #[error("build config fetch failed: {0}")]
    ConfigFetchFailed(String),
    #[error("status update failed: {0}")]
    StatusUpdateFailed(String),
    #[error("comment post failed: {0}")]
    CommentFailed(String),
}

/// Commit-status state reported to the hosting provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitState {
    Pending,
    Success,
    Failure,
}

ciq_core::simple_display! {
    CommitState {
        Pending => "pending",
        Success => "success",
        Failure => "failure",
    }
}

/// One commit-status update, as posted via `setCommitStatus`.
#[derive(Debug, Clone)]
pub struct CommitStatusUpdate {
    pub state: CommitState,
    pub context: String,
    pub description: String,
    pub target_url: Option<String>,
}

impl CommitStatusUpdate {
    pub fn pending(description: impl Into<String>) -> Self {
        Self {
            state: CommitState::Pending,
            context: "ci".to_string(),
            description: description.into(),
            target_url: None,
        }
    }

    pub fn with_target_url(mut self, url: impl Into<String>) -> Self {
        self.target_url = Some(url.into());
        self
    }

    pub fn terminal(state: CommitState, description: impl Into<String>) -> Self {
        Self {
            state,
            context: "ci".to_string(),
            description: description.into(),
            target_url: None,
        }
    }
}

/// Adapter for the source-hosting provider (e.g. commit metadata,
/// commit statuses, PR comments).
#[async_trait]
pub trait HostingAdapter: Clone + Send + Sync + 'static {
    /// Fetch commit metadata for `sha`. Returns `None` if the hosting
    /// provider has no such commit (spec §7: abort silently, log).
    async fn fetch_commit_info(&self, sha: &str) -> Result<Option<Commit>, HostingError>;

    /// Fetch the per-commit build configuration.
    async fn fetch_build_config(&self, sha: &str) -> Result<BuildConfig, HostingError>;

    /// Post a commit-status update for `sha`.
    async fn set_commit_status(
        &self,
        sha: &str,
        update: CommitStatusUpdate,
    ) -> Result<(), HostingError>;

    /// Post a PR comment summarizing a finished job.
    async fn comment_on_pr(&self, job: &Job) -> Result<(), HostingError>;
}

#[cfg(test)]
#[path = "hosting_tests.rs"]
mod tests;
