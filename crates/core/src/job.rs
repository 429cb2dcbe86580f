// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Job data model: the unit of work flowing through the dispatch core.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::define_id;

define_id! {
    /// Opaque identifier for a [`Job`].
    pub struct JobId("job-");
}

/// A commit snapshot as reported by the hosting adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    pub author: String,
}

/// Pull-request metadata attached to a PR-triggered job.
///
/// `labels` is kept sorted ascending at construction time for
/// deterministic comparisons and display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestInfo {
    pub number: u64,
    pub title: String,
    pub user: String,
    pub url: String,
    pub merge_commit: Option<String>,
    pub base_repo: String,
    pub base_branch: String,
    pub base_commit: String,
    pub base_full_name: String,
    pub mergeable: bool,
    pub labels: Vec<String>,
}

impl PullRequestInfo {
    /// Sort labels ascending, as the event handler requires at ingest time.
    pub fn sort_labels(&mut self) {
        self.labels.sort();
    }
}

/// What caused a job to be created. Exactly one of pull-request or
/// ref is ever meaningful; modeled as an enum so that invariant is a
/// compile-time property rather than a pair of optional fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Trigger {
    PullRequest(PullRequestInfo),
    Ref(String),
}

impl Trigger {
    pub fn pr_number(&self) -> Option<u64> {
        match self {
            Trigger::PullRequest(pr) => Some(pr.number),
            Trigger::Ref(_) => None,
        }
    }

    pub fn ref_name(&self) -> Option<&str> {
        match self {
            Trigger::Ref(r) => Some(r.as_str()),
            Trigger::PullRequest(_) => None,
        }
    }
}

/// Push-event ref acceptance policy: which branches/tags get built.
///
/// Each rule is matched against a candidate ref name as: literal
/// `"*"`, exact string match, or regex match.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PushPolicy {
    pub branches: Vec<String>,
    pub tags: Vec<String>,
}

/// Commit-message based skip policy.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CommitPolicy {
    pub skip_keywords: Vec<String>,
}

/// Pull-request specific build policy.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PrPolicy {
    pub enable_comments: bool,
}

/// Per-commit build configuration, as returned by the hosting
/// adapter's `fetchBuildConfig`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BuildConfig {
    pub commit: CommitPolicy,
    pub push: PushPolicy,
    pub pr: PrPolicy,
}

/// Process-wide dispatcher configuration (spec §6, §12).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    pub num_workers: usize,
    pub cancel_on_update: bool,
    pub base_url: String,
    pub work_dir: String,
    pub ready_label: Option<String>,
    /// PR label that derives `Job::fasttracked` (spec §3, GLOSSARY).
    /// Unlike `ready_label` this never blocks scheduling; it only
    /// affects priority once every worker is busy.
    pub fasttrack_label: Option<String>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            num_workers: 1,
            cancel_on_update: true,
            base_url: String::new(),
            work_dir: String::new(),
            ready_label: None,
            fasttrack_label: None,
        }
    }
}

/// The lifecycle phase of a job's status, transitioning monotonically
/// `queued -> working -> finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobPhase {
    Queued,
    Working,
    Finished,
}

crate::simple_display! {
    JobPhase {
        Queued => "queued",
        Working => "working",
        Finished => "finished",
    }
}

/// Mutable live-progress record, updated by the Execution adapter via
/// `handleJobStatusData`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatus {
    pub phase: JobPhase,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl JobStatus {
    pub fn queued() -> Self {
        Self { phase: JobPhase::Queued, extra: HashMap::new() }
    }
}

/// Terminal outcome of a job. `Unset` until execution completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobResult {
    Unset,
    Passed,
    Errored,
    Stopped,
}

crate::simple_display! {
    JobResult {
        Unset => "unset",
        Passed => "passed",
        Errored => "errored",
        Stopped => "stopped",
    }
}

/// One build request: commit, trigger, config, and mutable lifecycle
/// state (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub uid: JobId,
    pub commit: Commit,
    pub trigger: Trigger,
    pub config: BuildConfig,
    pub fasttracked: bool,
    pub status: JobStatus,
    pub result: JobResult,
    pub canceled: bool,
    pub start_time_epoch_ms: Option<u64>,
    pub stop_time_epoch_ms: Option<u64>,
}

impl Job {
    /// Construct a freshly-arrived, not-yet-queued job.
    ///
    /// `fasttracked` is derived by the Event Handler from PR
    /// labels/config before the job is built; it is not recomputed
    /// here.
    pub fn new(commit: Commit, trigger: Trigger, config: BuildConfig, fasttracked: bool) -> Self {
        Self {
            uid: JobId::new(),
            commit,
            trigger,
            config,
            fasttracked,
            status: JobStatus::queued(),
            result: JobResult::Unset,
            canceled: false,
            start_time_epoch_ms: None,
            stop_time_epoch_ms: None,
        }
    }

    pub fn pr_number(&self) -> Option<u64> {
        self.trigger.pr_number()
    }

    pub fn ref_name(&self) -> Option<&str> {
        self.trigger.ref_name()
    }

    pub fn pull_request(&self) -> Option<&PullRequestInfo> {
        match &self.trigger {
            Trigger::PullRequest(pr) => Some(pr),
            Trigger::Ref(_) => None,
        }
    }

    /// Human-readable runtime, used in the final commit status
    /// description (spec §4.5).
    pub fn runtime_human(&self) -> String {
        match (self.start_time_epoch_ms, self.stop_time_epoch_ms) {
            (Some(start), Some(stop)) if stop >= start => {
                let secs = (stop - start) / 1000;
                format!("{}m{}s", secs / 60, secs % 60)
            }
            _ => "unknown".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
