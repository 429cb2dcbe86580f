// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hosting-provider webhook payload shapes consumed by the Event
//! Handler (spec §4.1, §6).

use serde::Deserialize;
use thiserror::Error;

/// Errors decoding a raw webhook payload into a typed event.
#[derive(Debug, Error)]
pub enum EventDecodeError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("unrecognized ref shape: {0}")]
    BadRef(String),
}

/// Actions the PR event policy recognizes (spec §4.1). Any other
/// action string is ignored by the Event Handler, not rejected here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRequestAction {
    Opened,
    Reopened,
    Synchronize,
    Labeled,
    Unlabeled,
    Closed,
    Created,
    Other,
}

impl PullRequestAction {
    pub fn parse(action: &str) -> Self {
        match action {
            "opened" => Self::Opened,
            "reopened" => Self::Reopened,
            "synchronize" => Self::Synchronize,
            "labeled" => Self::Labeled,
            "unlabeled" => Self::Unlabeled,
            "closed" => Self::Closed,
            "created" => Self::Created,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestHeadUser {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestHead {
    pub sha: String,
    pub user: PullRequestHeadUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestBaseRepo {
    pub clone_url: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestBase {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
    pub repo: PullRequestBaseRepo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestLinks {
    pub html: PullRequestLink,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestLink {
    pub href: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestLabel {
    pub name: String,
}

/// The `pull_request` object of a PR webhook payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestPayload {
    pub title: String,
    pub number: u64,
    pub merge_commit_sha: Option<String>,
    pub head: PullRequestHead,
    pub base: PullRequestBase,
    #[serde(rename = "_links")]
    pub links: PullRequestLinks,
    pub mergeable: Option<bool>,
    pub labels: Vec<PullRequestLabel>,
}

/// Top-level PR webhook event.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    pub action: String,
    pub pull_request: PullRequestPayload,
    /// Present only for `labeled`/`unlabeled` actions.
    pub label: Option<PullRequestLabel>,
}

/// Top-level push webhook event.
#[derive(Debug, Clone, Deserialize)]
pub struct PushEvent {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub after: String,
}

/// Git's conventional all-zero SHA, signaling ref deletion (spec
/// §4.1 step 2).
pub const ZERO_SHA: &str = "0000000000000000000000000000000000000000";

/// Ref kind parsed from a `refs/{heads,tags}/{name}` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Heads,
    Tags,
}

impl PushEvent {
    /// Split `self.ref_name` into `(kind, short name)`, e.g.
    /// `refs/heads/main` -> `(Heads, "main")`.
    pub fn parse_ref(&self) -> Result<(RefKind, &str), EventDecodeError> {
        let mut parts = self.ref_name.rsplitn(3, '/');
        let name = parts.next().ok_or_else(|| EventDecodeError::BadRef(self.ref_name.clone()))?;
        let kind = parts.next().ok_or_else(|| EventDecodeError::BadRef(self.ref_name.clone()))?;
        let kind = match kind {
            "heads" => RefKind::Heads,
            "tags" => RefKind::Tags,
            _ => return Err(EventDecodeError::BadRef(self.ref_name.clone())),
        };
        Ok((kind, name))
    }

    pub fn is_deletion(&self) -> bool {
        self.after == ZERO_SHA
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
