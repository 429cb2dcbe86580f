// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types shared by the dispatch core's public operations.

use thiserror::Error;

/// Errors from the dispatch core's own public operations (as opposed
/// to adapter-boundary errors, which live in `ciq-adapters` and
/// `ciq-storage`).
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("job {0} not found")]
    JobNotFound(String),

    #[error("unsupported event action: {0}")]
    UnsupportedAction(String),

    #[error("malformed event payload: {0}")]
    MalformedEvent(String),
}
