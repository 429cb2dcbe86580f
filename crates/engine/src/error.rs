// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by the dispatch core's own operations, as
//! distinct from adapter-boundary errors (spec §7).

use thiserror::Error;

use ciq_adapters::{ExecutionError, HostingError};
use ciq_storage::PersistenceError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Dispatch(#[from] ciq_core::DispatchError),

    #[error(transparent)]
    Hosting(#[from] HostingError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
