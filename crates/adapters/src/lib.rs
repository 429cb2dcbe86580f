// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter traits for the two external collaborators the dispatch
//! core consumes: the source-hosting provider and the build
//! execution backend (spec §6). Each trait ships a `Fake`
//! implementation behind the `test-support` feature for use by other
//! crates' tests.

pub mod execution;
pub mod hosting;

pub use execution::{ExecutionAdapter, ExecutionError, JobStatusUpdate};
pub use hosting::{CommitState, CommitStatusUpdate, HostingAdapter, HostingError};
