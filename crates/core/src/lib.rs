// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Domain-agnostic primitives shared by every `ciq-*` crate: IDs,
//! clocks, the job model, and the boilerplate macros that generate
//! builders and setters for them.

pub mod clock;
pub mod error;
pub mod id;
pub mod ids;
#[macro_use]
pub mod macros;
pub mod job;

pub use clock::{Clock, FakeClock, SystemClock};
pub use error::DispatchError;
pub use ids::ObserverId;
pub use job::{
    BuildConfig, Commit, CommitPolicy, DispatcherConfig, Job, JobId, JobPhase, JobResult,
    JobStatus, PrPolicy, PullRequestInfo, PushPolicy, Trigger,
};
