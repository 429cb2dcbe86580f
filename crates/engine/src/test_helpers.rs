// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test harness: a [`Dispatcher`] wired to fakes plus a
//! convenience job builder.

use std::sync::Arc;

use ciq_adapters::{FakeExecutionAdapter, FakeHostingAdapter};
use ciq_core::{BuildConfig, Commit, DispatcherConfig, FakeClock, Job, Trigger};
use ciq_storage::FakePersistenceAdapter;

use crate::dispatcher::Dispatcher;

pub type TestDispatcher =
    Dispatcher<FakeHostingAdapter, FakeExecutionAdapter, FakePersistenceAdapter, FakeClock>;

pub struct Harness {
    pub dispatcher: Arc<TestDispatcher>,
    pub hosting: FakeHostingAdapter,
    pub execution: FakeExecutionAdapter,
    pub persistence: FakePersistenceAdapter,
    pub clock: FakeClock,
}

pub async fn harness(num_workers: usize) -> Harness {
    harness_with(DispatcherConfig { num_workers, ..Default::default() }).await
}

pub async fn harness_with(config: DispatcherConfig) -> Harness {
    let hosting = FakeHostingAdapter::new();
    let execution = FakeExecutionAdapter::new();
    let persistence = FakePersistenceAdapter::new();
    let clock = FakeClock::new();

    let dispatcher = Dispatcher::new(
        hosting.clone(),
        execution.clone(),
        persistence.clone(),
        clock.clone(),
        config,
    )
    .await
    .expect("dispatcher construction");

    Harness { dispatcher, hosting, execution, persistence, clock }
}

impl Harness {
    pub fn seeded_commit(&self, sha: &str) -> Commit {
        let commit = Commit { sha: sha.to_string(), message: "fix things".to_string(), author: "dev".to_string() };
        self.hosting.seed_commit(sha, commit.clone());
        commit
    }

    pub fn ref_job(&self, sha: &str, ref_name: &str, config: BuildConfig, fasttracked: bool) -> Job {
        Job::new(self.seeded_commit(sha), Trigger::Ref(ref_name.to_string()), config, fasttracked)
    }
}
