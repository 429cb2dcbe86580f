// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The WaitingSet + RunningSet: the dispatch core's single source of
//! truth, mutated exclusively through the operations in this crate
//! and always under one lock (spec §3, §5).

use std::collections::{HashMap, VecDeque};

use ciq_core::{Job, JobId};

/// All in-flight job state: every job (queued or running) keyed by
/// id, the two priority lanes (by id, FIFO), and the fixed-capacity
/// running-slot array.
///
/// Held behind a single `parking_lot::Mutex` by [`crate::Dispatcher`]
/// — no field here is ever locked independently.
pub struct DispatchState {
    jobs: HashMap<JobId, Job>,
    waiting_normal: VecDeque<JobId>,
    waiting_fasttrack: VecDeque<JobId>,
    /// Fixed-capacity slot array; invariant `len == num_workers`.
    running_slots: Vec<Option<JobId>>,
}

impl DispatchState {
    pub fn new(num_workers: usize) -> Self {
        Self {
            jobs: HashMap::new(),
            waiting_normal: VecDeque::new(),
            waiting_fasttrack: VecDeque::new(),
            running_slots: vec![None; num_workers.max(1)],
        }
    }

    pub fn get(&self, uid: &JobId) -> Option<&Job> {
        self.jobs.get(uid)
    }

    pub fn get_mut(&mut self, uid: &JobId) -> Option<&mut Job> {
        self.jobs.get_mut(uid)
    }

    /// Number of currently occupied running slots.
    pub fn occupied_running_slots(&self) -> usize {
        self.running_slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn num_workers(&self) -> usize {
        self.running_slots.len()
    }

    /// True iff every running slot is currently occupied. Callers
    /// that need the *pre-insertion* value (spec §9) must call this
    /// before inserting the candidate job anywhere.
    pub fn all_workers_busy(&self) -> bool {
        self.occupied_running_slots() >= self.running_slots.len()
    }

    pub fn is_waiting(&self, uid: &JobId) -> bool {
        self.waiting_normal.contains(uid) || self.waiting_fasttrack.contains(uid)
    }

    pub fn is_running(&self, uid: &JobId) -> bool {
        self.running_slots.iter().any(|s| s.as_ref() == Some(uid))
    }

    pub fn waiting_jobs(&self) -> Vec<&Job> {
        self.waiting_fasttrack
            .iter()
            .chain(self.waiting_normal.iter())
            .filter_map(|id| self.jobs.get(id))
            .collect()
    }

    pub fn running_jobs(&self) -> Vec<&Job> {
        self.running_slots.iter().filter_map(|s| s.as_ref()).filter_map(|id| self.jobs.get(id)).collect()
    }

    pub fn all_jobs(&self) -> Vec<&Job> {
        self.jobs.values().collect()
    }

    pub(crate) fn jobs_mut(&mut self) -> &mut HashMap<JobId, Job> {
        &mut self.jobs
    }

    pub(crate) fn waiting_normal_mut(&mut self) -> &mut VecDeque<JobId> {
        &mut self.waiting_normal
    }

    pub(crate) fn waiting_fasttrack_mut(&mut self) -> &mut VecDeque<JobId> {
        &mut self.waiting_fasttrack
    }

    pub(crate) fn running_slots_mut(&mut self) -> &mut Vec<Option<JobId>> {
        &mut self.running_slots
    }

    /// Occupy the first free running slot with `uid`. Returns
    /// `false` if every slot is already taken (callers only invoke
    /// this right after a successful dequeue, so this should not
    /// happen in practice).
    pub(crate) fn occupy_slot(&mut self, uid: JobId) -> bool {
        if let Some(slot) = self.running_slots.iter_mut().find(|s| s.is_none()) {
            *slot = Some(uid);
            true
        } else {
            false
        }
    }

    /// Clear whichever slot holds `uid`, if any.
    pub(crate) fn vacate_slot(&mut self, uid: &JobId) {
        if let Some(slot) = self.running_slots.iter_mut().find(|s| s.as_ref() == Some(uid)) {
            *slot = None;
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
