// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Observer Fan-out: broadcasts state-change messages to subscribed
//! listeners, tolerating per-observer failure (spec §4.7, §7).

use std::collections::HashMap;

use ciq_core::ObserverId;
use ciq_wire::ObserverMessage;
use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Registry of subscribed observer channels.
///
/// Subscribe and unsubscribe are idempotent: subscribing twice with
/// the same id replaces the handle, and unsubscribing an id that
/// isn't present is a no-op.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Mutex<HashMap<ObserverId, mpsc::UnboundedSender<ObserverMessage>>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, id: ObserverId, tx: mpsc::UnboundedSender<ObserverMessage>) {
        self.observers.lock().insert(id, tx);
    }

    pub fn unsubscribe(&self, id: &ObserverId) {
        self.observers.lock().remove(id);
    }

    pub fn len(&self) -> usize {
        self.observers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fan out `msg` to every subscribed observer. A send failure on
    /// one observer (its receiver was dropped) drops only that
    /// observer; the rest still receive the message.
    pub fn notify(&self, msg: ObserverMessage) {
        let mut dead = Vec::new();
        {
            let observers = self.observers.lock();
            for (id, tx) in observers.iter() {
                if tx.send(msg.clone()).is_err() {
                    dead.push(id.clone());
                }
            }
        }
        if !dead.is_empty() {
            let mut observers = self.observers.lock();
            for id in dead {
                observers.remove(&id);
            }
        }
    }

    /// Shorthand for `notify({cmd:"reload"})` (spec §4.7), called at
    /// every state-transition boundary.
    pub fn reload_jobs(&self) {
        self.notify(ObserverMessage::reload());
    }
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod tests;
