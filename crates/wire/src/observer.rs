// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound observer-channel payloads (spec §4.7, §6).

use serde::Serialize;
use serde_json::Value;

/// A message broadcast to every subscribed observer. Serializes to
/// one of the two JSON shapes the spec's observer channel contract
/// names: `{cmd:"reload"}` and `{cmd:"status", uid, ...}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
pub enum ObserverMessage {
    Reload,
    Status { uid: String, status: Value },
}

impl ObserverMessage {
    pub fn reload() -> Self {
        ObserverMessage::Reload
    }

    pub fn status(uid: impl Into<String>, status: Value) -> Self {
        ObserverMessage::Status { uid: uid.into(), status }
    }
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod tests;
