// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire-format DTOs: inbound hosting-provider webhook payloads and
//! outbound observer-channel messages (spec §4.1, §4.7, §6).

pub mod event;
pub mod observer;

pub use event::{
    EventDecodeError, PullRequestAction, PullRequestBase, PullRequestBaseRepo, PullRequestEvent,
    PullRequestHead, PullRequestHeadUser, PullRequestLabel, PullRequestLink, PullRequestLinks,
    PullRequestPayload, PushEvent, RefKind, ZERO_SHA,
};
pub use observer::ObserverMessage;
