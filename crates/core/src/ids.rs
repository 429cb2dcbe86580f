// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ID types shared across crate boundaries that don't belong to the
//! job model itself.

use crate::define_id;

define_id! {
    /// Opaque identifier for one observer-channel subscription.
    pub struct ObserverId("obs-");
}

#[cfg(test)]
#[path = "ids_tests.rs"]
mod tests;
