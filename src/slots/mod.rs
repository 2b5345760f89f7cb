// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Persistent device slots: storage, reconciliation against the live
//! device list, and the Bluetooth address predicate.

pub mod reconcile;
pub mod store;

pub use reconcile::refresh;
pub use store::{MemorySettings, SettingsEdit, SettingsRead, Slot, SlotStore, StoreError, TomlSettings};

use regex::Regex;
use std::sync::OnceLock;

/// Number of persisted slots. The settings layout enforces this cap, so the
/// reconciler silently drops devices beyond it.
pub const MAX_SLOTS: usize = 10;

/// Whether an address is a Bluetooth MAC (six uppercase hex octets).
///
/// Wired sinks carry an opaque numeric identifier instead, so this predicate
/// is what distinguishes the two kinds within the uniform slot record.
pub fn is_bluetooth_address(address: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9A-F]{2}(:[0-9A-F]{2}){5}$").expect("hardcoded pattern is valid")
    });
    pattern.is_match(address)
}
