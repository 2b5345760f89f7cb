// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Switch execution and outcome mapping for presentation.

use crate::audio::{ProviderError, SinkProvider};
use crate::icons::{Icon, IconVariant};
use crate::slots::store::Slot;
use tracing::{info, warn};

/// Result of a switch attempt, ready for a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchOutcome {
    pub success: bool,
    pub label: String,
    pub icon: Icon,
    pub variant: IconVariant,
}

/// Switch the default sink to the slot's device.
///
/// Retry/reconnect execution belongs to the provider; this only passes the
/// configured parameters through and maps the result. A `false` from the
/// provider is an ordinary failure outcome, not an error.
pub fn switch_to(
    provider: &dyn SinkProvider,
    slot: &Slot,
    retries: u32,
    reconnect: bool,
) -> Result<SwitchOutcome, ProviderError> {
    let success = provider.switch_sink(&slot.address, retries, reconnect)?;
    let label = slot.label().to_string();
    if success {
        info!("switched output to {}", label);
    } else {
        warn!("failed to switch output to {}", label);
    }
    Ok(SwitchOutcome {
        success,
        label,
        icon: slot.icon,
        variant: if success {
            IconVariant::Active
        } else {
            IconVariant::Plain
        },
    })
}

/// Disconnect the currently connected Bluetooth output.
pub fn disconnect_current(provider: &dyn SinkProvider) -> Result<(), ProviderError> {
    provider.disconnect_bluetooth()
}
