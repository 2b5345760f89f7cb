// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Audio server access: device enumeration and sink switching.

pub mod bluetooth;
pub mod pipewire;
pub mod types;

pub use pipewire::PipewireProvider;
pub use types::{BluetoothDevice, DeviceSnapshot, SinkInfo};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The audio or Bluetooth layer cannot be reached at all. Fatal to the
    /// current invocation.
    #[error("audio server unavailable: {0}")]
    Unavailable(String),
    #[error("{command} failed: {message}")]
    CommandFailed {
        command: &'static str,
        message: String,
    },
    #[error("failed to parse device listing: {0}")]
    Parse(String),
}

/// Access to the live device list and the low-level switch primitive.
pub trait SinkProvider {
    /// Read the current sinks, Bluetooth devices, and default sink.
    fn snapshot(&self) -> Result<DeviceSnapshot, ProviderError>;

    /// Make the device identified by `address` the default sink.
    ///
    /// Retry and reconnect execution is owned by the provider; callers only
    /// pass the configured parameters through. `Ok(false)` means the switch
    /// did not take effect after all attempts, which is an ordinary,
    /// reportable failure rather than an error.
    fn switch_sink(
        &self,
        address: &str,
        retries: u32,
        reconnect: bool,
    ) -> Result<bool, ProviderError>;

    /// Disconnect the currently connected Bluetooth output.
    fn disconnect_bluetooth(&self) -> Result<(), ProviderError>;
}
