// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Snapshot types for live sinks and Bluetooth endpoints.

/// An audio sink as reported by the PipeWire server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkInfo {
    /// PipeWire node id.
    pub id: u32,
    /// `node.name` property, used to resolve the default sink.
    pub node_name: String,
    /// Display name (`node.description`, falling back to `node.name`).
    pub name: String,
    /// `api.bluez5.address` when this sink is backed by a Bluetooth device.
    pub bluetooth_address: Option<String>,
}

/// A paired Bluetooth device as reported by BlueZ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BluetoothDevice {
    pub address: String,
    pub name: String,
    pub connected: bool,
}

/// A point-in-time read of the live device state. Transient, never persisted.
#[derive(Debug, Clone, Default)]
pub struct DeviceSnapshot {
    pub sinks: Vec<SinkInfo>,
    pub bluetooth: Vec<BluetoothDevice>,
    /// Display name of the server's current default sink.
    pub default_sink_name: String,
}

impl DeviceSnapshot {
    /// Addresses of the Bluetooth devices that are currently connected.
    pub fn connected_bluetooth(&self) -> Vec<&str> {
        self.bluetooth
            .iter()
            .filter(|d| d.connected)
            .map(|d| d.address.as_str())
            .collect()
    }
}
