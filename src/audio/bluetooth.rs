// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! BlueZ device enumeration and connection control via bluetoothctl.

use super::types::BluetoothDevice;
use super::ProviderError;
use std::process::Command;
use tracing::{debug, warn};

/// List paired Bluetooth devices with their connection state.
///
/// A machine without a Bluetooth stack is not an error: wired sinks must
/// still be switchable, so an unreachable bluetoothctl yields an empty list.
pub fn enumerate_devices() -> Vec<BluetoothDevice> {
    let listing = match Command::new("bluetoothctl").arg("devices").output() {
        Ok(output) => String::from_utf8_lossy(&output.stdout).to_string(),
        Err(e) => {
            warn!("bluetoothctl unavailable, skipping Bluetooth devices: {}", e);
            return Vec::new();
        }
    };

    let mut devices = Vec::new();
    for (address, name) in parse_device_listing(&listing) {
        let connected = device_connected(&address);
        debug!("bluetooth device {} ({}) connected={}", name, address, connected);
        devices.push(BluetoothDevice {
            address,
            name,
            connected,
        });
    }
    devices
}

/// Connect a Bluetooth device by address.
pub fn connect(address: &str) -> Result<(), ProviderError> {
    debug!("connecting bluetooth device {}", address);
    let output = Command::new("bluetoothctl")
        .args(["connect", address])
        .output()
        .map_err(|e| ProviderError::Unavailable(format!("bluetoothctl: {}", e)))?;

    if !output.status.success() {
        return Err(ProviderError::CommandFailed {
            command: "bluetoothctl connect",
            message: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        });
    }
    Ok(())
}

/// Disconnect the currently connected Bluetooth device.
pub fn disconnect() -> Result<(), ProviderError> {
    debug!("disconnecting current bluetooth device");
    let output = Command::new("bluetoothctl")
        .arg("disconnect")
        .output()
        .map_err(|e| ProviderError::Unavailable(format!("bluetoothctl: {}", e)))?;

    if !output.status.success() {
        return Err(ProviderError::CommandFailed {
            command: "bluetoothctl disconnect",
            message: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        });
    }
    Ok(())
}

fn device_connected(address: &str) -> bool {
    match Command::new("bluetoothctl").args(["info", address]).output() {
        Ok(output) => parse_connected(&String::from_utf8_lossy(&output.stdout)),
        Err(_) => false,
    }
}

/// Parse `bluetoothctl devices` output lines of the form
/// `Device AA:BB:CC:DD:EE:FF Some Name`.
fn parse_device_listing(listing: &str) -> Vec<(String, String)> {
    listing
        .lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix("Device ")?;
            let (address, name) = rest.split_once(' ')?;
            Some((address.to_string(), name.to_string()))
        })
        .collect()
}

/// Check a `bluetoothctl info` dump for a connected state.
fn parse_connected(info: &str) -> bool {
    info.lines().any(|line| line.trim() == "Connected: yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_device_listing() {
        let listing = "Device AA:BB:CC:DD:EE:FF JBL Flip 5\n\
                       Device 11:22:33:44:55:66 Sony WH-1000XM4\n";
        let devices = parse_device_listing(listing);
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].0, "AA:BB:CC:DD:EE:FF");
        assert_eq!(devices[0].1, "JBL Flip 5");
        assert_eq!(devices[1].1, "Sony WH-1000XM4");
    }

    #[test]
    fn test_parse_device_listing_skips_noise() {
        let listing = "Agent registered\nDevice AA:BB:CC:DD:EE:FF Speaker\nmalformed\n";
        let devices = parse_device_listing(listing);
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].0, "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn test_parse_connected() {
        let info = "Device AA:BB:CC:DD:EE:FF (public)\n\
                    \tName: Speaker\n\
                    \tConnected: yes\n";
        assert!(parse_connected(info));
        assert!(!parse_connected("\tConnected: no\n"));
        assert!(!parse_connected(""));
    }
}
