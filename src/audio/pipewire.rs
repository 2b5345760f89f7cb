// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! PipeWire sink enumeration and default-sink switching via the CLI tools.
//!
//! Uses `pw-dump` for enumeration, `pw-metadata` for the default sink, and
//! `wpctl set-default` for switching.

use super::bluetooth;
use super::types::{DeviceSnapshot, SinkInfo};
use super::{ProviderError, SinkProvider};
use crate::slots::is_bluetooth_address;
use regex::Regex;
use serde_json::Value;
use std::process::Command;
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Delay between switch attempts, long enough for a Bluetooth sink to
/// appear after a reconnect.
const RETRY_DELAY: Duration = Duration::from_millis(1500);

/// Snapshot provider backed by the PipeWire and BlueZ command-line tools.
pub struct PipewireProvider;

impl PipewireProvider {
    pub fn new() -> Self {
        Self
    }

    fn enumerate_sinks(&self) -> Result<Vec<SinkInfo>, ProviderError> {
        let output = Command::new("pw-dump")
            .output()
            .map_err(|e| ProviderError::Unavailable(format!("pw-dump: {}", e)))?;
        if !output.status.success() {
            return Err(ProviderError::Unavailable(
                "pw-dump exited with an error".to_string(),
            ));
        }
        parse_sinks(&String::from_utf8_lossy(&output.stdout))
    }

    /// `node.name` of the current default sink, empty when unset.
    fn default_sink_node(&self) -> Result<String, ProviderError> {
        let output = Command::new("pw-metadata")
            .args(["0", "default.audio.sink"])
            .output()
            .map_err(|e| ProviderError::Unavailable(format!("pw-metadata: {}", e)))?;
        Ok(parse_default_sink(&String::from_utf8_lossy(&output.stdout)).unwrap_or_default())
    }

    fn set_default(&self, node_id: u32) -> Result<bool, ProviderError> {
        let output = Command::new("wpctl")
            .args(["set-default", &node_id.to_string()])
            .output()
            .map_err(|e| ProviderError::Unavailable(format!("wpctl: {}", e)))?;
        if !output.status.success() {
            warn!(
                "wpctl set-default {} failed: {}",
                node_id,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(output.status.success())
    }

    /// Resolve a slot address to a live sink. Bluetooth slots match on the
    /// sink's bluez address, wired slots on the node id.
    fn find_target(&self, address: &str) -> Result<Option<SinkInfo>, ProviderError> {
        let sinks = self.enumerate_sinks()?;
        if is_bluetooth_address(address) {
            Ok(sinks
                .into_iter()
                .find(|s| s.bluetooth_address.as_deref() == Some(address)))
        } else {
            Ok(sinks.into_iter().find(|s| s.id.to_string() == address))
        }
    }
}

impl Default for PipewireProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SinkProvider for PipewireProvider {
    fn snapshot(&self) -> Result<DeviceSnapshot, ProviderError> {
        let sinks = self.enumerate_sinks()?;
        let bluetooth = bluetooth::enumerate_devices();
        let default_node = self.default_sink_node()?;
        let default_sink_name = sinks
            .iter()
            .find(|s| s.node_name == default_node)
            .map(|s| s.name.clone())
            .unwrap_or(default_node);
        debug!(
            "snapshot: {} sinks, {} bluetooth devices, default '{}'",
            sinks.len(),
            bluetooth.len(),
            default_sink_name
        );
        Ok(DeviceSnapshot {
            sinks,
            bluetooth,
            default_sink_name,
        })
    }

    fn switch_sink(
        &self,
        address: &str,
        retries: u32,
        reconnect: bool,
    ) -> Result<bool, ProviderError> {
        for attempt in 0..=retries {
            if attempt > 0 {
                thread::sleep(RETRY_DELAY);
            }
            match self.find_target(address)? {
                Some(sink) => {
                    if self.set_default(sink.id)? {
                        info!("default sink set to node {} ({})", sink.id, sink.name);
                        return Ok(true);
                    }
                }
                None if reconnect && is_bluetooth_address(address) => {
                    debug!("sink for {} absent, attempting Bluetooth reconnect", address);
                    if let Err(e) = bluetooth::connect(address) {
                        warn!("bluetooth reconnect failed: {}", e);
                    }
                }
                None => {
                    debug!("no live sink matches {}", address);
                }
            }
        }
        Ok(false)
    }

    fn disconnect_bluetooth(&self) -> Result<(), ProviderError> {
        bluetooth::disconnect()
    }
}

/// Extract Audio/Sink nodes from `pw-dump` JSON output.
fn parse_sinks(json: &str) -> Result<Vec<SinkInfo>, ProviderError> {
    let objects: Value =
        serde_json::from_str(json).map_err(|e| ProviderError::Parse(e.to_string()))?;
    let array = objects
        .as_array()
        .ok_or_else(|| ProviderError::Parse("expected a JSON array".to_string()))?;

    let mut sinks = Vec::new();
    for object in array {
        if object["type"].as_str() != Some("PipeWire:Interface:Node") {
            continue;
        }
        let props = &object["info"]["props"];
        if props["media.class"].as_str() != Some("Audio/Sink") {
            continue;
        }
        let id = match object["id"].as_u64() {
            Some(id) => id as u32,
            None => continue,
        };
        let node_name = props["node.name"].as_str().unwrap_or_default().to_string();
        let description = props["node.description"].as_str().unwrap_or_default();
        let name = if description.is_empty() {
            node_name.clone()
        } else {
            description.to_string()
        };
        let bluetooth_address = props["api.bluez5.address"]
            .as_str()
            .map(|s| s.to_uppercase());
        sinks.push(SinkInfo {
            id,
            node_name,
            name,
            bluetooth_address,
        });
    }
    Ok(sinks)
}

/// Extract the node name from `pw-metadata 0 default.audio.sink` output:
/// `update: id:0 key:'default.audio.sink' value:'{"name":"alsa_output..."}' ...`
fn parse_default_sink(output: &str) -> Option<String> {
    static NAME: OnceLock<Regex> = OnceLock::new();
    let pattern = NAME.get_or_init(|| {
        Regex::new(r#""name"\s*:\s*"([^"]+)""#).expect("hardcoded pattern is valid")
    });
    pattern
        .captures(output)
        .map(|captures| captures[1].to_string())
}
