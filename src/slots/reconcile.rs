// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Registry reconciliation: rewrite the slot store from a live device
//! snapshot while preserving user customizations keyed by address.

use super::store::{SettingsEdit, Slot, SlotStore, StoreError};
use crate::audio::DeviceSnapshot;
use crate::icons::Icon;
use tracing::{debug, info};

struct Candidate {
    address: String,
    name: String,
    bluetooth: bool,
}

/// Default icon for a device seen for the first time.
fn default_icon(name: &str, bluetooth: bool) -> Icon {
    if bluetooth {
        return Icon::Bluetooth;
    }
    let name = name.to_lowercase();
    if name.contains("hdmi") {
        Icon::Hdmi
    } else if name.contains("displayport") {
        Icon::DisplayPort
    } else if name.contains("usb") {
        Icon::Usb
    } else {
        Icon::Analog
    }
}

/// Merge the snapshot into the store.
///
/// The store is rewritten in full: candidates are sorted by name (ties by
/// address) for determinism and truncated at capacity. A former slot with
/// the same address keeps its alias, icon, and hidden flag; the name is
/// always refreshed from the snapshot. The snapshot is fully materialized
/// before the first write, so a failed enumeration never empties the store.
pub fn refresh<S: SettingsEdit>(
    snapshot: &DeviceSnapshot,
    store: &mut SlotStore<S>,
) -> Result<(), StoreError> {
    let candidates = collect_candidates(snapshot);
    let former = store.list_all();
    store.clear_all()?;

    let mut written = 0;
    for candidate in candidates.iter().take(store.capacity()) {
        let slot = match former.iter().find(|s| s.address == candidate.address) {
            Some(previous) => Slot {
                address: candidate.address.clone(),
                name: candidate.name.clone(),
                alias: previous.alias.clone(),
                icon: previous.icon,
                hidden: previous.hidden,
            },
            None => Slot {
                address: candidate.address.clone(),
                name: candidate.name.clone(),
                alias: String::new(),
                icon: default_icon(&candidate.name, candidate.bluetooth),
                hidden: false,
            },
        };
        store.set(written, &slot)?;
        written += 1;
    }

    if candidates.len() > written {
        debug!(
            "dropped {} devices beyond the {} available slots",
            candidates.len() - written,
            store.capacity()
        );
    }
    info!("reconciled {} of {} discovered devices", written, candidates.len());
    Ok(())
}

/// Candidate devices: wired sinks plus Bluetooth devices, deduplicated by
/// address with Bluetooth precedence, in deterministic order.
fn collect_candidates(snapshot: &DeviceSnapshot) -> Vec<Candidate> {
    // Bluetooth-backed sinks are represented by their Bluetooth device entry
    let mut candidates: Vec<Candidate> = snapshot
        .sinks
        .iter()
        .filter(|s| s.bluetooth_address.is_none())
        .map(|s| Candidate {
            address: s.id.to_string(),
            name: s.name.clone(),
            bluetooth: false,
        })
        .collect();

    for device in &snapshot.bluetooth {
        candidates.retain(|c| c.address != device.address);
        candidates.push(Candidate {
            address: device.address.clone(),
            name: device.name.clone(),
            bluetooth: true,
        });
    }

    candidates.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.address.cmp(&b.address)));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{BluetoothDevice, SinkInfo};
    use crate::slots::store::MemorySettings;

    fn sink(id: u32, name: &str) -> SinkInfo {
        SinkInfo {
            id,
            node_name: format!("node.{}", id),
            name: name.to_string(),
            bluetooth_address: None,
        }
    }

    fn bt(address: &str, name: &str) -> BluetoothDevice {
        BluetoothDevice {
            address: address.to_string(),
            name: name.to_string(),
            connected: false,
        }
    }

    fn snapshot(sinks: Vec<SinkInfo>, bluetooth: Vec<BluetoothDevice>) -> DeviceSnapshot {
        DeviceSnapshot {
            sinks,
            bluetooth,
            default_sink_name: String::new(),
        }
    }

    #[test]
    fn test_new_devices_sorted_by_name() {
        let mut store = SlotStore::new(MemorySettings::new());
        let snap = snapshot(
            vec![sink(2, "Speakers"), sink(1, "Analog Out")],
            vec![bt("AA:BB:CC:DD:EE:FF", "JBL Flip 5")],
        );
        refresh(&snap, &mut store).unwrap();

        let all = store.list_all();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].name, "Analog Out");
        assert_eq!(all[1].name, "JBL Flip 5");
        assert_eq!(all[2].name, "Speakers");
        assert_eq!(all[1].address, "AA:BB:CC:DD:EE:FF");
        assert_eq!(all[2].address, "2");
    }

    #[test]
    fn test_default_icons_by_classification() {
        let mut store = SlotStore::new(MemorySettings::new());
        let snap = snapshot(
            vec![
                sink(1, "HDMI Output 2"),
                sink(2, "DisplayPort Audio"),
                sink(3, "USB Headset"),
                sink(4, "Built-in Analog Stereo"),
            ],
            // Bluetooth wins over any name-based classification
            vec![bt("AA:BB:CC:DD:EE:FF", "Fake HDMI Speaker")],
        );
        refresh(&snap, &mut store).unwrap();

        let icon_of = |name: &str| {
            store
                .list_all()
                .into_iter()
                .find(|s| s.name == name)
                .map(|s| s.icon)
        };
        assert_eq!(icon_of("HDMI Output 2"), Some(Icon::Hdmi));
        assert_eq!(icon_of("DisplayPort Audio"), Some(Icon::DisplayPort));
        assert_eq!(icon_of("USB Headset"), Some(Icon::Usb));
        assert_eq!(icon_of("Built-in Analog Stereo"), Some(Icon::Analog));
        assert_eq!(icon_of("Fake HDMI Speaker"), Some(Icon::Bluetooth));
    }

    #[test]
    fn test_customization_preserved_across_rescan() {
        let mut store = SlotStore::new(MemorySettings::new());
        let snap = snapshot(vec![], vec![bt("AA:BB:CC:DD:EE:FF", "JBL Flip 5")]);
        refresh(&snap, &mut store).unwrap();

        // User customizes the slot
        let mut customized = store.get(0).unwrap();
        customized.alias = "Kitchen".to_string();
        customized.icon = Icon::Kitchen;
        customized.hidden = true;
        store.set(0, &customized).unwrap();

        // Device renamed on the remote side, address unchanged
        let snap = snapshot(
            vec![sink(7, "Monitor")],
            vec![bt("AA:BB:CC:DD:EE:FF", "JBL Flip 5 Renamed")],
        );
        refresh(&snap, &mut store).unwrap();

        let kept = store
            .list_all()
            .into_iter()
            .find(|s| s.address == "AA:BB:CC:DD:EE:FF")
            .unwrap();
        assert_eq!(kept.alias, "Kitchen");
        assert_eq!(kept.icon, Icon::Kitchen);
        assert!(kept.hidden);
        // Name refreshed from the live snapshot
        assert_eq!(kept.name, "JBL Flip 5 Renamed");
    }

    #[test]
    fn test_stale_slots_dropped() {
        let mut store = SlotStore::new(MemorySettings::new());
        refresh(&snapshot(vec![sink(1, "Old")], vec![]), &mut store).unwrap();
        refresh(&snapshot(vec![sink(2, "New")], vec![]), &mut store).unwrap();

        let all = store.list_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "New");
    }

    #[test]
    fn test_idempotent_without_device_change() {
        let mut store = SlotStore::new(MemorySettings::new());
        let snap = snapshot(
            vec![sink(1, "Speakers"), sink(2, "HDMI Output")],
            vec![bt("AA:BB:CC:DD:EE:FF", "Headphones")],
        );
        refresh(&snap, &mut store).unwrap();
        let first = store.list_all();
        refresh(&snap, &mut store).unwrap();
        assert_eq!(store.list_all(), first);
    }

    #[test]
    fn test_truncation_at_capacity_is_deterministic() {
        let mut store = SlotStore::new(MemorySettings::new());
        let sinks: Vec<SinkInfo> = (0..12).map(|i| sink(i, &format!("Sink {:02}", i))).collect();
        let snap = snapshot(sinks, vec![]);

        refresh(&snap, &mut store).unwrap();
        let first = store.list_all();
        assert_eq!(first.len(), 10);
        assert_eq!(first[0].name, "Sink 00");
        assert_eq!(first[9].name, "Sink 09");

        // Same candidates produce the same survivors
        refresh(&snap, &mut store).unwrap();
        assert_eq!(store.list_all(), first);
    }

    #[test]
    fn test_bluetooth_backed_sinks_excluded() {
        let mut store = SlotStore::new(MemorySettings::new());
        let bt_sink = SinkInfo {
            id: 47,
            node_name: "bluez_output".to_string(),
            name: "JBL Flip 5".to_string(),
            bluetooth_address: Some("AA:BB:CC:DD:EE:FF".to_string()),
        };
        let snap = snapshot(
            vec![sink(1, "Speakers"), bt_sink],
            vec![bt("AA:BB:CC:DD:EE:FF", "JBL Flip 5")],
        );
        refresh(&snap, &mut store).unwrap();

        // The Bluetooth device entry represents the endpoint, not the sink
        let all = store.list_all();
        assert_eq!(all.len(), 2);
        assert_eq!(
            all.iter().filter(|s| s.address == "AA:BB:CC:DD:EE:FF").count(),
            1
        );
    }

    #[test]
    fn test_empty_snapshot_clears_store() {
        let mut store = SlotStore::new(MemorySettings::new());
        refresh(&snapshot(vec![sink(1, "Speakers")], vec![]), &mut store).unwrap();
        refresh(&snapshot(vec![], vec![]), &mut store).unwrap();
        assert!(store.list_all().is_empty());
    }
}
