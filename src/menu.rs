// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Selection menu construction from the slot store and the live snapshot.

use crate::audio::DeviceSnapshot;
use crate::icons::{Icon, IconVariant};
use crate::slots::store::{SettingsRead, Slot, SlotStore};

pub const ACTIVE_FLAG: &str = "Active";
pub const CONNECTED_FLAG: &str = "Connected";
pub const DISCONNECT_LABEL: &str = "Disconnect Bluetooth output";

/// One renderable menu row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    /// State flags ("Active", "Connected") for slot entries; the target
    /// device label for the disconnect entry.
    pub sublabels: Vec<String>,
    pub icon: Icon,
    pub variant: IconVariant,
    pub preselect: bool,
}

impl MenuEntry {
    /// Sublabels joined for single-line presentation.
    pub fn sublabel(&self) -> Option<String> {
        if self.sublabels.is_empty() {
            None
        } else {
            Some(self.sublabels.join(", "))
        }
    }
}

/// A built selection menu. `slots[i]` backs `entries[i]`; when a disconnect
/// entry is present it is the last entry and has no backing slot.
#[derive(Debug, Clone, Default)]
pub struct Menu {
    pub entries: Vec<MenuEntry>,
    pub slots: Vec<Slot>,
    /// Position of the active entry, if any.
    pub preselect: Option<usize>,
    /// Label of the connected Bluetooth output, when one exists. Also
    /// signals that a disconnect entry was appended.
    pub disconnect: Option<String>,
}

impl Menu {
    /// No visible slots: the caller should route the user to configuration
    /// instead of presenting an empty list.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether `choice` selects the synthetic disconnect entry.
    pub fn is_disconnect_choice(&self, choice: usize) -> bool {
        self.disconnect.is_some() && choice + 1 == self.entries.len()
    }
}

/// Build the ranked, annotated menu of visible slots.
pub fn build_menu<S: SettingsRead>(store: &SlotStore<S>, snapshot: &DeviceSnapshot) -> Menu {
    let connected = snapshot.connected_bluetooth();

    let mut menu = Menu::default();
    for slot in store
        .list_sorted_by_display_name()
        .into_iter()
        .filter(|s| !s.hidden)
    {
        let label = slot.label().to_string();
        let mut sublabels = Vec::new();

        let is_active = slot.name == snapshot.default_sink_name;
        if is_active {
            menu.preselect = Some(menu.entries.len());
            sublabels.push(ACTIVE_FLAG.to_string());
        }

        let is_connected = slot.is_bluetooth() && connected.contains(&slot.address.as_str());
        if is_connected {
            // At most one Bluetooth output is expected connected; last wins
            menu.disconnect = Some(label.clone());
            sublabels.push(CONNECTED_FLAG.to_string());
        }

        menu.entries.push(MenuEntry {
            label,
            sublabels,
            icon: slot.icon,
            variant: IconVariant::for_state(is_active, is_connected),
            preselect: is_active,
        });
        menu.slots.push(slot);
    }

    if let Some(target) = menu.disconnect.clone() {
        menu.entries.push(MenuEntry {
            label: DISCONNECT_LABEL.to_string(),
            sublabels: vec![target],
            icon: Icon::Disconnect,
            variant: IconVariant::Plain,
            preselect: false,
        });
    }

    menu
}
