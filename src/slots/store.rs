// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Slot persistence behind a key-value settings interface.
//!
//! Each slot `i` occupies the keys `name_i`, `address_i`, `alias_i`,
//! `icon_i`, `hide_i`; a slot is used iff its address is non-empty. Reads
//! fall back to empty/zero/false for missing keys, writes are durable per
//! call.

use crate::icons::Icon;
use crate::slots::{is_bluetooth_address, MAX_SLOTS};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("slot index {0} out of range")]
    OutOfRange(usize),
}

/// A persisted, user-customizable record binding a device address to
/// display preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Stable device identifier: a MAC for Bluetooth devices, an opaque
    /// sink identifier otherwise.
    pub address: String,
    /// Device's reported name, refreshed on every reconciliation.
    pub name: String,
    /// User-chosen display override, empty when unset.
    pub alias: String,
    pub icon: Icon,
    /// Hidden slots stay in the registry but never reach the menu.
    pub hidden: bool,
}

impl Slot {
    /// Display label: the alias when set, otherwise the device name.
    pub fn label(&self) -> &str {
        if self.alias.is_empty() {
            &self.name
        } else {
            &self.alias
        }
    }

    pub fn is_bluetooth(&self) -> bool {
        is_bluetooth_address(&self.address)
    }
}

/// Read-only settings access. Missing keys yield empty/zero/false.
pub trait SettingsRead {
    fn get_string(&self, key: &str) -> String;
    fn get_int(&self, key: &str) -> i64;
    fn get_bool(&self, key: &str) -> bool;
}

/// Read-write settings access. Every write is immediately durable.
pub trait SettingsEdit: SettingsRead {
    fn set_string(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn set_int(&mut self, key: &str, value: i64) -> Result<(), StoreError>;
    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError>;
}

/// Settings backed by a flat TOML table, rewritten on every set.
pub struct TomlSettings {
    path: PathBuf,
    values: BTreeMap<String, toml::Value>,
}

impl TomlSettings {
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let values = if path.exists() {
            toml::from_str(&fs::read_to_string(path)?)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    fn save(&self) -> Result<(), StoreError> {
        fs::write(&self.path, toml::to_string_pretty(&self.values)?)?;
        Ok(())
    }
}

impl SettingsRead for TomlSettings {
    fn get_string(&self, key: &str) -> String {
        self.values
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }

    fn get_int(&self, key: &str) -> i64 {
        self.values
            .get(key)
            .and_then(|v| v.as_integer())
            .unwrap_or_default()
    }

    fn get_bool(&self, key: &str) -> bool {
        self.values
            .get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or_default()
    }
}

impl SettingsEdit for TomlSettings {
    fn set_string(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .insert(key.to_string(), toml::Value::String(value.to_string()));
        self.save()
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        self.values
            .insert(key.to_string(), toml::Value::Integer(value));
        self.save()
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.values
            .insert(key.to_string(), toml::Value::Boolean(value));
        self.save()
    }
}

/// In-memory settings fake for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: BTreeMap<String, toml::Value>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsRead for MemorySettings {
    fn get_string(&self, key: &str) -> String {
        self.values
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }

    fn get_int(&self, key: &str) -> i64 {
        self.values
            .get(key)
            .and_then(|v| v.as_integer())
            .unwrap_or_default()
    }

    fn get_bool(&self, key: &str) -> bool {
        self.values
            .get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or_default()
    }
}

impl SettingsEdit for MemorySettings {
    fn set_string(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .insert(key.to_string(), toml::Value::String(value.to_string()));
        Ok(())
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        self.values
            .insert(key.to_string(), toml::Value::Integer(value));
        Ok(())
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.values
            .insert(key.to_string(), toml::Value::Boolean(value));
        Ok(())
    }
}

/// Fixed-capacity persisted slot array, indexed 0..capacity-1.
pub struct SlotStore<S> {
    settings: S,
    capacity: usize,
}

impl<S: SettingsRead> SlotStore<S> {
    pub fn new(settings: S) -> Self {
        Self::with_capacity(settings, MAX_SLOTS)
    }

    pub fn with_capacity(settings: S, capacity: usize) -> Self {
        Self { settings, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Read one slot. `None` for out-of-range indices and unused slots.
    pub fn get(&self, index: usize) -> Option<Slot> {
        if index >= self.capacity {
            return None;
        }
        let address = self.settings.get_string(&format!("address_{}", index));
        if address.is_empty() {
            return None;
        }
        Some(Slot {
            address,
            name: self.settings.get_string(&format!("name_{}", index)),
            alias: self.settings.get_string(&format!("alias_{}", index)),
            icon: Icon::from_index(self.settings.get_int(&format!("icon_{}", index))),
            hidden: self.settings.get_bool(&format!("hide_{}", index)),
        })
    }

    /// All used slots in index order.
    pub fn list_all(&self) -> Vec<Slot> {
        (0..self.capacity).filter_map(|i| self.get(i)).collect()
    }

    /// All used slots sorted by display label, ties broken by index order.
    ///
    /// This is the canonical presentation order for configured slots.
    pub fn list_sorted_by_display_name(&self) -> Vec<Slot> {
        let mut slots = self.list_all();
        // Stable sort keeps index order for equal labels
        slots.sort_by(|a, b| a.label().cmp(b.label()));
        slots
    }
}

impl<S: SettingsEdit> SlotStore<S> {
    pub fn set(&mut self, index: usize, slot: &Slot) -> Result<(), StoreError> {
        if index >= self.capacity {
            return Err(StoreError::OutOfRange(index));
        }
        debug!("writing slot {}: {} ({})", index, slot.label(), slot.address);
        self.settings
            .set_string(&format!("name_{}", index), &slot.name)?;
        self.settings
            .set_string(&format!("address_{}", index), &slot.address)?;
        self.settings
            .set_string(&format!("alias_{}", index), &slot.alias)?;
        self.settings
            .set_int(&format!("icon_{}", index), slot.icon.index())?;
        self.settings
            .set_bool(&format!("hide_{}", index), slot.hidden)?;
        Ok(())
    }

    pub fn clear(&mut self, index: usize) -> Result<(), StoreError> {
        if index >= self.capacity {
            return Err(StoreError::OutOfRange(index));
        }
        self.settings.set_string(&format!("name_{}", index), "")?;
        self.settings.set_string(&format!("address_{}", index), "")?;
        self.settings.set_string(&format!("alias_{}", index), "")?;
        self.settings.set_int(&format!("icon_{}", index), 0)?;
        self.settings.set_bool(&format!("hide_{}", index), false)?;
        Ok(())
    }

    pub fn clear_all(&mut self) -> Result<(), StoreError> {
        for index in 0..self.capacity {
            self.clear(index)?;
        }
        Ok(())
    }
}
