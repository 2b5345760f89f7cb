// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Invocation dispatch and the terminal selection menu.
//!
//! One invocation is one user action: `discover` rescans devices into the
//! slot registry, `add_fav <i>` registers a shortcut, `?id=<i>` switches
//! directly (shortcut target), and no arguments opens the selection menu.

use crate::audio::{PipewireProvider, SinkProvider};
use crate::config::{AppConfig, ConfigManager};
use crate::favourites::{self, Favourite};
use crate::icons::{icon_path, Icon, IconVariant};
use crate::menu::{self, Menu};
use crate::notify::{DesktopNotifier, Notifier};
use crate::slots::{refresh, SlotStore, TomlSettings};
use crate::switcher;
use regex::Regex;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::OnceLock;
use tracing::warn;

pub fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let manager = ConfigManager::new()?;
    let config = manager.load_config()?;
    // First run: materialize the defaults so the settings are discoverable
    if !manager.config_path().exists() {
        manager.save_config(&config)?;
    }
    let settings = TomlSettings::load(&manager.slots_path())?;
    let mut store = SlotStore::new(settings);
    let provider = PipewireProvider::new();
    let notifier = DesktopNotifier;

    let argv: Vec<&str> = args.iter().map(String::as_str).collect();
    match argv.as_slice() {
        ["discover"] => discover(&provider, &mut store),
        ["add_fav", index] => add_favourite(&manager, &config, &store, index, &notifier),
        [query, ..] if query.starts_with("?id") => {
            launch_shortcut(&provider, &manager, &config, &store, query, &notifier)
        }
        _ => select(&provider, &manager, &config, &store, &notifier),
    }
}

/// Rescan live devices into the slot registry.
fn discover(
    provider: &dyn SinkProvider,
    store: &mut SlotStore<TomlSettings>,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = provider.snapshot()?;
    refresh(&snapshot, store)?;
    println!("Discovered {} output device(s).", store.list_all().len());
    Ok(())
}

/// Register a quick-launch favourite for a slot.
fn add_favourite(
    manager: &ConfigManager,
    config: &AppConfig,
    store: &SlotStore<TomlSettings>,
    raw_index: &str,
    notifier: &dyn Notifier,
) -> Result<(), Box<dyn std::error::Error>> {
    let index = match raw_index.parse::<usize>() {
        Ok(index) => index,
        Err(_) => {
            warn!("invalid slot index '{}'", raw_index);
            return Ok(());
        }
    };
    let slot = match store.get(index) {
        Some(slot) => slot,
        None => {
            // Shortcut references go stale after a rescan; not a fault
            warn!("slot {} is unused or out of range", index);
            return Ok(());
        }
    };

    let assets = manager.assets_dir(config);
    let thumbnail = icon_path(&assets, slot.icon, IconVariant::Plain);
    favourites::append(
        &manager.favourites_path(),
        Favourite::for_slot(index, slot.label(), &thumbnail),
    )?;
    notifier.notify("Favourite added", slot.label(), &thumbnail);
    Ok(())
}

/// Direct switch via a `?id=<slot_index>` shortcut target, no menu shown.
fn launch_shortcut(
    provider: &dyn SinkProvider,
    manager: &ConfigManager,
    config: &AppConfig,
    store: &SlotStore<TomlSettings>,
    query: &str,
    notifier: &dyn Notifier,
) -> Result<(), Box<dyn std::error::Error>> {
    static QUERY: OnceLock<Regex> = OnceLock::new();
    let pattern = QUERY
        .get_or_init(|| Regex::new(r"^\?id=([0-9]+)$").expect("hardcoded pattern is valid"));

    let index = match pattern
        .captures(query)
        .and_then(|captures| captures[1].parse::<usize>().ok())
    {
        Some(index) => index,
        None => {
            warn!("unrecognized shortcut query '{}'", query);
            return Ok(());
        }
    };
    let slot = match store.get(index) {
        Some(slot) => slot,
        None => {
            warn!("slot {} is unused or out of range", index);
            return Ok(());
        }
    };

    let assets = manager.assets_dir(config);
    perform_switch(provider, config, &slot, &assets, notifier)
}

/// Present the selection menu and act on the user's choice.
fn select(
    provider: &dyn SinkProvider,
    manager: &ConfigManager,
    config: &AppConfig,
    store: &SlotStore<TomlSettings>,
    notifier: &dyn Notifier,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = provider.snapshot()?;
    let menu = menu::build_menu(store, &snapshot);
    if menu.is_empty() {
        println!("No outputs configured yet. Run `pwsink discover` first.");
        return Ok(());
    }

    present(&menu);
    let choice = match read_choice(io::stdin().lock(), &menu)? {
        Some(choice) => choice,
        None => return Ok(()),
    };

    let assets = manager.assets_dir(config);
    if menu.is_disconnect_choice(choice) {
        match switcher::disconnect_current(provider) {
            Ok(()) => {
                if let Some(target) = &menu.disconnect {
                    notifier.notify(
                        "Bluetooth",
                        &format!("Disconnected {}", target),
                        &icon_path(&assets, Icon::Disconnect, IconVariant::Plain),
                    );
                }
            }
            Err(e) => warn!("disconnect failed: {}", e),
        }
        return Ok(());
    }

    match menu.slots.get(choice) {
        Some(slot) => perform_switch(provider, config, slot, &assets, notifier),
        None => Ok(()),
    }
}

/// Execute the switch and notify the outcome.
fn perform_switch(
    provider: &dyn SinkProvider,
    config: &AppConfig,
    slot: &crate::slots::Slot,
    assets: &Path,
    notifier: &dyn Notifier,
) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = switcher::switch_to(provider, slot, config.switch.retries, config.switch.reconnect)?;
    let icon = icon_path(assets, outcome.icon, outcome.variant);
    if outcome.success {
        notifier.notify(
            "Output switched",
            &format!("Now playing through {}", outcome.label),
            &icon,
        );
    } else {
        notifier.notify(
            "Switch failed",
            &format!("Could not switch to {}", outcome.label),
            &icon,
        );
    }
    Ok(())
}

fn present(menu: &Menu) {
    println!("Audio outputs:");
    for (i, entry) in menu.entries.iter().enumerate() {
        let marker = if entry.preselect { '*' } else { ' ' };
        match entry.sublabel() {
            Some(sublabel) => println!(" {}{:>2}. {} ({})", marker, i + 1, entry.label, sublabel),
            None => println!(" {}{:>2}. {}", marker, i + 1, entry.label),
        }
    }
}

/// Read a 1-based entry choice. An empty line keeps the preselected entry;
/// anything unparseable or out of range cancels.
fn read_choice(input: impl BufRead, menu: &Menu) -> Result<Option<usize>, io::Error> {
    match menu.preselect {
        Some(preselect) => print!("Select output [{}]: ", preselect + 1),
        None => print!("Select output: "),
    }
    io::stdout().flush()?;

    let mut line = String::new();
    let mut input = input;
    input.read_line(&mut line)?;
    let line = line.trim();

    if line.is_empty() {
        return Ok(menu.preselect);
    }
    match line.parse::<usize>() {
        Ok(number) if number >= 1 && number <= menu.entries.len() => Ok(Some(number - 1)),
        _ => {
            println!("No such entry.");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::MenuEntry;

    fn menu_with(entries: usize, preselect: Option<usize>) -> Menu {
        Menu {
            entries: (0..entries)
                .map(|i| MenuEntry {
                    label: format!("Entry {}", i),
                    sublabels: Vec::new(),
                    icon: Icon::Analog,
                    variant: IconVariant::Plain,
                    preselect: Some(i) == preselect,
                })
                .collect(),
            slots: Vec::new(),
            preselect,
            disconnect: None,
        }
    }

    #[test]
    fn test_read_choice_number() {
        let menu = menu_with(3, None);
        assert_eq!(read_choice("2\n".as_bytes(), &menu).unwrap(), Some(1));
    }

    #[test]
    fn test_read_choice_empty_uses_preselect() {
        let menu = menu_with(3, Some(2));
        assert_eq!(read_choice("\n".as_bytes(), &menu).unwrap(), Some(2));

        let no_preselect = menu_with(3, None);
        assert_eq!(read_choice("\n".as_bytes(), &no_preselect).unwrap(), None);
    }

    #[test]
    fn test_read_choice_out_of_range_cancels() {
        let menu = menu_with(3, None);
        assert_eq!(read_choice("4\n".as_bytes(), &menu).unwrap(), None);
        assert_eq!(read_choice("0\n".as_bytes(), &menu).unwrap(), None);
        assert_eq!(read_choice("abc\n".as_bytes(), &menu).unwrap(), None);
    }
}
