// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Quick-launch favourites referencing a slot by index.
//!
//! Favourites are stored as a JSON list the host launcher consumes. Slot
//! indices can go stale after a reconciliation reshuffles the registry;
//! resolving a stale reference is the caller's no-op concern, not ours.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FavouritesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One quick-launch entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favourite {
    pub title: String,
    /// Shortcut target, re-invokes this tool with `?id=<slot_index>`.
    pub path: String,
    pub thumbnail: String,
}

impl Favourite {
    pub fn for_slot(index: usize, label: &str, thumbnail: &Path) -> Self {
        Self {
            title: label.to_string(),
            path: format!("pwsink://?id={}", index),
            thumbnail: thumbnail.display().to_string(),
        }
    }
}

pub fn load(path: &Path) -> Result<Vec<Favourite>, FavouritesError> {
    if path.exists() {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    } else {
        Ok(Vec::new())
    }
}

/// Append a favourite, replacing any earlier entry for the same slot.
pub fn append(path: &Path, favourite: Favourite) -> Result<(), FavouritesError> {
    let mut favourites = load(path)?;
    favourites.retain(|f| f.path != favourite.path);
    favourites.push(favourite);
    fs::write(path, serde_json::to_string_pretty(&favourites)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let favourites = load(&dir.path().join("favourites.json")).unwrap();
        assert!(favourites.is_empty());
    }

    #[test]
    fn test_append_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favourites.json");

        let entry = Favourite::for_slot(3, "Kitchen", Path::new("/assets/icon_kitchen.png"));
        append(&path, entry.clone()).unwrap();

        let favourites = load(&path).unwrap();
        assert_eq!(favourites, vec![entry]);
        assert_eq!(favourites[0].path, "pwsink://?id=3");
    }

    #[test]
    fn test_reappending_same_slot_replaces_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favourites.json");

        append(&path, Favourite::for_slot(3, "Old Name", Path::new("/a.png"))).unwrap();
        append(&path, Favourite::for_slot(3, "New Name", Path::new("/b.png"))).unwrap();
        append(&path, Favourite::for_slot(4, "Other", Path::new("/c.png"))).unwrap();

        let favourites = load(&path).unwrap();
        assert_eq!(favourites.len(), 2);
        assert_eq!(favourites[0].title, "New Name");
        assert_eq!(favourites[1].title, "Other");
    }
}
