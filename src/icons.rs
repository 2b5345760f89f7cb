// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Icon table for slots and notifications.
//!
//! The discriminant is the persisted `icon_<i>` value, so the variant order
//! must never change.

use std::path::{Path, PathBuf};

/// Fixed icon enumeration for device slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Analog = 0,
    Hdmi = 1,
    DisplayPort = 2,
    Usb = 3,
    Bluetooth = 4,
    Stereo = 5,
    Speaker = 6,
    Headphones = 7,
    LivingRoom = 8,
    Bedroom = 9,
    Kitchen = 10,
    Bathroom = 11,
    Hall = 12,
    Combine = 13,
    Default = 14,
    Disconnect = 15,
}

impl Icon {
    /// Resolve a persisted icon index. Unknown indices fall back to
    /// [`Icon::Default`] so a corrupted settings file cannot crash a lookup.
    pub fn from_index(index: i64) -> Self {
        match index {
            0 => Self::Analog,
            1 => Self::Hdmi,
            2 => Self::DisplayPort,
            3 => Self::Usb,
            4 => Self::Bluetooth,
            5 => Self::Stereo,
            6 => Self::Speaker,
            7 => Self::Headphones,
            8 => Self::LivingRoom,
            9 => Self::Bedroom,
            10 => Self::Kitchen,
            11 => Self::Bathroom,
            12 => Self::Hall,
            13 => Self::Combine,
            14 => Self::Default,
            15 => Self::Disconnect,
            _ => Self::Default,
        }
    }

    /// The persisted index for this icon.
    pub fn index(self) -> i64 {
        self as i64
    }

    /// Asset file stem for this icon.
    fn stem(self) -> &'static str {
        match self {
            Self::Analog => "icon_analog",
            Self::Hdmi => "icon_hdmi",
            Self::DisplayPort => "icon_dp",
            Self::Usb => "icon_usb",
            Self::Bluetooth => "icon_bluetooth",
            Self::Stereo => "icon_stereo",
            Self::Speaker => "icon_speaker",
            Self::Headphones => "icon_headphones",
            Self::LivingRoom => "icon_livingroom",
            Self::Bedroom => "icon_bedroom",
            Self::Kitchen => "icon_kitchen",
            Self::Bathroom => "icon_bathroom",
            Self::Hall => "icon_hall",
            Self::Combine => "icon_combine",
            Self::Default => "icon_default",
            Self::Disconnect => "icon_disconnect",
        }
    }
}

/// Visual variant of an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconVariant {
    Plain,
    Active,
    Connected,
}

impl IconVariant {
    /// Variant for an entry's state. Active takes visual precedence over
    /// connected.
    pub fn for_state(active: bool, connected: bool) -> Self {
        if active {
            Self::Active
        } else if connected {
            Self::Connected
        } else {
            Self::Plain
        }
    }
}

/// Path to the asset file for an icon in a given variant.
pub fn icon_path(assets_dir: &Path, icon: Icon, variant: IconVariant) -> PathBuf {
    let stem = icon.stem();
    let file = match variant {
        IconVariant::Plain => format!("{}.png", stem),
        IconVariant::Active => format!("{}_active.png", stem),
        IconVariant::Connected => format!("{}_connected.png", stem),
    };
    assets_dir.join(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for index in 0..16 {
            assert_eq!(Icon::from_index(index).index(), index);
        }
    }

    #[test]
    fn test_unknown_index_falls_back_to_default() {
        assert_eq!(Icon::from_index(-1), Icon::Default);
        assert_eq!(Icon::from_index(16), Icon::Default);
        assert_eq!(Icon::from_index(999), Icon::Default);
    }

    #[test]
    fn test_variant_precedence() {
        assert_eq!(IconVariant::for_state(true, true), IconVariant::Active);
        assert_eq!(IconVariant::for_state(true, false), IconVariant::Active);
        assert_eq!(IconVariant::for_state(false, true), IconVariant::Connected);
        assert_eq!(IconVariant::for_state(false, false), IconVariant::Plain);
    }

    #[test]
    fn test_icon_path_variants() {
        let dir = Path::new("/tmp/assets");
        assert_eq!(
            icon_path(dir, Icon::Hdmi, IconVariant::Plain),
            dir.join("icon_hdmi.png")
        );
        assert_eq!(
            icon_path(dir, Icon::Hdmi, IconVariant::Active),
            dir.join("icon_hdmi_active.png")
        );
        assert_eq!(
            icon_path(dir, Icon::Bluetooth, IconVariant::Connected),
            dir.join("icon_bluetooth_connected.png")
        );
    }
}
