// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! User-facing result notifications.

use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// Presentation sink for one-shot heading+message+icon notifications.
pub trait Notifier {
    fn notify(&self, heading: &str, message: &str, icon: &Path);
}

/// Sends desktop notifications with `notify-send`, degrading to terminal
/// output when no notification service is reachable.
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, heading: &str, message: &str, icon: &Path) {
        debug!("notify: {}: {}", heading, message);
        let result = Command::new("notify-send")
            .arg("--app-name")
            .arg("pwsink")
            .arg("--icon")
            .arg(icon)
            .arg(heading)
            .arg(message)
            .status();
        match result {
            Ok(status) if status.success() => {}
            Ok(status) => warn!("notify-send exited with {}", status),
            Err(e) => {
                warn!("notify-send unavailable: {}", e);
                println!("{}: {}", heading, message);
            }
        }
    }
}
