// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! pwsink - PipeWire output switcher with persistent device slots.
//!
//! Lets a user name, order, hide, and quickly switch between audio outputs
//! (wired sinks and Bluetooth endpoints), preserving customizations across
//! device rescans.

mod audio;
mod cli;
mod config;
mod favourites;
mod icons;
mod menu;
mod notify;
mod slots;
mod switcher;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("pwsink=info".parse().unwrap()))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    cli::run(&args)
}
