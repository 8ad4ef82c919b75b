// This file is part of vncdrv, a virtual framebuffer display driver for VNC
// Copyright (C) 2026 The vncdrv developers
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

use std::env::var_os;
use std::process::Command;

use chrono::prelude::Utc;

/// Run a command in the crate directory and return its trimmed stdout
///
/// Returns `None` if the command could not be run or did not succeed,
/// e.g. when building from a source tarball without a git checkout.
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let dir = var_os("CARGO_MANIFEST_DIR")?;

    let output = Command::new(program)
        .args(args)
        .current_dir(&dir)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    Some(
        String::from_utf8_lossy(&output.stdout)
            .trim_end()
            .to_string(),
    )
}

/// Generates a version string
/// `vncdrv 0.1.0 (b9ff258-dirty @ 2019-11-05 14:13:49) with rustc 1.75.0`
fn generate_version_string() {
    let git_hash_str = command_output("git", &["describe", "--always", "--dirty=-dirty"])
        .unwrap_or_else(|| "unknown".to_string());

    let rustc_version_str =
        command_output("rustc", &["-V"]).unwrap_or_else(|| "unknown rustc".to_string());

    println!(
        "cargo:rustc-env=VERSION_STRING={} {} ({} @ {}) with {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        git_hash_str,
        Utc::now().format("%Y-%m-%d %T"),
        rustc_version_str
    )
}

fn main() {
    generate_version_string();
}
