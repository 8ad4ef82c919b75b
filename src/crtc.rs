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

//! CRTCs and outputs without anything behind them.
//!
//! The server's output configuration needs at least one CRTC driving one
//! connected output before it will pick a mode. These satisfy it: every
//! output is connected, takes any mode and reports the built-in mode list.

use log::debug;

use crate::host::ScreenHost;
use crate::mode::{builtin_modes, DisplayMode, ModeStatus};

/// Upper bound for the `num_outputs` option
pub const MAX_OUTPUTS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Rotate0,
    Rotate90,
    Rotate180,
    Rotate270,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpmsMode {
    On,
    Standby,
    Suspend,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStatus {
    Connected,
    Disconnected,
    Unknown,
}

/// Hooks the server calls on a CRTC
pub trait CrtcFuncs {
    fn set_mode_major(&mut self, mode: &DisplayMode, rotation: Rotation, x: i32, y: i32) -> bool;
    fn dpms(&mut self, mode: DpmsMode);
}

/// Hooks the server calls on an output
pub trait OutputFuncs {
    fn detect(&self) -> OutputStatus;
    fn mode_valid(&self, mode: &DisplayMode) -> ModeStatus;
    fn get_modes(&self) -> Vec<DisplayMode>;
    fn dpms(&mut self, mode: DpmsMode);
}

/// Hooks the server's CRTC configuration layer calls on the screen
pub trait CrtcConfigFuncs {
    /// Resize the screen, returns false if the old size stays in effect
    fn resize(&mut self, host: &mut dyn ScreenHost, width: u32, height: u32) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub struct VncCrtc {
    index: u32,
    mode: Option<DisplayMode>,
    x: i32,
    y: i32,
    rotation: Rotation,
}

impl VncCrtc {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            mode: None,
            x: 0,
            y: 0,
            rotation: Rotation::Rotate0,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn mode(&self) -> Option<&DisplayMode> {
        self.mode.as_ref()
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }
}

impl CrtcFuncs for VncCrtc {
    fn set_mode_major(&mut self, mode: &DisplayMode, rotation: Rotation, x: i32, y: i32) -> bool {
        debug!("CRTC {}: mode {} at {x},{y}", self.index, mode.name);

        self.mode = Some(mode.clone());
        self.x = x;
        self.y = y;
        self.rotation = rotation;

        true
    }

    fn dpms(&mut self, _: DpmsMode) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VncOutput {
    index: u32,
    name: String,
}

impl VncOutput {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            name: format!("vnc-{index}"),
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bitmask of the CRTCs that can drive this output
    ///
    /// Every output is tied to the CRTC with the same index.
    pub fn possible_crtcs(&self) -> u32 {
        1 << self.index
    }

    /// Bitmask of the outputs this one can mirror
    pub fn possible_clones(&self) -> u32 {
        0
    }
}

impl OutputFuncs for VncOutput {
    fn detect(&self) -> OutputStatus {
        OutputStatus::Connected
    }

    fn mode_valid(&self, _: &DisplayMode) -> ModeStatus {
        ModeStatus::Ok
    }

    fn get_modes(&self) -> Vec<DisplayMode> {
        builtin_modes()
    }

    fn dpms(&mut self, _: DpmsMode) {}
}

#[cfg(test)]
mod tests {
    use super::{CrtcFuncs, DpmsMode, OutputFuncs, OutputStatus, Rotation, VncCrtc, VncOutput};
    use crate::mode::{DisplayMode, ModeStatus};

    #[test]
    fn outputs_are_always_connected() {
        let mut output = VncOutput::new(3);

        assert_eq!(output.name(), "vnc-3");
        assert_eq!(output.possible_crtcs(), 0b1000);
        assert_eq!(output.possible_clones(), 0);
        assert_eq!(output.detect(), OutputStatus::Connected);

        output.dpms(DpmsMode::Off);
        assert_eq!(output.detect(), OutputStatus::Connected);

        let odd = DisplayMode::synthesize(123, 45);
        assert_eq!(output.mode_valid(&odd), ModeStatus::Ok);

        let modes = output.get_modes();
        assert_eq!(modes.len(), 1);
        assert_eq!(modes[0].name, "1024x768");
    }

    #[test]
    fn crtc_remembers_mode() {
        let mut crtc = VncCrtc::new(0);
        assert!(crtc.mode().is_none());

        let mode = DisplayMode::synthesize(1024, 768);
        assert!(crtc.set_mode_major(&mode, Rotation::Rotate90, 10, 20));

        assert_eq!(crtc.mode(), Some(&mode));
        assert_eq!(crtc.position(), (10, 20));
        assert_eq!(crtc.rotation(), Rotation::Rotate90);

        crtc.dpms(DpmsMode::Standby);
        assert_eq!(crtc.mode(), Some(&mode));
    }
}
