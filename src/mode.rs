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

use std::fmt;

use crate::geometry::Geometry;

/// Modes offered by every output
pub const BUILTIN_MODES: &[Geometry] = &[Geometry::new(1024, 768)];

const REFRESH_HZ: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeStatus {
    Ok,
    /// Larger than the screen size range or the video RAM allow
    Bad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeType {
    /// Generated by the driver instead of read from an EDID
    Builtin,
}

/// Display timings of a single mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMode {
    pub name: String,
    pub status: ModeStatus,
    pub mode_type: ModeType,
    /// Pixel clock in kHz
    pub clock: u32,

    pub hdisplay: u32,
    pub hsync_start: u32,
    pub hsync_end: u32,
    pub htotal: u32,

    pub vdisplay: u32,
    pub vsync_start: u32,
    pub vsync_end: u32,
    pub vtotal: u32,
}

impl DisplayMode {
    /// Make up timings for a `width` x `height` mode at 60 Hz
    ///
    /// There is no monitor to sync to, so the blanking intervals are
    /// just large enough to be valid.
    pub fn synthesize(width: u32, height: u32) -> Self {
        let htotal = width + 6;
        let vtotal = height + 6;

        Self {
            name: format!("{width}x{height}"),
            status: ModeStatus::Ok,
            mode_type: ModeType::Builtin,
            clock: htotal * vtotal * REFRESH_HZ / 1000,
            hdisplay: width,
            hsync_start: width + 2,
            hsync_end: width + 4,
            htotal,
            vdisplay: height,
            vsync_start: height + 2,
            vsync_end: height + 4,
            vtotal,
        }
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.hdisplay, self.vdisplay)
    }

    pub fn refresh_hz(&self) -> f64 {
        let total = f64::from(self.htotal) * f64::from(self.vtotal);

        if total == 0.0 {
            return 0.0;
        }

        f64::from(self.clock) * 1000.0 / total
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" {:.3} MHz {} {} {} {} {} {} {} {}",
            self.name,
            f64::from(self.clock) / 1000.0,
            self.hdisplay,
            self.hsync_start,
            self.hsync_end,
            self.htotal,
            self.vdisplay,
            self.vsync_start,
            self.vsync_end,
            self.vtotal
        )
    }
}

pub fn builtin_modes() -> Vec<DisplayMode> {
    BUILTIN_MODES
        .iter()
        .map(|g| DisplayMode::synthesize(g.width, g.height))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{builtin_modes, DisplayMode, ModeStatus, ModeType};

    #[test]
    fn synthesized_timings() {
        let mode = DisplayMode::synthesize(1024, 768);

        assert_eq!(mode.name, "1024x768");
        assert_eq!(mode.status, ModeStatus::Ok);
        assert_eq!(mode.mode_type, ModeType::Builtin);

        assert_eq!(
            (mode.hdisplay, mode.hsync_start, mode.hsync_end, mode.htotal),
            (1024, 1026, 1028, 1030)
        );
        assert_eq!(
            (mode.vdisplay, mode.vsync_start, mode.vsync_end, mode.vtotal),
            (768, 770, 772, 774)
        );

        // 1030 * 774 * 60 / 1000, truncated
        assert_eq!(mode.clock, 47833);

        let refresh = mode.refresh_hz();
        assert!((59.9..60.1).contains(&refresh), "refresh was {refresh}");
    }

    #[test]
    fn single_builtin_mode() {
        let modes = builtin_modes();

        assert_eq!(modes.len(), 1);
        assert_eq!(modes[0], DisplayMode::synthesize(1024, 768));
        assert_eq!(
            modes[0].to_string(),
            "\"1024x768\" 47.833 MHz 1024 1026 1028 1030 768 770 772 774"
        );
    }
}
