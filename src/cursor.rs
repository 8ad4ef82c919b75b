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

use crate::host::CursorHost;

pub const MAX_CURSOR_SIZE: u32 = 64;

/// What the "hardware" cursor can do, as announced to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorInfo {
    pub max_width: u32,
    pub max_height: u32,
    pub truecolor_at_8bpp: bool,
}

impl Default for CursorInfo {
    fn default() -> Self {
        Self {
            max_width: MAX_CURSOR_SIZE,
            max_height: MAX_CURSOR_SIZE,
            truecolor_at_8bpp: true,
        }
    }
}

/// Hooks the server's cursor layer calls on a hardware cursor
pub trait HwCursorFuncs {
    fn show_cursor(&mut self);
    fn hide_cursor(&mut self);
    fn set_cursor_position(&mut self, x: i32, y: i32);
    fn set_cursor_colors(&mut self, bg: u32, fg: u32);
    fn load_cursor_image(&mut self, bits: &[u8]);
    fn use_hw_cursor(&self) -> bool;
}

/// Cursor state kept on behalf of the server
///
/// Nothing is ever drawn. The state is only remembered so a VNC server
/// can pick it up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VncCursor {
    sw_cursor: bool,
    shown: bool,
    x: i32,
    y: i32,
    fg: u32,
    bg: u32,
}

impl VncCursor {
    pub fn new(sw_cursor: bool) -> Self {
        Self {
            sw_cursor,
            ..Default::default()
        }
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Background and foreground color
    pub fn colors(&self) -> (u32, u32) {
        (self.bg, self.fg)
    }
}

impl HwCursorFuncs for VncCursor {
    fn show_cursor(&mut self) {
        self.shown = true;
    }

    fn hide_cursor(&mut self) {
        self.shown = false;
    }

    fn set_cursor_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    fn set_cursor_colors(&mut self, bg: u32, fg: u32) {
        self.bg = bg;
        self.fg = fg;
    }

    fn load_cursor_image(&mut self, _: &[u8]) {}

    fn use_hw_cursor(&self) -> bool {
        !self.sw_cursor
    }
}

/// Register the hardware cursor with the server
///
/// Returns the cursor state on success, `None` if the server refused it.
pub fn cursor_init<H: CursorHost + ?Sized>(host: &mut H) -> Option<VncCursor> {
    if host.init_hw_cursor(&CursorInfo::default()) {
        Some(VncCursor::new(false))
    } else {
        None
    }
}
