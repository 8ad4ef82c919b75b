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
use std::str::FromStr;

use anyhow::{anyhow, Context, Error};

use crate::pixel::PixelFormat;

pub const MAX_WIDTH: u32 = 32767;
pub const MAX_HEIGHT: u32 = 32767;

/// Lower bound of the screen size range announced to the CRTC configuration
pub const MIN_WIDTH: u32 = 256;
pub const MIN_HEIGHT: u32 = 256;

/// Size of the virtual screen in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Bytes per scanline
    pub fn stride(&self, format: &PixelFormat) -> u32 {
        self.width * format.bytes_per_pixel()
    }

    /// Size of a framebuffer backing this geometry
    ///
    /// Returns `None` if the size does not fit into the address space.
    pub fn fb_bytes(&self, format: &PixelFormat) -> Option<usize> {
        let width = usize::try_from(self.width).ok()?;
        let height = usize::try_from(self.height).ok()?;
        let bpp = usize::try_from(format.bytes_per_pixel()).ok()?;

        width.checked_mul(height)?.checked_mul(bpp)
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Geometry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .split_once('x')
            .ok_or_else(|| anyhow!("Expected a geometry like 1024x768, got \"{s}\""))?;

        let width = width
            .trim()
            .parse()
            .with_context(|| format!("Invalid width in \"{s}\""))?;
        let height = height
            .trim()
            .parse()
            .with_context(|| format!("Invalid height in \"{s}\""))?;

        Ok(Self { width, height })
    }
}
