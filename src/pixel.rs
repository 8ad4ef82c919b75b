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

use anyhow::{bail, Result};
use serde::Deserialize;

/// Color depths the driver can present to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum Depth {
    D8,
    D15,
    D16,
    D24,
    D30,
}

impl Depth {
    pub fn bits(self) -> u8 {
        match self {
            Self::D8 => 8,
            Self::D15 => 15,
            Self::D16 => 16,
            Self::D24 => 24,
            Self::D30 => 30,
        }
    }

    /// The framebuffer layout picked when none is configured.
    ///
    /// Depth 24 prefers 32 bpp over the packed layout.
    pub fn default_bits_per_pixel(self) -> u8 {
        match self {
            Self::D8 => 8,
            Self::D15 | Self::D16 => 16,
            Self::D24 | Self::D30 => 32,
        }
    }
}

impl Default for Depth {
    fn default() -> Self {
        Self::D24
    }
}

impl TryFrom<u8> for Depth {
    type Error = String;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            8 => Ok(Self::D8),
            15 => Ok(Self::D15),
            16 => Ok(Self::D16),
            24 => Ok(Self::D24),
            30 => Ok(Self::D30),
            _ => Err(format!(
                "Given depth ({bits}) is not supported by this driver"
            )),
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Depth and framebuffer bits per pixel of the root window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    depth: Depth,
    bits_per_pixel: u8,
}

impl PixelFormat {
    pub fn new(depth: Depth, bits_per_pixel: Option<u8>) -> Result<Self> {
        let bits_per_pixel = bits_per_pixel.unwrap_or_else(|| depth.default_bits_per_pixel());

        let supported = match depth {
            Depth::D8 => bits_per_pixel == 8,
            Depth::D15 | Depth::D16 => bits_per_pixel == 16,
            Depth::D24 => bits_per_pixel == 24 || bits_per_pixel == 32,
            Depth::D30 => bits_per_pixel == 32,
        };

        if !supported {
            bail!("Depth {depth} can not be used with a {bits_per_pixel} bpp framebuffer");
        }

        Ok(Self {
            depth,
            bits_per_pixel,
        })
    }

    pub fn depth(&self) -> Depth {
        self.depth
    }

    pub fn bits_per_pixel(&self) -> u8 {
        self.bits_per_pixel
    }

    pub fn bytes_per_pixel(&self) -> u32 {
        u32::from(self.bits_per_pixel / 8)
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        Self {
            depth: Depth::D24,
            bits_per_pixel: 32,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "depth {}, {} bpp", self.depth, self.bits_per_pixel)
    }
}

#[cfg(test)]
mod tests {
    use super::{Depth, PixelFormat};

    #[test]
    fn default_layouts() {
        let expected = [
            (Depth::D8, 8, 1),
            (Depth::D15, 16, 2),
            (Depth::D16, 16, 2),
            (Depth::D24, 32, 4),
            (Depth::D30, 32, 4),
        ];

        for (depth, bpp, bytes) in expected {
            let format = PixelFormat::new(depth, None).unwrap();
            assert_eq!(format.bits_per_pixel(), bpp);
            assert_eq!(format.bytes_per_pixel(), bytes);
        }
    }

    #[test]
    fn packed_24bpp_is_allowed_for_depth_24_only() {
        let packed = PixelFormat::new(Depth::D24, Some(24)).unwrap();
        assert_eq!(packed.bytes_per_pixel(), 3);

        assert!(PixelFormat::new(Depth::D30, Some(24)).is_err());
        assert!(PixelFormat::new(Depth::D16, Some(32)).is_err());
        assert!(PixelFormat::new(Depth::D8, Some(16)).is_err());
    }

    #[test]
    fn unsupported_depths_are_rejected() {
        assert_eq!(Depth::try_from(24), Ok(Depth::D24));
        assert!(Depth::try_from(1).is_err());
        assert!(Depth::try_from(32).is_err());
    }
}
