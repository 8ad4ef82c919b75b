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

use crate::geometry::{MAX_HEIGHT, MAX_WIDTH};

/// Why a screen size was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SizeRejection {
    #[error("width and height must be non-zero")]
    ZeroSize,
    #[error("exceeds the maximum of {MAX_WIDTH}x{MAX_HEIGHT}")]
    TooLarge,
    #[error("needs {required_kb} kB of video RAM but only {budget_kb} kB are available")]
    OverBudget { required_kb: u32, budget_kb: u32 },
}

/// Check a screen size against the size limits and the video RAM budget
pub fn check_size(
    width: u32,
    height: u32,
    bytes_per_pixel: u32,
    budget_kb: u32,
) -> Result<(), SizeRejection> {
    if width == 0 || height == 0 {
        return Err(SizeRejection::ZeroSize);
    }

    if width > MAX_WIDTH || height > MAX_HEIGHT {
        return Err(SizeRejection::TooLarge);
    }

    // Both sides are at most 32767, so the area fits into an u32.
    // Round up to kB before scaling by the pixel size to keep the
    // intermediate small.
    let required_kb = (width * height).div_ceil(1024) * bytes_per_pixel;

    if required_kb > budget_kb {
        return Err(SizeRejection::OverBudget {
            required_kb,
            budget_kb,
        });
    }

    Ok(())
}

pub fn size_valid(width: u32, height: u32, bytes_per_pixel: u32, budget_kb: u32) -> bool {
    check_size(width, height, bytes_per_pixel, budget_kb).is_ok()
}
