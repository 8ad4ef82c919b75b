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

//! A display driver for X servers that are only ever looked at through VNC.
//!
//! There is no hardware. The framebuffer lives in system memory, every
//! output is always connected and the screen can be resized at runtime
//! within the configured amount of video RAM.

pub mod config;
pub mod crtc;
pub mod cursor;
pub mod driver;
pub mod framebuffer;
pub mod geometry;
pub mod host;
pub mod mode;
pub mod pixel;
pub mod screenshot;
pub mod window;
