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

//! The parts of the display server the driver talks to.
//!
//! The server owns the root pixmap, the window tree and the cursor layer.
//! The driver only ever reaches them through the traits in this module,
//! which keeps the driver testable without a server.

use crate::cursor::CursorInfo;

mod headless;

pub use headless::{HeadlessCreateWindow, HeadlessScreen};

/// Metadata of the pixmap backing the root window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixmapHeader {
    pub width: u32,
    pub height: u32,
    pub depth: u8,
    pub bits_per_pixel: u8,
    /// Bytes per scanline
    pub stride: u32,
}

/// Server side of the root pixmap
pub trait ScreenPixmap {
    fn pixmap_header(&self) -> Option<PixmapHeader>;

    /// The pixel storage currently bound to the root pixmap
    fn pixmap_pixels(&self) -> Option<&[u8]>;

    /// Rebind the root pixmap to new metadata and storage
    ///
    /// On success the storage that was bound before (if any) is handed back
    /// to the caller. If the server refuses the new header, `pixels` is
    /// handed back instead and the pixmap stays as it was.
    fn modify_pixmap_header(
        &mut self,
        header: PixmapHeader,
        pixels: Vec<u8>,
    ) -> Result<Option<Vec<u8>>, Vec<u8>>;

    /// Unbind and return the storage of the root pixmap
    fn take_pixmap_pixels(&mut self) -> Option<Vec<u8>>;
}

/// Opaque handle of a window created by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(pub u32);

/// The root window of the screen
pub trait RootWindow {
    /// Replace a STRING property on the root window
    fn change_root_property(&mut self, name: &str, value: &[u8]) -> Result<(), PropertyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    #[error("the root window does not exist yet")]
    NoRootWindow,
    #[error("property {0} was refused by the server")]
    Refused(String),
}

/// Server side cursor layer
pub trait CursorHost {
    /// Register a hardware cursor with the given capabilities
    ///
    /// Returns false if the server could not set up the cursor layer.
    fn init_hw_cursor(&mut self, info: &CursorInfo) -> bool;
}

/// Everything the driver needs from the server for a single screen
pub trait ScreenHost: ScreenPixmap + RootWindow + CursorHost {}

impl<T: ScreenPixmap + RootWindow + CursorHost> ScreenHost for T {}
