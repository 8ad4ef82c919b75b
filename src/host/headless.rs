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

use std::collections::BTreeMap;

use log::info;

use super::{CursorHost, PixmapHeader, PropertyError, RootWindow, ScreenPixmap, WindowId};
use crate::cursor::CursorInfo;
use crate::window::CreateWindow;

/// An in-process stand-in for the display server
///
/// Keeps the root pixmap, the root window properties and the cursor
/// registration in memory. Used by the `vncdrv` binary for headless
/// bring-up and by the tests, which can also make it refuse requests.
#[derive(Default)]
pub struct HeadlessScreen {
    pixmap: Option<PixmapHeader>,
    pixels: Option<Vec<u8>>,
    windows: Vec<WindowId>,
    root_properties: BTreeMap<String, Vec<u8>>,
    hw_cursor: Option<CursorInfo>,

    pub refuse_pixmap_headers: bool,
    pub refuse_properties: bool,
    pub refuse_hw_cursor: bool,
    pub refuse_windows: bool,
}

impl HeadlessScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root_window(&self) -> Option<WindowId> {
        self.windows.first().copied()
    }

    pub fn windows(&self) -> &[WindowId] {
        &self.windows
    }

    pub fn root_property(&self, name: &str) -> Option<&[u8]> {
        self.root_properties.get(name).map(Vec::as_slice)
    }

    pub fn hw_cursor(&self) -> Option<&CursorInfo> {
        self.hw_cursor.as_ref()
    }

    /// Allocate a new window id through the given create window chain
    ///
    /// The first window created becomes the root window.
    pub fn create_window<C: CreateWindow<Self>>(&mut self, chain: &mut C) -> Option<WindowId> {
        let id = WindowId(self.windows.len() as u32 + 1);

        if chain.create_window(self, id) {
            Some(id)
        } else {
            None
        }
    }
}

impl ScreenPixmap for HeadlessScreen {
    fn pixmap_header(&self) -> Option<PixmapHeader> {
        self.pixmap
    }

    fn pixmap_pixels(&self) -> Option<&[u8]> {
        self.pixels.as_deref()
    }

    fn modify_pixmap_header(
        &mut self,
        header: PixmapHeader,
        pixels: Vec<u8>,
    ) -> Result<Option<Vec<u8>>, Vec<u8>> {
        let expected = header.stride as usize * header.height as usize;

        if self.refuse_pixmap_headers || pixels.len() < expected {
            return Err(pixels);
        }

        self.pixmap = Some(header);
        Ok(self.pixels.replace(pixels))
    }

    fn take_pixmap_pixels(&mut self) -> Option<Vec<u8>> {
        self.pixels.take()
    }
}

impl RootWindow for HeadlessScreen {
    fn change_root_property(&mut self, name: &str, value: &[u8]) -> Result<(), PropertyError> {
        if self.windows.is_empty() {
            return Err(PropertyError::NoRootWindow);
        }

        if self.refuse_properties {
            return Err(PropertyError::Refused(name.to_string()));
        }

        self.root_properties.insert(name.to_string(), value.to_vec());

        Ok(())
    }
}

impl CursorHost for HeadlessScreen {
    fn init_hw_cursor(&mut self, info: &CursorInfo) -> bool {
        if self.refuse_hw_cursor {
            return false;
        }

        self.hw_cursor = Some(info.clone());
        true
    }
}

/// The server's own window creation, at the bottom of every create window chain
pub struct HeadlessCreateWindow;

impl CreateWindow<HeadlessScreen> for HeadlessCreateWindow {
    fn create_window(&mut self, host: &mut HeadlessScreen, window: WindowId) -> bool {
        if host.refuse_windows {
            return false;
        }

        info!("Created window {}", window.0);
        host.windows.push(window);

        true
    }
}
