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

use log::{error, info};

use crate::host::{RootWindow, WindowId};

pub const VERSION_PROPERTY: &str = "VNC_DRV_VERSION";

/// A link in the server's chain of window creation hooks
pub trait CreateWindow<H: ?Sized> {
    fn create_window(&mut self, host: &mut H, window: WindowId) -> bool;
}

/// Publishes the driver version on the root window
///
/// Wraps the next create window hook in the chain. Once the first window,
/// the root window, was created successfully the `VNC_DRV_VERSION` property
/// is set on it. Later calls just pass through.
pub struct VersionPropertyInterceptor<C> {
    wrapped: C,
    version: String,
    property_set: bool,
}

impl<C> VersionPropertyInterceptor<C> {
    pub fn new(wrapped: C, version: impl Into<String>) -> Self {
        Self {
            wrapped,
            version: version.into(),
            property_set: false,
        }
    }

    pub fn property_set(&self) -> bool {
        self.property_set
    }

    pub fn into_inner(self) -> C {
        self.wrapped
    }
}

impl<H, C> CreateWindow<H> for VersionPropertyInterceptor<C>
where
    H: RootWindow + ?Sized,
    C: CreateWindow<H>,
{
    fn create_window(&mut self, host: &mut H, window: WindowId) -> bool {
        if !self.wrapped.create_window(host, window) {
            return false;
        }

        if !self.property_set {
            match host.change_root_property(VERSION_PROPERTY, self.version.as_bytes()) {
                Ok(()) => info!("Set {VERSION_PROPERTY} to {}", self.version),
                Err(e) => error!("Could not set {VERSION_PROPERTY} root window property: {e}"),
            }

            // Only ever try once, even if the server refused it
            self.property_set = true;
        }

        true
    }
}
