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

//! The memory backing the root window.
//!
//! There is no video memory. The framebuffer is a plain heap buffer that is
//! handed to the server's root pixmap. Resizing allocates a new buffer and
//! only updates the driver's view of the screen once the server accepted it,
//! so a failed resize leaves everything as it was.

use log::{error, info};

use crate::geometry::Geometry;
use crate::host::{PixmapHeader, ScreenPixmap};
use crate::pixel::PixelFormat;

mod alloc;
mod validate;

pub use self::alloc::{realloc_fb, FramebufferAlloc, HeapAlloc};
pub use self::validate::{check_size, size_valid, SizeRejection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResizeError {
    #[error("Invalid screen size: {0}")]
    PolicyRejected(#[from] SizeRejection),
    #[error("Failed to (re)alloc fb of {bytes} B")]
    ResourceExhausted { bytes: usize },
    #[error("Server refused a {width}x{height} root pixmap")]
    HostRejected { width: u32, height: u32 },
}

pub struct Framebuffer<A = HeapAlloc> {
    geometry: Geometry,
    format: PixelFormat,
    video_ram_kb: u32,
    stride: u32,
    alloc: A,
}

impl Framebuffer<HeapAlloc> {
    pub fn new(geometry: Geometry, format: PixelFormat, video_ram_kb: u32) -> Self {
        Self::with_alloc(geometry, format, video_ram_kb, HeapAlloc)
    }
}

impl<A: FramebufferAlloc> Framebuffer<A> {
    pub fn with_alloc(geometry: Geometry, format: PixelFormat, video_ram_kb: u32, alloc: A) -> Self {
        Self {
            geometry,
            format,
            video_ram_kb,
            stride: geometry.stride(&format),
            alloc,
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Bytes per scanline of the committed framebuffer
    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn video_ram_kb(&self) -> u32 {
        self.video_ram_kb
    }

    pub fn check_size(&self, geometry: Geometry) -> Result<(), SizeRejection> {
        check_size(
            geometry.width,
            geometry.height,
            self.format.bytes_per_pixel(),
            self.video_ram_kb,
        )
    }

    fn header(&self, geometry: Geometry) -> PixmapHeader {
        PixmapHeader {
            width: geometry.width,
            height: geometry.height,
            depth: self.format.depth().bits(),
            bits_per_pixel: self.format.bits_per_pixel(),
            stride: geometry.stride(&self.format),
        }
    }

    /// Allocate storage for `geometry` and hand it to the root pixmap
    ///
    /// Nothing in `self` is touched. On success the storage that was
    /// bound before has been freed.
    fn commit<H: ScreenPixmap + ?Sized>(
        &mut self,
        host: &mut H,
        geometry: Geometry,
    ) -> Result<(), ResizeError> {
        let bytes = geometry
            .fb_bytes(&self.format)
            .ok_or(ResizeError::ResourceExhausted { bytes: usize::MAX })?;

        info!(
            "Setting fb to {} x {} ({} B)",
            geometry.width, geometry.height, bytes
        );

        let pixels = realloc_fb(&mut self.alloc, host.pixmap_pixels(), bytes).ok_or_else(|| {
            error!("Failed to (re)alloc fb");
            ResizeError::ResourceExhausted { bytes }
        })?;

        match host.modify_pixmap_header(self.header(geometry), pixels) {
            Ok(previous) => {
                drop(previous);
                Ok(())
            }
            Err(refused) => {
                drop(refused);
                Err(ResizeError::HostRejected {
                    width: geometry.width,
                    height: geometry.height,
                })
            }
        }
    }

    /// Allocate the first framebuffer and bind it to the root pixmap
    pub fn bind<H: ScreenPixmap + ?Sized>(&mut self, host: &mut H) -> Result<(), ResizeError> {
        self.commit(host, self.geometry)
    }

    /// Resize the screen to `width` x `height`
    ///
    /// The geometry and stride are only updated after the server took the
    /// new framebuffer. On any error the root pixmap keeps its previous
    /// header and storage.
    pub fn resize<H: ScreenPixmap + ?Sized>(
        &mut self,
        host: &mut H,
        width: u32,
        height: u32,
    ) -> Result<(), ResizeError> {
        let candidate = Geometry::new(width, height);

        self.check_size(candidate)?;
        self.commit(host, candidate)?;

        self.geometry = candidate;
        self.stride = candidate.stride(&self.format);

        Ok(())
    }

    /// Take the framebuffer back from the root pixmap and free it
    pub fn release<H: ScreenPixmap + ?Sized>(&mut self, host: &mut H) {
        if let Some(pixels) = host.take_pixmap_pixels() {
            info!("Freeing fb ({} B)", pixels.len());
        }
    }
}
