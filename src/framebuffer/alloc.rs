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

/// Source of framebuffer storage
pub trait FramebufferAlloc {
    /// Allocate `len` zeroed bytes, or `None` if memory is exhausted
    fn alloc_zeroed(&mut self, len: usize) -> Option<Vec<u8>>;
}

/// Allocates framebuffers on the heap without aborting on exhaustion
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapAlloc;

impl FramebufferAlloc for HeapAlloc {
    fn alloc_zeroed(&mut self, len: usize) -> Option<Vec<u8>> {
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).ok()?;
        pixels.resize(len, 0);

        Some(pixels)
    }
}

/// Allocate a buffer of `len` bytes that starts out with the content of `current`
///
/// Works like `realloc()`: the common prefix is kept and any bytes beyond
/// the old length are zero. `current` is left untouched so the caller still
/// has it if anything later on fails.
pub fn realloc_fb<A: FramebufferAlloc + ?Sized>(
    alloc: &mut A,
    current: Option<&[u8]>,
    len: usize,
) -> Option<Vec<u8>> {
    let mut pixels = alloc.alloc_zeroed(len)?;

    if let Some(current) = current {
        let keep = current.len().min(len);
        pixels[..keep].copy_from_slice(&current[..keep]);
    }

    Some(pixels)
}
