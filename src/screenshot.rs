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

use std::io::Cursor;

use anyhow::{bail, Result};
use png::{BitDepth, ColorType, Encoder};

use crate::host::{PixmapHeader, ScreenPixmap};

/// Widen a `bits` wide color channel to eight bits
fn expand(value: u32, bits: u32) -> u8 {
    let value = value & ((1 << bits) - 1);

    match bits {
        8 => value as u8,
        b if b > 8 => (value >> (b - 8)) as u8,
        b => ((value << (8 - b)) | (value >> (2 * b).saturating_sub(8).min(b))) as u8,
    }
}

fn rgb(pixel: &[u8], header: &PixmapHeader) -> Result<[u8; 3]> {
    let rgb = match (header.bits_per_pixel, header.depth) {
        (32, 24) => {
            let p = u32::from_le_bytes([pixel[0], pixel[1], pixel[2], pixel[3]]);
            [expand(p >> 16, 8), expand(p >> 8, 8), expand(p, 8)]
        }
        (32, 30) => {
            let p = u32::from_le_bytes([pixel[0], pixel[1], pixel[2], pixel[3]]);
            [expand(p >> 20, 10), expand(p >> 10, 10), expand(p, 10)]
        }
        (24, 24) => [pixel[2], pixel[1], pixel[0]],
        (16, 16) => {
            let p = u32::from(u16::from_le_bytes([pixel[0], pixel[1]]));
            [expand(p >> 11, 5), expand(p >> 5, 6), expand(p, 5)]
        }
        (16, 15) => {
            let p = u32::from(u16::from_le_bytes([pixel[0], pixel[1]]));
            [expand(p >> 10, 5), expand(p >> 5, 5), expand(p, 5)]
        }
        (bpp, depth) => bail!("Can not take screenshots of depth {depth} at {bpp} bpp"),
    };

    Ok(rgb)
}

/// Encode the content of a root pixmap as PNG
///
/// Truecolor framebuffers become 8 bit RGB images. At depth 8 there is no
/// colormap to look the pixels up in, so the raw values are written as
/// grayscale instead.
pub fn as_png(header: &PixmapHeader, pixels: &[u8]) -> Result<Vec<u8>> {
    let stride = header.stride as usize;
    let bytes_pp = usize::from(header.bits_per_pixel / 8);
    let row_len = header.width as usize * bytes_pp;

    if bytes_pp == 0 || stride == 0 || row_len > stride {
        bail!("Invalid pixmap header {header:?}");
    }

    if pixels.len() < stride * header.height as usize {
        bail!(
            "Pixmap storage is too small: {} B for {}x{}",
            pixels.len(),
            header.width,
            header.height
        );
    }

    let grayscale = header.bits_per_pixel == 8;
    let mut image = Vec::with_capacity(header.width as usize * header.height as usize * 3);

    for row in pixels.chunks(stride).take(header.height as usize) {
        for pixel in row[..row_len].chunks_exact(bytes_pp) {
            if grayscale {
                image.push(pixel[0]);
            } else {
                image.extend_from_slice(&rgb(pixel, header)?);
            }
        }
    }

    let mut dst = Cursor::new(Vec::new());

    let mut writer = {
        let mut enc = Encoder::new(&mut dst, header.width, header.height);
        enc.set_color(if grayscale {
            ColorType::Grayscale
        } else {
            ColorType::Rgb
        });
        enc.set_depth(BitDepth::Eight);
        enc.write_header()?
    };

    writer.write_image_data(&image)?;
    writer.finish()?;

    Ok(dst.into_inner())
}

/// Take a screenshot of whatever the root pixmap currently shows
pub fn screenshot<H: ScreenPixmap + ?Sized>(host: &H) -> Result<Vec<u8>> {
    match (host.pixmap_header(), host.pixmap_pixels()) {
        (Some(header), Some(pixels)) => as_png(&header, pixels),
        _ => bail!("There is no framebuffer bound to the root pixmap"),
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use png::{ColorType, Decoder};

    use super::{as_png, expand, screenshot};
    use crate::host::{HeadlessScreen, PixmapHeader, ScreenPixmap};

    fn decode(png: &[u8]) -> Result<(png::OutputInfo, Vec<u8>)> {
        let decoder = Decoder::new(png);
        let mut reader = decoder.read_info()?;
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;
        buf.truncate(info.buffer_size());

        Ok((info, buf))
    }

    fn header(width: u32, height: u32, depth: u8, bits_per_pixel: u8, stride: u32) -> PixmapHeader {
        PixmapHeader {
            width,
            height,
            depth,
            bits_per_pixel,
            stride,
        }
    }

    #[test]
    fn channel_expansion() {
        assert_eq!(expand(0x1f, 5), 0xff);
        assert_eq!(expand(0x3f, 6), 0xff);
        assert_eq!(expand(0x3ff, 10), 0xff);
        assert_eq!(expand(0x1ab, 8), 0xab);
        assert_eq!(expand(0, 5), 0);
        assert_eq!(expand(0x10, 5), 0x84);
    }

    #[test]
    fn xrgb8888() -> Result<()> {
        // Two pixels per row, one byte of padding at the end of each row
        let pixels = [
            0x00, 0x00, 0xff, 0x00, 0x00, 0xff, 0x00, 0x00, 0xee, //
            0xff, 0x00, 0x00, 0x00, 0x30, 0x20, 0x10, 0x00, 0xee, //
        ];
        let png = as_png(&header(2, 2, 24, 32, 9), &pixels)?;
        let (info, data) = decode(&png)?;

        assert_eq!((info.width, info.height), (2, 2));
        assert_eq!(info.color_type, ColorType::Rgb);
        assert_eq!(
            data,
            [0xff, 0, 0, 0, 0xff, 0, 0, 0, 0xff, 0x10, 0x20, 0x30]
        );

        Ok(())
    }

    #[test]
    fn rgb565_and_xrgb1555() -> Result<()> {
        let red_565 = 0xf800u16.to_le_bytes();
        let green_565 = 0x07e0u16.to_le_bytes();
        let pixels = [red_565, green_565].concat();

        let (_, data) = decode(&as_png(&header(2, 1, 16, 16, 4), &pixels)?)?;
        assert_eq!(data, [0xff, 0, 0, 0, 0xff, 0]);

        let blue_555 = 0x001fu16.to_le_bytes();
        let (_, data) = decode(&as_png(&header(1, 1, 15, 16, 2), &blue_555)?)?;
        assert_eq!(data, [0, 0, 0xff]);

        Ok(())
    }

    #[test]
    fn packed_and_deep() -> Result<()> {
        let (_, data) = decode(&as_png(&header(1, 1, 24, 24, 3), &[0x01, 0x02, 0x03])?)?;
        assert_eq!(data, [0x03, 0x02, 0x01]);

        let white_30 = 0x3fff_ffffu32.to_le_bytes();
        let (_, data) = decode(&as_png(&header(1, 1, 30, 32, 4), &white_30)?)?;
        assert_eq!(data, [0xff, 0xff, 0xff]);

        Ok(())
    }

    #[test]
    fn depth_8_is_grayscale() -> Result<()> {
        let (info, data) = decode(&as_png(&header(3, 1, 8, 8, 4), &[1, 2, 3, 4])?)?;

        assert_eq!(info.color_type, ColorType::Grayscale);
        assert_eq!(data, [1, 2, 3]);

        Ok(())
    }

    #[test]
    fn rejects_short_storage() {
        assert!(as_png(&header(2, 2, 24, 32, 8), &[0; 15]).is_err());
        assert!(as_png(&header(4, 1, 24, 32, 8), &[0; 16]).is_err());
        assert!(as_png(&header(1, 1, 12, 16, 2), &[0; 2]).is_err());
        assert!(as_png(&header(0, 1, 24, 32, 0), &[]).is_err());
    }

    #[test]
    fn screenshot_of_root_pixmap() -> Result<()> {
        let mut host = HeadlessScreen::new();
        assert!(screenshot(&host).is_err());

        let header = header(2, 2, 24, 32, 8);
        assert!(host.modify_pixmap_header(header, vec![0x80; 16]).is_ok());

        let (info, data) = decode(&screenshot(&host)?)?;
        assert_eq!((info.width, info.height), (2, 2));
        assert_eq!(data, [0x80; 12]);

        Ok(())
    }
}
