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

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::warn;
use serde::Deserialize;
use serde_json::{from_reader, Map, Value};

use crate::pixel::{Depth, PixelFormat};

pub const DEFAULT_VIDEO_RAM_KB: u32 = 4096;
pub const DEFAULT_MAX_CLOCK_KHZ: u32 = 300_000;

const FORMAT_VERSION: u64 = 1;

fn format_version() -> u64 {
    FORMAT_VERSION
}

fn one() -> u32 {
    1
}

/// The Device section of a screen
///
/// Zero for `video_ram_kb` or `max_clock_khz` means "use the default",
/// the same as leaving them out.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DriverConfig {
    #[serde(default = "format_version")]
    pub format_version: u64,
    pub depth: Depth,
    pub bits_per_pixel: Option<u8>,
    pub video_ram_kb: u32,
    pub max_clock_khz: u32,
    #[serde(rename = "SWcursor", alias = "sw_cursor")]
    pub sw_cursor: bool,
    #[serde(rename = "NumOutputs", alias = "num_outputs", default = "one")]
    pub num_outputs: u32,

    /// Everything we do not know about, reported as unused options
    #[serde(flatten)]
    pub unused: Map<String, Value>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            depth: Depth::default(),
            bits_per_pixel: None,
            video_ram_kb: 0,
            max_clock_khz: 0,
            sw_cursor: false,
            num_outputs: 1,
            unused: Map::new(),
        }
    }
}

impl DriverConfig {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let config: Self = from_reader(reader)?;

        if config.format_version != FORMAT_VERSION {
            bail!("Unknown config file version: {}", config.format_version);
        }

        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file {}", path.display()))?;

        Self::from_reader(file).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn pixel_format(&self) -> Result<PixelFormat> {
        PixelFormat::new(self.depth, self.bits_per_pixel)
    }

    /// The video RAM budget in kB and whether it was configured
    pub fn video_ram_kb(&self) -> (u32, bool) {
        match self.video_ram_kb {
            0 => (DEFAULT_VIDEO_RAM_KB, false),
            kb => (kb, true),
        }
    }

    /// The maximum pixel clock in kHz and whether it was configured
    pub fn max_clock_khz(&self) -> (u32, bool) {
        match self.max_clock_khz {
            0 => (DEFAULT_MAX_CLOCK_KHZ, false),
            khz => (khz, true),
        }
    }

    pub fn show_unused_options(&self) {
        for key in self.unused.keys() {
            warn!("Option \"{key}\" is not used");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use anyhow::Result;
    use tempfile::NamedTempFile;

    use super::{DriverConfig, DEFAULT_MAX_CLOCK_KHZ, DEFAULT_VIDEO_RAM_KB};
    use crate::pixel::Depth;

    #[test]
    fn defaults() -> Result<()> {
        let config = DriverConfig::from_reader(&b"{}"[..])?;

        assert_eq!(config, DriverConfig::default());
        assert_eq!(config.depth, Depth::D24);
        assert_eq!(config.num_outputs, 1);
        assert!(!config.sw_cursor);
        assert_eq!(config.video_ram_kb(), (DEFAULT_VIDEO_RAM_KB, false));
        assert_eq!(config.max_clock_khz(), (DEFAULT_MAX_CLOCK_KHZ, false));
        assert_eq!(config.pixel_format()?.bits_per_pixel(), 32);

        Ok(())
    }

    #[test]
    fn load_from_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            r#"{{
                "format_version": 1,
                "depth": 16,
                "video_ram_kb": 16384,
                "SWcursor": true,
                "NumOutputs": 2,
                "Rotate": "left"
            }}"#
        )?;

        let config = DriverConfig::load(file.path())?;

        assert_eq!(config.depth, Depth::D16);
        assert_eq!(config.video_ram_kb(), (16384, true));
        assert!(config.sw_cursor);
        assert_eq!(config.num_outputs, 2);
        assert_eq!(config.pixel_format()?.bytes_per_pixel(), 2);

        let unused: Vec<&String> = config.unused.keys().collect();
        assert_eq!(unused, ["Rotate"]);

        Ok(())
    }

    #[test]
    fn snake_case_aliases() -> Result<()> {
        let config = DriverConfig::from_reader(&br#"{"sw_cursor": true, "num_outputs": 4}"#[..])?;

        assert!(config.sw_cursor);
        assert_eq!(config.num_outputs, 4);
        assert!(config.unused.is_empty());

        Ok(())
    }

    #[test]
    fn rejects_bad_input() {
        assert!(DriverConfig::from_reader(&br#"{"format_version": 2}"#[..]).is_err());
        assert!(DriverConfig::from_reader(&br#"{"depth": 32}"#[..]).is_err());
        assert!(DriverConfig::from_reader(&b"not json"[..]).is_err());
        assert!(DriverConfig::load("/nonexistent/vncdrv.json").is_err());

        let config = DriverConfig::from_reader(&br#"{"depth": 8, "bits_per_pixel": 32}"#[..]).unwrap();
        assert!(config.pixel_format().is_err());
    }
}
