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

//! Per-screen driver state and the screen lifecycle hooks.

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info, warn};

use crate::config::DriverConfig;
use crate::crtc::{
    CrtcConfigFuncs, CrtcFuncs, OutputFuncs, Rotation, VncCrtc, VncOutput, MAX_OUTPUTS,
};
use crate::cursor::{cursor_init, VncCursor};
use crate::framebuffer::{size_valid, Framebuffer};
use crate::geometry::{Geometry, MAX_HEIGHT, MAX_WIDTH, MIN_HEIGHT, MIN_WIDTH};
use crate::host::ScreenHost;
use crate::mode::{DisplayMode, ModeStatus};
use crate::pixel::PixelFormat;
use crate::window::VersionPropertyInterceptor;

fn source(configured: bool) -> &'static str {
    if configured {
        "config"
    } else {
        "default"
    }
}

pub struct VncDriver {
    config: DriverConfig,
    max_clock_khz: u32,
    crtcs: Vec<VncCrtc>,
    outputs: Vec<VncOutput>,
    modes: Vec<DisplayMode>,
    framebuffer: Framebuffer,
    cursor: Option<VncCursor>,
}

impl VncDriver {
    /// Check the configuration and pick the initial mode
    ///
    /// Nothing is allocated yet. That happens in `screen_init`.
    pub fn pre_init(config: DriverConfig) -> Result<Self> {
        info!("Chipset is a VNC");

        let format = config.pixel_format()?;
        info!("Pixel format: {format}");

        if config.num_outputs > MAX_OUTPUTS {
            bail!(
                "Too many outputs ({}), at most {MAX_OUTPUTS} are supported",
                config.num_outputs
            );
        }

        let (video_ram_kb, configured) = config.video_ram_kb();
        info!("VideoRAM: {video_ram_kb} kByte ({})", source(configured));

        let (max_clock_khz, configured) = config.max_clock_khz();
        info!("Max Clock: {max_clock_khz} kHz ({})", source(configured));

        let mut crtcs: Vec<VncCrtc> = (0..config.num_outputs).map(VncCrtc::new).collect();
        let outputs: Vec<VncOutput> = (0..config.num_outputs).map(VncOutput::new).collect();

        let mut modes: Vec<DisplayMode> = Vec::new();

        for output in &outputs {
            for mut mode in output.get_modes() {
                if modes.iter().any(|m| m.name == mode.name) {
                    continue;
                }

                mode.status = Self::check_mode(&mode, output, &format, video_ram_kb, max_clock_khz);

                if mode.status == ModeStatus::Ok {
                    modes.push(mode);
                } else {
                    debug!("{}: dropping mode {mode}", output.name());
                }
            }
        }

        let current = match modes.first() {
            Some(mode) => mode.clone(),
            None => bail!("No valid modes found"),
        };

        let virtual_size = modes
            .iter()
            .map(DisplayMode::geometry)
            .max_by_key(Geometry::area)
            .unwrap_or_else(|| current.geometry());

        info!("Virtual size is {virtual_size}");

        for mode in &modes {
            info!("Mode: {mode}");
        }

        for crtc in crtcs.iter_mut() {
            if !crtc.set_mode_major(&current, Rotation::Rotate0, 0, 0) {
                bail!("Could not set mode {} on CRTC {}", current.name, crtc.index());
            }
        }

        Ok(Self {
            max_clock_khz,
            crtcs,
            outputs,
            modes,
            framebuffer: Framebuffer::new(virtual_size, format, video_ram_kb),
            cursor: None,
            config,
        })
    }

    fn check_mode(
        mode: &DisplayMode,
        output: &VncOutput,
        format: &PixelFormat,
        video_ram_kb: u32,
        max_clock_khz: u32,
    ) -> ModeStatus {
        let width = mode.hdisplay;
        let height = mode.vdisplay;

        let in_range = (MIN_WIDTH..=MAX_WIDTH).contains(&width)
            && (MIN_HEIGHT..=MAX_HEIGHT).contains(&height);

        if output.mode_valid(mode) == ModeStatus::Ok
            && in_range
            && mode.clock <= max_clock_khz
            && size_valid(width, height, format.bytes_per_pixel(), video_ram_kb)
        {
            ModeStatus::Ok
        } else {
            ModeStatus::Bad
        }
    }

    /// Allocate the framebuffer and register the cursor with the server
    pub fn screen_init<H: ScreenHost + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        self.framebuffer
            .bind(host)
            .context("Failed to set up the root pixmap")?;

        if self.config.sw_cursor {
            info!("Using Software Cursor");
        } else {
            let cursor = cursor_init(host)
                .ok_or_else(|| anyhow!("Hardware cursor initialization failed"))?;

            self.cursor = Some(cursor);
        }

        self.config.show_unused_options();

        Ok(())
    }

    pub fn close_screen<H: ScreenHost + ?Sized>(&mut self, host: &mut H) {
        self.framebuffer.release(host);
        self.cursor = None;
    }

    pub fn enter_vt(&mut self) -> bool {
        self.adjust_frame(0, 0);
        true
    }

    pub fn leave_vt(&mut self) {}

    pub fn switch_mode(&mut self, _: &DisplayMode) -> bool {
        true
    }

    pub fn adjust_frame(&mut self, _: i32, _: i32) {}

    pub fn save_screen(&mut self, _: bool) -> bool {
        true
    }

    pub fn valid_mode(&self, _: &DisplayMode) -> ModeStatus {
        ModeStatus::Ok
    }

    /// Wrap the server's create window hook so the root window gets the
    /// driver version attached
    pub fn wrap_create_window<C>(wrapped: C) -> VersionPropertyInterceptor<C> {
        VersionPropertyInterceptor::new(wrapped, env!("CARGO_PKG_VERSION"))
    }

    pub fn crtcs(&self) -> &[VncCrtc] {
        &self.crtcs
    }

    pub fn outputs(&self) -> &[VncOutput] {
        &self.outputs
    }

    pub fn modes(&self) -> &[DisplayMode] {
        &self.modes
    }

    pub fn current_mode(&self) -> Option<&DisplayMode> {
        self.crtcs.first().and_then(VncCrtc::mode)
    }

    pub fn max_clock_khz(&self) -> u32 {
        self.max_clock_khz
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn cursor(&self) -> Option<&VncCursor> {
        self.cursor.as_ref()
    }

    pub fn cursor_mut(&mut self) -> Option<&mut VncCursor> {
        self.cursor.as_mut()
    }
}

impl CrtcConfigFuncs for VncDriver {
    fn resize(&mut self, host: &mut dyn ScreenHost, width: u32, height: u32) -> bool {
        match self.framebuffer.resize(host, width, height) {
            Ok(()) => true,
            Err(e) => {
                warn!("Can not resize to {width}x{height}: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::VncDriver;
    use crate::config::DriverConfig;
    use crate::crtc::{CrtcConfigFuncs, Rotation};
    use crate::cursor::HwCursorFuncs;
    use crate::geometry::Geometry;
    use crate::host::{HeadlessCreateWindow, HeadlessScreen, ScreenPixmap};
    use crate::mode::{DisplayMode, ModeStatus};
    use crate::pixel::Depth;
    use crate::window::VERSION_PROPERTY;

    fn pre_init_error(config: DriverConfig) -> String {
        match VncDriver::pre_init(config) {
            Ok(_) => panic!("pre_init succeeded"),
            Err(e) => format!("{e:#}"),
        }
    }

    #[test]
    fn pre_init_defaults() -> Result<()> {
        let driver = VncDriver::pre_init(DriverConfig::default())?;

        assert_eq!(driver.crtcs().len(), 1);
        assert_eq!(driver.outputs().len(), 1);
        assert_eq!(driver.max_clock_khz(), 300_000);

        let names: Vec<&str> = driver.modes().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["1024x768"]);
        assert_eq!(driver.current_mode().map(|m| m.name.as_str()), Some("1024x768"));

        let crtc = &driver.crtcs()[0];
        assert_eq!(crtc.rotation(), Rotation::Rotate0);
        assert_eq!(crtc.position(), (0, 0));

        let fb = driver.framebuffer();
        assert_eq!(fb.geometry(), Geometry::new(1024, 768));
        assert_eq!(fb.stride(), 4096);
        assert_eq!(fb.video_ram_kb(), 4096);

        Ok(())
    }

    #[test]
    fn pre_init_multiple_outputs() -> Result<()> {
        let config = DriverConfig {
            num_outputs: 3,
            ..Default::default()
        };
        let driver = VncDriver::pre_init(config)?;

        assert_eq!(driver.crtcs().len(), 3);
        assert_eq!(driver.outputs()[2].name(), "vnc-2");

        // Every output offers the same mode, it is only listed once
        assert_eq!(driver.modes().len(), 1);
        assert!(driver.crtcs().iter().all(|c| c.mode().is_some()));

        Ok(())
    }

    #[test]
    fn pre_init_failures() {
        let too_many = DriverConfig {
            num_outputs: 11,
            ..Default::default()
        };
        assert!(pre_init_error(too_many).contains("Too many outputs"));

        let none = DriverConfig {
            num_outputs: 0,
            ..Default::default()
        };
        assert!(pre_init_error(none).contains("No valid modes found"));

        // 1024x768 at 4 B/px needs 3072 kB
        let small_ram = DriverConfig {
            video_ram_kb: 3071,
            ..Default::default()
        };
        assert!(pre_init_error(small_ram).contains("No valid modes found"));

        let slow_clock = DriverConfig {
            max_clock_khz: 47832,
            ..Default::default()
        };
        assert!(pre_init_error(slow_clock).contains("No valid modes found"));

        let bad_format = DriverConfig {
            depth: Depth::D16,
            bits_per_pixel: Some(32),
            ..Default::default()
        };
        assert!(VncDriver::pre_init(bad_format).is_err());
    }

    #[test]
    fn screen_lifecycle() -> Result<()> {
        let mut host = HeadlessScreen::new();
        let mut driver = VncDriver::pre_init(DriverConfig::default())?;

        driver.screen_init(&mut host)?;

        let header = host.pixmap_header().unwrap();
        assert_eq!((header.width, header.height), (1024, 768));
        assert_eq!((header.depth, header.bits_per_pixel), (24, 32));
        assert_eq!(header.stride, 4096);
        assert_eq!(host.pixmap_pixels().map(<[u8]>::len), Some(4096 * 768));

        assert!(host.hw_cursor().is_some());
        let cursor = driver.cursor_mut().unwrap();
        assert!(cursor.use_hw_cursor());
        cursor.set_cursor_position(5, 6);
        assert_eq!(driver.cursor().map(|c| c.position()), Some((5, 6)));

        assert!(driver.enter_vt());
        driver.leave_vt();
        let mode = DisplayMode::synthesize(800, 600);
        assert!(driver.switch_mode(&mode));
        assert!(driver.save_screen(true));
        assert_eq!(driver.valid_mode(&mode), ModeStatus::Ok);

        driver.close_screen(&mut host);
        assert!(host.pixmap_pixels().is_none());
        assert!(driver.cursor().is_none());

        Ok(())
    }

    #[test]
    fn software_cursor() -> Result<()> {
        let mut host = HeadlessScreen::new();
        host.refuse_hw_cursor = true;

        let config = DriverConfig {
            sw_cursor: true,
            ..Default::default()
        };
        let mut driver = VncDriver::pre_init(config)?;
        driver.screen_init(&mut host)?;

        assert!(driver.cursor().is_none());
        assert!(host.hw_cursor().is_none());

        Ok(())
    }

    #[test]
    fn screen_init_failures() -> Result<()> {
        let mut host = HeadlessScreen::new();
        host.refuse_hw_cursor = true;
        let mut driver = VncDriver::pre_init(DriverConfig::default())?;
        assert!(driver.screen_init(&mut host).is_err());

        let mut host = HeadlessScreen::new();
        host.refuse_pixmap_headers = true;
        let mut driver = VncDriver::pre_init(DriverConfig::default())?;
        assert!(driver.screen_init(&mut host).is_err());
        assert!(host.pixmap_pixels().is_none());

        Ok(())
    }

    #[test]
    fn resize_through_crtc_config() -> Result<()> {
        let mut host = HeadlessScreen::new();
        let mut driver = VncDriver::pre_init(DriverConfig::default())?;
        driver.screen_init(&mut host)?;

        assert!(driver.resize(&mut host, 1280, 720));
        assert_eq!(driver.framebuffer().geometry(), Geometry::new(1280, 720));
        assert_eq!(host.pixmap_header().map(|h| h.stride), Some(5120));

        // 16 MiB do not fit into the default 4 MiB of video RAM
        assert!(!driver.resize(&mut host, 2048, 2048));
        assert!(!driver.resize(&mut host, 0, 720));
        assert_eq!(driver.framebuffer().geometry(), Geometry::new(1280, 720));
        assert_eq!(host.pixmap_header().map(|h| h.width), Some(1280));

        host.refuse_pixmap_headers = true;
        assert!(!driver.resize(&mut host, 800, 600));
        assert_eq!(driver.framebuffer().geometry(), Geometry::new(1280, 720));

        Ok(())
    }

    #[test]
    fn root_window_gets_version() -> Result<()> {
        let mut host = HeadlessScreen::new();
        let mut driver = VncDriver::pre_init(DriverConfig::default())?;
        driver.screen_init(&mut host)?;

        let mut chain = VncDriver::wrap_create_window(HeadlessCreateWindow);
        assert!(host.create_window(&mut chain).is_some());

        assert_eq!(
            host.root_property(VERSION_PROPERTY),
            Some(env!("CARGO_PKG_VERSION").as_bytes())
        );

        Ok(())
    }
}
