use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};

use vncdrv::config::DriverConfig;
use vncdrv::crtc::CrtcConfigFuncs;
use vncdrv::driver::VncDriver;
use vncdrv::geometry::Geometry;
use vncdrv::host::{HeadlessCreateWindow, HeadlessScreen};
use vncdrv::screenshot::screenshot;

/// Bring up a headless vncdrv screen and resize it
#[derive(Parser, Debug)]
#[command(name = "vncdrv", version, long_about = None)]
struct Cli {
    /// JSON driver configuration, built-in defaults if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a PNG of the final root pixmap to this path
    #[arg(long, env = "VNCDRV_SCREENSHOT")]
    screenshot: Option<PathBuf>,

    /// Screen sizes to resize to in order, e.g. 1280x720
    sizes: Vec<Geometry>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    pretty_env_logger::init();

    info!("{}", env!("VERSION_STRING"));

    let config = match &cli.config {
        Some(path) => DriverConfig::load(path)?,
        None => DriverConfig::default(),
    };

    let mut host = HeadlessScreen::new();
    let mut driver = VncDriver::pre_init(config)?;

    driver.screen_init(&mut host)?;

    let mut create_window = VncDriver::wrap_create_window(HeadlessCreateWindow);
    if host.create_window(&mut create_window).is_none() {
        warn!("Could not create the root window");
    }

    for size in &cli.sizes {
        if driver.resize(&mut host, size.width, size.height) {
            info!("Resized screen to {size}");
        } else {
            error!("Failed to resize screen to {size}");
        }
    }

    if let Some(path) = &cli.screenshot {
        let png = screenshot(&host)?;

        fs::write(path, png)
            .with_context(|| format!("Failed to write screenshot to {}", path.display()))?;
    }

    driver.close_screen(&mut host);

    Ok(())
}
