//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;
use glint_tracer::RenderOptions;

use crate::palette::COLORMIND_URL;

/// Streaming ray-tracing server.
#[derive(Debug, Clone, Parser)]
#[command(name = "glint_server", version, about)]
pub struct Config {
    /// Listen port for the HTTP server
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Rendered image width in pixels
    #[arg(long, default_value_t = 400)]
    pub width: u32,

    /// Rendered image height in pixels
    #[arg(long, default_value_t = 300)]
    pub height: u32,

    /// Samples accumulated per pixel
    #[arg(long, default_value_t = 10)]
    pub samples: u32,

    /// Maximum scatter recursion depth
    #[arg(long, default_value_t = 10)]
    pub max_bounces: u32,

    /// Directory served for static assets
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,

    /// Palette provider endpoint
    #[arg(long, default_value = COLORMIND_URL)]
    pub palette_url: String,
}

impl Config {
    /// Render options for every render this server spawns.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            width: self.width,
            height: self.height,
            samples_per_pixel: self.samples,
            max_bounces: self.max_bounces,
            ..RenderOptions::default()
        }
    }
}
