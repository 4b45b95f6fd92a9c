//! One-shot offline render of the demo scene to a PPM file.
//!
//! ```sh
//! cargo run --release --example render_ppm > out.ppm
//! ```

use std::io::{self, BufWriter, Write};

use glint_tracer::{demo_world, render, RenderOptions, ViewParams, DEFAULT_PALETTE};
use tokio_util::sync::CancellationToken;

fn main() -> io::Result<()> {
    env_logger::init();

    let options = RenderOptions {
        width: 400,
        height: 300,
        samples_per_pixel: 50,
        ..RenderOptions::default()
    };
    let view = ViewParams::default();
    let camera = view.camera(options.width, options.height);

    let mut rng = rand::thread_rng();
    let world = demo_world(&DEFAULT_PALETTE, &mut rng);

    // Collect progressive updates into a framebuffer; later emissions for
    // a pixel overwrite earlier, coarser ones
    let width = options.width as usize;
    let height = options.height as usize;
    let mut framebuffer = vec![[0u8; 3]; width * height];

    let cancel = CancellationToken::new();
    render(&world, &camera, &options, &cancel, &mut rng, &mut |update| {
        framebuffer[update.y as usize * width + update.x as usize] = update.rgb;
    });

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    writeln!(out, "P3")?;
    writeln!(out, "{width} {height}")?;
    writeln!(out, "255")?;
    for [r, g, b] in &framebuffer {
        writeln!(out, "{r} {g} {b}")?;
    }
    out.flush()
}
