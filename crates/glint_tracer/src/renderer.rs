//! Progressive multi-sample renderer.
//!
//! Drives the per-pixel, per-sample loop: camera rays in, recursive
//! shading against the world, a running per-pixel average, gamma
//! correction, and periodic pixel-update emission so viewers see a
//! coarse image immediately and watch it sharpen.

use crate::{Camera, Color, World};
use glint_math::{Interval, Ray, Vec3};
use rand::{Rng, RngCore};
use tokio_util::sync::CancellationToken;

/// Minimum t for shading queries; suppresses self-intersection acne.
const T_MIN: f32 = 1e-3;

/// Display gamma applied to averaged samples.
const GAMMA: f32 = 2.0;

/// How a hit is shaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Full recursive material shading.
    #[default]
    Shaded,
    /// Debug view encoding the oriented surface normal as a color, with
    /// no bounces and no gamma.
    Normals,
}

/// Configuration for one render invocation.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    /// Samples accumulated per pixel across the whole render
    pub samples_per_pixel: u32,
    /// Maximum scatter recursion depth
    pub max_bounces: u32,
    pub mode: RenderMode,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
            samples_per_pixel: 10,
            max_bounces: 10,
            mode: RenderMode::Shaded,
        }
    }
}

/// One progressively refined pixel in screen orientation, ready for the
/// wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelUpdate {
    pub x: u16,
    pub y: u16,
    pub rgb: [u8; 3],
}

/// Compute the color seen by a ray.
///
/// Recursively traces scattered rays until a miss, an absorption, or the
/// bounce cutoff; the cutoff returns black, bounding recursion depth
/// deterministically.
pub fn ray_color(world: &World, ray: &Ray, bounces_left: u32, rng: &mut dyn RngCore) -> Color {
    if bounces_left == 0 {
        return Color::ZERO;
    }

    match world.closest_hit(ray, Interval::new(T_MIN, f32::INFINITY)) {
        Some(hit) => match hit.material.scatter(ray, &hit, rng) {
            Some(scatter) => {
                scatter.attenuation * ray_color(world, &scatter.ray, bounces_left - 1, rng)
            }
            // Absorbed
            None => Color::ZERO,
        },
        None => sky_gradient(ray),
    }
}

/// Vertical white-to-sky blend for rays that miss everything.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction.normalize();
    let t = 0.5 * (unit_direction.y + 1.0);
    let white = Color::ONE;
    let sky = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - t) + sky * t
}

/// Debug shading: the oriented surface normal encoded as `0.5 * (n + 1)`.
fn normal_color(world: &World, ray: &Ray) -> Color {
    match world.closest_hit(ray, Interval::new(T_MIN, f32::INFINITY)) {
        Some(hit) => 0.5 * (hit.normal + Vec3::ONE),
        None => sky_gradient(ray),
    }
}

/// Apply display gamma to one linear channel.
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.powf(1.0 / GAMMA)
    } else {
        0.0
    }
}

/// Quantize an averaged color to 8-bit channels.
fn to_rgb(color: Color, mode: RenderMode) -> [u8; 3] {
    let corrected = match mode {
        RenderMode::Shaded => Vec3::new(
            linear_to_gamma(color.x),
            linear_to_gamma(color.y),
            linear_to_gamma(color.z),
        ),
        // The normal encoding is already display-ready
        RenderMode::Normals => color,
    };

    [
        (255.0 * corrected.x.clamp(0.0, 1.0)) as u8,
        (255.0 * corrected.y.clamp(0.0, 1.0)) as u8,
        (255.0 * corrected.z.clamp(0.0, 1.0)) as u8,
    ]
}

/// Render the scene progressively, emitting pixel updates as samples
/// accumulate.
///
/// Iteration is samples-outer, rows-outer (top to bottom in internal Y,
/// flipped to screen Y on emit), columns-inner. Each pixel's running
/// average is emitted on the first, every third, and the final sample
/// pass. The cancellation token is checked before every pixel's sample
/// so a superseding render takes over quickly; a cancelled render stops
/// emitting and returns without error.
pub fn render(
    world: &World,
    camera: &Camera,
    options: &RenderOptions,
    cancel: &CancellationToken,
    rng: &mut dyn RngCore,
    emit: &mut dyn FnMut(PixelUpdate),
) {
    let width = options.width.max(1) as usize;
    let height = options.height.max(1) as usize;
    let samples = options.samples_per_pixel.max(1);
    let inv_w = 1.0 / width.saturating_sub(1).max(1) as f32;
    let inv_h = 1.0 / height.saturating_sub(1).max(1) as f32;

    // Running per-pixel sums; each render owns its own buffer
    let mut sums = vec![Vec3::ZERO; width * height];

    for s in 0..samples {
        for y in (0..height).rev() {
            for x in 0..width {
                if cancel.is_cancelled() {
                    log::debug!("render cancelled at sample {s}");
                    return;
                }

                // Jitter within the pixel footprint
                let u = (x as f32 + rng.gen::<f32>()) * inv_w;
                let v = (y as f32 + rng.gen::<f32>()) * inv_h;
                let ray = camera.ray_at(u, v);

                let color = match options.mode {
                    RenderMode::Shaded => ray_color(world, &ray, options.max_bounces, rng),
                    RenderMode::Normals => normal_color(world, &ray),
                };

                let i = y * width + x;
                sums[i] += color;

                if s % 3 == 0 || s == samples - 1 {
                    let average = sums[i] / (s + 1) as f32;
                    emit(PixelUpdate {
                        x: x as u16,
                        y: (height - 1 - y) as u16,
                        rgb: to_rgb(average, options.mode),
                    });
                }
            }
        }
    }

    log::debug!("render finished: {width}x{height} @ {samples} spp");
}
