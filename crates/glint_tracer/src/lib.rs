//! Progressive CPU ray tracing over a small sphere scene.
//!
//! A recursive ray tracer with diffuse, metal, and dielectric materials.
//! The renderer emits per-pixel updates through a callback and observes a
//! cancellation token inside its innermost loop, which is what lets the
//! streaming server supersede an in-flight render with a fresh one.

mod camera;
mod material;
mod renderer;
mod sphere;
mod world;

pub use camera::{Camera, ViewParams};
pub use material::{random_unit_vector, reflect, refract, Color, Material, Scatter};
pub use renderer::{
    linear_to_gamma, ray_color, render, PixelUpdate, RenderMode, RenderOptions,
};
pub use sphere::Sphere;
pub use world::{demo_world, Hit, Object, World, DEFAULT_PALETTE};

/// Re-export math types from glint_math
pub use glint_math::{Interval, Ray, Vec3};
