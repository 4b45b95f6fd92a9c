//! The scene: an immutable collection of intersectable objects.

use crate::{Color, Material, Sphere};
use glint_math::{Interval, Ray, Vec3};
use rand::{Rng, RngCore};

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Point of intersection
    pub point: Vec3,
    /// Unit surface normal, always oriented against the incoming ray
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front (outward) face of the surface
    pub front_face: bool,
    /// Material at the intersection point
    pub material: Material,
}

impl Hit {
    /// Build a hit from the outward geometric normal, orienting the
    /// stored normal against the incoming ray.
    pub fn new(ray: &Ray, point: Vec3, outward_normal: Vec3, t: f32, material: Material) -> Self {
        let front_face = ray.direction.dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            point,
            normal,
            t,
            front_face,
            material,
        }
    }
}

/// A geometric primitive the tracer can intersect.
///
/// A closed sum type with one dispatch point keeps future primitives an
/// additive change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Object {
    Sphere(Sphere),
}

impl Object {
    /// Test the ray against this object within the given t range.
    pub fn hit(&self, ray: &Ray, range: Interval) -> Option<Hit> {
        match self {
            Object::Sphere(sphere) => sphere.hit(ray, range),
        }
    }
}

/// An ordered collection of scene objects.
///
/// A world is an immutable snapshot for the lifetime of one render; a
/// parameter change builds a brand-new world rather than mutating one an
/// in-flight render may still be reading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct World {
    objects: Vec<Object>,
}

impl World {
    /// Create a new empty world.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the world.
    pub fn add(&mut self, object: Object) {
        self.objects.push(object);
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the world is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Find the closest intersection of the ray within the range.
    ///
    /// Candidates are compared by the intersection parameter `t`, which
    /// stays correct for non-unit ray directions.
    pub fn closest_hit(&self, ray: &Ray, range: Interval) -> Option<Hit> {
        let mut closest: Option<Hit> = None;
        let mut closest_t = range.max;

        for object in &self.objects {
            if let Some(hit) = object.hit(ray, Interval::new(range.min, closest_t)) {
                closest_t = hit.t;
                closest = Some(hit);
            }
        }

        closest
    }
}

/// Palette used until the first successful palette fetch.
pub const DEFAULT_PALETTE: [Color; 3] = [
    Color::new(0.4, 0.8, 0.97),
    Color::new(0.97, 0.55, 0.28),
    Color::new(0.3, 0.89, 1.0),
];

/// Pick a color uniformly from the palette.
fn random_color(palette: &[Color], rng: &mut dyn RngCore) -> Color {
    palette[rng.gen_range(0..palette.len())]
}

/// Build the demo scene with palette-driven albedos: a large diffuse
/// ground sphere, a hollow glass shell, and two metal spheres.
pub fn demo_world(palette: &[Color], rng: &mut dyn RngCore) -> World {
    let palette = if palette.is_empty() {
        &DEFAULT_PALETTE[..]
    } else {
        palette
    };

    let ground = Material::Diffuse {
        albedo: random_color(palette, rng),
    };
    let glass = Material::Dielectric {
        refractive_index: 1.5,
    };
    let left = Material::metal(random_color(palette, rng), 0.3);
    let right = Material::metal(random_color(palette, rng), 1.0);

    let mut world = World::new();
    world.add(Object::Sphere(Sphere::new(
        Vec3::new(0.0, -100.5, -1.0),
        100.0,
        ground,
    )));
    world.add(Object::Sphere(Sphere::new(
        Vec3::new(0.0, 0.3, -1.0),
        0.5,
        glass,
    )));
    // The negative radius turns this into the inner wall of a hollow shell
    world.add(Object::Sphere(Sphere::new(
        Vec3::new(0.0, 0.3, -1.0),
        -0.48,
        glass,
    )));
    world.add(Object::Sphere(Sphere::new(
        Vec3::new(-1.0, 0.0, -1.0),
        0.5,
        left,
    )));
    world.add(Object::Sphere(Sphere::new(
        Vec3::new(1.0, 0.0, -1.0),
        0.5,
        right,
    )));

    world
}
