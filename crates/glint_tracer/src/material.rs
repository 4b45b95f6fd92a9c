//! Surface scattering for the three material kinds.

use crate::Hit;
use glint_math::{Ray, Vec3};
use rand::{Rng, RngCore};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// A scattered ray together with its attenuation color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scatter {
    pub attenuation: Color,
    pub ray: Ray,
}

/// Surface material.
///
/// A closed set of scattering behaviors with a single dispatch point in
/// [`Material::scatter`], so every variant is exhaustively handled at
/// compile time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    /// Lambertian scatter with the given albedo.
    Diffuse { albedo: Color },
    /// Specular reflection with a randomized fuzz perturbation.
    Metal { albedo: Color, fuzz: f32 },
    /// Refract/reflect by Snell's law and the Schlick approximation.
    Dielectric { refractive_index: f32 },
}

impl Material {
    /// Metal with fuzz clamped to [0, 1].
    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        Material::Metal {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    /// Scatter an incoming ray at a hit point.
    ///
    /// Returns `None` when the ray is absorbed.
    pub fn scatter(&self, ray_in: &Ray, hit: &Hit, rng: &mut dyn RngCore) -> Option<Scatter> {
        match *self {
            Material::Diffuse { albedo } => {
                let direction = diffuse_direction(hit.normal, random_unit_vector(rng));
                Some(Scatter {
                    attenuation: albedo,
                    ray: Ray::new(hit.point, direction),
                })
            }
            Material::Metal { albedo, fuzz } => {
                let reflected = reflect(ray_in.direction.normalize(), hit.normal);

                // A reflection leaving through the surface is absorbed
                if reflected.dot(hit.normal) <= 0.0 {
                    return None;
                }

                Some(Scatter {
                    attenuation: albedo,
                    ray: Ray::new(hit.point, reflected + fuzz * random_unit_vector(rng)),
                })
            }
            Material::Dielectric { refractive_index } => {
                let refraction_ratio = if hit.front_face {
                    1.0 / refractive_index
                } else {
                    refractive_index
                };

                let unit_direction = ray_in.direction.normalize();
                let cos_theta = (-unit_direction).dot(hit.normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

                let cannot_refract = refraction_ratio * sin_theta > 1.0;
                let direction =
                    if cannot_refract || reflectance(cos_theta, refraction_ratio) > rng.gen() {
                        reflect(unit_direction, hit.normal)
                    } else {
                        refract(unit_direction, hit.normal, refraction_ratio)
                    };

                // The glass itself adds no tint
                Some(Scatter {
                    attenuation: Color::ONE,
                    ray: Ray::new(hit.point, direction),
                })
            }
        }
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through a surface with the given refraction ratio.
///
/// The `max(0, ..)` clamp absorbs small negative values from float error
/// near total internal reflection.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).max(0.0).sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance.
fn reflectance(cosine: f32, refraction_ratio: f32) -> f32 {
    let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

/// Lambertian scatter direction with the degenerate-cancellation fallback:
/// when `normal + random` nearly cancels, scatter along the normal itself
/// instead of a near-zero direction.
fn diffuse_direction(normal: Vec3, random: Vec3) -> Vec3 {
    let direction = normal + random;
    if direction.length_squared() < 1e-8 {
        normal
    } else {
        direction
    }
}

/// Generate a random unit vector on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sampling for a uniform distribution on the sphere
    loop {
        let v = Vec3::new(
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>() * 2.0 - 1.0,
            rng.gen::<f32>() * 2.0 - 1.0,
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}
