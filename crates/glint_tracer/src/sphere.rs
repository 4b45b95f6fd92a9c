//! Sphere primitive for ray tracing.

use crate::{Hit, Material};
use glint_math::{Interval, Ray, Vec3};

/// A sphere primitive.
///
/// A negative radius models a hollow, inward-facing shell: the outward
/// normal `(point - center) / radius` flips with the sign, which is how
/// the demo scene builds its glass bubble.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub material: Material,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    /// Test the ray against this sphere within the given t range.
    pub fn hit(&self, ray: &Ray, range: Interval) -> Option<Hit> {
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let half_b = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (-half_b - sqrtd) / a;
        if !range.surrounds(root) {
            root = (-half_b + sqrtd) / a;
            if !range.surrounds(root) {
                return None;
            }
        }

        let point = ray.at(root);
        let outward_normal = (point - self.center) / self.radius;
        Some(Hit::new(ray, point, outward_normal, root, self.material))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    fn gray() -> Material {
        Material::Diffuse {
            albedo: Color::splat(0.5),
        }
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let hit = sphere
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("ray through the center must hit");

        assert!((hit.t - 0.5).abs() < 1e-4);
        assert!(hit.front_face);
        assert!((hit.normal - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());

        // Ray pointing away from the sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_hit_point_lies_on_surface() {
        let sphere = Sphere::new(Vec3::new(0.3, -0.2, -2.0), 0.7, gray());
        let ray = Ray::new(Vec3::new(0.1, 0.1, 0.5), Vec3::new(0.05, -0.08, -1.0));

        let hit = sphere
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("ray aimed near the center must hit");

        let distance = (hit.point - sphere.center).length();
        assert!(
            (distance - sphere.radius).abs() < 1e-4,
            "hit point must lie on the sphere surface, got distance {distance}"
        );
    }

    #[test]
    fn test_range_skips_near_root_to_far_root() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        // Near root is at t=0.5; exclude it and the far root at t=1.5 wins
        let hit = sphere
            .hit(&ray, Interval::new(1.0, f32::INFINITY))
            .expect("far root must be found");
        assert!((hit.t - 1.5).abs() < 1e-4);

        // From inside, the normal is flipped to oppose the ray
        assert!(!hit.front_face);
        assert!((hit.normal - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn test_negative_radius_inverts_orientation() {
        // A hollow shell: same geometry, inverted surface
        let shell = Sphere::new(Vec3::new(0.0, 0.0, -1.0), -0.5, gray());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let hit = shell
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("shell surface must still intersect");

        assert!((hit.t - 0.5).abs() < 1e-4);
        // Geometric normal flips with the sign of the radius, so the
        // front-facing side is now the inside
        assert!(!hit.front_face);
        assert!((hit.normal - Vec3::Z).length() < 1e-4);
    }
}
