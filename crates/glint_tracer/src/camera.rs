//! Camera: viewport basis and ray generation.

use glint_math::{Ray, Vec3};

/// Camera with a precomputed viewport basis.
///
/// [`Camera::ray_at`] maps normalized image coordinates in [0,1]² — with
/// (0,0) at the lower-left viewport corner — to a ray out of the eye
/// point. The camera is immutable after construction and safe to share
/// across all pixels of a render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    origin: Vec3,
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
}

impl Camera {
    /// Build the orthonormal viewport basis for a camera at `look_from`
    /// facing `look_at`.
    pub fn new(
        vup: Vec3,
        look_from: Vec3,
        look_at: Vec3,
        viewport_height: f32,
        aspect_ratio: f32,
    ) -> Self {
        let viewport_width = aspect_ratio * viewport_height;

        let w = (look_from - look_at).normalize();
        let u = vup.cross(w).normalize();
        let v = w.cross(u);

        let origin = look_from;
        let horizontal = u * viewport_width;
        let vertical = v * viewport_height;
        let lower_left = origin - horizontal / 2.0 - vertical / 2.0 - w;

        Self {
            origin,
            lower_left,
            horizontal,
            vertical,
        }
    }

    /// Generate the ray through normalized viewport coordinates (s, t).
    pub fn ray_at(&self, s: f32, t: f32) -> Ray {
        let direction = self.lower_left + s * self.horizontal + t * self.vertical - self.origin;
        Ray::new(self.origin, direction)
    }
}

/// Viewer-facing view parameters: orbit angle and zoom.
///
/// These are the values a `/change` request carries; a fresh camera is
/// derived from them for each render.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewParams {
    /// Orbit angle around the scene center, in degrees
    pub angle_degrees: f32,
    /// Zoom percentage; 0 is the neutral framing
    pub zoom_percent: f32,
}

/// Viewport height at the neutral zoom.
const BASE_VIEWPORT_HEIGHT: f32 = 2.0;

impl ViewParams {
    /// Eye position orbiting the scene at the given angle, slightly
    /// elevated, at a fixed distance of 2.
    pub fn eye(&self) -> Vec3 {
        let angle = self.angle_degrees.to_radians();
        Vec3::new(angle.cos(), 0.5, angle.sin()).normalize() * 2.0
    }

    /// Map the zoom percentage onto a viewport height.
    ///
    /// Zoom 0 keeps the neutral framing; larger values narrow the
    /// viewport. Clamped so extreme inputs stay renderable.
    pub fn viewport_height(&self) -> f32 {
        (BASE_VIEWPORT_HEIGHT - self.zoom_percent / 100.0).clamp(0.25, 4.0)
    }

    /// Build the camera for this view at the given image resolution.
    pub fn camera(&self, width: u32, height: u32) -> Camera {
        let aspect_ratio = width as f32 / height as f32;
        Camera::new(
            Vec3::Y,
            self.eye(),
            Vec3::new(0.0, 0.0, -1.0),
            self.viewport_height(),
            aspect_ratio,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_points_at_look_target() {
        let camera = Camera::new(Vec3::Y, Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 2.0, 1.0);

        let ray = camera.ray_at(0.5, 0.5);
        assert_eq!(ray.origin, Vec3::ZERO);
        assert!((ray.direction.normalize() - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_lower_left_corner_ray() {
        let camera = Camera::new(Vec3::Y, Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 2.0, 1.0);

        // (0,0) is the lower-left corner: down and to the left of center
        let ray = camera.ray_at(0.0, 0.0);
        assert!(ray.direction.x < 0.0);
        assert!(ray.direction.y < 0.0);
        assert!(ray.direction.z < 0.0);
    }

    #[test]
    fn test_rays_originate_at_eye() {
        let eye = Vec3::new(2.0, 1.0, 3.0);
        let camera = Camera::new(Vec3::Y, eye, Vec3::ZERO, 2.0, 4.0 / 3.0);

        for (s, t) in [(0.0, 0.0), (0.5, 0.5), (1.0, 1.0), (0.25, 0.75)] {
            assert_eq!(camera.ray_at(s, t).origin, eye);
        }
    }

    #[test]
    fn test_view_params_eye_orbit() {
        let view = ViewParams::default();
        let eye = view.eye();
        assert!((eye.length() - 2.0).abs() < 1e-5);
        assert!(eye.y > 0.0);

        // Opposite angles land on opposite sides of the scene
        let opposite = ViewParams {
            angle_degrees: 180.0,
            zoom_percent: 0.0,
        };
        assert!((eye.x + opposite.eye().x).abs() < 1e-5);
    }

    #[test]
    fn test_zoom_mapping() {
        let neutral = ViewParams::default();
        assert_eq!(neutral.viewport_height(), 2.0);

        let closer = ViewParams {
            angle_degrees: 0.0,
            zoom_percent: 100.0,
        };
        assert_eq!(closer.viewport_height(), 1.0);

        // Extreme values are clamped, not propagated
        let extreme = ViewParams {
            angle_degrees: 0.0,
            zoom_percent: 1e6,
        };
        assert_eq!(extreme.viewport_height(), 0.25);
    }
}
