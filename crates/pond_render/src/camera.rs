//! Orbit camera looking at the pond.
//!
//! Doubles as the pick-ray source: pointer positions are unprojected
//! through the inverse view-projection.

use glam::{Mat4, Vec2, Vec3};
use pond_core::math::Ray;
use pond_core::picking::{RayCaster, Viewport};

const DEFAULT_EYE: Vec3 = Vec3::new(8.0, 6.0, 10.0);
const DEFAULT_TARGET: Vec3 = Vec3::new(0.0, 0.1, 0.0);

const MIN_DISTANCE: f32 = 2.0;
const MAX_DISTANCE: f32 = 60.0;
/// Keeps the eye off the poles so the up vector stays valid.
const MAX_PITCH: f32 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            eye: DEFAULT_EYE,
            target: DEFAULT_TARGET,
            fov_y_degrees: 50.0,
            near: 0.1,
            far: 200.0,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the initial framing.
    pub fn reset(&mut self) {
        self.eye = DEFAULT_EYE;
        self.target = DEFAULT_TARGET;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }

    pub fn distance(&self) -> f32 {
        self.eye.distance(self.target)
    }

    /// Rotate the eye around the target by yaw (about +Y) and pitch.
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        let offset = self.eye - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let yaw = offset.z.atan2(offset.x) + delta_yaw;
        let pitch = ((offset.y / radius).asin() + delta_pitch).clamp(-MAX_PITCH, MAX_PITCH);
        let planar = radius * pitch.cos();
        self.eye = self.target + Vec3::new(planar * yaw.cos(), radius * pitch.sin(), planar * yaw.sin());
    }

    /// Scale the eye distance by `factor`, clamped to a sane range.
    pub fn zoom(&mut self, factor: f32) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let offset = self.eye - self.target;
        let distance = (offset.length() * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.eye = self.target + offset.normalize_or_zero() * distance;
    }
}

impl RayCaster for OrbitCamera {
    fn ray_from_pointer(&self, pointer: Vec2, viewport: &Viewport) -> Option<Ray> {
        let ndc = viewport.to_ndc(pointer)?;
        let inverse = self.view_projection(viewport.aspect()).inverse();
        // perspective_rh maps the far plane to depth 1
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        if !far.is_finite() {
            return None;
        }
        Ray::new(self.eye, far - self.eye)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centre_ray_points_at_target() {
        let camera = OrbitCamera::default();
        let viewport = Viewport::new(1280.0, 720.0);
        let ray = camera
            .ray_from_pointer(Vec2::new(640.0, 360.0), &viewport)
            .unwrap();
        let expected = (camera.target - camera.eye).normalize();
        assert!(ray.direction.abs_diff_eq(expected, 1e-4));
        assert_eq!(ray.origin, camera.eye);
    }

    #[test]
    fn test_pointer_left_of_centre_turns_ray_left() {
        let camera = OrbitCamera::default();
        let viewport = Viewport::new(800.0, 600.0);
        let centre = camera
            .ray_from_pointer(Vec2::new(400.0, 300.0), &viewport)
            .unwrap();
        let left = camera
            .ray_from_pointer(Vec2::new(100.0, 300.0), &viewport)
            .unwrap();
        let right_axis = (camera.target - camera.eye).cross(Vec3::Y).normalize();
        assert!(left.direction.dot(right_axis) < centre.direction.dot(right_axis));
    }

    #[test]
    fn test_empty_viewport_gives_no_ray() {
        let camera = OrbitCamera::default();
        assert!(camera
            .ray_from_pointer(Vec2::ZERO, &Viewport::new(0.0, 0.0))
            .is_none());
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let mut camera = OrbitCamera::default();
        let distance = camera.distance();
        camera.orbit(0.7, -0.2);
        assert!((camera.distance() - distance).abs() < 1e-4);
        camera.orbit(0.0, 10.0);
        let offset = (camera.eye - camera.target).normalize();
        assert!(offset.y < 1.0);
        camera.reset();
        assert_eq!(camera, OrbitCamera::default());
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = OrbitCamera::default();
        camera.zoom(0.001);
        assert!((camera.distance() - MIN_DISTANCE).abs() < 1e-4);
        camera.zoom(1000.0);
        assert!((camera.distance() - MAX_DISTANCE).abs() < 1e-3);
    }
}
