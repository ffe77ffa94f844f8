//! Camera
//!
//! Perspective camera, screen-to-world unprojection and a rig that keeps
//! the eye inside the room and reports whether it moved this frame.

use glam::{Mat4, Vec2, Vec3};

use crate::math::{Aabb, Ray};

/// Displacement below which the camera counts as still
pub const CAMERA_MOVE_EPSILON: f32 = 0.001;

/// Perspective camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye position
    pub position: Vec3,
    /// Look-at target
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    /// Width / height
    pub aspect: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(1.5, 1.3, 1.8),
            target: Vec3::new(0.0, 0.9, 0.0),
            fov_y_degrees: 50.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 50.0,
        }
    }
}

impl Camera {
    /// World-to-view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// View-to-clip matrix (depth 0..1)
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect.max(f32::EPSILON),
            self.near,
            self.far,
        )
    }

    /// Combined world-to-clip matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Set aspect ratio from a viewport size
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Ray through a pixel of a `viewport`-sized surface (origin top-left)
    pub fn screen_ray(&self, screen: Vec2, viewport: Vec2) -> Option<Ray> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }
        let ndc = Vec2::new(
            (screen.x / viewport.x) * 2.0 - 1.0,
            -(screen.y / viewport.y) * 2.0 + 1.0,
        );
        let inverse = self.view_projection().inverse();
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        let direction = far - near;
        if !direction.is_finite() || direction.length_squared() == 0.0 {
            return None;
        }
        Some(Ray::new(near, direction))
    }
}

/// Camera plus room bounds and motion tracking
#[derive(Debug, Clone)]
pub struct CameraRig {
    /// The controlled camera
    pub camera: Camera,
    bounds: Aabb,
    last_position: Vec3,
    moving: bool,
}

impl CameraRig {
    /// Create a rig confined to `bounds`
    pub fn new(camera: Camera, bounds: Aabb) -> Self {
        let position = bounds.clamp_point(camera.position);
        Self {
            camera: Camera { position, ..camera },
            bounds,
            last_position: position,
            moving: false,
        }
    }

    /// Request a new eye position; applied on the next `update`
    pub fn move_to(&mut self, position: Vec3) {
        self.camera.position = position;
    }

    /// Orbit the eye around the target by yaw/pitch radians
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        let offset = self.camera.position - self.camera.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }
        let current_yaw = offset.x.atan2(offset.z);
        let current_pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();
        let new_yaw = current_yaw + yaw;
        let new_pitch = (current_pitch + pitch).clamp(-1.4, 1.4);
        let dir = Vec3::new(
            new_pitch.cos() * new_yaw.sin(),
            new_pitch.sin(),
            new_pitch.cos() * new_yaw.cos(),
        );
        self.camera.position = self.camera.target + dir * radius;
    }

    /// Clamp to the room and record whether the eye moved since last frame
    pub fn update(&mut self) -> bool {
        self.camera.position = self.bounds.clamp_point(self.camera.position);
        self.moving = self.camera.position.distance(self.last_position) > CAMERA_MOVE_EPSILON;
        self.last_position = self.camera.position;
        self.moving
    }

    /// Whether the last `update` saw movement
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Room bounds
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bathroom_bounds() -> Aabb {
        Aabb::new(Vec3::new(-2.5, 0.4, -1.8), Vec3::new(2.5, 2.6, 3.2))
    }

    #[test]
    fn test_center_ray_hits_target() {
        let camera = Camera::default();
        let viewport = Vec2::new(1600.0, 900.0);
        let ray = camera.screen_ray(viewport * 0.5, viewport).unwrap();

        let to_target = (camera.target - camera.position).normalize();
        assert!(ray.direction.dot(to_target) > 0.999);
    }

    #[test]
    fn test_screen_ray_onto_pane_plane() {
        let camera = Camera {
            position: Vec3::new(0.0, 1.0, 3.0),
            target: Vec3::new(0.0, 1.0, 0.0),
            ..Default::default()
        };
        let viewport = Vec2::new(800.0, 450.0);
        let hit = camera
            .screen_ray(viewport * 0.5, viewport)
            .and_then(|ray| ray.intersect_z_plane(0.0))
            .unwrap();
        assert!((hit - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-3);

        // Upper-left of screen maps to upper-left of the plane
        let hit = camera
            .screen_ray(Vec2::new(100.0, 50.0), viewport)
            .and_then(|ray| ray.intersect_z_plane(0.0))
            .unwrap();
        assert!(hit.x < 0.0 && hit.y > 1.0);
    }

    #[test]
    fn test_degenerate_viewport() {
        let camera = Camera::default();
        assert!(camera.screen_ray(Vec2::ZERO, Vec2::ZERO).is_none());
    }

    #[test]
    fn test_rig_clamps_to_room() {
        let mut rig = CameraRig::new(Camera::default(), bathroom_bounds());
        rig.move_to(Vec3::new(10.0, -3.0, 0.0));
        assert!(rig.update());
        assert_eq!(rig.camera.position, Vec3::new(2.5, 0.4, 0.0));
    }

    #[test]
    fn test_rig_motion_detection() {
        let mut rig = CameraRig::new(Camera::default(), bathroom_bounds());
        assert!(!rig.update());

        rig.orbit(0.3, 0.0);
        assert!(rig.update());
        assert!(rig.is_moving());

        assert!(!rig.update());
        assert!(!rig.is_moving());
    }

    #[test]
    fn test_orbit_keeps_radius() {
        let mut rig = CameraRig::new(Camera::default(), bathroom_bounds());
        let radius = rig.camera.position.distance(rig.camera.target);
        rig.orbit(0.2, 0.1);
        let after = rig.camera.position.distance(rig.camera.target);
        assert!((radius - after).abs() < 1e-4);
    }
}
