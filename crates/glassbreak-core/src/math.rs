//! Math utilities
//!
//! Re-exports from glam and the few geometric helpers the simulator needs.

pub use glam::{EulerRot, Mat4, Quat, UVec2, Vec2, Vec3, Vec4};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create an empty AABB
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Create an AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from center and half-extents
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half-extents of the AABB
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Get the full size of the AABB
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check if the AABB is empty
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Check if a point is inside the AABB
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Nearest point inside the box
    pub fn clamp_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    /// Expand the AABB to include a point
    pub fn expand_to_include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Ray for picking
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin
    pub origin: Vec3,
    /// Ray direction (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersect with the plane `z = plane_z`, in front of the origin only
    pub fn intersect_z_plane(&self, plane_z: f32) -> Option<Vec3> {
        if self.direction.z.abs() < 1e-6 {
            return None;
        }
        let t = (plane_z - self.origin.z) / self.direction.z;
        (t >= 0.0).then(|| self.at(t))
    }
}

/// Pane rectangle in world space, facing +Z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelRect {
    /// Pane centre
    pub center: Vec3,
    pub width: f32,
    pub height: f32,
    pub thickness: f32,
}

impl PanelRect {
    /// Pane standing on the floor with its bottom edge `lift` above it
    pub fn standing(width: f32, height: f32, thickness: f32, lift: f32) -> Self {
        Self {
            center: Vec3::new(0.0, height / 2.0 + lift, 0.0),
            width,
            height,
            thickness,
        }
    }

    /// Half extents including thickness
    pub fn half_extents(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.thickness) * 0.5
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center, self.half_extents())
    }

    /// Pane-local to world
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.center + local
    }

    /// World to pane-local
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        world - self.center
    }

    /// Clamp a pane-local point onto the pane volume
    pub fn clamp_local(&self, local: Vec3) -> Vec3 {
        let half = self.half_extents();
        local.clamp(-half, half)
    }
}

/// Rotation quaternion from XYZ Euler angles (radians)
pub fn euler_to_quat(euler: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z)
}

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_creation() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(aabb.center(), Vec3::splat(0.5));
        assert_eq!(aabb.size(), Vec3::ONE);
        assert!(!aabb.is_empty());
        assert!(Aabb::EMPTY.is_empty());
    }

    #[test]
    fn test_aabb_contains_point() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.contains_point(Vec3::splat(0.5)));
        assert!(!aabb.contains_point(Vec3::splat(2.0)));
    }

    #[test]
    fn test_aabb_clamp_point() {
        let aabb = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::new(1.0, 2.0, 0.5));
        let clamped = aabb.clamp_point(Vec3::new(5.0, -9.0, 0.1));
        assert_eq!(clamped, Vec3::new(1.0, -2.0, 0.1));
    }

    #[test]
    fn test_aabb_expand() {
        let mut aabb = Aabb::EMPTY;
        aabb.expand_to_include(Vec3::new(-1.0, 0.0, 2.0));
        aabb.expand_to_include(Vec3::new(1.0, 3.0, -2.0));
        assert_eq!(aabb.min, Vec3::new(-1.0, 0.0, -2.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 3.0, 2.0));
    }

    #[test]
    fn test_ray_plane_intersection() {
        let ray = Ray::new(Vec3::new(0.5, 1.0, 4.0), Vec3::NEG_Z);
        let hit = ray.intersect_z_plane(0.0).unwrap();
        assert!((hit - Vec3::new(0.5, 1.0, 0.0)).length() < 1e-5);

        // Plane behind the ray
        let away = Ray::new(Vec3::new(0.0, 0.0, 4.0), Vec3::Z);
        assert!(away.intersect_z_plane(0.0).is_none());

        // Parallel ray
        let parallel = Ray::new(Vec3::new(0.0, 0.0, 4.0), Vec3::X);
        assert!(parallel.intersect_z_plane(0.0).is_none());
    }

    #[test]
    fn test_panel_rect() {
        let rect = PanelRect::standing(0.85, 1.75, 0.008, 0.1);
        assert!((rect.center.y - 0.975).abs() < 1e-6);
        assert!((rect.bounds().min.y - 0.1).abs() < 1e-6);

        let world = rect.to_world(Vec3::new(0.1, 0.2, 0.0));
        assert!((rect.to_local(world) - Vec3::new(0.1, 0.2, 0.0)).length() < 1e-6);

        let clamped = rect.clamp_local(Vec3::new(5.0, -5.0, 1.0));
        assert_eq!(clamped, Vec3::new(0.425, -0.875, 0.004));
    }

    #[test]
    fn test_euler_to_quat() {
        let q = euler_to_quat(Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));
        let rotated = q * Vec3::X;
        assert!((rotated - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
    }
}
