//! Mesh and Geometry
//!
//! Geometry descriptors handed to the GPU backend. The backend tessellates;
//! this side only tracks shape parameters and rough triangle budgets.

use glam::{Vec2, Vec3};
use smallvec::SmallVec;

/// Closed 2D outline, counter-clockwise
pub type Outline = SmallVec<[Vec2; 8]>;

/// Geometry descriptor
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Axis-aligned box centred on the origin
    Box {
        /// Full extents
        size: Vec3,
    },
    /// Flat rectangle in the XY plane facing +Z
    Plane {
        /// Width along X
        width: f32,
        /// Height along Y
        height: f32,
    },
    /// Outline extruded along +Z
    Extruded {
        /// Closed outline
        outline: Outline,
        /// Extrusion depth
        depth: f32,
        /// Bevel size, zero for none
        bevel: f32,
    },
}

impl Geometry {
    /// Box of the given extents
    pub fn cube(size: Vec3) -> Self {
        Self::Box { size }
    }

    /// Plane of the given size
    pub fn plane(width: f32, height: f32) -> Self {
        Self::Plane { width, height }
    }

    /// Extrusion without bevel
    pub fn extruded(outline: Outline, depth: f32) -> Self {
        Self::Extruded {
            outline,
            depth,
            bevel: 0.0,
        }
    }

    /// Approximate triangle count after tessellation
    pub fn triangle_count(&self) -> u32 {
        match self {
            Geometry::Box { .. } => 12,
            Geometry::Plane { .. } => 2,
            Geometry::Extruded { outline, bevel, .. } => {
                let n = outline.len() as u32;
                if n < 3 {
                    return 0;
                }
                // Two caps plus side walls, bevels add one ring per side
                let caps = 2 * (n - 2);
                let sides = 2 * n;
                let bevel_rings = if *bevel > 0.0 { 4 * n } else { 0 };
                caps + sides + bevel_rings
            }
        }
    }

    /// Local-space extents
    pub fn extents(&self) -> Vec3 {
        match self {
            Geometry::Box { size } => *size,
            Geometry::Plane { width, height } => Vec3::new(*width, *height, 0.0),
            Geometry::Extruded {
                outline,
                depth,
                bevel,
            } => {
                let (min, max) = outline.iter().fold(
                    (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
                    |(min, max), p| (min.min(*p), max.max(*p)),
                );
                if outline.is_empty() {
                    return Vec3::new(0.0, 0.0, *depth);
                }
                let size = max - min + Vec2::splat(2.0 * bevel);
                Vec3::new(size.x, size.y, depth + 2.0 * bevel)
            }
        }
    }
}

/// Signed area of a closed outline (positive when counter-clockwise)
pub fn outline_area(outline: &[Vec2]) -> f32 {
    let n = outline.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f32 = (0..n)
        .map(|i| {
            let a = outline[i];
            let b = outline[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice * 0.5
}

/// Whether a closed outline is convex
pub fn is_convex(outline: &[Vec2]) -> bool {
    let n = outline.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0f32;
    for i in 0..n {
        let a = outline[i];
        let b = outline[(i + 1) % n];
        let c = outline[(i + 2) % n];
        let cross = (b - a).perp_dot(c - b);
        if cross.abs() <= f32::EPSILON {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    sign != 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn unit_square() -> Outline {
        smallvec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_triangle_counts() {
        assert_eq!(Geometry::cube(Vec3::ONE).triangle_count(), 12);
        assert_eq!(Geometry::plane(1.0, 1.0).triangle_count(), 2);
        assert_eq!(Geometry::extruded(unit_square(), 0.1).triangle_count(), 12);
    }

    #[test]
    fn test_extruded_extents() {
        let geometry = Geometry::Extruded {
            outline: unit_square(),
            depth: 0.004,
            bevel: 0.001,
        };
        let extents = geometry.extents();
        assert!((extents.x - 1.002).abs() < 1e-6);
        assert!((extents.z - 0.006).abs() < 1e-6);
    }

    #[test]
    fn test_outline_area_and_convexity() {
        let square = unit_square();
        assert!((outline_area(&square) - 1.0).abs() < 1e-6);
        assert!(is_convex(&square));

        let dart = [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(0.0, 2.0),
            Vec2::new(0.5, 1.0),
        ];
        assert!(!is_convex(&dart));
    }
}
