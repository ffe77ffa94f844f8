//! Decorative glass: a few dozen large irregular polygons.

use std::f32::consts::TAU;

use glam::Vec2;
use glassbreak_core::{QualityProfile, ResourceId};
use glassbreak_renderer::mesh::Outline;
use glassbreak_renderer::{Material, Side};
use rand::Rng;

use super::FragmentShape;
use crate::glass::{GlassTypeSpec, OpticalParams};
use crate::materials::glass_material;

const PIECE_OPTICAL: OpticalParams = OpticalParams {
    color: 0xe0e0e0,
    roughness: 0.55,
    metalness: 0.0,
    ior: 1.45,
    transmission: 0.4,
    thickness_scale: 40.0,
    clearcoat: 0.0,
    clearcoat_roughness: 0.0,
    opacity: 0.8,
    env_intensity: 0.4,
};

/// Convex 5 to 7 sided outline with jittered radii
pub(super) fn polygon(spec: &GlassTypeSpec, rng: &mut impl Rng) -> FragmentShape {
    let (min, max) = spec.fragment_size_range;
    let width = rng.gen_range(min..=max);
    let height = rng.gen_range(min..=max);
    let sides = rng.gen_range(5..=7);

    let outline: Outline = (0..sides)
        .map(|i| {
            let angle = i as f32 / sides as f32 * TAU;
            let radius = rng.gen_range(0.5..=0.8) * 0.5;
            Vec2::new(angle.cos() * radius * width, angle.sin() * radius * height)
        })
        .collect();

    FragmentShape::Polygon {
        outline,
        depth: spec.pane_thickness,
    }
}

/// Frosted material for one decorative piece
pub fn decorative_material(depth: f32, profile: &QualityProfile, env_map: Option<ResourceId>) -> Material {
    glass_material(&PIECE_OPTICAL, depth, Side::Double, profile, env_map)
}
