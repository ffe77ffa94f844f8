//! Mirror glass: bevelled slivers, each with a dark backing behind it.

use glam::{Vec2, Vec3};
use glassbreak_core::{QualityProfile, ResourceId};
use glassbreak_renderer::material::color_from_hex;
use glassbreak_renderer::mesh::Outline;
use glassbreak_renderer::{Material, Side, StandardMaterial};
use rand::Rng;
use smallvec::smallvec;

use super::FragmentShape;
use crate::glass::{GlassTypeSpec, OpticalParams};
use crate::materials::glass_material;

/// Shard edge bevel
const SHARD_BEVEL: f32 = 0.0005;

/// Backing placement behind the shard, as a multiple of the shard depth
pub const BACKING_OFFSET: f32 = -0.8;
/// Backing scale relative to the shard
pub const BACKING_SCALE: Vec3 = Vec3::new(0.98, 0.98, 0.5);

const SHARD_OPTICAL: OpticalParams = OpticalParams {
    color: 0xd0d0d0,
    roughness: 0.05,
    metalness: 0.95,
    ior: 1.5,
    transmission: 0.0,
    thickness_scale: 0.0,
    clearcoat: 0.25,
    clearcoat_roughness: 0.1,
    opacity: 1.0,
    env_intensity: 0.9,
};

/// One of three silhouette templates: triangle, quad or pentagon
pub(super) fn shard(spec: &GlassTypeSpec, rng: &mut impl Rng) -> FragmentShape {
    let (min, max) = spec.fragment_size_range;
    let w = rng.gen_range(min..=max * 0.45);
    let h = rng.gen_range(min * 1.5..=max);

    let outline: Outline = match rng.gen_range(0..3) {
        0 => {
            let r: f32 = rng.gen_range(0.0..1.0);
            smallvec![
                Vec2::new(0.0, h / 2.0),
                Vec2::new(-w / 2.0 + r * 0.2 * w, -h / 2.0),
                Vec2::new(w / 2.0 - r * 0.2 * w, -h / 2.0 + r * 0.1 * h),
            ]
        }
        1 => smallvec![
            Vec2::new(-0.3 * w, h / 2.0),
            Vec2::new(0.4 * w, 0.4 * h),
            Vec2::new(w / 2.0, -h / 2.0 + 0.15 * h),
            Vec2::new(-w / 2.0, -h / 2.0),
        ],
        _ => smallvec![
            Vec2::new(0.0, h / 2.0),
            Vec2::new(w / 2.0, 0.2 * h),
            Vec2::new(0.3 * w, -h / 2.0),
            Vec2::new(-0.3 * w, -h / 2.0),
            Vec2::new(-w / 2.0, 0.1 * h),
        ],
    };

    FragmentShape::Shard {
        outline,
        depth: spec.pane_thickness,
        bevel: SHARD_BEVEL,
        height: h,
    }
}

/// Reflective face of a shard
pub fn mirror_material(depth: f32, profile: &QualityProfile, env_map: Option<ResourceId>) -> Material {
    glass_material(&SHARD_OPTICAL, depth, Side::Double, profile, env_map)
}

/// Painted backing behind the silvering
pub fn backing_material() -> Material {
    Material::Standard(StandardMaterial {
        color: color_from_hex(0x1a1a1a),
        metalness: 0.3,
        roughness: 0.7,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glass::GlassType;
    use glassbreak_core::QualityTier;
    use glassbreak_renderer::mesh::outline_area;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_all_templates_appear() {
        let mut rng = StdRng::seed_from_u64(9);
        let spec = GlassType::Mirror.spec();
        let mut seen = [false; 3];
        for _ in 0..200 {
            let FragmentShape::Shard { outline, bevel, height, .. } = shard(spec, &mut rng) else {
                unreachable!();
            };
            seen[outline.len() - 3] = true;
            assert_eq!(bevel, SHARD_BEVEL);
            assert!(height >= spec.fragment_size_range.0 * 1.5);
            assert!(outline_area(&outline).abs() > 0.0);
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn test_shard_is_opaque_at_every_tier() {
        for tier in QualityTier::ALL {
            let material = mirror_material(0.004, &QualityProfile::for_tier(tier, 1.0), None);
            assert!(!material.is_transparent(), "{tier}");
        }
        assert!(!backing_material().is_transparent());
    }
}
