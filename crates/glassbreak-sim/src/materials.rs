//! Glass Materials
//!
//! Tier-gated material selection. Low and medium tiers get a flat basic
//! material; only the top tier pays for transmission and reflections.

use glassbreak_core::{QualityProfile, QualityTier, ResourceId};
use glassbreak_renderer::material::color_from_hex;
use glassbreak_renderer::{AlphaMode, BasicMaterial, Material, PhysicalMaterial, Side, StandardMaterial};

use crate::glass::OpticalParams;

/// Metalness above which a surface is treated as a mirror
const MIRROR_METALNESS: f32 = 0.8;

/// Glass material for `optical` at the profile's tier.
///
/// `thickness` is the physical thickness of the piece; the transmission
/// volume is scaled from it.
pub fn glass_material(
    optical: &OpticalParams,
    thickness: f32,
    side: Side,
    profile: &QualityProfile,
    env_map: Option<ResourceId>,
) -> Material {
    let mirror = optical.metalness > MIRROR_METALNESS;

    if !profile.physical_materials() {
        if mirror {
            return Material::Basic(BasicMaterial {
                color: color_from_hex(0xd0d0d0),
                side,
                ..Default::default()
            });
        }
        return Material::Basic(BasicMaterial {
            color: color_from_hex(0xffffff),
            opacity: if profile.tier == QualityTier::Low { 0.15 } else { 0.2 },
            alpha_mode: AlphaMode::Blend,
            side: Side::Front,
            map: None,
        });
    }

    let transparent = !mirror && optical.opacity < 1.0;
    Material::Physical(PhysicalMaterial {
        color: color_from_hex(optical.color),
        roughness: optical.roughness,
        metalness: optical.metalness,
        ior: optical.ior,
        transmission: optical.transmission,
        thickness: thickness * optical.thickness_scale,
        clearcoat: optical.clearcoat,
        clearcoat_roughness: optical.clearcoat_roughness,
        env_map_intensity: optical.env_intensity,
        opacity: if transparent { optical.opacity } else { 1.0 },
        alpha_mode: if transparent { AlphaMode::Blend } else { AlphaMode::Opaque },
        side,
        env_map,
        ..Default::default()
    })
}

/// Brushed aluminium for the frame rails and posts
pub fn frame_material() -> Material {
    Material::Standard(StandardMaterial {
        color: color_from_hex(0xb8b8b8),
        roughness: 0.35,
        metalness: 0.9,
        env_map_intensity: 0.7,
        ..Default::default()
    })
}
