//! Material System
//!
//! Three shading models cover the whole showcase: unlit basic materials for
//! the cheap tiers, metal/rough standard materials for the frame and
//! physically based transmissive materials for high-tier glass.

use glam::Vec3;
use glassbreak_core::ResourceId;

/// Linear RGB color from a 0xRRGGBB literal
pub fn color_from_hex(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    )
}

/// Faces drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

/// Alpha blending modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaMode {
    #[default]
    Opaque,
    Blend,
}

/// Unlit flat-color material
#[derive(Debug, Clone, PartialEq)]
pub struct BasicMaterial {
    pub color: Vec3,
    pub opacity: f32,
    pub alpha_mode: AlphaMode,
    pub side: Side,
    /// Color texture
    pub map: Option<ResourceId>,
}

impl Default for BasicMaterial {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            opacity: 1.0,
            alpha_mode: AlphaMode::Opaque,
            side: Side::Front,
            map: None,
        }
    }
}

/// Metallic-roughness material
#[derive(Debug, Clone, PartialEq)]
pub struct StandardMaterial {
    pub color: Vec3,
    pub roughness: f32,
    pub metalness: f32,
    pub env_map_intensity: f32,
    pub opacity: f32,
    pub alpha_mode: AlphaMode,
    pub side: Side,
    pub map: Option<ResourceId>,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            roughness: 1.0,
            metalness: 0.0,
            env_map_intensity: 1.0,
            opacity: 1.0,
            alpha_mode: AlphaMode::Opaque,
            side: Side::Front,
            map: None,
        }
    }
}

/// Physically based material with transmission and clear-coat
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalMaterial {
    pub color: Vec3,
    pub roughness: f32,
    pub metalness: f32,
    pub ior: f32,
    pub transmission: f32,
    /// Volume thickness used by the transmission model
    pub thickness: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub env_map_intensity: f32,
    pub opacity: f32,
    pub alpha_mode: AlphaMode,
    pub side: Side,
    pub map: Option<ResourceId>,
    pub roughness_map: Option<ResourceId>,
    pub alpha_map: Option<ResourceId>,
    /// Bound cube reflection map
    pub env_map: Option<ResourceId>,
}

impl Default for PhysicalMaterial {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            roughness: 1.0,
            metalness: 0.0,
            ior: 1.5,
            transmission: 0.0,
            thickness: 0.0,
            clearcoat: 0.0,
            clearcoat_roughness: 0.0,
            env_map_intensity: 1.0,
            opacity: 1.0,
            alpha_mode: AlphaMode::Opaque,
            side: Side::Front,
            map: None,
            roughness_map: None,
            alpha_map: None,
            env_map: None,
        }
    }
}

/// Material definition
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Basic(BasicMaterial),
    Standard(StandardMaterial),
    Physical(PhysicalMaterial),
}

impl Material {
    /// Final opacity
    pub fn opacity(&self) -> f32 {
        match self {
            Material::Basic(m) => m.opacity,
            Material::Standard(m) => m.opacity,
            Material::Physical(m) => m.opacity,
        }
    }

    /// Whether the material is alpha blended
    pub fn is_transparent(&self) -> bool {
        let mode = match self {
            Material::Basic(m) => m.alpha_mode,
            Material::Standard(m) => m.alpha_mode,
            Material::Physical(m) => m.alpha_mode,
        };
        mode == AlphaMode::Blend
    }

    /// Owned textures referenced by this material, without duplicates.
    ///
    /// The environment map is shared scene state and is not listed.
    pub fn texture_refs(&self) -> Vec<ResourceId> {
        let mut refs: Vec<ResourceId> = match self {
            Material::Basic(m) => m.map.into_iter().collect(),
            Material::Standard(m) => m.map.into_iter().collect(),
            Material::Physical(m) => [m.map, m.roughness_map, m.alpha_map]
                .into_iter()
                .flatten()
                .collect(),
        };
        refs.sort();
        refs.dedup();
        refs
    }

    /// Bind a reflection map; only physical materials sample one
    pub fn set_env_map(&mut self, env_map: Option<ResourceId>) -> bool {
        match self {
            Material::Physical(m) => {
                m.env_map = env_map;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        let c = color_from_hex(0xff8000);
        assert_eq!(c.x, 1.0);
        assert!((c.y - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.z, 0.0);
    }

    #[test]
    fn test_texture_refs_dedup() {
        let texture = ResourceId(7);
        let material = Material::Physical(PhysicalMaterial {
            map: Some(texture),
            roughness_map: Some(texture),
            env_map: Some(ResourceId(99)),
            ..Default::default()
        });
        assert_eq!(material.texture_refs(), vec![texture]);
    }

    #[test]
    fn test_env_map_only_on_physical() {
        let mut basic = Material::Basic(BasicMaterial::default());
        assert!(!basic.set_env_map(Some(ResourceId(1))));

        let mut physical = Material::Physical(PhysicalMaterial::default());
        assert!(physical.set_env_map(Some(ResourceId(1))));
    }

    #[test]
    fn test_transparency() {
        let glass = Material::Basic(BasicMaterial {
            opacity: 0.15,
            alpha_mode: AlphaMode::Blend,
            ..Default::default()
        });
        assert!(glass.is_transparent());
        assert_eq!(glass.opacity(), 0.15);
    }
}
