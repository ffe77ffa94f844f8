//! Lighting
//!
//! Room lighting rig. The cheap tiers get an ambient term and one
//! directional key light; the top tier gets the full ceiling rig with a
//! shadowed point light and rim/fill lights that pick out glass edges.

use glam::Vec3;
use glassbreak_core::{QualityProfile, QualityTier};
use smallvec::SmallVec;

use crate::material::color_from_hex;

/// Light types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightType {
    /// Directional light
    Directional,
    /// Point light
    Point,
    /// Rectangular area light
    Area,
}

/// Light description
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub light_type: LightType,
    pub color: Vec3,
    pub intensity: f32,
    /// Position (direction source for directional lights)
    pub position: Vec3,
    /// Falloff distance for point lights
    pub range: f32,
    /// Writes a shadow map
    pub cast_shadow: bool,
    /// Shadow map edge in texels when casting
    pub shadow_map_resolution: u32,
}

impl Light {
    /// Create a directional light
    pub fn directional(color: Vec3, intensity: f32, position: Vec3) -> Self {
        Self {
            light_type: LightType::Directional,
            color,
            intensity,
            position,
            range: f32::INFINITY,
            cast_shadow: false,
            shadow_map_resolution: 0,
        }
    }

    /// Create a point light
    pub fn point(color: Vec3, intensity: f32, range: f32, position: Vec3) -> Self {
        Self {
            light_type: LightType::Point,
            color,
            intensity,
            position,
            range,
            cast_shadow: false,
            shadow_map_resolution: 0,
        }
    }

    /// Enable shadows at a resolution
    pub fn with_shadows(mut self, resolution: u32) -> Self {
        self.cast_shadow = true;
        self.shadow_map_resolution = resolution;
        self
    }

    /// Get the effective color (color * intensity)
    pub fn effective_color(&self) -> Vec3 {
        self.color * self.intensity
    }
}

/// Ambient term plus discrete lights
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    pub ambient_color: Vec3,
    pub ambient_intensity: f32,
    pub lights: SmallVec<[Light; 6]>,
}

impl LightRig {
    /// Rig for a profile in a room of the given height
    pub fn for_profile(profile: &QualityProfile, room_height: f32) -> Self {
        let ambient_intensity = match profile.tier {
            QualityTier::Low => 0.7,
            QualityTier::Medium => 0.5,
            QualityTier::High => 0.25,
        };
        let mut lights = SmallVec::new();

        if profile.tier != QualityTier::High {
            let intensity = if profile.tier == QualityTier::Low { 1.2 } else { 1.5 };
            let mut key = Light::directional(Vec3::ONE, intensity, Vec3::new(1.0, 3.0, 2.0));
            if profile.shadows_enabled {
                key = key.with_shadows(profile.shadow_map_resolution);
            }
            lights.push(key);
            if profile.tier == QualityTier::Medium {
                lights.push(Light::directional(color_from_hex(0xf0f5ff), 0.3, Vec3::new(-2.0, 1.0, 1.0)));
            }
        } else {
            lights.push(Light {
                light_type: LightType::Area,
                color: Vec3::ONE,
                intensity: 3.0,
                position: Vec3::new(0.0, room_height - 0.05, 0.3),
                range: f32::INFINITY,
                cast_shadow: false,
                shadow_map_resolution: 0,
            });
            lights.push(
                Light::point(color_from_hex(0xfff5e6), 35.0, 6.0, Vec3::new(0.0, room_height - 0.15, 0.4))
                    .with_shadows(profile.shadow_map_resolution),
            );
            lights.push(Light::directional(color_from_hex(0xf0f5ff), 0.35, Vec3::new(-2.0, 1.8, 1.5)));
            lights.push(Light::directional(color_from_hex(0xffe8d0), 0.3, Vec3::new(2.0, 1.5, -1.0)));
            lights.push(Light::point(Vec3::ONE, 12.0, 5.0, Vec3::new(0.5, 1.2, 2.0)));
        }

        Self {
            ambient_color: color_from_hex(0xfff8f0),
            ambient_intensity,
            lights,
        }
    }

    /// Lights that render shadow maps
    pub fn shadow_casters(&self) -> usize {
        self.lights.iter().filter(|l| l.cast_shadow).count()
    }
}
