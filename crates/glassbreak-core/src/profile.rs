//! Quality Profile
//!
//! Resolves the per-session fidelity profile from an explicit tier or from
//! device signals. The profile is immutable: changing tiers means tearing
//! down and rebuilding every other component.

use serde::{Deserialize, Serialize};

use crate::QualityTier;

/// Device signals read once at startup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceSignals {
    /// Viewport width in CSS/logical pixels
    pub viewport_width: u32,
    /// Viewport height in CSS/logical pixels
    pub viewport_height: u32,
    /// Physical pixels per logical pixel
    pub device_pixel_ratio: f32,
    /// Logical CPU cores
    pub logical_cores: usize,
    /// Phone/tablet class device
    pub mobile: bool,
}

impl Default for DeviceSignals {
    fn default() -> Self {
        Self {
            viewport_width: 1280,
            viewport_height: 720,
            device_pixel_ratio: 1.0,
            logical_cores: 4,
            mobile: false,
        }
    }
}

impl DeviceSignals {
    /// Device-class tier used when no explicit tier was chosen
    pub fn recommended_tier(&self) -> QualityTier {
        if self.mobile || self.viewport_width < 768 {
            QualityTier::Low
        } else if self.logical_cores >= 8 && self.viewport_width >= 1280 {
            QualityTier::High
        } else {
            QualityTier::Medium
        }
    }
}

/// How the tier should be chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierHint {
    /// Use exactly this tier
    Explicit(QualityTier),
    /// Derive the tier from device signals
    Auto,
}

impl From<QualityTier> for TierHint {
    fn from(tier: QualityTier) -> Self {
        Self::Explicit(tier)
    }
}

/// Fidelity settings bundle, fixed for the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityProfile {
    /// Tier this profile was built from
    pub tier: QualityTier,
    /// Upper bound on the render pixel ratio
    pub pixel_density_cap: f32,
    /// Shadow casting enabled
    pub shadows_enabled: bool,
    /// Shadow map edge in texels
    pub shadow_map_resolution: u32,
    /// Bloom/SMAA composer enabled
    pub post_processing_enabled: bool,
    /// Bloom strength when post-processing is on
    pub bloom_strength: f32,
    /// Cube reflection map edge in texels
    pub reflection_map_resolution: u32,
    /// Scales every glass type's base fragment count
    pub fragment_count_multiplier: f32,
    /// Frame rate the tier is tuned for
    pub target_frame_rate: u32,
    /// MSAA on the default framebuffer
    pub antialias: bool,
    /// Edge of the laminated crack overlay texture
    pub crack_texture_resolution: u32,
}

impl QualityProfile {
    /// Build the profile for a tier, capping pixel density by the device ratio
    pub fn for_tier(tier: QualityTier, device_pixel_ratio: f32) -> Self {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };

        match tier {
            QualityTier::Low => Self {
                tier,
                pixel_density_cap: 1.0,
                shadows_enabled: false,
                shadow_map_resolution: 256,
                post_processing_enabled: false,
                bloom_strength: 0.0,
                reflection_map_resolution: 32,
                fragment_count_multiplier: 0.2,
                target_frame_rate: 30,
                antialias: false,
                crack_texture_resolution: 512,
            },
            QualityTier::Medium => Self {
                tier,
                pixel_density_cap: dpr.min(1.5),
                shadows_enabled: true,
                shadow_map_resolution: 512,
                post_processing_enabled: false,
                bloom_strength: 0.0,
                reflection_map_resolution: 64,
                fragment_count_multiplier: 0.5,
                target_frame_rate: 30,
                antialias: false,
                crack_texture_resolution: 1024,
            },
            QualityTier::High => Self {
                tier,
                pixel_density_cap: dpr.min(2.0),
                shadows_enabled: true,
                shadow_map_resolution: 1024,
                post_processing_enabled: true,
                bloom_strength: 0.05,
                reflection_map_resolution: 256,
                fragment_count_multiplier: 1.0,
                target_frame_rate: 60,
                antialias: true,
                crack_texture_resolution: 2048,
            },
        }
    }

    /// Whether physically based transmissive materials are used
    pub fn physical_materials(&self) -> bool {
        self.tier == QualityTier::High
    }

    /// Whether the cube-camera reflection capture runs
    pub fn reflections_enabled(&self) -> bool {
        self.tier == QualityTier::High
    }
}

impl Default for QualityProfile {
    fn default() -> Self {
        Self::for_tier(QualityTier::Low, 1.0)
    }
}

/// Resolve the session profile.
///
/// Pure over its inputs; call once before building the scene.
pub fn resolve_profile(hint: TierHint, device: Option<&DeviceSignals>) -> QualityProfile {
    let tier = match hint {
        TierHint::Explicit(tier) => tier,
        TierHint::Auto => device.map(DeviceSignals::recommended_tier).unwrap_or_default(),
    };
    let dpr = device.map(|d| d.device_pixel_ratio).unwrap_or(1.0);

    log::debug!("Resolved quality profile: {} (dpr {:.2})", tier, dpr);
    QualityProfile::for_tier(tier, dpr)
}
