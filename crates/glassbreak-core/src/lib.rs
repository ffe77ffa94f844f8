//! # Glassbreak Core
//!
//! Core runtime library for the glassbreak fracture showcase.
//!
//! This crate provides the foundational pieces every other crate reads from:
//! - **Profile**: Quality tiers and the per-session capability profile
//! - **Time**: Frame clock with clamped steps and a global time scale
//! - **Scene Graph**: Hierarchical transforms, visibility and render bindings
//! - **Camera**: Perspective camera with screen-to-world unprojection
//! - **Math**: glam re-exports and bounding-box helpers

pub mod camera;
pub mod math;
pub mod profile;
pub mod scene;
pub mod time;

pub use camera::{Camera, CameraRig};
pub use math::{Aabb, PanelRect, Ray};
pub use profile::{resolve_profile, DeviceSignals, QualityProfile, TierHint};
pub use scene::{Node, NodeFlags, NodeId, ResourceId, SceneGraph, Transform};
pub use time::{DeltaTime, FrameClock};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Rendering fidelity tier chosen once per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    /// Basic materials, no shadows, fewest fragments
    Low,
    /// Basic materials with shadows
    Medium,
    /// Physically based glass, reflections, post-processing
    High,
}

impl Default for QualityTier {
    fn default() -> Self {
        Self::Low
    }
}

impl QualityTier {
    /// All tiers from cheapest to most expensive
    pub const ALL: [QualityTier; 3] = [QualityTier::Low, QualityTier::Medium, QualityTier::High];

    /// Stable lowercase name, also used as the persisted value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Short label for the frame-rate display
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "SD",
            Self::High => "HD",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a tier name is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTier(pub String);

impl fmt::Display for UnknownTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown quality tier '{}'", self.0)
    }
}

impl std::error::Error for UnknownTier {}

impl FromStr for QualityTier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" | "sd" => Ok(Self::Medium),
            "high" | "hd" => Ok(Self::High),
            _ => Err(UnknownTier(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tier() {
        assert_eq!(QualityTier::default(), QualityTier::Low);
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!("HIGH".parse::<QualityTier>(), Ok(QualityTier::High));
        assert_eq!(" medium ".parse::<QualityTier>(), Ok(QualityTier::Medium));
        assert!("ultra".parse::<QualityTier>().is_err());
    }

    #[test]
    fn test_tier_ordering() {
        assert!(QualityTier::Low < QualityTier::Medium);
        assert!(QualityTier::Medium < QualityTier::High);
    }

    #[test]
    fn test_tier_serde() {
        let json = serde_json::to_string(&QualityTier::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }
}
