//! Simulation Configuration
//!
//! Scene variant and tunables, loadable from JSON. Missing fields take
//! their defaults so partial files stay valid.

use std::path::Path;

use glam::Vec3;
use glassbreak_core::{Aabb, Camera, PanelRect};
use glassbreak_physics::{PhysicsConfig, RoomBounds};
use glassbreak_renderer::accumulation::DEFAULT_TARGET_SAMPLES;
use serde::{Deserialize, Serialize};

use crate::SimResult;

/// Bottom edge of the pane above the floor
pub const PANE_LIFT: f32 = 0.1;

/// Room and pane layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneVariant {
    /// Shower enclosure in a tiled bathroom
    #[default]
    Bathroom,
    /// Shop window in a wide showroom
    Storefront,
}

impl SceneVariant {
    /// Pane width and height in metres
    pub fn pane_size(&self) -> (f32, f32) {
        match self {
            Self::Bathroom => (0.85, 1.75),
            Self::Storefront => (2.5, 3.0),
        }
    }

    /// Room width, depth and height in metres
    pub fn room_size(&self) -> (f32, f32, f32) {
        match self {
            Self::Bathroom => (4.0, 3.5, 2.8),
            Self::Storefront => (6.0, 4.0, 3.6),
        }
    }

    /// Pane rectangle for a given thickness
    pub fn panel_rect(&self, thickness: f32) -> PanelRect {
        let (width, height) = self.pane_size();
        PanelRect::standing(width, height, thickness, PANE_LIFT)
    }

    /// Fragment containment
    pub fn room_bounds(&self) -> RoomBounds {
        let (width, depth, height) = self.room_size();
        RoomBounds::from_room(width, depth, height)
    }

    /// Box the orbiting camera is kept inside
    pub fn camera_bounds(&self) -> Aabb {
        match self {
            Self::Bathroom => Aabb::new(Vec3::new(-2.5, 0.4, -1.8), Vec3::new(2.5, 2.6, 3.2)),
            Self::Storefront => Aabb::new(Vec3::new(-3.5, 0.4, -2.0), Vec3::new(3.5, 3.4, 4.5)),
        }
    }

    /// Starting viewpoint
    pub fn camera(&self) -> Camera {
        match self {
            Self::Bathroom => Camera::default(),
            Self::Storefront => Camera {
                position: Vec3::new(2.8, 1.9, 3.8),
                target: Vec3::new(0.0, 1.6, 0.0),
                ..Camera::default()
            },
        }
    }
}

/// Simulation tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub variant: SceneVariant,
    pub physics: PhysicsConfig,
    /// Impact intensity used until the user changes it
    pub default_intensity: f32,
    /// Time scale while slow motion is on
    pub slow_motion_factor: f32,
    /// Break cue volume
    pub audio_volume: f32,
    /// Sample target of the idle accumulation mode
    pub target_samples: u32,
    /// Fixed RNG seed, random when absent
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            variant: SceneVariant::Bathroom,
            physics: PhysicsConfig::default(),
            default_intensity: 1.0,
            slow_motion_factor: 0.2,
            audio_volume: 0.7,
            target_samples: DEFAULT_TARGET_SAMPLES,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        log::info!("Loaded simulation config from {}", path.as_ref().display());
        Ok(config)
    }
}
