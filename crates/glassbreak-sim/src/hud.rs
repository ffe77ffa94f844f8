//! Host UI output: frame rate label, fragment count and safety copy.

use std::fmt;

use glassbreak_core::QualityTier;
use serde::Serialize;

use crate::controller::SimState;
use crate::glass::{GlassType, SafetyDescriptor};

/// Everything the host page displays next to the viewer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub fps: u32,
    /// e.g. `60 FPS (HD)`
    pub fps_label: String,
    pub tier: QualityTier,
    pub state: SimState,
    pub glass_type: GlassType,
    pub display_name: &'static str,
    pub safety_score: u8,
    pub risk: SafetyDescriptor,
    pub fragment_count: usize,
    pub intensity: f32,
    pub slow_motion: bool,
    /// Accumulated samples in ultra mode
    pub samples: u32,
}

impl HudSnapshot {
    pub fn fps_label(fps: u32, tier: QualityTier) -> String {
        format!("{} FPS ({})", fps, tier.label())
    }
}

impl fmt::Display for HudSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}  |  {}  |  {:?}", self.fps_label, self.display_name, self.state)?;
        writeln!(
            f,
            "Fragments: {}  Intensity: {:.1}{}",
            self.fragment_count,
            self.intensity,
            if self.slow_motion { "  [slow motion]" } else { "" }
        )?;
        writeln!(f, "{} {} (safety {}/100)", self.risk.icon, self.risk.label, self.safety_score)?;
        for bullet in self.risk.bullets {
            writeln!(f, "  - {}", bullet)?;
        }
        Ok(())
    }
}
