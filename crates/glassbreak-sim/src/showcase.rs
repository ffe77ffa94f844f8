//! Showcase
//!
//! Host-facing wrapper around [`Simulator`]. Picks the session tier from
//! storage or device signals, degrades to "no simulation" when no GPU
//! context can be created, and rebuilds everything when the tier changes.

use glassbreak_core::{resolve_profile, QualityTier, TierHint};
use glassbreak_platform::storage::{load_quality_tier, save_quality_tier, take_tap_hint, QUALITY_KEY};
use glassbreak_platform::{AudioSink, DeviceCapabilities, KeyValueStore, NullSink};
use glassbreak_renderer::{Renderer, RendererConfig};
use std::sync::Arc;

use crate::controller::{FrameReport, Simulator};
use crate::hud::HudSnapshot;
use crate::intent::Intent;
use crate::{SimResult, SimulationConfig};

/// Simulator plus the host state around it
pub struct Showcase {
    config: SimulationConfig,
    device: DeviceCapabilities,
    store: Box<dyn KeyValueStore>,
    audio: Arc<dyn AudioSink + Sync>,
    tier: QualityTier,
    simulator: Option<Simulator>,
}

impl Showcase {
    /// Start a session. `hint` overrides the stored tier when given.
    pub fn start(
        config: SimulationConfig,
        device: DeviceCapabilities,
        store: Box<dyn KeyValueStore>,
        hint: Option<TierHint>,
    ) -> Self {
        let hint = hint.unwrap_or_else(|| stored_hint(store.as_ref()));
        let tier = resolve_profile(hint, Some(&device.signals())).tier;
        let mut showcase = Self {
            config,
            device,
            store,
            audio: Arc::new(NullSink),
            tier,
            simulator: None,
        };
        showcase.rebuild();
        showcase
    }

    /// Route break cues to `audio`
    pub fn with_audio(mut self, audio: Arc<dyn AudioSink + Sync>) -> Self {
        if let Some(simulator) = &mut self.simulator {
            simulator.set_audio(Box::new(audio.clone()));
        }
        self.audio = audio;
        self
    }

    pub fn tier(&self) -> QualityTier {
        self.tier
    }

    /// No GPU context: the page shows static content only
    pub fn is_degraded(&self) -> bool {
        self.simulator.is_none()
    }

    pub fn simulator(&self) -> Option<&Simulator> {
        self.simulator.as_ref()
    }

    pub fn simulator_mut(&mut self) -> Option<&mut Simulator> {
        self.simulator.as_mut()
    }

    /// Forward an intent; dropped when degraded
    pub fn push(&mut self, intent: Intent) {
        match &mut self.simulator {
            Some(simulator) => simulator.push(intent),
            None => log::debug!("Intent {:?} dropped, no simulator", intent),
        }
    }

    pub fn tick(&mut self, frame_secs: f64) -> Option<FrameReport> {
        self.simulator.as_mut().map(|s| s.tick(frame_secs))
    }

    pub fn hud(&self) -> Option<HudSnapshot> {
        self.simulator.as_ref().map(Simulator::hud)
    }

    /// Whether the one-time double-tap hint should be shown now
    pub fn take_tap_hint(&self) -> bool {
        take_tap_hint(self.store.as_ref(), self.device.viewport_width)
    }

    /// Switch tier: persist it and rebuild the whole scene. The rebuild
    /// happens even when persisting fails.
    pub fn set_quality(&mut self, tier: QualityTier) -> SimResult<()> {
        log::info!("Quality {} -> {}", self.tier, tier);
        self.tier = tier;
        self.rebuild();
        save_quality_tier(self.store.as_ref(), tier)?;
        Ok(())
    }

    fn rebuild(&mut self) {
        let glass_type = self.simulator.as_ref().map(Simulator::glass_type);
        if let Some(previous) = self.simulator.take() {
            previous.shutdown();
        }

        let profile = resolve_profile(TierHint::Explicit(self.tier), Some(&self.device.signals()));
        let renderer_config =
            RendererConfig::for_profile(&profile).with_backend(self.device.graphics_backend.to_wgpu_backend());
        let renderer = match Renderer::new(renderer_config, self.device.gpu_available) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::warn!("Simulation unavailable: {}", e);
                return;
            }
        };

        let mut simulator =
            Simulator::new(self.config.clone(), profile, renderer).with_audio(Box::new(self.audio.clone()));
        if let Some(glass_type) = glass_type {
            simulator.push(Intent::SetGlassType(glass_type));
        }
        self.simulator = Some(simulator);
    }
}

/// Explicit stored tier, or device-based selection when nothing is stored
fn stored_hint(store: &dyn KeyValueStore) -> TierHint {
    match store.get(QUALITY_KEY) {
        Ok(Some(_)) => TierHint::Explicit(load_quality_tier(store)),
        _ => TierHint::Auto,
    }
}
