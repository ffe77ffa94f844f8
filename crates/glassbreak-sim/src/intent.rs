//! User Intents
//!
//! Input handlers only build intents; the simulator drains them at the top
//! of its tick.

use glam::{Vec2, Vec3};
use glassbreak_core::{Camera, PanelRect};
use glassbreak_platform::Gesture;
use glassbreak_renderer::RenderMode;
use rand::Rng;

use crate::glass::GlassType;

/// Smallest accepted impact intensity
pub const MIN_INTENSITY: f32 = 0.1;
/// Largest accepted impact intensity
pub const MAX_INTENSITY: f32 = 3.0;
/// Intensity slider granularity
pub const INTENSITY_STEP: f32 = 0.1;

/// Clamp an intensity to the slider range, snapped to its step
pub fn clamp_intensity(intensity: f32) -> f32 {
    if !intensity.is_finite() {
        log::warn!("Non-finite intensity {}, using 1.0", intensity);
        return 1.0;
    }
    let clamped = intensity.clamp(MIN_INTENSITY, MAX_INTENSITY);
    if clamped != intensity {
        log::warn!("Intensity {} clamped to {}", intensity, clamped);
    }
    ((clamped / INTENSITY_STEP).round() * INTENSITY_STEP).clamp(MIN_INTENSITY, MAX_INTENSITY)
}

/// Where a break was aimed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreakTarget {
    /// A random spot near the top middle of the pane
    Default,
    /// A pixel of the viewport, unprojected onto the pane
    Screen { point: Vec2, viewport: Vec2 },
    /// Pane-local coordinates
    Panel(Vec3),
}

/// Everything the user can ask for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    Break(BreakTarget),
    Reset,
    SetGlassType(GlassType),
    /// Intensity of subsequent breaks
    SetIntensity(f32),
    SetSlowMotion(bool),
    ToggleSlowMotion,
    SetRenderMode(RenderMode),
    /// Orbit the camera by yaw/pitch radians
    OrbitCamera { yaw: f32, pitch: f32 },
    MoveCamera(Vec3),
    Resize { width: u32, height: u32 },
    /// Re-capture the reflection map
    RefreshReflections,
}

impl Intent {
    /// Intent for a decoded input gesture
    pub fn from_gesture(gesture: Gesture, viewport: Vec2) -> Self {
        match gesture {
            Gesture::BreakAt(point) => Self::Break(BreakTarget::Screen { point, viewport }),
            Gesture::Resize { width, height } => Self::Resize { width, height },
        }
    }
}

/// Where and how hard the pane is hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactPoint {
    /// Pane-local position
    pub point: Vec3,
    /// Clamped to 0.1..=3.0
    pub intensity: f32,
}

impl ImpactPoint {
    pub fn new(point: Vec3, intensity: f32) -> Self {
        Self {
            point,
            intensity: clamp_intensity(intensity),
        }
    }

    /// Random point within ±15% of the width around the centre line, in
    /// the upper part of the pane
    pub fn random_default(rect: &PanelRect, intensity: f32, rng: &mut impl Rng) -> Self {
        let half_span = rect.width * 0.15;
        let x = rng.gen_range(-half_span..=half_span);
        let y = rng.gen_range(0.0..=rect.height * 0.3);
        Self::new(Vec3::new(x, y, 0.0), intensity)
    }

    /// Resolve a break target to a pane-local impact.
    ///
    /// Screen points that miss the pane plane fall back to the default point;
    /// hits outside the pane are clamped onto it.
    pub fn resolve(
        target: BreakTarget,
        camera: &Camera,
        rect: &PanelRect,
        intensity: f32,
        rng: &mut impl Rng,
    ) -> Self {
        match target {
            BreakTarget::Default => Self::random_default(rect, intensity, rng),
            BreakTarget::Panel(local) => Self::new(clamp_to_face(rect, local), intensity),
            BreakTarget::Screen { point, viewport } => {
                let hit = camera
                    .screen_ray(point, viewport)
                    .and_then(|ray| ray.intersect_z_plane(rect.center.z));
                match hit {
                    Some(world) => Self::new(clamp_to_face(rect, rect.to_local(world)), intensity),
                    None => {
                        log::debug!("Break at {:?} missed the pane plane, using default point", point);
                        Self::random_default(rect, intensity, rng)
                    }
                }
            }
        }
    }
}

fn clamp_to_face(rect: &PanelRect, local: Vec3) -> Vec3 {
    let mut clamped = rect.clamp_local(local);
    clamped.z = 0.0;
    clamped
}
