use glam::Vec2;
use rand::Rng;

use crate::fracture::ShakeParams;

/// Running impact shake of the panel
#[derive(Debug, Clone, PartialEq)]
pub struct PanelShake {
    params: ShakeParams,
    elapsed: f32,
}

impl PanelShake {
    pub fn new(params: ShakeParams) -> Self {
        Self { params, elapsed: 0.0 }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.params.duration
    }

    /// Envelope at the current time, 1 at impact decaying towards 0
    pub fn envelope(&self) -> f32 {
        if self.is_finished() {
            return 0.0;
        }
        (-self.elapsed / self.params.decay).exp()
    }

    /// Advance by `dt` seconds and return the offset to apply. Once finished
    /// the offset is zero so the panel ends back at rest.
    pub fn advance(&mut self, dt: f32, rng: &mut impl Rng) -> Vec2 {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        let envelope = self.envelope();
        if envelope == 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            rng.gen_range(-0.5..=0.5) * self.params.amplitude.x * envelope,
            rng.gen_range(-0.5..=0.5) * self.params.amplitude.y * envelope,
        )
    }
}
