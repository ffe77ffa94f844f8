//! Sample Accumulation
//!
//! The "ultra" render mode keeps refining the image while nothing moves,
//! up to a sample target. Any camera motion starts over. This is a render
//! loop policy only; it never touches simulation state.

/// Default accumulation target
pub const DEFAULT_TARGET_SAMPLES: u32 = 128;

/// Render loop mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// One sample per frame
    #[default]
    Realtime,
    /// Accumulate samples while idle
    Ultra,
}

/// Idle sample accumulator
#[derive(Debug, Clone)]
pub struct SampleAccumulator {
    mode: RenderMode,
    target: u32,
    accumulated: u32,
}

impl SampleAccumulator {
    /// Realtime accumulator with the default target
    pub fn new() -> Self {
        Self {
            mode: RenderMode::Realtime,
            target: DEFAULT_TARGET_SAMPLES,
            accumulated: 0,
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Switch mode; entering ultra starts from zero
    pub fn set_mode(&mut self, mode: RenderMode) {
        if mode == RenderMode::Ultra && self.mode != RenderMode::Ultra {
            self.reset();
        }
        self.mode = mode;
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    /// Set the sample target (at least 1)
    pub fn set_target(&mut self, target: u32) {
        self.target = target.max(1);
        self.accumulated = self.accumulated.min(self.target);
    }

    /// Samples accumulated so far
    pub fn accumulated(&self) -> u32 {
        self.accumulated
    }

    /// Start over
    pub fn reset(&mut self) {
        self.accumulated = 0;
    }

    /// Whether the target was reached
    pub fn is_converged(&self) -> bool {
        self.mode == RenderMode::Ultra && self.accumulated >= self.target
    }

    /// Advance one frame. `supported` gates accumulation to tiers that can
    /// afford it. Returns the sample count after the frame.
    pub fn advance(&mut self, supported: bool, camera_moving: bool, animating: bool) -> u32 {
        if camera_moving {
            self.reset();
            return self.accumulated;
        }
        if self.mode == RenderMode::Ultra && supported && !animating {
            self.accumulated = (self.accumulated + 1).min(self.target);
        }
        self.accumulated
    }
}

impl Default for SampleAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
