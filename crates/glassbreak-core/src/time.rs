//! Time Management
//!
//! Per-frame clock with:
//! - Clamped frame steps (a stalled tab must not launch fragments through walls)
//! - Global time scale for slow motion

/// Largest step the simulation accepts, in seconds
pub const MAX_FRAME_STEP: f64 = 0.1;

/// Delta time wrapper for type safety
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DeltaTime(pub f64);

impl DeltaTime {
    /// Create a new delta time from seconds
    pub fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    /// Get the delta time in seconds
    pub fn as_secs(&self) -> f64 {
        self.0
    }

    /// Get the delta time as f32
    pub fn as_secs_f32(&self) -> f32 {
        self.0 as f32
    }
}

/// Frame clock feeding the simulation step
#[derive(Debug, Clone)]
pub struct FrameClock {
    delta_time: f64,
    raw_delta_time: f64,
    total_time: f64,
    frame_count: u64,
    time_scale: f64,
}

impl FrameClock {
    /// Create a clock running at normal speed
    pub fn new() -> Self {
        Self {
            delta_time: 0.0,
            raw_delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
            time_scale: 1.0,
        }
    }

    /// Advance by one displayed frame of `frame_secs` wall time.
    ///
    /// Returns the scaled simulation step.
    pub fn advance(&mut self, frame_secs: f64) -> DeltaTime {
        let clamped = if frame_secs.is_finite() {
            frame_secs.clamp(0.0, MAX_FRAME_STEP)
        } else {
            0.0
        };

        self.raw_delta_time = clamped;
        self.delta_time = clamped * self.time_scale;
        self.total_time += self.delta_time;
        self.frame_count += 1;
        DeltaTime(self.delta_time)
    }

    /// Scaled step of the last frame
    pub fn delta_time(&self) -> DeltaTime {
        DeltaTime(self.delta_time)
    }

    /// Unscaled (but clamped) step of the last frame
    pub fn raw_delta_time(&self) -> DeltaTime {
        DeltaTime(self.raw_delta_time)
    }

    /// Simulated seconds since creation
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Frames advanced so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the time scale
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Set the time scale
    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = if scale.is_finite() { scale.max(0.0) } else { 1.0 };
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
