//! Timers
//!
//! Frame-rate sampling for the HUD and scoped timers for profiling.

use std::time::{Duration, Instant};

/// Length of one frame-rate sampling window
pub const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Scoped timer that records duration on drop
pub struct ScopedTimer<'a> {
    name: &'a str,
    start: Instant,
    callback: Option<Box<dyn FnMut(&str, Duration) + 'a>>,
}

impl<'a> ScopedTimer<'a> {
    /// Create a new scoped timer with a callback
    pub fn new<F>(name: &'a str, callback: F) -> Self
    where
        F: FnMut(&str, Duration) + 'a,
    {
        Self {
            name,
            start: Instant::now(),
            callback: Some(Box::new(callback)),
        }
    }

    /// Create a scoped timer that logs to tracing
    pub fn traced(name: &'a str) -> Self {
        Self {
            name,
            start: Instant::now(),
            callback: None,
        }
    }

    /// Get elapsed time so far
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        if let Some(mut callback) = self.callback.take() {
            callback(self.name, duration);
        } else {
            tracing::debug!(
                target: "timing",
                name = self.name,
                duration_us = duration.as_micros() as u64,
                "Timer completed"
            );
        }
    }
}

/// Frame-rate counter publishing once per sampling window
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window: Duration,
    frames: u32,
    elapsed: Duration,
    fps: u32,
}

impl FpsCounter {
    /// Counter with the default 500 ms window
    pub fn new() -> Self {
        Self::with_window(FPS_WINDOW)
    }

    /// Counter with a custom window
    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            frames: 0,
            elapsed: Duration::ZERO,
            fps: 0,
        }
    }

    /// Count one displayed frame of wall time `frame_time`.
    ///
    /// Returns the new rate when a window closes.
    pub fn record_frame(&mut self, frame_time: Duration) -> Option<u32> {
        self.frames += 1;
        self.elapsed += frame_time;

        if self.elapsed < self.window || self.elapsed.is_zero() {
            return None;
        }

        self.fps = (self.frames as f64 / self.elapsed.as_secs_f64()).round() as u32;
        self.frames = 0;
        self.elapsed = Duration::ZERO;
        Some(self.fps)
    }

    /// Last published rate (0 until the first window closes)
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
