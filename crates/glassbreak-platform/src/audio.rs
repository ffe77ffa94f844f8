//! Audio Backend
//!
//! One-shot break cue playback. Hosts frequently refuse playback (autoplay
//! policies, no output device); a refused cue is logged and dropped, never
//! retried, and never fails the break that triggered it.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

/// Default cue volume
pub const DEFAULT_CUE_VOLUME: f32 = 0.7;

/// Audio playback errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("Playback blocked by host policy")]
    Blocked,

    #[error("No audio output: {0}")]
    Unavailable(String),
}

/// Break sound request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakCue {
    /// Playback rate multiplier (pitch)
    pub playback_rate: f32,
    /// Volume 0..1
    pub volume: f32,
}

impl BreakCue {
    /// Cue at the default volume
    pub fn new(playback_rate: f32) -> Self {
        Self {
            playback_rate,
            volume: DEFAULT_CUE_VOLUME,
        }
    }

    /// Override volume (clamped to 0..1)
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }
}

/// Audio output
pub trait AudioSink: Send {
    /// Start playing a cue from the beginning
    fn play(&self, cue: &BreakCue) -> Result<(), AudioError>;
}

impl<T: AudioSink + Sync + ?Sized> AudioSink for Arc<T> {
    fn play(&self, cue: &BreakCue) -> Result<(), AudioError> {
        (**self).play(cue)
    }
}

/// Sink for hosts without audio; every cue is accepted and discarded
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&self, _cue: &BreakCue) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Sink that records cues, optionally refusing them
#[derive(Debug, Default)]
pub struct RecordingSink {
    played: Mutex<Vec<BreakCue>>,
    blocked: bool,
}

impl RecordingSink {
    /// Accepting sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that refuses every cue
    pub fn blocked() -> Self {
        Self {
            played: Mutex::new(Vec::new()),
            blocked: true,
        }
    }

    /// Cues played so far
    pub fn played(&self) -> Vec<BreakCue> {
        self.played.lock().clone()
    }
}

impl AudioSink for RecordingSink {
    fn play(&self, cue: &BreakCue) -> Result<(), AudioError> {
        if self.blocked {
            return Err(AudioError::Blocked);
        }
        self.played.lock().push(*cue);
        Ok(())
    }
}

/// Play a cue, swallowing failure. Returns whether the cue played.
pub fn play_cue(sink: &dyn AudioSink, cue: &BreakCue) -> bool {
    match sink.play(cue) {
        Ok(()) => true,
        Err(e) => {
            log::debug!("Break cue dropped: {}", e);
            false
        }
    }
}
