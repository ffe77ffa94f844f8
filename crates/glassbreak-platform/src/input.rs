//! Input Handling
//!
//! Decodes raw pointer events into the gestures the simulator reacts to.
//! Desktop hosts deliver double-clicks directly; touch hosts deliver single
//! taps that are paired here.

use std::time::Duration;

use glam::Vec2;

/// Maximum gap between two taps of a double-tap
pub const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(300);

/// Raw input event from the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Mouse double-click at a screen position
    MouseDoubleClick { x: f32, y: f32 },
    /// Touch lifted at a screen position, timestamped by the host clock
    TouchEnded { x: f32, y: f32, timestamp_ms: u64 },
    /// Viewport resized
    Resized { width: u32, height: u32 },
}

/// Decoded gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Break the pane at this screen position
    BreakAt(Vec2),
    /// Viewport changed size
    Resize { width: u32, height: u32 },
}

/// Pairs taps into double-taps
#[derive(Debug, Clone)]
pub struct GestureDecoder {
    window: Duration,
    last_tap_ms: Option<u64>,
}

impl GestureDecoder {
    /// Create a decoder with the default double-tap window
    pub fn new() -> Self {
        Self::with_window(DOUBLE_TAP_WINDOW)
    }

    /// Create a decoder with a custom double-tap window
    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            last_tap_ms: None,
        }
    }

    /// Feed one event; returns a gesture when one completes
    pub fn decode(&mut self, event: &InputEvent) -> Option<Gesture> {
        match *event {
            InputEvent::MouseDoubleClick { x, y } => Some(Gesture::BreakAt(Vec2::new(x, y))),
            InputEvent::TouchEnded { x, y, timestamp_ms } => {
                let window_ms = self.window.as_millis() as u64;
                let is_double = self
                    .last_tap_ms
                    .map(|last| timestamp_ms > last && timestamp_ms - last < window_ms)
                    .unwrap_or(false);

                if is_double {
                    self.last_tap_ms = None;
                    Some(Gesture::BreakAt(Vec2::new(x, y)))
                } else {
                    self.last_tap_ms = Some(timestamp_ms);
                    None
                }
            }
            InputEvent::Resized { width, height } => Some(Gesture::Resize { width, height }),
        }
    }
}

impl Default for GestureDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tap(timestamp_ms: u64) -> InputEvent {
        InputEvent::TouchEnded { x: 10.0, y: 20.0, timestamp_ms }
    }

    #[test]
    fn test_double_click_breaks_immediately() {
        let mut decoder = GestureDecoder::new();
        let gesture = decoder.decode(&InputEvent::MouseDoubleClick { x: 5.0, y: 6.0 });
        assert_eq!(gesture, Some(Gesture::BreakAt(Vec2::new(5.0, 6.0))));
    }

    #[test]
    fn test_double_tap_within_window() {
        let mut decoder = GestureDecoder::new();
        assert_eq!(decoder.decode(&tap(1000)), None);
        assert_eq!(
            decoder.decode(&tap(1250)),
            Some(Gesture::BreakAt(Vec2::new(10.0, 20.0)))
        );
    }

    #[test]
    fn test_slow_taps_do_not_pair() {
        let mut decoder = GestureDecoder::new();
        assert_eq!(decoder.decode(&tap(1000)), None);
        assert_eq!(decoder.decode(&tap(1300)), None);
        // The second tap starts a new pair
        assert!(decoder.decode(&tap(1450)).is_some());
    }

    #[test]
    fn test_same_timestamp_is_not_a_double_tap() {
        let mut decoder = GestureDecoder::new();
        assert_eq!(decoder.decode(&tap(1000)), None);
        assert_eq!(decoder.decode(&tap(1000)), None);
    }

    #[test]
    fn test_third_tap_starts_over() {
        let mut decoder = GestureDecoder::new();
        decoder.decode(&tap(10));
        assert!(decoder.decode(&tap(100)).is_some());
        assert!(decoder.decode(&tap(200)).is_none());
    }

    #[test]
    fn test_resize() {
        let mut decoder = GestureDecoder::new();
        assert_eq!(
            decoder.decode(&InputEvent::Resized { width: 800, height: 600 }),
            Some(Gesture::Resize { width: 800, height: 600 })
        );
    }
}
