//! Long-press gesture recognition
//!
//! A press becomes a long press once it has been held for the threshold.
//! Letting go (or the pointer leaving the control) always ends the gesture,
//! whether or not the long press was ever recognized, so a stop command
//! follows every press.
//!
//! Time is passed in explicitly; the caller decides how often to poll.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::trace;

/// Default hold duration before a press counts as a long press.
pub const DEFAULT_THRESHOLD: Duration = Duration::from_millis(300);

/// Gesture state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressState {
    /// Not pressed
    Idle,
    /// Pressed, threshold not yet reached
    Pressed { since: Instant },
    /// Long press recognized
    Held { since: Instant },
}

/// Gesture edge reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressEvent {
    /// Hold reached the threshold
    LongPress,
    /// Control released after a press
    LongPressEnd,
}

/// Long-press recognizer for a single control
#[derive(Debug, Clone)]
pub struct LongPress {
    threshold: Duration,
    state: PressState,
}

impl Default for LongPress {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl LongPress {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            state: PressState::Idle,
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    pub fn state(&self) -> PressState {
        self.state
    }

    pub fn is_pressed(&self) -> bool {
        !matches!(self.state, PressState::Idle)
    }

    /// Start a press. A press while already pressed is ignored.
    pub fn press(&mut self, now: Instant) -> bool {
        if self.is_pressed() {
            return false;
        }
        self.state = PressState::Pressed { since: now };
        true
    }

    /// Report the long press once the hold reaches the threshold.
    pub fn poll(&mut self, now: Instant) -> Option<PressEvent> {
        match self.state {
            PressState::Pressed { since }
                if now.saturating_duration_since(since) >= self.threshold =>
            {
                self.state = PressState::Held { since };
                Some(PressEvent::LongPress)
            }
            _ => None,
        }
    }

    /// End the press. Ignored when not pressed.
    pub fn release(&mut self, now: Instant) -> Option<PressEvent> {
        let since = match self.state {
            PressState::Idle => return None,
            PressState::Pressed { since } | PressState::Held { since } => since,
        };

        trace!(
            held_ms = now.saturating_duration_since(since).as_millis() as u64,
            recognized = matches!(self.state, PressState::Held { .. }),
            "Press released"
        );
        self.state = PressState::Idle;
        Some(PressEvent::LongPressEnd)
    }

    /// Pointer left the control; same as a release.
    pub fn leave(&mut self, now: Instant) -> Option<PressEvent> {
        self.release(now)
    }
}
