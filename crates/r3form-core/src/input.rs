//! Input events and the frame clock.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Pointer event scoped to a single hit region.
///
/// Positions are in the local coordinates of the widget that was hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Pointer entered the hit region.
    Enter,
    /// Pointer left the hit region.
    Leave,
    Down {
        position: DVec3,
    },
    Up {
        position: DVec3,
    },
    /// Down and up landed on the same hit region.
    Click {
        position: DVec3,
    },
}

impl PointerEvent {
    /// Pointer-down at the local origin.
    pub fn down() -> Self {
        Self::Down {
            position: DVec3::ZERO,
        }
    }

    /// Pointer-up at the local origin.
    pub fn up() -> Self {
        Self::Up {
            position: DVec3::ZERO,
        }
    }

    /// Check if this is a pointer-down.
    pub fn is_down(&self) -> bool {
        matches!(self, Self::Down { .. })
    }
}

/// Keyboard event type.
///
/// Keys are named the way browsers name them: `"a"`, `"A"`, `" "`,
/// `"Backspace"`, `"Enter"`, ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

impl KeyEvent {
    /// Name of the key.
    pub fn key(&self) -> &str {
        match self {
            Self::Pressed(key) | Self::Released(key) => key,
        }
    }

    /// The printable character this key produces, if it is a single character.
    pub fn printable(&self) -> Option<char> {
        let mut chars = self.key().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

/// Whether a pointer event should keep travelling to the elements behind the
/// one that handled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    /// Let the background (and anything behind) see the event too.
    #[default]
    Continue,
    /// The widget consumed the event.
    Stop,
}

/// Timing information for a single rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    /// Number of frames ticked before this one.
    pub index: u64,
    /// Seconds since the clock started.
    pub elapsed: f64,
    /// Seconds since the previous frame.
    pub delta: f64,
}

/// Accumulates host frame ticks into [`Frame`]s.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    frames: u64,
    elapsed: f64,
}

impl FrameClock {
    /// Create a new clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `dt` seconds and return the new frame.
    ///
    /// Negative deltas are treated as zero.
    pub fn tick(&mut self, dt: f64) -> Frame {
        let delta = dt.max(0.0);
        let frame = Frame {
            index: self.frames,
            elapsed: self.elapsed + delta,
            delta,
        };
        self.frames += 1;
        self.elapsed = frame.elapsed;
        frame
    }

    /// Seconds since the clock started.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of frames ticked so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_keys() {
        assert_eq!(KeyEvent::Pressed("a".into()).printable(), Some('a'));
        assert_eq!(KeyEvent::Pressed(" ".into()).printable(), Some(' '));
        assert_eq!(KeyEvent::Pressed("é".into()).printable(), Some('é'));
        assert_eq!(KeyEvent::Pressed("Backspace".into()).printable(), None);
        assert_eq!(KeyEvent::Pressed(String::new()).printable(), None);
    }

    #[test]
    fn test_frame_clock() {
        let mut clock = FrameClock::new();
        let first = clock.tick(0.5);
        assert_eq!(first.index, 0);
        assert!((first.elapsed - 0.5).abs() < f64::EPSILON);

        let second = clock.tick(0.25);
        assert_eq!(second.index, 1);
        assert!((second.elapsed - 0.75).abs() < f64::EPSILON);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn test_frame_clock_ignores_negative_delta() {
        let mut clock = FrameClock::new();
        clock.tick(1.0);
        let frame = clock.tick(-3.0);
        assert!((frame.elapsed - 1.0).abs() < f64::EPSILON);
        assert!(frame.delta.abs() < f64::EPSILON);
    }
}
