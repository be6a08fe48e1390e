//! Key-repeat velocity tracking.
//!
//! Derives a scalar mouse speed from the press/repeat/release cadence of
//! the physical device: release resets to 0, a press starts at the base
//! speed, and every autorepeat notification adds the increment, with no
//! cap short of the integer ceiling.
//! Holding a directional key therefore accelerates the pointer.
//!
//! The tracker is deliberately global rather than per-key: remote-control
//! input is single-key-at-a-time, and the speed always reflects the most
//! recent key-value transition regardless of which key produced it.

use crate::event::{KEY_PRESS, KEY_RELEASE, KEY_REPEAT};

pub const DEFAULT_BASE_SPEED: i32 = 5;
pub const DEFAULT_REPEAT_INCREMENT: i32 = 10;

#[derive(Debug, Clone)]
pub struct VelocityTracker {
    speed: i32,
    base: i32,
    increment: i32,
}

impl VelocityTracker {
    pub fn new(base: i32, increment: i32) -> Self {
        Self {
            speed: 0,
            base,
            increment,
        }
    }

    /// Advance the tracker with a key event value and return the new speed.
    pub fn observe(&mut self, value: i32) -> i32 {
        match value {
            KEY_RELEASE => self.speed = 0,
            KEY_PRESS => self.speed = self.base,
            KEY_REPEAT => self.speed = self.speed.saturating_add(self.increment),
            _ => {}
        }
        self.speed
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_SPEED, DEFAULT_REPEAT_INCREMENT)
    }
}
