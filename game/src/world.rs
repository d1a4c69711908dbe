use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The world moves in discrete steps on this cadence, not every tick.
pub const SCROLL_CADENCE: Duration = Duration::from_millis(150);
/// Pixels the world shifts left per cadence step while the skater is alive.
pub const SCROLL_SPEED: f32 = 30.0;

/// Horizontal scroll of the floor texture (and everything pinned to it).
///
/// The skater never moves in its own frame; dying zeroes the speed and
/// landing restores it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldScroll {
    offset: f32,
    speed: f32,
    texture_span: f32,
    last_step: Duration,
}

impl WorldScroll {
    pub fn new(texture_span: f32) -> Self {
        Self {
            offset: 0.0,
            speed: SCROLL_SPEED,
            texture_span: texture_span.max(1.0),
            last_step: Duration::ZERO,
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn stop(&mut self) {
        self.speed = 0.0;
    }

    pub fn restore_speed(&mut self) {
        self.speed = SCROLL_SPEED;
    }

    /// Advances the cadence clock. Returns true when a movement step fired
    /// this tick; rails shift on the same steps so they stay glued to the
    /// floor.
    pub fn tick(&mut self, now: Duration) -> bool {
        if now.saturating_sub(self.last_step) < SCROLL_CADENCE {
            return false;
        }
        self.last_step = now;
        self.offset = (self.offset - self.speed).rem_euclid(self.texture_span);
        true
    }
}
