use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::deadline::Deadline;
use crate::rng::Rng;

/// Rails render (and collide) at six times their source-image width.
pub const RAIL_STRETCH: f32 = 6.0;
/// Horizontal slack on proximity checks.
pub const PROXIMITY_BUFFER: f32 = 80.0;
/// Vertical slack on proximity checks.
pub const VERTICAL_TOLERANCE: f32 = 120.0;
/// Tighter vertical slack for the rail-end check.
pub const RAIL_END_VERTICAL_TOLERANCE: f32 = 100.0;
/// The rail-end check fires this many pixels before the true trailing edge.
pub const RAIL_END_MARGIN: f32 = 50.0;

pub const SPAWN_INTERVAL_MIN_SECS: f32 = 3.0;
pub const SPAWN_INTERVAL_MAX_SECS: f32 = 6.0;

/// Unstretched dimensions of the rail asset after its 0.4 down-scale.
pub const DEFAULT_RAIL_WIDTH: f32 = 50.0;
pub const DEFAULT_RAIL_HEIGHT: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rail {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rail {
    pub fn stretched_width(&self) -> f32 {
        self.width * RAIL_STRETCH
    }

    /// Trailing edge in world space.
    pub fn end_x(&self) -> f32 {
        self.x + self.stretched_width()
    }

    pub fn is_offscreen(&self) -> bool {
        self.end_x() < 0.0
    }

    pub fn near(&self, point: Vec2) -> bool {
        let within_x = (self.x - PROXIMITY_BUFFER..=self.end_x() + PROXIMITY_BUFFER)
            .contains(&point.x);
        within_x && (point.y - self.y).abs() < VERTICAL_TOLERANCE
    }

    pub fn at_end(&self, point: Vec2) -> bool {
        let on_rail = (self.x..=self.end_x()).contains(&point.x)
            && (point.y - self.y).abs() < RAIL_END_VERTICAL_TOLERANCE;
        on_rail && point.x >= self.end_x() - RAIL_END_MARGIN
    }
}

/// The moving rail obstacles and their randomized spawn cadence.
///
/// Rails advance on the shared world-scroll cadence (the caller passes the
/// scroll speed, which is zero while dead), spawn at the right edge pinned
/// to the skater's render y, and are pruned once fully past the left edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RailField {
    rails: Vec<Rail>,
    next_spawn: Deadline,
    view_width: f32,
    rail_y: f32,
}

impl RailField {
    pub fn new(view_width: f32, rail_y: f32, now: Duration, rng: &mut Rng) -> Self {
        Self {
            rails: Vec::new(),
            next_spawn: Deadline::arm(now, spawn_interval(rng)),
            view_width,
            rail_y,
        }
    }

    pub fn rails(&self) -> &[Rail] {
        &self.rails
    }

    /// Spawns when the randomized interval elapses. Independent of the
    /// movement cadence.
    pub fn maybe_spawn(&mut self, now: Duration, rng: &mut Rng) {
        if !self.next_spawn.is_expired(now) {
            return;
        }
        self.rails.push(Rail {
            x: self.view_width,
            y: self.rail_y,
            width: DEFAULT_RAIL_WIDTH,
            height: DEFAULT_RAIL_HEIGHT,
        });
        self.next_spawn = Deadline::arm(now, spawn_interval(rng));
    }

    /// One movement step: shift every rail left and prune the ones whose
    /// stretched extent has fully left the view.
    pub fn advance_step(&mut self, speed: f32) {
        for rail in &mut self.rails {
            rail.x -= speed;
        }
        self.rails.retain(|rail| !rail.is_offscreen());
    }

    pub fn near(&self, point: Vec2) -> bool {
        self.rails.iter().any(|rail| rail.near(point))
    }

    pub fn at_end(&self, point: Vec2) -> bool {
        self.rails.iter().any(|rail| rail.at_end(point))
    }

    #[cfg(test)]
    pub fn push_rail_for_test(&mut self, rail: Rail) {
        self.rails.push(rail);
    }
}

fn spawn_interval(rng: &mut Rng) -> Duration {
    Duration::from_secs_f32(rng.range_f32(SPAWN_INTERVAL_MIN_SECS, SPAWN_INTERVAL_MAX_SECS))
}
