use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::deadline::Deadline;
use crate::hands::{Combination, CENTER_CENTER};
use crate::tricks::{GrindTrick, TrickCatalog};

/// How long after a rail-adjacent catch the player has to commit to a grind.
pub const GRIND_WINDOW_DURATION: Duration = Duration::from_secs(1);
/// Continuous hold required before a pending grind trick commits.
pub const GRIND_HOLD_DWELL: Duration = Duration::from_millis(150);
/// Manual exit is refused before this much grinding has elapsed.
pub const MIN_GRIND_DURATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct PendingGrind {
    trick: GrindTrick,
    held_since: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrindWindowOutcome {
    Commit(GrindTrick),
    /// Window closed without a commit; the skater lands.
    ForceLand,
}

/// The bounded input window between a successful rail-adjacent catch and the
/// grind itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrindWindow {
    window: Deadline,
    pending: Option<PendingGrind>,
}

impl GrindWindow {
    pub fn open(now: Duration) -> Self {
        Self {
            window: Deadline::arm(now, GRIND_WINDOW_DURATION),
            pending: None,
        }
    }

    pub fn pending_trick(&self) -> Option<GrindTrick> {
        self.pending.map(|p| p.trick)
    }

    /// Fraction of the window remaining, for HUD feedback.
    pub fn remaining_fraction(&self, now: Duration) -> f32 {
        1.0 - self.window.progress(now)
    }

    /// Polls the window once per tick.
    ///
    /// The window only stays open while the rail is still under the skater;
    /// the moment it scrolls out of proximity the skater lands, pending hold
    /// or not.
    pub fn tick(
        &mut self,
        now: Duration,
        hands: Combination,
        near_rail: bool,
        catalog: &TrickCatalog,
    ) -> Option<GrindWindowOutcome> {
        if !near_rail || self.window.is_expired(now) {
            return Some(GrindWindowOutcome::ForceLand);
        }

        if hands == CENTER_CENTER {
            self.pending = None;
            return None;
        }

        if let Some(trick) = catalog.lookup_grind(hands) {
            match self.pending {
                Some(pending) if pending.trick == trick => {
                    if now.saturating_sub(pending.held_since) >= GRIND_HOLD_DWELL {
                        return Some(GrindWindowOutcome::Commit(trick));
                    }
                }
                _ => {
                    self.pending = Some(PendingGrind {
                        trick,
                        held_since: now,
                    });
                }
            }
        }
        // A held combination that maps to no grind trick leaves any pending
        // hold untouched.

        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrindExit {
    /// The skater reached the rail's trailing edge. Unconditional.
    RailEnd,
    /// Hands centered after the minimum grind duration.
    Manual,
}

/// An active grind on a rail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrindSession {
    trick: GrindTrick,
    min_duration: Deadline,
}

impl GrindSession {
    pub fn start(trick: GrindTrick, now: Duration) -> Self {
        Self {
            trick,
            min_duration: Deadline::arm(now, MIN_GRIND_DURATION),
        }
    }

    pub fn trick(&self) -> GrindTrick {
        self.trick
    }

    pub fn elapsed(&self, now: Duration) -> Duration {
        self.min_duration.elapsed(now)
    }

    /// Rail-end is checked first and exits regardless of elapsed time;
    /// manual exit additionally requires the minimum duration.
    pub fn tick(
        &self,
        now: Duration,
        hands: Combination,
        at_rail_end: bool,
    ) -> Option<GrindExit> {
        if at_rail_end {
            return Some(GrindExit::RailEnd);
        }
        if hands == CENTER_CENTER && self.min_duration.is_expired(now) {
            return Some(GrindExit::Manual);
        }
        None
    }
}
