use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::hands::{Combination, CENTER_CENTER};
use crate::tricks::{Trick, TrickCatalog};

/// How long a non-center combination must be held before it resolves.
pub const HOLD_THRESHOLD: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectorEvent {
    /// One hand's region changed; drives the footstep sounds.
    FootMoved(Side),
    AttemptStarted(Combination),
    TrickConfirmed(Trick),
    /// A hold reached the threshold but matched no aerial trick.
    InvalidCombination(Combination),
    /// Hands returned to center before the threshold. Carries the trick the
    /// abandoned combination would have resolved to, when there is one.
    AttemptCancelled { matched: Option<Trick> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Hold {
    started: Duration,
    resolved: bool,
}

/// Watches the combination stream and turns sustained holds into trick
/// confirmations.
///
/// The hold timer re-arms whenever the combination value changes (a player
/// may roll from one combination into another without touching center); the
/// threshold lookup always uses the combination held at resolve time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrickDetector {
    last_combination: Combination,
    hold: Option<Hold>,
}

impl Default for TrickDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl TrickDetector {
    pub fn new() -> Self {
        Self {
            last_combination: CENTER_CENTER,
            hold: None,
        }
    }

    pub fn last_combination(&self) -> Combination {
        self.last_combination
    }

    /// The combination currently being held toward a trick, if any.
    pub fn pending_combination(&self) -> Option<Combination> {
        self.hold
            .filter(|h| !h.resolved)
            .map(|_| self.last_combination)
    }

    /// Fraction of the hold threshold reached, for HUD feedback.
    pub fn hold_progress(&self, now: Duration) -> Option<f32> {
        let hold = self.hold.filter(|h| !h.resolved)?;
        let elapsed = now.saturating_sub(hold.started).as_secs_f32();
        Some((elapsed / HOLD_THRESHOLD.as_secs_f32()).clamp(0.0, 1.0))
    }

    /// Feeds one tick's combination. `grinding` suppresses detection
    /// entirely; the detector does not even track hand movement while the
    /// player is on a rail.
    pub fn update(
        &mut self,
        now: Duration,
        combo: Combination,
        grinding: bool,
        catalog: &TrickCatalog,
    ) -> Vec<DetectorEvent> {
        if grinding {
            return Vec::new();
        }

        let mut events = Vec::new();

        if combo != self.last_combination {
            if combo.0 != self.last_combination.0 {
                events.push(DetectorEvent::FootMoved(Side::Left));
            }
            if combo.1 != self.last_combination.1 {
                events.push(DetectorEvent::FootMoved(Side::Right));
            }

            if combo == CENTER_CENTER {
                if let Some(hold) = self.hold.take() {
                    if !hold.resolved {
                        events.push(DetectorEvent::AttemptCancelled {
                            matched: catalog.lookup_aerial(self.last_combination),
                        });
                    }
                }
            } else {
                self.hold = Some(Hold {
                    started: now,
                    resolved: false,
                });
                events.push(DetectorEvent::AttemptStarted(combo));
            }

            self.last_combination = combo;
        }

        if let Some(hold) = &mut self.hold {
            if !hold.resolved && now.saturating_sub(hold.started) >= HOLD_THRESHOLD {
                hold.resolved = true;
                match catalog.lookup_aerial(self.last_combination) {
                    Some(trick) => events.push(DetectorEvent::TrickConfirmed(trick)),
                    None => {
                        // No trick starts; back to idle so the same held
                        // combination cannot resolve again.
                        events.push(DetectorEvent::InvalidCombination(self.last_combination));
                        self.hold = None;
                    }
                }
            }
        }

        events
    }
}
