use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animation::AnimationState;
use crate::catch::{CatchResolution, CatchState};
use crate::deadline::Deadline;
use crate::grind::{GrindExit, GrindSession, GrindWindow, GrindWindowOutcome};
use crate::hands::Combination;
use crate::rails::{RailField, Vec2};
use crate::tricks::{GrindTrick, Trick, TrickCatalog};

/// How long the death effect (and the scroll freeze) lasts.
pub const DEATH_DURATION: Duration = Duration::from_millis(200);

/// Everything that can happen inside the flight machine during one tick.
/// The shell maps these to sounds; tests assert on them directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightEvent {
    TrickStarted(Trick),
    CatchResolved {
        trick: Trick,
        resolution: CatchResolution,
    },
    GrindWindowOpened,
    GrindStarted(GrindTrick),
    GrindEnded {
        trick: GrindTrick,
        exit: GrindExit,
    },
    Landed {
        caught: bool,
        from_grind: bool,
    },
}

/// The one flight phase the skater is in. Exactly one variant holds at any
/// time, which is the whole point: a missed catch cannot coexist with an
/// open grind window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FlightPhase {
    Grounded,
    Airborne {
        trick: Trick,
        anim: AnimationState,
        catch: CatchState,
    },
    GrindWindow {
        trick: Trick,
        anim: AnimationState,
        window: GrindWindow,
    },
    Grinding {
        session: GrindSession,
    },
    Dead {
        trick: Trick,
        anim: AnimationState,
        effect: Deadline,
    },
}

impl FlightPhase {
    pub fn is_grounded(&self) -> bool {
        matches!(self, FlightPhase::Grounded)
    }

    pub fn is_airborne(&self) -> bool {
        matches!(
            self,
            FlightPhase::Airborne { .. } | FlightPhase::GrindWindow { .. }
        )
    }

    pub fn is_grinding(&self) -> bool {
        matches!(self, FlightPhase::Grinding { .. })
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, FlightPhase::Dead { .. })
    }

    /// The aerial trick currently in play, if any.
    pub fn active_trick(&self) -> Option<Trick> {
        match self {
            FlightPhase::Airborne { trick, .. }
            | FlightPhase::GrindWindow { trick, .. }
            | FlightPhase::Dead { trick, .. } => Some(*trick),
            _ => None,
        }
    }

    /// The flip animation, where one is still on screen: spinning while
    /// airborne or dead, frozen on the caught frame during the grind window.
    pub fn animation(&self) -> Option<&AnimationState> {
        match self {
            FlightPhase::Airborne { anim, .. }
            | FlightPhase::GrindWindow { anim, .. }
            | FlightPhase::Dead { anim, .. } => Some(anim),
            _ => None,
        }
    }

    pub fn grind_trick(&self) -> Option<GrindTrick> {
        match self {
            FlightPhase::Grinding { session } => Some(session.trick()),
            _ => None,
        }
    }

    /// Starts a trick from the ground. Confirmations that arrive in any
    /// other phase are dropped; only one trick per flight.
    pub fn start_trick(
        &mut self,
        trick: Trick,
        now: Duration,
        events: &mut Vec<FlightEvent>,
    ) {
        if !self.is_grounded() {
            return;
        }
        let meta = trick.meta();
        *self = FlightPhase::Airborne {
            trick,
            anim: AnimationState::start(trick),
            catch: CatchState::open_after_trick_start(now, meta.frames),
        };
        events.push(FlightEvent::TrickStarted(trick));
    }

    /// One simulation tick of the flight machine proper. The detector runs
    /// outside; this sequences animation, catch, grind window/session and
    /// the death timer.
    pub fn tick(
        &mut self,
        now: Duration,
        dt: Duration,
        hands: Combination,
        rails: &RailField,
        skater: Vec2,
        catalog: &TrickCatalog,
        events: &mut Vec<FlightEvent>,
    ) {
        match self {
            FlightPhase::Grounded => {}

            FlightPhase::Airborne { trick, anim, catch } => {
                let trick = *trick;
                let meta = trick.meta();
                anim.advance(&meta, dt);

                if let Some(resolution) = catch.tick(now, hands, anim.frame()) {
                    events.push(FlightEvent::CatchResolved { trick, resolution });
                    if resolution.is_success() {
                        anim.mark_completed();
                        if rails.near(skater) {
                            *self = FlightPhase::GrindWindow {
                                trick,
                                anim: *anim,
                                window: GrindWindow::open(now),
                            };
                            events.push(FlightEvent::GrindWindowOpened);
                        } else {
                            *self = FlightPhase::Grounded;
                            events.push(FlightEvent::Landed {
                                caught: true,
                                from_grind: false,
                            });
                        }
                    } else {
                        *self = FlightPhase::Dead {
                            trick,
                            anim: *anim,
                            effect: Deadline::arm(now, DEATH_DURATION),
                        };
                    }
                }
            }

            FlightPhase::GrindWindow { window, .. } => {
                match window.tick(now, hands, rails.near(skater), catalog) {
                    Some(GrindWindowOutcome::Commit(grind)) => {
                        *self = FlightPhase::Grinding {
                            session: GrindSession::start(grind, now),
                        };
                        events.push(FlightEvent::GrindStarted(grind));
                    }
                    Some(GrindWindowOutcome::ForceLand) => {
                        // The catch already succeeded; an expired grind
                        // window lands on the success branch.
                        *self = FlightPhase::Grounded;
                        events.push(FlightEvent::Landed {
                            caught: true,
                            from_grind: false,
                        });
                    }
                    None => {}
                }
            }

            FlightPhase::Grinding { session } => {
                if let Some(exit) = session.tick(now, hands, rails.at_end(skater)) {
                    let trick = session.trick();
                    *self = FlightPhase::Grounded;
                    events.push(FlightEvent::GrindEnded { trick, exit });
                    events.push(FlightEvent::Landed {
                        caught: true,
                        from_grind: true,
                    });
                }
            }

            FlightPhase::Dead { trick, anim, effect } => {
                // The board keeps spinning through the death effect.
                anim.advance(&trick.meta(), dt);
                if effect.is_expired(now) {
                    *self = FlightPhase::Grounded;
                    events.push(FlightEvent::Landed {
                        caught: false,
                        from_grind: false,
                    });
                }
            }
        }
    }
}
