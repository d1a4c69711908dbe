use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::deadline::Deadline;
use crate::detector::{DetectorEvent, TrickDetector};
use crate::flight::{FlightEvent, FlightPhase};
use crate::hands::{combination, Combination, HandKeys};
use crate::rails::{RailField, Vec2};
use crate::rng::Rng;
use crate::tricks::TrickCatalog;
use crate::world::WorldScroll;

/// The skater renders this far left of the view center.
pub const SKATEBOARD_X_OFFSET: f32 = 500.0;

/// How long the catch feedback text stays on screen.
pub const CATCH_FEEDBACK_DURATION: Duration = Duration::from_millis(1500);
/// How long the landing feedback text stays on screen.
pub const LANDING_FEEDBACK_DURATION: Duration = Duration::from_secs(2);

/// One tick's worth of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: HandKeys,
    pub right: HandKeys,
    pub dt: Duration,
}

impl TickInput {
    pub fn idle(dt: Duration) -> Self {
        Self {
            left: HandKeys::NONE,
            right: HandKeys::NONE,
            dt,
        }
    }
}

/// Everything observable that happened during one tick, in order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SkateEvent {
    Input(DetectorEvent),
    Flight(FlightEvent),
}

/// A transient yes/no verdict shown by the HUD for a fixed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Feedback {
    positive: bool,
    until: Deadline,
}

/// The whole simulation: one aggregate advanced serially by `tick`.
///
/// No wall-clock access, no I/O; the clock is the sum of the `dt`s fed in,
/// so identical input sequences produce identical states.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkaterState {
    clock: Duration,
    view_width: f32,
    view_height: f32,
    skater: Vec2,
    phase: FlightPhase,
    detector: TrickDetector,
    world: WorldScroll,
    rails: RailField,
    rng: Rng,
    /// Displayed board rotation (shuv, flip) while idle; landing resets it.
    angle: (f32, f32),
    catch_feedback: Option<Feedback>,
    landing_feedback: Option<Feedback>,
}

impl SkaterState {
    pub fn new(view_width: f32, view_height: f32, seed: u64) -> Self {
        let skater = Vec2::new(view_width / 2.0 - SKATEBOARD_X_OFFSET, view_height / 2.0);
        let mut rng = Rng::new(seed);
        let rails = RailField::new(view_width, skater.y, Duration::ZERO, &mut rng);
        Self {
            clock: Duration::ZERO,
            view_width,
            view_height,
            skater,
            phase: FlightPhase::Grounded,
            detector: TrickDetector::new(),
            world: WorldScroll::new(view_width),
            rails,
            rng,
            angle: (0.0, 0.0),
            catch_feedback: None,
            landing_feedback: None,
        }
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn view_size(&self) -> (f32, f32) {
        (self.view_width, self.view_height)
    }

    pub fn skater_point(&self) -> Vec2 {
        self.skater
    }

    pub fn phase(&self) -> &FlightPhase {
        &self.phase
    }

    pub fn world(&self) -> &WorldScroll {
        &self.world
    }

    pub fn rails(&self) -> &RailField {
        &self.rails
    }

    pub fn angle(&self) -> (f32, f32) {
        self.angle
    }

    pub fn set_angle(&mut self, shuv: f32, flip: f32) {
        self.angle = (shuv, flip);
    }

    pub fn reset_angle(&mut self) {
        self.angle = (0.0, 0.0);
    }

    pub fn last_combination(&self) -> Combination {
        self.detector.last_combination()
    }

    /// Progress of the current trick hold toward confirmation, for the HUD.
    pub fn hold_progress(&self) -> Option<f32> {
        self.detector.hold_progress(self.clock)
    }

    /// Remaining fraction of an open grind window, for the HUD.
    pub fn grind_window_fraction(&self) -> Option<f32> {
        match &self.phase {
            FlightPhase::GrindWindow { window, .. } => {
                Some(window.remaining_fraction(self.clock))
            }
            _ => None,
        }
    }

    /// Catch verdict to display, if its feedback window is still running.
    pub fn catch_feedback(&self) -> Option<bool> {
        self.catch_feedback
            .filter(|f| !f.until.is_expired(self.clock))
            .map(|f| f.positive)
    }

    /// Landing verdict to display, if its feedback window is still running.
    pub fn landing_feedback(&self) -> Option<bool> {
        self.landing_feedback
            .filter(|f| !f.until.is_expired(self.clock))
            .map(|f| f.positive)
    }

    /// Advances the simulation by one tick and reports what happened.
    pub fn tick(&mut self, input: TickInput, catalog: &TrickCatalog) -> Vec<SkateEvent> {
        self.clock += input.dt;
        let now = self.clock;
        let hands = combination(input.left, input.right);

        let mut events = Vec::new();

        for event in self
            .detector
            .update(now, hands, self.phase.is_grinding(), catalog)
        {
            events.push(SkateEvent::Input(event));
            if let DetectorEvent::TrickConfirmed(trick) = event {
                let mut flight_events = Vec::new();
                self.phase.start_trick(trick, now, &mut flight_events);
                events.extend(flight_events.into_iter().map(SkateEvent::Flight));
            }
        }

        // World and rails share one movement cadence; a dead skater's world
        // has speed zero, so rails freeze with the floor.
        if self.world.tick(now) {
            self.rails.advance_step(self.world.speed());
        }
        self.rails.maybe_spawn(now, &mut self.rng);

        let mut flight_events = Vec::new();
        self.phase.tick(
            now,
            input.dt,
            hands,
            &self.rails,
            self.skater,
            catalog,
            &mut flight_events,
        );

        for event in flight_events {
            match event {
                FlightEvent::CatchResolved { resolution, .. } => {
                    self.catch_feedback = Some(Feedback {
                        positive: resolution.is_success(),
                        until: Deadline::arm(now, CATCH_FEEDBACK_DURATION),
                    });
                    if !resolution.is_success() {
                        self.world.stop();
                    }
                }
                FlightEvent::Landed { caught, .. } => {
                    self.world.restore_speed();
                    self.angle = (0.0, 0.0);
                    self.landing_feedback = Some(Feedback {
                        positive: caught,
                        until: Deadline::arm(now, LANDING_FEEDBACK_DURATION),
                    });
                }
                _ => {}
            }
            events.push(SkateEvent::Flight(event));
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catch::CatchResolution;
    use crate::flight::FlightEvent;
    use crate::tricks::Trick;

    const MS: fn(u64) -> Duration = Duration::from_millis;

    fn catalog() -> TrickCatalog {
        TrickCatalog::new().unwrap()
    }

    fn kickflip_keys() -> (HandKeys, HandKeys) {
        // (Left, Down) is Kickflip.
        (
            HandKeys {
                left: true,
                ..HandKeys::NONE
            },
            HandKeys {
                down: true,
                ..HandKeys::NONE
            },
        )
    }

    fn run_until<F>(state: &mut SkaterState, catalog: &TrickCatalog, input: TickInput, max_ticks: u32, mut pred: F) -> Vec<SkateEvent>
    where
        F: FnMut(&[SkateEvent]) -> bool,
    {
        for _ in 0..max_ticks {
            let events = state.tick(input, catalog);
            if pred(&events) {
                return events;
            }
        }
        panic!("predicate never satisfied within {max_ticks} ticks");
    }

    #[test]
    fn holding_kickflip_goes_airborne() {
        let catalog = catalog();
        let mut state = SkaterState::new(1920.0, 1080.0, 7);
        let (left, right) = kickflip_keys();
        let input = TickInput { left, right, dt: MS(16) };

        let events = run_until(&mut state, &catalog, input, 20, |events| {
            events.contains(&SkateEvent::Flight(FlightEvent::TrickStarted(Trick::Kickflip)))
        });
        assert!(state.phase().is_airborne());
        assert!(events
            .iter()
            .any(|e| matches!(e, SkateEvent::Input(DetectorEvent::TrickConfirmed(_)))));
    }

    #[test]
    fn death_freezes_the_world_and_landing_restores_it() {
        let catalog = catalog();
        let mut state = SkaterState::new(1920.0, 1080.0, 7);
        let (left, right) = kickflip_keys();
        let held = TickInput { left, right, dt: MS(16) };

        // Hold through trick start and the whole catch window so it expires.
        run_until(&mut state, &catalog, held, 200, |events| {
            events.iter().any(|e| {
                matches!(
                    e,
                    SkateEvent::Flight(FlightEvent::CatchResolved {
                        resolution: CatchResolution::WindowExpired,
                        ..
                    })
                )
            })
        });
        assert!(state.phase().is_dead());
        assert_eq!(state.world().speed(), 0.0);
        assert_eq!(state.catch_feedback(), Some(false));

        run_until(&mut state, &catalog, TickInput::idle(MS(16)), 50, |events| {
            events.contains(&SkateEvent::Flight(FlightEvent::Landed {
                caught: false,
                from_grind: false,
            }))
        });
        assert!(state.phase().is_grounded());
        assert_eq!(state.world().speed(), crate::world::SCROLL_SPEED);
        assert_eq!(state.landing_feedback(), Some(false));
    }

    #[test]
    fn identical_seeds_and_inputs_stay_identical() {
        let catalog = catalog();
        let mut a = SkaterState::new(1920.0, 1080.0, 42);
        let mut b = SkaterState::new(1920.0, 1080.0, 42);
        let (left, right) = kickflip_keys();

        for tick in 0..600 {
            let input = if tick % 40 < 20 {
                TickInput { left, right, dt: MS(16) }
            } else {
                TickInput::idle(MS(16))
            };
            let ea = a.tick(input, &catalog);
            let eb = b.tick(input, &catalog);
            assert_eq!(ea, eb);
        }

        let ja = serde_json::to_string(&a).unwrap();
        let jb = serde_json::to_string(&b).unwrap();
        assert_eq!(ja, jb);
    }
}
