//! Full-loop scenarios driven through `SkaterState::tick` with scripted
//! inputs, covering trick start, perfect and sloppy catches, death, and a
//! complete grind run on a naturally spawned rail.

use std::time::Duration;

use game::catch::CatchResolution;
use game::detector::DetectorEvent;
use game::flight::FlightEvent;
use game::grind::GrindExit;
use game::hands::HandRegion::{Center, Down, Left, Right};
use game::playtest::{hold, SCRIPT_TICK};
use game::state::{SkateEvent, SkaterState, TickInput};
use game::tricks::{GrindTrick, Trick, TrickCatalog};

fn catalog() -> TrickCatalog {
    TrickCatalog::new().expect("default catalog has no duplicate bindings")
}

fn new_state(seed: u64) -> SkaterState {
    SkaterState::new(1920.0, 1080.0, seed)
}

/// Ticks with a fixed input until the predicate matches an event batch.
fn run_until<F>(
    state: &mut SkaterState,
    catalog: &TrickCatalog,
    input: TickInput,
    max_ticks: u32,
    mut pred: F,
) -> Vec<SkateEvent>
where
    F: FnMut(&[SkateEvent]) -> bool,
{
    for _ in 0..max_ticks {
        let events = state.tick(input, catalog);
        if pred(&events) {
            return events;
        }
    }
    panic!("predicate not satisfied within {max_ticks} ticks (clock {:?})", state.clock());
}

fn run_ticks(state: &mut SkaterState, catalog: &TrickCatalog, input: TickInput, ticks: u32) -> Vec<SkateEvent> {
    let mut all = Vec::new();
    for _ in 0..ticks {
        all.extend(state.tick(input, catalog));
    }
    all
}

fn started(events: &[SkateEvent], trick: Trick) -> bool {
    events.contains(&SkateEvent::Flight(FlightEvent::TrickStarted(trick)))
}

#[test]
fn held_combination_confirms_and_launches_the_trick() {
    let catalog = catalog();
    let mut state = new_state(1);

    // (Left, Down) held past the 200ms threshold is a Kickflip.
    let events = run_until(&mut state, &catalog, hold(Left, Down), 20, |e| {
        started(e, Trick::Kickflip)
    });
    assert!(events.contains(&SkateEvent::Input(DetectorEvent::TrickConfirmed(Trick::Kickflip))));
    assert!(state.phase().is_airborne());
    assert!(state.clock() >= Duration::from_millis(200));
}

#[test]
fn centering_on_a_late_perfect_frame_lands_clean() {
    let catalog = catalog();
    let mut state = new_state(1);

    run_until(&mut state, &catalog, hold(Left, Down), 20, |e| {
        started(e, Trick::Kickflip)
    });

    // Keep the hold 17 more ticks (~283ms): the window is open and the
    // animation sits in the tail perfect frames (8..=11 of 12).
    run_ticks(&mut state, &catalog, hold(Left, Down), 17);
    let events = run_ticks(&mut state, &catalog, hold(Center, Center), 1);

    assert!(events.contains(&SkateEvent::Flight(FlightEvent::CatchResolved {
        trick: Trick::Kickflip,
        resolution: CatchResolution::Caught,
    })));
    // Seed 1 spawns no rail in the first three seconds, so a clean catch
    // lands immediately.
    assert!(events.contains(&SkateEvent::Flight(FlightEvent::Landed {
        caught: true,
        from_grind: false,
    })));
    assert!(state.phase().is_grounded());
    assert_eq!(state.catch_feedback(), Some(true));
    assert_eq!(state.landing_feedback(), Some(true));
}

#[test]
fn centering_on_a_mid_rotation_frame_is_fatal() {
    let catalog = catalog();
    let mut state = new_state(1);

    run_until(&mut state, &catalog, hold(Left, Down), 20, |e| {
        started(e, Trick::Kickflip)
    });

    // ~233ms after launch the board sits on frame 7, outside both perfect
    // bands.
    run_ticks(&mut state, &catalog, hold(Left, Down), 13);
    let events = run_ticks(&mut state, &catalog, hold(Center, Center), 1);

    assert!(events.contains(&SkateEvent::Flight(FlightEvent::CatchResolved {
        trick: Trick::Kickflip,
        resolution: CatchResolution::MissedAttempt,
    })));
    assert!(state.phase().is_dead());
    assert_eq!(state.world().speed(), 0.0, "a bail freezes the scroll");

    // The death effect runs 200ms, then the failed landing restores scroll.
    let events = run_until(&mut state, &catalog, hold(Center, Center), 20, |e| {
        e.contains(&SkateEvent::Flight(FlightEvent::Landed {
            caught: false,
            from_grind: false,
        }))
    });
    assert!(state.phase().is_grounded());
    assert_ne!(state.world().speed(), 0.0);
    assert_eq!(events.len(), 1);
    assert_eq!(state.landing_feedback(), Some(false));
}

#[test]
fn never_centering_expires_the_window_and_bails() {
    let catalog = catalog();
    let mut state = new_state(1);

    run_until(&mut state, &catalog, hold(Left, Down), 20, |e| {
        started(e, Trick::Kickflip)
    });

    // Window opens 200ms after launch and lasts 1s; holding through all of
    // it expires the catch.
    let events = run_until(&mut state, &catalog, hold(Left, Down), 90, |e| {
        e.iter().any(|event| {
            matches!(
                event,
                SkateEvent::Flight(FlightEvent::CatchResolved {
                    resolution: CatchResolution::WindowExpired,
                    ..
                })
            )
        })
    });
    assert!(state.phase().is_dead());
    assert!(!events.contains(&SkateEvent::Flight(FlightEvent::GrindWindowOpened)));
    assert_eq!(state.catch_feedback(), Some(false));
}

#[test]
fn unbound_combinations_report_invalid_without_launching() {
    let catalog = catalog();
    let mut state = new_state(1);

    // (Right, Right) is a grind binding, not an aerial one; holding it on
    // the ground is invalid.
    let events = run_until(&mut state, &catalog, hold(Right, Right), 20, |e| {
        e.iter()
            .any(|event| matches!(event, SkateEvent::Input(DetectorEvent::InvalidCombination(_))))
    });
    assert!(state.phase().is_grounded());
    assert!(!events
        .iter()
        .any(|e| matches!(e, SkateEvent::Flight(FlightEvent::TrickStarted(_)))));
}

#[test]
fn releasing_before_the_threshold_cancels_the_attempt() {
    let catalog = catalog();
    let mut state = new_state(1);

    // Five ticks is ~83ms, well under the 200ms confirm threshold.
    run_ticks(&mut state, &catalog, hold(Left, Down), 5);
    let events = run_ticks(&mut state, &catalog, hold(Center, Center), 1);

    assert!(events.contains(&SkateEvent::Input(DetectorEvent::AttemptCancelled {
        matched: Some(Trick::Kickflip),
    })));
    assert!(state.phase().is_grounded());
}

#[test]
fn full_grind_run_on_a_spawned_rail() {
    let catalog = catalog();
    let mut state = new_state(9);
    let skater = state.skater_point();

    // Coast until a spawned rail has scrolled into grind range.
    let idle = TickInput::idle(SCRIPT_TICK);
    let mut near = false;
    for _ in 0..2000 {
        state.tick(idle, &catalog);
        if state.rails().near(skater) {
            near = true;
            break;
        }
    }
    assert!(near, "no rail reached the skater within 2000 ticks");

    // Kickflip, then a tail-band perfect catch while still near the rail.
    run_until(&mut state, &catalog, hold(Left, Down), 20, |e| {
        started(e, Trick::Kickflip)
    });
    run_ticks(&mut state, &catalog, hold(Left, Down), 17);
    let events = run_ticks(&mut state, &catalog, hold(Center, Center), 1);
    assert!(events.contains(&SkateEvent::Flight(FlightEvent::GrindWindowOpened)));
    assert!(state.grind_window_fraction().is_some());

    // Hold Nose Grind (Left, Left) through the 150ms dwell to commit.
    let events = run_until(&mut state, &catalog, hold(Left, Left), 20, |e| {
        e.contains(&SkateEvent::Flight(FlightEvent::GrindStarted(GrindTrick::NoseGrind)))
    });
    assert!(state.phase().is_grinding());
    assert_eq!(state.phase().grind_trick(), Some(GrindTrick::NoseGrind));
    assert!(!events
        .iter()
        .any(|e| matches!(e, SkateEvent::Flight(FlightEvent::Landed { .. }))));

    // Ride to the end of the rail; the exit lands on the success branch
    // and counts as a grind landing.
    let events = run_until(&mut state, &catalog, hold(Left, Left), 2000, |e| {
        e.iter()
            .any(|event| matches!(event, SkateEvent::Flight(FlightEvent::GrindEnded { .. })))
    });
    assert!(events.contains(&SkateEvent::Flight(FlightEvent::GrindEnded {
        trick: GrindTrick::NoseGrind,
        exit: GrindExit::RailEnd,
    })));
    assert!(events.contains(&SkateEvent::Flight(FlightEvent::Landed {
        caught: true,
        from_grind: true,
    })));
    assert!(state.phase().is_grounded());
    assert_eq!(state.landing_feedback(), Some(true));
}
