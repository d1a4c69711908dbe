use std::time::Duration;

use game::hands::HandRegion::{Down, Left};
use game::playtest::hold;
use game::state::{SkaterState, TickInput};
use game::tricks::TrickCatalog;

fn catalog() -> TrickCatalog {
    TrickCatalog::new().expect("default catalog has no duplicate bindings")
}

#[test]
fn skater_state_round_trips_through_json() {
    let catalog = catalog();
    let mut state = SkaterState::new(1920.0, 1080.0, 11);
    state.set_angle(45.0, 120.0);

    // Advance into a mid-trick phase so a non-trivial machine is on the
    // wire, not just the initial state.
    for _ in 0..20 {
        state.tick(hold(Left, Down), &catalog);
    }
    assert!(state.phase().is_airborne());

    let json = serde_json::to_string(&state).expect("serialize skater state");
    let mut restored: SkaterState = serde_json::from_str(&json).expect("deserialize skater state");

    assert_eq!(restored.clock(), state.clock());
    assert_eq!(restored.phase(), state.phase());
    assert_eq!(restored.angle(), state.angle());
    assert_eq!(restored.skater_point(), state.skater_point());
    assert_eq!(restored.rails().rails(), state.rails().rails());

    // The restored copy keeps ticking exactly like the original.
    for _ in 0..50 {
        let a = state.tick(hold(Left, Down), &catalog);
        let b = restored.tick(hold(Left, Down), &catalog);
        assert_eq!(a, b);
    }
    assert_eq!(
        serde_json::to_string(&state).expect("serialize"),
        serde_json::to_string(&restored).expect("serialize")
    );
}

#[test]
fn feedback_expires_with_the_simulation_clock() {
    let catalog = catalog();
    let mut state = SkaterState::new(1920.0, 1080.0, 11);

    // Launch and let the catch window expire: negative catch feedback.
    for _ in 0..90 {
        state.tick(hold(Left, Down), &catalog);
        if state.catch_feedback().is_some() {
            break;
        }
    }
    assert_eq!(state.catch_feedback(), Some(false));

    // Catch feedback holds for 1.5s of simulation time, then clears.
    let idle = TickInput::idle(Duration::from_millis(100));
    for _ in 0..20 {
        state.tick(idle, &catalog);
    }
    assert_eq!(state.catch_feedback(), None);
    assert_eq!(state.landing_feedback(), None);
}
