//! Headless harness plumbing: a pure `GameLogic` wrapper around the
//! simulation so tests and the regression suite can step it frame by frame.

use std::time::Duration;

use engine::GameLogic;

use crate::hands::{HandKeys, HandRegion};
use crate::state::{SkaterState, TickInput};
use crate::tricks::{CatalogError, TrickCatalog};

/// Fixed timestep used by scripted runs; 60 Hz.
pub const SCRIPT_TICK: Duration = Duration::from_micros(16_667);

/// Canonical key state producing a given region (the mapper is many-to-one;
/// this picks the single-key representative).
pub fn keys_for(region: HandRegion) -> HandKeys {
    match region {
        HandRegion::Center => HandKeys::NONE,
        HandRegion::Up => HandKeys {
            up: true,
            ..HandKeys::NONE
        },
        HandRegion::Down => HandKeys {
            down: true,
            ..HandKeys::NONE
        },
        HandRegion::Left => HandKeys {
            left: true,
            ..HandKeys::NONE
        },
        HandRegion::Right => HandKeys {
            right: true,
            ..HandKeys::NONE
        },
    }
}

/// One scripted tick holding the given regions.
pub fn hold(left: HandRegion, right: HandRegion) -> TickInput {
    TickInput {
        left: keys_for(left),
        right: keys_for(right),
        dt: SCRIPT_TICK,
    }
}

pub struct SkateLogic {
    catalog: TrickCatalog,
    view_width: f32,
    view_height: f32,
    seed: u64,
}

impl SkateLogic {
    pub fn new(seed: u64) -> Result<Self, CatalogError> {
        Ok(Self {
            catalog: TrickCatalog::new()?,
            view_width: 1920.0,
            view_height: 1080.0,
            seed,
        })
    }

    pub fn catalog(&self) -> &TrickCatalog {
        &self.catalog
    }
}

impl GameLogic for SkateLogic {
    type State = SkaterState;
    type Input = TickInput;

    fn initial_state(&self) -> SkaterState {
        SkaterState::new(self.view_width, self.view_height, self.seed)
    }

    fn step(&self, state: &SkaterState, input: TickInput) -> SkaterState {
        let mut next = state.clone();
        next.tick(input, &self.catalog);
        next
    }
}
