use serde::{Deserialize, Serialize};

/// Symbolic position of one hand's 4-key directional cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandRegion {
    Center,
    Up,
    Down,
    Left,
    Right,
}

impl HandRegion {
    pub fn is_center(self) -> bool {
        self == HandRegion::Center
    }
}

/// The pair (left hand, right hand) is the input symbol every trick lookup
/// keys on.
pub type Combination = (HandRegion, HandRegion);

pub const CENTER_CENTER: Combination = (HandRegion::Center, HandRegion::Center);

/// Raw key-state of one hand's directional cluster for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandKeys {
    pub up: bool,
    pub left: bool,
    pub down: bool,
    pub right: bool,
}

impl HandKeys {
    pub const NONE: HandKeys = HandKeys {
        up: false,
        left: false,
        down: false,
        right: false,
    };

    /// Collapses the four booleans into a region.
    ///
    /// The priority table is asymmetric on purpose: down+left resolves to
    /// Left while down+right resolves to Down. Gameplay was tuned against
    /// this table, so it must not be "fixed".
    pub fn region(self) -> HandRegion {
        if self.up && (self.left || self.right) {
            HandRegion::Up
        } else if self.up {
            HandRegion::Up
        } else if self.down && self.left {
            HandRegion::Left
        } else if self.down && self.right {
            HandRegion::Down
        } else if self.down {
            HandRegion::Down
        } else if self.left {
            HandRegion::Left
        } else if self.right {
            HandRegion::Right
        } else {
            HandRegion::Center
        }
    }
}

pub fn combination(left: HandKeys, right: HandKeys) -> Combination {
    (left.region(), right.region())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(up: bool, left: bool, down: bool, right: bool) -> HandKeys {
        HandKeys { up, left, down, right }
    }

    #[test]
    fn all_sixteen_key_states_map_per_priority_table() {
        use HandRegion::*;
        // (up, left, down, right) -> region, enumerated exhaustively.
        let table = [
            (keys(false, false, false, false), Center),
            (keys(false, false, false, true), Right),
            (keys(false, false, true, false), Down),
            (keys(false, false, true, true), Down),
            (keys(false, true, false, false), Left),
            (keys(false, true, false, true), Left),
            (keys(false, true, true, false), Left),
            (keys(false, true, true, true), Left),
            (keys(true, false, false, false), Up),
            (keys(true, false, false, true), Up),
            (keys(true, false, true, false), Up),
            (keys(true, false, true, true), Up),
            (keys(true, true, false, false), Up),
            (keys(true, true, false, true), Up),
            (keys(true, true, true, false), Up),
            (keys(true, true, true, true), Up),
        ];
        for (input, expected) in table {
            assert_eq!(input.region(), expected, "input: {input:?}");
        }
    }

    #[test]
    fn down_left_and_down_right_resolve_asymmetrically() {
        // Known asymmetry in the shipped tuning: down+left yields Left but
        // down+right yields Down.
        assert_eq!(keys(false, true, true, false).region(), HandRegion::Left);
        assert_eq!(keys(false, false, true, true).region(), HandRegion::Down);
    }
}
