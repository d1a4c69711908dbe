use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hands::{Combination, HandRegion};

/// Spin class decides animation speed and which sheet frames are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinClass {
    Shuv,
    Flip,
    Varial,
    Default,
}

impl SpinClass {
    /// Divides the base frame interval; flips and varials rotate faster.
    pub fn speed_multiplier(self) -> f32 {
        match self {
            SpinClass::Shuv => 1.0,
            SpinClass::Flip => 1.5,
            SpinClass::Varial => 1.5,
            SpinClass::Default => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trick {
    BsShuvIt,
    FsShuvIt,
    NollieBsShuvIt,
    NollieFsShuvIt,
    Kickflip,
    Heelflip,
    NollieKickflip,
    NollieHeelflip,
    VarialKickflip,
    VarialHeelflip,
    InwardHeelflip,
    Hardflip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrindTrick {
    NoseGrind,
    FiveOGrind,
    Tailslide,
    Noseslide,
    CrookedGrind,
    OvercrookedGrind,
    SmithGrind,
    FeebleGrind,
    FsBoardslide,
    BsBoardslide,
    FiftyFifty,
    SaladGrind,
    SuskiGrind,
}

/// Static per-trick animation metadata.
///
/// `frames` counts the logical frames the player sees; `frame_step` maps a
/// logical frame to its sheet frame (shuv/flip sheets are sampled every other
/// frame to get 30-degree steps out of 15-degree assets, and their `frames`
/// value is already the halved, round-up count).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrickMeta {
    pub combination: Combination,
    pub class: SpinClass,
    pub frames: u32,
    pub frames_per_row: u32,
    pub frame_step: u32,
    pub looping: bool,
    pub halfway_landing: bool,
}

// The sheets are 15-degree full rotations: 24 frames, 5 per row.
const SHEET_FRAMES: u32 = 24;
const SHEET_FRAMES_PER_ROW: u32 = 5;
const HALVED_FRAMES: u32 = SHEET_FRAMES.div_ceil(2);

const fn aerial_meta(
    combination: Combination,
    class: SpinClass,
    halfway_landing: bool,
) -> TrickMeta {
    let (frames, frame_step) = match class {
        SpinClass::Shuv | SpinClass::Flip => (HALVED_FRAMES, 2),
        SpinClass::Varial | SpinClass::Default => (SHEET_FRAMES, 1),
    };
    TrickMeta {
        combination,
        class,
        frames,
        frames_per_row: SHEET_FRAMES_PER_ROW,
        frame_step,
        looping: true,
        halfway_landing,
    }
}

impl Trick {
    pub const ALL: [Trick; 12] = [
        Trick::BsShuvIt,
        Trick::FsShuvIt,
        Trick::NollieBsShuvIt,
        Trick::NollieFsShuvIt,
        Trick::Kickflip,
        Trick::Heelflip,
        Trick::NollieKickflip,
        Trick::NollieHeelflip,
        Trick::VarialKickflip,
        Trick::VarialHeelflip,
        Trick::InwardHeelflip,
        Trick::Hardflip,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Trick::BsShuvIt => "BS-Shuv-It",
            Trick::FsShuvIt => "FS-Shuv-It",
            Trick::NollieBsShuvIt => "Nollie BS-Shuv-It",
            Trick::NollieFsShuvIt => "Nollie FS-Shuv-It",
            Trick::Kickflip => "Kickflip",
            Trick::Heelflip => "Heelflip",
            Trick::NollieKickflip => "Nollie Kickflip",
            Trick::NollieHeelflip => "Nollie Heelflip",
            Trick::VarialKickflip => "Varial Kickflip",
            Trick::VarialHeelflip => "Varial Heelflip",
            Trick::InwardHeelflip => "Inward Heelflip",
            Trick::Hardflip => "Hardflip",
        }
    }

    pub fn meta(self) -> TrickMeta {
        use HandRegion::*;
        match self {
            Trick::BsShuvIt => aerial_meta((Down, Center), SpinClass::Shuv, false),
            Trick::FsShuvIt => aerial_meta((Up, Center), SpinClass::Shuv, false),
            Trick::NollieBsShuvIt => aerial_meta((Center, Down), SpinClass::Shuv, false),
            Trick::NollieFsShuvIt => aerial_meta((Center, Up), SpinClass::Shuv, false),
            Trick::Kickflip => aerial_meta((Left, Down), SpinClass::Flip, false),
            Trick::Heelflip => aerial_meta((Left, Up), SpinClass::Flip, false),
            Trick::NollieKickflip => aerial_meta((Down, Right), SpinClass::Flip, false),
            Trick::NollieHeelflip => aerial_meta((Up, Right), SpinClass::Flip, false),
            Trick::VarialKickflip => aerial_meta((Down, Down), SpinClass::Varial, true),
            Trick::VarialHeelflip => aerial_meta((Up, Up), SpinClass::Varial, true),
            Trick::InwardHeelflip => aerial_meta((Down, Up), SpinClass::Varial, true),
            Trick::Hardflip => aerial_meta((Up, Down), SpinClass::Varial, true),
        }
    }
}

impl fmt::Display for Trick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl GrindTrick {
    pub const ALL: [GrindTrick; 13] = [
        GrindTrick::NoseGrind,
        GrindTrick::FiveOGrind,
        GrindTrick::Tailslide,
        GrindTrick::Noseslide,
        GrindTrick::CrookedGrind,
        GrindTrick::OvercrookedGrind,
        GrindTrick::SmithGrind,
        GrindTrick::FeebleGrind,
        GrindTrick::FsBoardslide,
        GrindTrick::BsBoardslide,
        GrindTrick::FiftyFifty,
        GrindTrick::SaladGrind,
        GrindTrick::SuskiGrind,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GrindTrick::NoseGrind => "Nose Grind",
            GrindTrick::FiveOGrind => "5-0 Grind",
            GrindTrick::Tailslide => "Tailslide",
            GrindTrick::Noseslide => "Noseslide",
            GrindTrick::CrookedGrind => "Crooked Grind",
            GrindTrick::OvercrookedGrind => "Overcrooked Grind",
            GrindTrick::SmithGrind => "Smith Grind",
            GrindTrick::FeebleGrind => "Feeble Grind",
            GrindTrick::FsBoardslide => "Frontside Boardslide",
            GrindTrick::BsBoardslide => "Backside Boardslide",
            GrindTrick::FiftyFifty => "50-50 Grind",
            GrindTrick::SaladGrind => "Salad Grind",
            GrindTrick::SuskiGrind => "Suski Grind",
        }
    }

    pub fn combination(self) -> Combination {
        use HandRegion::*;
        match self {
            GrindTrick::NoseGrind => (Left, Left),
            GrindTrick::FiveOGrind => (Right, Right),
            GrindTrick::Tailslide => (Up, Up),
            GrindTrick::Noseslide => (Down, Down),
            GrindTrick::CrookedGrind => (Down, Right),
            GrindTrick::OvercrookedGrind => (Up, Right),
            GrindTrick::SmithGrind => (Left, Down),
            GrindTrick::FeebleGrind => (Left, Up),
            GrindTrick::FsBoardslide => (Down, Up),
            GrindTrick::BsBoardslide => (Up, Down),
            GrindTrick::FiftyFifty => (Right, Left),
            GrindTrick::SaladGrind => (Right, Up),
            GrindTrick::SuskiGrind => (Right, Down),
        }
    }
}

impl fmt::Display for GrindTrick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    DuplicateAerialBinding(Combination),
    DuplicateGrindBinding(Combination),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::DuplicateAerialBinding(combo) => {
                write!(f, "two aerial tricks share the combination {combo:?}")
            }
            CatalogError::DuplicateGrindBinding(combo) => {
                write!(f, "two grind tricks share the combination {combo:?}")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// Combination → trick lookup tables, validated once at startup.
///
/// Aerial and grind combinations live in disjoint namespaces; a duplicate
/// inside either namespace is a configuration error and aborts construction.
#[derive(Debug, Clone)]
pub struct TrickCatalog {
    aerial: HashMap<Combination, Trick>,
    grind: HashMap<Combination, GrindTrick>,
}

impl TrickCatalog {
    pub fn new() -> Result<Self, CatalogError> {
        let mut aerial = HashMap::new();
        for trick in Trick::ALL {
            let combo = trick.meta().combination;
            if aerial.insert(combo, trick).is_some() {
                return Err(CatalogError::DuplicateAerialBinding(combo));
            }
        }

        let mut grind = HashMap::new();
        for trick in GrindTrick::ALL {
            let combo = trick.combination();
            if grind.insert(combo, trick).is_some() {
                return Err(CatalogError::DuplicateGrindBinding(combo));
            }
        }

        Ok(Self { aerial, grind })
    }

    pub fn lookup_aerial(&self, combo: Combination) -> Option<Trick> {
        self.aerial.get(&combo).copied()
    }

    pub fn lookup_grind(&self, combo: Combination) -> Option<GrindTrick> {
        self.grind.get(&combo).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_constructs_with_unique_bindings() {
        let catalog = TrickCatalog::new().unwrap();
        assert_eq!(
            catalog.lookup_aerial((HandRegion::Left, HandRegion::Down)),
            Some(Trick::Kickflip)
        );
        assert_eq!(
            catalog.lookup_grind((HandRegion::Left, HandRegion::Left)),
            Some(GrindTrick::NoseGrind)
        );
        assert_eq!(catalog.lookup_aerial((HandRegion::Center, HandRegion::Center)), None);
    }

    #[test]
    fn aerial_and_grind_namespaces_may_overlap() {
        // (Down, Down) is Varial Kickflip in the air and Noseslide on a rail.
        let catalog = TrickCatalog::new().unwrap();
        let combo = (HandRegion::Down, HandRegion::Down);
        assert_eq!(catalog.lookup_aerial(combo), Some(Trick::VarialKickflip));
        assert_eq!(catalog.lookup_grind(combo), Some(GrindTrick::Noseslide));
    }

    #[test]
    fn shuv_and_flip_frame_counts_are_halved_with_step_two() {
        let meta = Trick::Kickflip.meta();
        assert_eq!(meta.frames, 12);
        assert_eq!(meta.frame_step, 2);
        assert!(meta.looping);

        let meta = Trick::VarialKickflip.meta();
        assert_eq!(meta.frames, 24);
        assert_eq!(meta.frame_step, 1);
        assert!(meta.halfway_landing);
    }

    #[test]
    fn halfway_landing_is_limited_to_the_varial_family() {
        let eligible: Vec<Trick> = Trick::ALL
            .into_iter()
            .filter(|t| t.meta().halfway_landing)
            .collect();
        assert_eq!(
            eligible,
            vec![
                Trick::VarialKickflip,
                Trick::VarialHeelflip,
                Trick::InwardHeelflip,
                Trick::Hardflip
            ]
        );
    }
}
