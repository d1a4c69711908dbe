use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::tricks::{Trick, TrickMeta};

/// Frame interval before the spin-class multiplier is applied.
pub const BASE_FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// Frame counter for the active trick's flip animation.
///
/// Lives from trick start until the grind commits or the skater lands; the
/// death effect keeps it advancing, a successful catch freezes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationState {
    trick: Trick,
    frame: u32,
    frame_timer: Duration,
    completed: bool,
}

impl AnimationState {
    pub fn start(trick: Trick) -> Self {
        Self {
            trick,
            frame: 0,
            frame_timer: Duration::ZERO,
            completed: false,
        }
    }

    pub fn trick(&self) -> Trick {
        self.trick
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    /// The sheet frame behind the current logical frame.
    pub fn sheet_frame(&self, meta: &TrickMeta) -> u32 {
        self.frame * meta.frame_step
    }

    /// Freezes the animation; a successful catch stops the board spinning
    /// immediately. Latched until a new trick starts.
    pub fn mark_completed(&mut self) {
        self.completed = true;
    }

    pub fn advance(&mut self, meta: &TrickMeta, dt: Duration) {
        if self.completed || meta.frames == 0 {
            return;
        }

        let interval = Duration::from_secs_f64(
            BASE_FRAME_INTERVAL.as_secs_f64() / meta.class.speed_multiplier() as f64,
        );
        self.frame_timer = self.frame_timer.saturating_add(dt);

        while self.frame_timer >= interval {
            self.frame_timer -= interval;
            self.frame += 1;
            if self.frame >= meta.frames {
                if meta.looping {
                    self.frame = 0;
                } else {
                    self.frame = meta.frames - 1;
                    self.completed = true;
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hands::HandRegion;
    use crate::tricks::SpinClass;

    const MS: fn(u64) -> Duration = Duration::from_millis;

    fn meta(frames: u32, class: SpinClass, looping: bool) -> TrickMeta {
        TrickMeta {
            combination: (HandRegion::Center, HandRegion::Center),
            class,
            frames,
            frames_per_row: 5,
            frame_step: 1,
            looping,
            halfway_landing: false,
        }
    }

    #[test]
    fn shuv_class_advances_once_per_base_interval() {
        let meta = meta(12, SpinClass::Shuv, true);
        let mut anim = AnimationState::start(Trick::BsShuvIt);
        anim.advance(&meta, MS(49));
        assert_eq!(anim.frame(), 0);
        anim.advance(&meta, MS(1));
        assert_eq!(anim.frame(), 1);
    }

    #[test]
    fn flip_class_advances_faster() {
        // 50ms / 1.5 is about 33.3ms per frame, so 110ms crosses three frames.
        let meta = meta(24, SpinClass::Flip, true);
        let mut anim = AnimationState::start(Trick::Kickflip);
        anim.advance(&meta, MS(110));
        assert_eq!(anim.frame(), 3);
    }

    #[test]
    fn looping_animation_wraps_to_zero() {
        let meta = meta(4, SpinClass::Default, true);
        let mut anim = AnimationState::start(Trick::Kickflip);
        anim.advance(&meta, MS(200));
        assert_eq!(anim.frame(), 0);
        assert!(!anim.completed());
    }

    #[test]
    fn non_looping_animation_clamps_and_latches_completed() {
        let meta = meta(4, SpinClass::Default, false);
        let mut anim = AnimationState::start(Trick::Kickflip);
        anim.advance(&meta, MS(1000));
        assert_eq!(anim.frame(), 3);
        assert!(anim.completed());

        anim.advance(&meta, MS(1000));
        assert_eq!(anim.frame(), 3, "completed animation must not move");
    }

    #[test]
    fn mark_completed_freezes_a_looping_animation() {
        let meta = meta(12, SpinClass::Shuv, true);
        let mut anim = AnimationState::start(Trick::BsShuvIt);
        anim.advance(&meta, MS(150));
        let frozen = anim.frame();
        anim.mark_completed();
        anim.advance(&meta, MS(500));
        assert_eq!(anim.frame(), frozen);
    }

    #[test]
    fn sheet_frame_applies_frame_step() {
        let meta = TrickMeta {
            frame_step: 2,
            ..meta(12, SpinClass::Shuv, true)
        };
        let mut anim = AnimationState::start(Trick::BsShuvIt);
        anim.advance(&meta, MS(250));
        assert_eq!(anim.frame(), 5);
        assert_eq!(anim.sheet_frame(&meta), 10);
    }
}
