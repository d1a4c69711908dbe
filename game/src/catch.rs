use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::deadline::Deadline;
use crate::hands::{Combination, CENTER_CENTER};

/// The catch window opens this long after the trick starts.
pub const CATCH_DELAY: Duration = Duration::from_millis(200);
/// How long the window stays open once it does.
pub const CATCH_DURATION: Duration = Duration::from_secs(1);

/// Frames that count as a perfect catch: the first up-to-5 and last 4 of the
/// animation, deduplicated. Deliberately generous.
pub fn perfect_frames(total_frames: u32) -> Vec<u32> {
    let mut frames: Vec<u32> = (0..total_frames.min(5)).collect();
    for frame in total_frames.saturating_sub(4)..total_frames {
        if !frames.contains(&frame) {
            frames.push(frame);
        }
    }
    frames
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatchResolution {
    /// Hands centered on a perfect frame.
    Caught,
    /// Hands centered on a non-perfect frame.
    MissedAttempt,
    /// The window closed without any attempt; forced miss.
    WindowExpired,
}

impl CatchResolution {
    pub fn is_success(self) -> bool {
        matches!(self, CatchResolution::Caught)
    }
}

/// Timing state for one trick's catch.
///
/// Created when the trick starts, resolved at most once, cleared at landing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatchState {
    window: Deadline,
    attempted: bool,
    success: bool,
    perfect: Vec<u32>,
}

impl CatchState {
    pub fn open_after_trick_start(trick_start: Duration, total_frames: u32) -> Self {
        Self {
            window: Deadline::arm(trick_start + CATCH_DELAY, CATCH_DURATION),
            attempted: false,
            success: false,
            perfect: perfect_frames(total_frames),
        }
    }

    pub fn attempted(&self) -> bool {
        self.attempted
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn perfect(&self) -> &[u32] {
        &self.perfect
    }

    pub fn is_open(&self, now: Duration) -> bool {
        now >= self.window.armed_at() && !self.window.is_expired(now)
    }

    /// Fraction of the window remaining, for HUD feedback; 1.0 before it
    /// opens, 0.0 after it closes.
    pub fn remaining_fraction(&self, now: Duration) -> f32 {
        1.0 - self.window.progress(now)
    }

    /// Polls the window. Returns a resolution at most once.
    pub fn tick(
        &mut self,
        now: Duration,
        hands: Combination,
        current_frame: u32,
    ) -> Option<CatchResolution> {
        if self.attempted {
            return None;
        }

        if self.is_open(now) {
            if hands == CENTER_CENTER {
                self.attempted = true;
                self.success = self.perfect.contains(&current_frame);
                return Some(if self.success {
                    CatchResolution::Caught
                } else {
                    CatchResolution::MissedAttempt
                });
            }
            return None;
        }

        if self.window.is_expired(now) {
            self.attempted = true;
            self.success = false;
            return Some(CatchResolution::WindowExpired);
        }

        // Window not open yet.
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hands::HandRegion::*;

    const MS: fn(u64) -> Duration = Duration::from_millis;

    #[test]
    fn perfect_set_for_ten_frames_is_first_five_and_last_four() {
        assert_eq!(perfect_frames(10), vec![0, 1, 2, 3, 4, 6, 7, 8, 9]);
    }

    #[test]
    fn perfect_set_deduplicates_short_animations() {
        assert_eq!(perfect_frames(3), vec![0, 1, 2]);
        assert_eq!(perfect_frames(6), vec![0, 1, 2, 3, 4, 5]);
        assert!(perfect_frames(1) == vec![0]);
    }

    #[test]
    fn centering_before_the_window_opens_does_nothing() {
        let mut catch = CatchState::open_after_trick_start(MS(0), 10);
        assert_eq!(catch.tick(MS(100), CENTER_CENTER, 2), None);
        assert!(!catch.attempted());
    }

    #[test]
    fn attempt_on_perfect_frame_succeeds() {
        let mut catch = CatchState::open_after_trick_start(MS(0), 10);
        // Held non-center through the open, then centered at 300ms on frame 2.
        assert_eq!(catch.tick(MS(250), (Left, Down), 1), None);
        assert_eq!(
            catch.tick(MS(300), CENTER_CENTER, 2),
            Some(CatchResolution::Caught)
        );
        assert!(catch.success());
    }

    #[test]
    fn attempt_on_non_perfect_frame_misses() {
        let mut catch = CatchState::open_after_trick_start(MS(0), 10);
        assert_eq!(
            catch.tick(MS(300), CENTER_CENTER, 5),
            Some(CatchResolution::MissedAttempt)
        );
        assert!(catch.attempted());
        assert!(!catch.success());
    }

    #[test]
    fn expiry_without_attempt_forces_a_miss() {
        let mut catch = CatchState::open_after_trick_start(MS(0), 10);
        assert_eq!(catch.tick(MS(900), (Left, Down), 3), None);
        assert_eq!(
            catch.tick(MS(1200), (Left, Down), 3),
            Some(CatchResolution::WindowExpired)
        );
    }

    #[test]
    fn resolution_is_one_shot() {
        let mut catch = CatchState::open_after_trick_start(MS(0), 10);
        assert!(catch.tick(MS(300), CENTER_CENTER, 2).is_some());
        assert_eq!(catch.tick(MS(310), CENTER_CENTER, 2), None);
        assert_eq!(catch.tick(MS(2000), CENTER_CENTER, 2), None);
    }
}
