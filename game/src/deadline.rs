use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A polling timer armed against the simulation clock.
///
/// Every timed window in the game (trick hold, catch window, grind window,
/// grind minimum duration, death effect, rail spawn cadence) compares the
/// current simulation time against one of these instead of carrying ad hoc
/// start/duration pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    armed_at: Duration,
    duration: Duration,
}

impl Deadline {
    pub fn arm(now: Duration, duration: Duration) -> Self {
        Self {
            armed_at: now,
            duration,
        }
    }

    pub fn armed_at(&self) -> Duration {
        self.armed_at
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.armed_at)
    }

    pub fn remaining(&self, now: Duration) -> Duration {
        self.duration.saturating_sub(self.elapsed(now))
    }

    pub fn is_expired(&self, now: Duration) -> bool {
        self.elapsed(now) >= self.duration
    }

    /// Fraction of the duration consumed, clamped to [0, 1].
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed(now).as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Re-arms at `now` keeping the same duration.
    pub fn rearm(&mut self, now: Duration) {
        self.armed_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: fn(u64) -> Duration = Duration::from_millis;

    #[test]
    fn deadline_expires_at_or_past_duration() {
        let d = Deadline::arm(MS(100), MS(200));
        assert!(!d.is_expired(MS(100)));
        assert!(!d.is_expired(MS(299)));
        assert!(d.is_expired(MS(300)));
        assert!(d.is_expired(MS(900)));
    }

    #[test]
    fn remaining_and_progress_track_elapsed() {
        let d = Deadline::arm(MS(0), MS(400));
        assert_eq!(d.remaining(MS(100)), MS(300));
        assert!((d.progress(MS(100)) - 0.25).abs() < 1e-6);
        assert_eq!(d.remaining(MS(1000)), Duration::ZERO);
        assert_eq!(d.progress(MS(1000)), 1.0);
    }

    #[test]
    fn rearm_restarts_the_window() {
        let mut d = Deadline::arm(MS(0), MS(150));
        assert!(d.is_expired(MS(150)));
        d.rearm(MS(150));
        assert!(!d.is_expired(MS(250)));
        assert!(d.is_expired(MS(300)));
    }

    #[test]
    fn clock_before_armed_at_reads_as_zero_elapsed() {
        let d = Deadline::arm(MS(500), MS(100));
        assert_eq!(d.elapsed(MS(400)), Duration::ZERO);
        assert_eq!(d.remaining(MS(400)), MS(100));
    }
}
