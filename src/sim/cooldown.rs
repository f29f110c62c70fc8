//! Per-target fire-rate gating

use serde::{Deserialize, Serialize};

use super::tracker::Track;
use crate::elapsed_ms;

/// Whether `track` may fire at `now_ms`.
///
/// A track that has never fired always may. Otherwise strictly more than
/// `cooldown_ms` must have passed; a last-fire time in the future (clock went
/// backward) is treated as not yet eligible.
pub fn can_fire(track: &Track, now_ms: u64, cooldown_ms: u64) -> bool {
    match track.last_fire_ms {
        None => true,
        Some(last) => elapsed_ms(now_ms, last).is_some_and(|dt| dt > cooldown_ms),
    }
}

/// Cooldown check bundled with its bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownGate {
    pub cooldown_ms: u64,
}

impl CooldownGate {
    pub fn new(cooldown_ms: u64) -> Self {
        Self { cooldown_ms }
    }

    pub fn can_fire(&self, track: &Track, now_ms: u64) -> bool {
        can_fire(track, now_ms, self.cooldown_ms)
    }

    /// Approve and stamp the track in one step
    pub fn try_fire(&self, track: &mut Track, now_ms: u64) -> bool {
        if self.can_fire(track, now_ms) {
            track.last_fire_ms = Some(now_ms);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn track(last_fire_ms: Option<u64>) -> Track {
        Track {
            id: 1,
            pos: Vec2::new(100.0, 100.0),
            last_update_ms: 0,
            last_fire_ms,
        }
    }

    #[test]
    fn test_never_fired_is_eligible() {
        assert!(can_fire(&track(None), 0, 2000));
    }

    #[test]
    fn test_cooldown_window() {
        let gate = CooldownGate::new(2000);
        let mut t = track(None);
        assert!(gate.try_fire(&mut t, 0));
        assert!(!gate.try_fire(&mut t, 1000));
        // Strictly greater than the cooldown
        assert!(!gate.try_fire(&mut t, 2000));
        assert!(gate.try_fire(&mut t, 2001));
        assert_eq!(t.last_fire_ms, Some(2001));
    }

    #[test]
    fn test_denied_fire_does_not_stamp() {
        let gate = CooldownGate::new(2000);
        let mut t = track(Some(500));
        assert!(!gate.try_fire(&mut t, 1000));
        assert_eq!(t.last_fire_ms, Some(500));
    }

    #[test]
    fn test_backward_clock_not_eligible() {
        assert!(!can_fire(&track(Some(10_000)), 5_000, 2000));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn never_approves_inside_window(last in 0u64..1_000_000, dt in 0u64..=2000) {
                prop_assert!(!can_fire(&track(Some(last)), last + dt, 2000));
            }

            #[test]
            fn always_approves_after_window(last in 0u64..1_000_000, dt in 2001u64..100_000) {
                prop_assert!(can_fire(&track(Some(last)), last + dt, 2000));
            }
        }
    }
}
