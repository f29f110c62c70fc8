//! Score counter and session timer

use serde::{Deserialize, Serialize};

/// Running score plus the countdown clock for the session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreKeeper {
    score: u32,
    remaining_secs: u32,
    /// Latched once the timer has reported expiry
    expired: bool,
}

impl ScoreKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self) {
        self.add(1);
    }

    pub fn add(&mut self, hits: u32) {
        self.score = self.score.saturating_add(hits);
    }

    /// Zero the score and the timer
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn value(&self) -> u32 {
        self.score
    }

    /// Arm the timer for a new session
    pub fn start_timer(&mut self, secs: u32) {
        self.remaining_secs = secs;
        self.expired = false;
    }

    /// One second elapsed. Returns true exactly once, on the tick that
    /// reaches zero.
    pub fn tick(&mut self) -> bool {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 && !self.expired {
            self.expired = true;
            return true;
        }
        false
    }

    pub fn remaining(&self) -> u32 {
        self.remaining_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_and_reset() {
        let mut keeper = ScoreKeeper::new();
        keeper.increment();
        keeper.add(2);
        assert_eq!(keeper.value(), 3);
        keeper.start_timer(30);
        keeper.reset();
        assert_eq!(keeper.value(), 0);
        assert_eq!(keeper.remaining(), 0);
    }

    #[test]
    fn test_timer_expires_once() {
        let mut keeper = ScoreKeeper::new();
        keeper.start_timer(3);
        assert!(!keeper.tick());
        assert!(!keeper.tick());
        assert!(keeper.tick());
        assert_eq!(keeper.remaining(), 0);
        // Clamped, and silent after the first expiry
        assert!(!keeper.tick());
        assert_eq!(keeper.remaining(), 0);
    }

    #[test]
    fn test_restart_rearms_expiry() {
        let mut keeper = ScoreKeeper::new();
        keeper.start_timer(1);
        assert!(keeper.tick());
        keeper.start_timer(1);
        assert!(keeper.tick());
    }
}
