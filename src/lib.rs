//! Pose Blaster - a camera-driven reaction game core
//!
//! A host feeds per-frame person detections in; the core tracks each person,
//! fires a projectile at them on a per-target cooldown, scores hits, and runs
//! the Idle → Countdown → Running → Ended session loop.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tracking, projectiles, hits, phases)
//! - `clock`: Monotonic time sources
//! - `settings`: Data-driven game configuration
//! - `demo`: Synthetic detection source and logging sink for headless runs

pub mod clock;
pub mod demo;
pub mod settings;
pub mod sim;

pub use clock::{Clock, ManualClock, SystemClock};
pub use settings::{ConfigError, GameConfig, MotionModel};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Landmarks at or below this confidence are ignored for the anchor
    pub const LANDMARK_CONFIDENCE: f32 = 0.5;
    /// Max anchor distance for a detection to keep an existing track
    pub const MATCH_RADIUS: f32 = 100.0;
    /// Tracks not seen for this long are dropped (ms)
    pub const STALE_AFTER_MS: u64 = 3000;

    /// Per-target cooldown between shots (ms)
    pub const COOLDOWN_MS: u64 = 2000;

    /// Countdown ticks before the session starts (one per second)
    pub const COUNTDOWN_TICKS: u32 = 3;
    /// Session length (seconds)
    pub const SESSION_SECS: u32 = 30;

    /// Progress added per frame in per-frame motion mode
    pub const PROGRESS_PER_FRAME: f32 = 0.05;
    /// Flight time in timed motion mode (20 frames at 60 Hz)
    pub const FLIGHT_MS: u64 = 333;
    /// Aim this far above the anchor (screen y grows downward)
    pub const AIM_OFFSET_Y: f32 = -80.0;

    /// Hit projectiles stay visible this long (ms)
    pub const LINGER_MS: u64 = 1000;
    /// "Hit!" banner display time (ms)
    pub const BANNER_MS: u64 = 800;
}

/// Linear interpolation between two points, `t` in [0, 1]
#[inline]
pub fn lerp(from: Vec2, to: Vec2, t: f32) -> Vec2 {
    from * (1.0 - t) + to * t
}

/// Bottom-centre of a frame in screen coordinates (y grows downward)
#[inline]
pub fn bottom_center(frame_size: Vec2) -> Vec2 {
    Vec2::new(frame_size.x / 2.0, frame_size.y)
}

/// Milliseconds from `earlier` to `now`, or `None` if the clock went backward
#[inline]
pub fn elapsed_ms(now: u64, earlier: u64) -> Option<u64> {
    now.checked_sub(earlier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        let a = Vec2::new(320.0, 480.0);
        let b = Vec2::new(100.0, 20.0);
        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);
        assert_eq!(lerp(a, b, 0.5), Vec2::new(210.0, 250.0));
    }

    #[test]
    fn test_bottom_center() {
        assert_eq!(bottom_center(Vec2::new(640.0, 480.0)), Vec2::new(320.0, 480.0));
    }

    #[test]
    fn test_elapsed_backward_clock() {
        assert_eq!(elapsed_ms(1500, 1000), Some(500));
        assert_eq!(elapsed_ms(900, 1000), None);
    }
}
