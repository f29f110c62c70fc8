//! Projectile spawning and flight
//!
//! A projectile flies in a straight line from the bottom-centre of the frame
//! to where its target was when it was fired. It is never retargeted.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::lerp;
use crate::settings::MotionModel;

/// An in-flight (or just-landed) shot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    /// Track that was fired at
    pub track_id: u32,
    pub origin: Vec2,
    pub target: Vec2,
    /// 0 at spawn, 1 on arrival; frozen once hit
    pub progress: f32,
    /// Current interpolated position
    pub pos: Vec2,
    pub spawned_ms: u64,
    /// Set exactly once, when the projectile first reaches its target
    pub hit_ms: Option<u64>,
}

impl Projectile {
    pub fn is_hit(&self) -> bool {
        self.hit_ms.is_some()
    }

    pub fn has_arrived(&self) -> bool {
        self.progress >= 1.0
    }

    /// Move progress forward; never backward, never past 1
    fn set_progress(&mut self, progress: f32) {
        self.progress = progress.clamp(self.progress, 1.0);
        self.pos = lerp(self.origin, self.target, self.progress);
    }
}

/// Spawns and advances projectiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileSimulator {
    pub motion: MotionModel,
    /// Added to the target point at spawn (aim at the head, not the torso)
    pub aim_offset: Vec2,
    next_id: u32,
}

impl ProjectileSimulator {
    pub fn new(motion: MotionModel, aim_offset: Vec2) -> Self {
        Self {
            motion,
            aim_offset,
            next_id: 1,
        }
    }

    /// Create a projectile from `origin` aimed at `target` (plus aim offset)
    pub fn spawn(&mut self, origin: Vec2, target: Vec2, track_id: u32, now_ms: u64) -> Projectile {
        let id = self.next_id;
        self.next_id += 1;
        Projectile {
            id,
            track_id,
            origin,
            target: target + self.aim_offset,
            progress: 0.0,
            pos: origin,
            spawned_ms: now_ms,
            hit_ms: None,
        }
    }

    /// Advance every unresolved projectile by one frame
    pub fn advance(&self, projectiles: &mut [Projectile], now_ms: u64) {
        for p in projectiles.iter_mut().filter(|p| !p.is_hit()) {
            let progress = match self.motion {
                MotionModel::PerFrame { increment } => p.progress + increment,
                MotionModel::Timed { flight_ms } => {
                    // Backward clock leaves progress where it was
                    let elapsed = now_ms.saturating_sub(p.spawned_ms);
                    elapsed as f32 / flight_ms.max(1) as f32
                }
            };
            p.set_progress(progress);
        }
    }
}
