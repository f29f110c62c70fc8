//! Hit resolution
//!
//! A projectile scores at most once: the first resolve pass that sees it at
//! its target stamps `hit_ms`, and from then on it is only waiting out the
//! linger window so the host can keep drawing it.

use serde::{Deserialize, Serialize};

use super::projectile::Projectile;
use crate::elapsed_ms;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionResolver {
    /// How long a hit projectile stays in the active set (ms)
    pub linger_ms: u64,
}

impl CollisionResolver {
    pub fn new(linger_ms: u64) -> Self {
        Self { linger_ms }
    }

    /// Stamp newly-arrived projectiles; returns how many hit this call
    pub fn resolve(&self, projectiles: &mut [Projectile], now_ms: u64) -> u32 {
        self.resolve_with(projectiles, now_ms, |_| {})
    }

    /// Like `resolve`, calling `on_hit` for each projectile that just landed
    pub fn resolve_with(
        &self,
        projectiles: &mut [Projectile],
        now_ms: u64,
        mut on_hit: impl FnMut(&Projectile),
    ) -> u32 {
        let mut hits = 0;
        for p in projectiles.iter_mut() {
            if p.has_arrived() && !p.is_hit() {
                p.hit_ms = Some(now_ms);
                hits += 1;
                log::debug!("Projectile {} hit track {}", p.id, p.track_id);
                on_hit(p);
            }
        }
        hits
    }

    /// Whether a hit projectile has finished lingering
    pub fn is_expired(&self, projectile: &Projectile, now_ms: u64) -> bool {
        projectile
            .hit_ms
            .and_then(|hit| elapsed_ms(now_ms, hit))
            .is_some_and(|dt| dt > self.linger_ms)
    }

    /// Drop projectiles whose linger window has passed; returns how many
    pub fn sweep(&self, projectiles: &mut Vec<Projectile>, now_ms: u64) -> usize {
        let before = projectiles.len();
        projectiles.retain(|p| !self.is_expired(p, now_ms));
        before - projectiles.len()
    }
}
