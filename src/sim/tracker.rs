//! Target tracking across frames
//!
//! Each frame's detections arrive unordered and anonymous. The tracker gives
//! them stable identities by greedy nearest-neighbour matching against last
//! frame's tracks, so per-target state (the fire cooldown) survives from one
//! frame to the next.
//!
//! Matching is per detection, nearest track within `match_radius`, in input
//! order. It is not a global assignment: two detections inside the same
//! radius both land on one track.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::detection::Subject;
use crate::elapsed_ms;

/// Stable identity for one tracked person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: u32,
    /// Anchor position from the latest matching detection
    pub pos: Vec2,
    pub last_update_ms: u64,
    /// `None` until the track has been fired at
    pub last_fire_ms: Option<u64>,
}

impl Track {
    fn new(id: u32, pos: Vec2, now_ms: u64) -> Self {
        Self {
            id,
            pos,
            last_update_ms: now_ms,
            last_fire_ms: None,
        }
    }

    /// True once the track has gone unseen for longer than `stale_after_ms`.
    /// A timestamp from the future (clock went backward) is never stale.
    pub fn is_stale(&self, now_ms: u64, stale_after_ms: u64) -> bool {
        elapsed_ms(now_ms, self.last_update_ms).is_some_and(|age| age > stale_after_ms)
    }
}

/// What happened to the track set during one update
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Association {
    /// Tracks seen this frame (existing and new), in detection order, deduplicated
    pub seen: Vec<u32>,
    /// Tracks created this frame
    pub born: Vec<u32>,
    /// Tracks dropped as stale this frame
    pub pruned: Vec<u32>,
}

/// Owns the track set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetTracker {
    pub match_radius: f32,
    pub stale_after_ms: u64,
    pub landmark_confidence: f32,
    pub min_subject_confidence: f32,
    tracks: Vec<Track>,
    next_id: u32,
}

impl TargetTracker {
    pub fn new(match_radius: f32, stale_after_ms: u64, landmark_confidence: f32) -> Self {
        Self {
            match_radius,
            stale_after_ms,
            landmark_confidence,
            min_subject_confidence: 0.0,
            tracks: Vec::new(),
            next_id: 1,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, id: u32) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == id)
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Fold one frame's detections into the track set
    pub fn update<S: Subject>(&mut self, subjects: &[S], now_ms: u64) -> Association {
        let mut assoc = Association::default();

        // Prune first so a long-gone track can't be revived by a newcomer
        let stale_after_ms = self.stale_after_ms;
        self.tracks.retain(|t| {
            let stale = t.is_stale(now_ms, stale_after_ms);
            if stale {
                assoc.pruned.push(t.id);
            }
            !stale
        });
        for id in &assoc.pruned {
            log::debug!("Track {} pruned", id);
        }

        for subject in subjects {
            if subject.confidence() < self.min_subject_confidence {
                continue;
            }
            let Some(anchor) = subject.anchor(self.landmark_confidence) else {
                continue;
            };

            let id = match self.nearest_within_radius(anchor) {
                Some(index) => {
                    let track = &mut self.tracks[index];
                    track.pos = anchor;
                    track.last_update_ms = now_ms;
                    track.id
                }
                None => {
                    let id = self.next_id;
                    self.next_id += 1;
                    self.tracks.push(Track::new(id, anchor, now_ms));
                    assoc.born.push(id);
                    log::debug!("Track {} born at ({:.0}, {:.0})", id, anchor.x, anchor.y);
                    id
                }
            };

            if !assoc.seen.contains(&id) {
                assoc.seen.push(id);
            }
        }

        assoc
    }

    fn nearest_within_radius(&self, anchor: Vec2) -> Option<usize> {
        let radius_sq = self.match_radius * self.match_radius;
        self.tracks
            .iter()
            .enumerate()
            .map(|(i, t)| (i, t.pos.distance_squared(anchor)))
            .filter(|&(_, d)| d <= radius_sq)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
    }
}
