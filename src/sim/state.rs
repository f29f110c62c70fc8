//! Game state and the per-session context
//!
//! Everything the simulation mutates lives in one `GameContext`, so a host
//! can drive it (and a test can poke it) without any camera or renderer.

use serde::{Deserialize, Serialize};

use super::collision::CollisionResolver;
use super::cooldown::CooldownGate;
use super::projectile::{Projectile, ProjectileSimulator};
use super::score::ScoreKeeper;
use super::tracker::{TargetTracker, Track};
use crate::settings::GameConfig;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start input
    Idle,
    /// Counting down to play; `remaining` ticks left
    Countdown { remaining: u32 },
    /// Active play: shots fire, hits score, the timer runs
    Running,
    /// Time's up; showing the final score until restart
    Ended,
}

/// Things a host may want to react to (sound, flashes, HUD animation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Countdown display changed (3, 2, 1, ...)
    CountdownTick { remaining: u32 },
    /// Countdown finished, play begins
    Attack,
    ShotFired { projectile_id: u32, track_id: u32 },
    Hit { projectile_id: u32, track_id: u32 },
    SessionEnded { final_score: u32 },
    /// Back to Idle after the end screen
    Restarted,
}

/// Transient HUD message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub text: String,
    pub until_ms: u64,
}

/// Read-only view of one frame, everything a renderer needs
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub tracks: &'a [Track],
    pub projectiles: &'a [Projectile],
    pub score: u32,
    pub remaining_secs: u32,
    /// Live banner text, if any
    pub banner: Option<&'a str>,
    /// Start input is only accepted while Idle
    pub start_enabled: bool,
    /// Set on the end screen
    pub final_score: Option<u32>,
}

/// Consumer of per-frame snapshots (the external renderer)
pub trait RenderSink {
    fn present(&mut self, snapshot: &Snapshot<'_>);
}

/// Proof that a frame update was begun; hand it back to finish the frame
#[derive(Debug)]
#[must_use = "an outstanding frame blocks all later frames until finished or abandoned"]
pub struct FrameTicket {
    pub(super) seq: u64,
}

/// Complete simulation context for one game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameContext {
    pub config: GameConfig,
    pub phase: GamePhase,
    pub tracker: TargetTracker,
    pub gate: CooldownGate,
    pub simulator: ProjectileSimulator,
    pub resolver: CollisionResolver,
    /// Active projectiles, in spawn order
    pub projectiles: Vec<Projectile>,
    pub score: ScoreKeeper,
    pub banner: Option<Banner>,
    /// Pending events, oldest first
    #[serde(skip)]
    pub(super) events: Vec<GameEvent>,
    /// Sequence number of the outstanding frame, if any
    #[serde(skip)]
    pub(super) frame_in_flight: Option<u64>,
    #[serde(skip)]
    pub(super) frame_seq: u64,
}

impl GameContext {
    /// Build a context from an already-validated config
    pub fn new(config: GameConfig) -> Self {
        let mut tracker = TargetTracker::new(
            config.match_radius,
            config.stale_after_ms,
            config.landmark_confidence,
        );
        tracker.min_subject_confidence = config.min_subject_confidence;

        Self {
            phase: GamePhase::Idle,
            tracker,
            gate: CooldownGate::new(config.cooldown_ms),
            simulator: ProjectileSimulator::new(config.motion, config.aim_offset),
            resolver: CollisionResolver::new(config.linger_ms),
            projectiles: Vec::new(),
            score: ScoreKeeper::new(),
            banner: None,
            events: Vec::new(),
            frame_in_flight: None,
            frame_seq: 0,
            config,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(super) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drop tracks, projectiles and the banner
    pub(super) fn clear_field(&mut self) {
        self.tracker.clear();
        self.projectiles.clear();
        self.banner = None;
    }

    pub(super) fn show_banner(&mut self, text: &str, now_ms: u64) {
        self.banner = Some(Banner {
            text: text.to_string(),
            until_ms: now_ms.saturating_add(self.config.banner_ms),
        });
    }

    pub fn snapshot(&self, now_ms: u64) -> Snapshot<'_> {
        let banner = self
            .banner
            .as_ref()
            .filter(|b| now_ms < b.until_ms)
            .map(|b| b.text.as_str());
        Snapshot {
            phase: self.phase,
            tracks: self.tracker.tracks(),
            projectiles: &self.projectiles,
            score: self.score.value(),
            remaining_secs: self.score.remaining(),
            banner,
            start_enabled: self.phase == GamePhase::Idle,
            final_score: (self.phase == GamePhase::Ended).then(|| self.score.value()),
        }
    }
}

impl Default for GameContext {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
