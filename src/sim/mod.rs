//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time comes in as `now_ms`, never read from the system
//! - Stable iteration order (tracks and projectiles in creation order)
//! - No camera, model, rendering or audio dependencies

pub mod collision;
pub mod cooldown;
pub mod detection;
pub mod projectile;
pub mod score;
pub mod state;
pub mod tick;
pub mod tracker;

pub use collision::CollisionResolver;
pub use cooldown::{CooldownGate, can_fire};
pub use detection::{
    DetectedSubject, DetectionError, DetectionSource, FaceBox, Landmark, Subject, detect_or_empty,
};
pub use projectile::{Projectile, ProjectileSimulator};
pub use score::ScoreKeeper;
pub use state::{Banner, FrameTicket, GameContext, GameEvent, GamePhase, RenderSink, Snapshot};
pub use tick::{
    FrameInput, FrameReport, HIT_BANNER, abandon_frame, begin_frame, finish_frame, restart,
    run_frame, second_tick, start,
};
pub use tracker::{Association, TargetTracker, Track};
