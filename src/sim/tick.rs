//! Session state machine and the per-frame update
//!
//! Two drivers feed the context: the host's frame loop (`begin_frame` /
//! `finish_frame`) and a one-second interval timer (`second_tick`). Both take
//! `&mut GameContext`, so they are serialized by construction.

use glam::Vec2;

use super::detection::{DetectionSource, Subject, detect_or_empty};
use super::state::{FrameTicket, GameContext, GameEvent, GamePhase};
use super::tracker::Association;
use crate::bottom_center;

/// Text raised on every hit
pub const HIT_BANNER: &str = "Hit!";

/// One frame's worth of detector output
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a, S> {
    pub subjects: &'a [S],
    /// Video frame size; projectiles launch from its bottom-centre
    pub frame_size: Vec2,
    pub now_ms: u64,
}

/// What one frame update did
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameReport {
    pub association: Association,
    /// Projectiles spawned this frame
    pub fired: Vec<u32>,
    /// Hits resolved this frame
    pub hits: u32,
    /// Projectiles removed after lingering
    pub removed: usize,
}

/// Start input. Only valid in Idle; otherwise ignored.
pub fn start(ctx: &mut GameContext) -> bool {
    if ctx.phase != GamePhase::Idle {
        log::debug!("Start ignored in {:?}", ctx.phase);
        return false;
    }
    let remaining = ctx.config.countdown_ticks;
    ctx.phase = GamePhase::Countdown { remaining };
    ctx.emit(GameEvent::CountdownTick { remaining });
    log::info!("Countdown started ({} ticks)", remaining);
    true
}

/// Restart input. Only valid on the end screen; otherwise ignored.
pub fn restart(ctx: &mut GameContext) -> bool {
    if ctx.phase != GamePhase::Ended {
        log::debug!("Restart ignored in {:?}", ctx.phase);
        return false;
    }
    ctx.score.reset();
    ctx.clear_field();
    ctx.phase = GamePhase::Idle;
    ctx.emit(GameEvent::Restarted);
    log::info!("Back to idle");
    true
}

/// One-second timer tick: drives the countdown and the session clock
pub fn second_tick(ctx: &mut GameContext) {
    match ctx.phase {
        GamePhase::Countdown { remaining } => {
            let remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                enter_running(ctx);
            } else {
                ctx.phase = GamePhase::Countdown { remaining };
                ctx.emit(GameEvent::CountdownTick { remaining });
            }
        }
        GamePhase::Running => {
            if ctx.score.tick() {
                end_session(ctx);
            }
        }
        GamePhase::Idle | GamePhase::Ended => {}
    }
}

fn enter_running(ctx: &mut GameContext) {
    ctx.score.reset();
    ctx.score.start_timer(ctx.config.session_secs);
    ctx.clear_field();
    ctx.phase = GamePhase::Running;
    ctx.emit(GameEvent::Attack);
    log::info!("Session running ({}s)", ctx.config.session_secs);
}

fn end_session(ctx: &mut GameContext) {
    // In-flight shots are dropped so nothing scores after time is up
    ctx.projectiles.clear();
    ctx.banner = None;
    ctx.phase = GamePhase::Ended;
    let final_score = ctx.score.value();
    ctx.emit(GameEvent::SessionEnded { final_score });
    log::info!("Session ended, final score {}", final_score);
}

/// Claim the frame slot before awaiting the detector.
///
/// Returns `None` while a previous frame is still outstanding; the caller
/// should skip this frame.
pub fn begin_frame(ctx: &mut GameContext) -> Option<FrameTicket> {
    if ctx.frame_in_flight.is_some() {
        log::debug!("Frame skipped, previous frame still in flight");
        return None;
    }
    ctx.frame_seq += 1;
    ctx.frame_in_flight = Some(ctx.frame_seq);
    Some(FrameTicket { seq: ctx.frame_seq })
}

/// Release the frame slot without applying anything (detector cancelled)
pub fn abandon_frame(ctx: &mut GameContext, ticket: FrameTicket) {
    if ctx.frame_in_flight == Some(ticket.seq) {
        ctx.frame_in_flight = None;
    }
}

/// Apply the detector output for a claimed frame.
///
/// Returns `None` if the ticket is not the outstanding one.
pub fn finish_frame<S: Subject>(
    ctx: &mut GameContext,
    ticket: FrameTicket,
    input: &FrameInput<'_, S>,
) -> Option<FrameReport> {
    if ctx.frame_in_flight != Some(ticket.seq) {
        log::debug!("Stale frame ticket {} ignored", ticket.seq);
        return None;
    }
    ctx.frame_in_flight = None;
    Some(update(ctx, input))
}

/// Claim, detect and apply in one call, for synchronous detectors
pub fn run_frame<D: DetectionSource>(
    ctx: &mut GameContext,
    source: &mut D,
    frame: &D::Frame,
    frame_size: Vec2,
    now_ms: u64,
) -> Option<FrameReport> {
    let ticket = begin_frame(ctx)?;
    let subjects = detect_or_empty(source, frame);
    let input = FrameInput {
        subjects: &subjects,
        frame_size,
        now_ms,
    };
    finish_frame(ctx, ticket, &input)
}

/// The per-frame pipeline: track → gate → spawn/advance → resolve → score
fn update<S: Subject>(ctx: &mut GameContext, input: &FrameInput<'_, S>) -> FrameReport {
    let now_ms = input.now_ms;
    let mut report = FrameReport {
        // Tracking runs in every phase so the host can draw debug boxes
        association: ctx.tracker.update(input.subjects, now_ms),
        ..Default::default()
    };

    if !ctx.is_running() {
        return report;
    }

    // Only people seen this frame are fired at
    let origin = bottom_center(input.frame_size);
    for &track_id in &report.association.seen {
        let Some(track) = ctx.tracker.get_mut(track_id) else {
            continue;
        };
        if !ctx.gate.try_fire(track, now_ms) {
            continue;
        }
        let target = track.pos;
        let projectile = ctx.simulator.spawn(origin, target, track_id, now_ms);
        log::debug!("Fired projectile {} at track {}", projectile.id, track_id);
        report.fired.push(projectile.id);
        ctx.emit(GameEvent::ShotFired {
            projectile_id: projectile.id,
            track_id,
        });
        ctx.projectiles.push(projectile);
    }

    ctx.simulator.advance(&mut ctx.projectiles, now_ms);

    let mut landed = Vec::new();
    let hits = ctx
        .resolver
        .resolve_with(&mut ctx.projectiles, now_ms, |p| {
            landed.push(GameEvent::Hit {
                projectile_id: p.id,
                track_id: p.track_id,
            })
        });
    if hits > 0 {
        for event in landed {
            ctx.emit(event);
        }
        ctx.score.add(hits);
        ctx.show_banner(HIT_BANNER, now_ms);
    }
    report.hits = hits;

    report.removed = ctx.resolver.sweep(&mut ctx.projectiles, now_ms);
    report
}
