//! Headless play: a synthetic crowd in place of a camera + pose model, and a
//! sink that logs what a renderer would draw.
//!
//! Seeded, so a given seed always plays out the same session.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::clock::{Clock, ManualClock};
use crate::settings::GameConfig;
use crate::sim::{
    DetectedSubject, DetectionError, DetectionSource, GameContext, GameEvent, GamePhase, Landmark,
    RenderSink, Snapshot, run_frame, second_tick, start,
};

/// Keypoint names in the usual 17-point pose layout
const KEYPOINTS: [&str; 17] = [
    "nose",
    "left_eye",
    "right_eye",
    "left_ear",
    "right_ear",
    "left_shoulder",
    "right_shoulder",
    "left_elbow",
    "right_elbow",
    "left_wrist",
    "right_wrist",
    "left_hip",
    "right_hip",
    "left_knee",
    "right_knee",
    "left_ankle",
    "right_ankle",
];

#[derive(Debug, Clone)]
struct Walker {
    pos: Vec2,
    vel: Vec2,
}

/// Fake pose detector: people drifting around the frame
#[derive(Debug)]
pub struct SyntheticCrowd {
    rng: Pcg32,
    walkers: Vec<Walker>,
    pub frame_size: Vec2,
    /// Chance per frame that the detector fails outright
    pub dropout: f64,
}

impl SyntheticCrowd {
    pub fn new(seed: u64, people: usize, frame_size: Vec2) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let walkers = (0..people)
            .map(|_| Walker {
                pos: Vec2::new(
                    rng.random_range(0.0..frame_size.x),
                    rng.random_range(0.0..frame_size.y),
                ),
                vel: Vec2::new(rng.random_range(-3.0..3.0), rng.random_range(-2.0..2.0)),
            })
            .collect();
        Self {
            rng,
            walkers,
            frame_size,
            dropout: 0.02,
        }
    }

    fn step(&mut self) {
        let size = self.frame_size;
        for w in &mut self.walkers {
            w.pos += w.vel;
            // Bounce off the frame edges
            if w.pos.x < 0.0 || w.pos.x > size.x {
                w.vel.x = -w.vel.x;
            }
            if w.pos.y < 0.0 || w.pos.y > size.y {
                w.vel.y = -w.vel.y;
            }
            w.pos = w.pos.clamp(Vec2::ZERO, size);
        }
    }

    fn pose(&mut self, center: Vec2) -> DetectedSubject {
        let landmarks = KEYPOINTS
            .iter()
            .map(|name| {
                let jitter = Vec2::new(
                    self.rng.random_range(-40.0..40.0),
                    self.rng.random_range(-60.0..60.0),
                );
                let p = center + jitter;
                Landmark::new(*name, p.x, p.y, self.rng.random_range(0.0..1.0))
            })
            .collect();
        DetectedSubject::new(self.rng.random_range(0.5..1.0), landmarks)
    }
}

impl DetectionSource for SyntheticCrowd {
    type Frame = ();
    type Subject = DetectedSubject;

    fn estimate(&mut self, _frame: &()) -> Result<Vec<DetectedSubject>, DetectionError> {
        self.step();
        if self.rng.random_bool(self.dropout) {
            return Err(DetectionError::Failed("synthetic dropout".into()));
        }
        let centers: Vec<Vec2> = self.walkers.iter().map(|w| w.pos).collect();
        Ok(centers.into_iter().map(|c| self.pose(c)).collect())
    }
}

/// Render sink that only logs
#[derive(Debug, Default)]
pub struct LogSink {
    pub frames: u64,
    last_phase: Option<GamePhase>,
}

impl RenderSink for LogSink {
    fn present(&mut self, snapshot: &Snapshot<'_>) {
        self.frames += 1;
        if self.last_phase != Some(snapshot.phase) {
            log::info!("Phase: {:?}", snapshot.phase);
            self.last_phase = Some(snapshot.phase);
        }
        log::trace!(
            "frame {}: {} tracks, {} projectiles, score {}, {}s left",
            self.frames,
            snapshot.tracks.len(),
            snapshot.projectiles.len(),
            snapshot.score,
            snapshot.remaining_secs
        );
    }
}

/// Outcome of a headless session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub final_score: u32,
    pub shots: u32,
    pub frames: u64,
}

/// Play one full session (start → countdown → run → end) with a hand-driven
/// clock, a frame every `frame_ms` and the timer every 1000 ms.
pub fn play_session<D, R>(
    config: GameConfig,
    source: &mut D,
    sink: &mut R,
    frame_size: Vec2,
    frame_ms: u64,
) -> SessionSummary
where
    D: DetectionSource<Frame = ()>,
    R: RenderSink,
{
    let clock = ManualClock::new(0);
    let mut ctx = GameContext::new(config);
    let mut summary = SessionSummary::default();
    let mut next_second = 1000;

    start(&mut ctx);
    while ctx.phase != GamePhase::Ended {
        clock.advance(frame_ms.max(1));
        let now = clock.now_ms();

        while now >= next_second {
            second_tick(&mut ctx);
            next_second += 1000;
        }
        if run_frame(&mut ctx, source, &(), frame_size, now).is_some() {
            summary.frames += 1;
        }
        sink.present(&ctx.snapshot(now));

        for event in ctx.drain_events() {
            match event {
                GameEvent::ShotFired { .. } => summary.shots += 1,
                GameEvent::SessionEnded { final_score } => summary.final_score = final_score,
                _ => {}
            }
        }
    }
    summary
}
