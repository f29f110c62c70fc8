//! Pose Blaster entry point
//!
//! The native build has no camera: it plays one headless session against a
//! synthetic crowd and reports the score.
//!
//! Usage: `pose-blaster [config.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use pose_blaster::GameConfig;
    use pose_blaster::demo::{LogSink, SyntheticCrowd, play_session};

    env_logger::init();
    log::info!("Pose Blaster (native) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => GameConfig::load(path),
        None => GameConfig::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);
    log::info!("Synthetic crowd seed: {}", seed);

    let frame_size = Vec2::new(640.0, 480.0);
    let mut crowd = SyntheticCrowd::new(seed, 3, frame_size);
    let mut sink = LogSink::default();

    // ~30 fps detector
    let summary = play_session(config, &mut crowd, &mut sink, frame_size, 33);
    log::info!(
        "Final score {} ({} shots over {} frames)",
        summary.final_score,
        summary.shots,
        summary.frames
    );
    println!("Final Score: {}", summary.final_score);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts embed the library directly; there is no wasm binary
}
