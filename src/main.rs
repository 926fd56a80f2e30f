//! Application entry point. Replays a recorded landmark script through a
//! detection session and logs every gesture.
//!
//! ```text
//! gesture-control [replay.json]
//! ```
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`GestureConfig`] from disk (returns default on first run).
//! 3. Build a [`ReplayProvider`] from the script.
//! 4. Initialise and start a [`DetectionSession`].
//! 5. Feed blank frames at the debounce cadence until every recorded frame
//!    has been processed (or Ctrl-C).
//! 6. Print the final metrics and close the session.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use gesture_control::{
    config::{AppPaths, GestureConfig},
    pipeline::{DetectionSession, SessionError},
    provider::{ImageData, ReplayProvider, ReplayScript},
};

/// Size of the blank frames fed to the replay provider.
const FRAME_WIDTH: u32 = 640;
const FRAME_HEIGHT: u32 = 480;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("gesture-control starting up");

    // 2. Configuration
    let config = GestureConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        GestureConfig::default()
    });
    config.validate().context("invalid settings.toml")?;

    // 3. Replay provider
    let script_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| AppPaths::new().recordings_dir.join("replay.json"));
    let script = ReplayScript::load(&script_path)?;
    let total = script.len() as u64;
    log::info!("Replaying {total} frames from {}", script_path.display());

    // 4. Session
    let session = DetectionSession::new(&config);
    session.set_callback(|gesture| {
        log::info!(
            "gesture: {} ({:.2}) {} hand at {}",
            gesture.gesture_type.label(),
            gesture.confidence,
            gesture.hand.handedness,
            gesture.timestamp
        );
    });
    session
        .initialize(Box::new(ReplayProvider::new(script)), &config.provider)
        .await?;
    session.start()?;

    // 5. Frame loop
    let pixels = vec![0u8; (FRAME_WIDTH * FRAME_HEIGHT * 4) as usize];
    let cadence = Duration::from_millis(config.session.debounce_ms.max(1));
    let mut ticker = tokio::time::interval(cadence);
    loop {
        let m = session.metrics();
        if m.frames_processed + m.frames_failed >= total {
            break;
        }
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                log::info!("Interrupted");
                break;
            }
        }
        // Other per-frame errors are already logged by the session.
        if let Err(SessionError::Disposed) = session
            .process_frame(ImageData::new(FRAME_WIDTH, FRAME_HEIGHT, &pixels))
            .await
        {
            log::warn!("Session closed while replaying");
            break;
        }
    }

    // 6. Shutdown
    if let Err(e) = session.stop() {
        log::warn!("Stop failed: {e}");
    }
    let m = session.metrics();
    log::info!(
        "Done: {} frames processed, {} debounced, {} failed, {} gestures, {:.1} fps",
        m.frames_processed,
        m.frames_debounced,
        m.frames_failed,
        m.gestures_emitted,
        m.fps
    );
    session.close();
    Ok(())
}
