//! Frame counters and timing for a detection session.

/// Snapshot returned by
/// [`DetectionSession::metrics`](super::DetectionSession::metrics).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineMetrics {
    /// Frames handed to `process_frame` while detecting.
    pub frames_received: u64,
    /// Frames dropped by the debounce gate.
    pub frames_debounced: u64,
    /// Frames whose landmarks were classified.
    pub frames_processed: u64,
    /// Frames that ended in a per-frame error.
    pub frames_failed: u64,
    /// Results that arrived after detection stopped and were ignored.
    pub frames_discarded: u64,
    /// Gestures handed to the callback.
    pub gestures_emitted: u64,
    /// Submit-to-result latency of the last processed frame.
    pub last_round_trip_ms: u64,
    /// Processed frames per second, refreshed about once a second.
    pub fps: f32,
}

/// Accumulates [`PipelineMetrics`].
#[derive(Debug, Clone, Default)]
pub(crate) struct MetricsRecorder {
    metrics: PipelineMetrics,
    window_start: Option<u64>,
    window_frames: u32,
}

const FPS_WINDOW_MS: u64 = 1_000;

impl MetricsRecorder {
    pub fn frame_received(&mut self) {
        self.metrics.frames_received += 1;
    }

    pub fn frame_debounced(&mut self) {
        self.metrics.frames_debounced += 1;
    }

    pub fn frame_failed(&mut self) {
        self.metrics.frames_failed += 1;
    }

    pub fn frame_discarded(&mut self) {
        self.metrics.frames_discarded += 1;
    }

    pub fn gesture_emitted(&mut self) {
        self.metrics.gestures_emitted += 1;
    }

    pub fn frame_processed(&mut self, now: u64, round_trip_ms: u64) {
        self.metrics.frames_processed += 1;
        self.metrics.last_round_trip_ms = round_trip_ms;

        let start = *self.window_start.get_or_insert(now);
        self.window_frames += 1;
        let elapsed = now.saturating_sub(start);
        if elapsed >= FPS_WINDOW_MS {
            self.metrics.fps = self.window_frames as f32 * 1_000.0 / elapsed as f32;
            self.window_start = Some(now);
            self.window_frames = 0;
        }
    }

    pub fn snapshot(&self) -> PipelineMetrics {
        self.metrics.clone()
    }
}
