//! Debounce, history and swipe handling across frames.
//!
//! The classifier looks at one frame at a time.  [`TemporalStabilizer`] adds
//! the time dimension:
//!
//! * a **debounce gate** that drops frames arriving faster than
//!   `debounce_ms` before they reach the provider,
//! * a bounded **history** of every classified frame (including `none`),
//! * a **swipe heuristic** comparing palm centroids across the newest
//!   `swipe_window` history entries,
//! * a **swipe cooldown** so one physical swipe is reported once.

use serde::{Deserialize, Serialize};

use crate::gesture::{Classification, GestureType};

use super::history::{HistoryEntry, RingBuffer};

/// Confidence reported for a swipe produced by the centroid heuristic.
pub const SWIPE_CONFIDENCE: f32 = 0.75;

// ---------------------------------------------------------------------------
// StabilizerConfig
// ---------------------------------------------------------------------------

/// Tunables for [`TemporalStabilizer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerConfig {
    /// Number of classified frames remembered.
    pub history_size: usize,
    /// Minimum milliseconds between two accepted swipes.
    pub swipe_cooldown_ms: u64,
    /// Number of newest history entries the swipe heuristic inspects.
    pub swipe_window: usize,
    /// Minimum net palm displacement (normalized units) along the dominant
    /// axis for a swipe.
    pub swipe_min_distance: f32,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            history_size: 10,
            swipe_cooldown_ms: 1_000,
            swipe_window: 5,
            swipe_min_distance: 0.15,
        }
    }
}

// ---------------------------------------------------------------------------
// TemporalStabilizer
// ---------------------------------------------------------------------------

/// Turns per-frame classifications into rate-limited gesture decisions.
#[derive(Debug, Clone)]
pub struct TemporalStabilizer {
    config: StabilizerConfig,
    debounce_ms: u64,
    history: RingBuffer<HistoryEntry>,
    last_processed: Option<u64>,
    last_swipe: Option<u64>,
}

impl TemporalStabilizer {
    /// Create a stabilizer.  `debounce_ms` is fixed for its whole lifetime.
    ///
    /// A `history_size` of zero is raised to one.
    pub fn new(config: StabilizerConfig, debounce_ms: u64) -> Self {
        let history = RingBuffer::new(config.history_size.max(1));
        Self {
            config,
            debounce_ms,
            history,
            last_processed: None,
            last_swipe: None,
        }
    }

    // -----------------------------------------------------------------------
    // Debounce
    // -----------------------------------------------------------------------

    /// Debounce gate.  Returns `true` and remembers `now` when at least
    /// `debounce_ms` has passed since the last frame let through.
    pub fn should_process(&mut self, now: u64) -> bool {
        if let Some(last) = self.last_processed {
            if now.saturating_sub(last) < self.debounce_ms {
                return false;
            }
        }
        self.last_processed = Some(now);
        true
    }

    pub fn debounce_ms(&self) -> u64 {
        self.debounce_ms
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Remember a classified frame, whether or not it gets accepted.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    pub fn history(&self) -> &RingBuffer<HistoryEntry> {
        &self.history
    }

    /// Gesture types of the remembered frames, oldest first.
    pub fn recent_types(&self) -> Vec<GestureType> {
        self.history.iter().map(|e| e.gesture_type).collect()
    }

    // -----------------------------------------------------------------------
    // Swipe heuristic
    // -----------------------------------------------------------------------

    /// Look for a directional swipe in the newest `swipe_window` entries.
    ///
    /// Every entry in the window must carry a palm centroid; a frame without
    /// a hand breaks the motion.  The net displacement from the oldest to
    /// the newest centroid is compared on its dominant axis against
    /// `swipe_min_distance`.  Image `y` grows downward, so a negative `dy`
    /// is an upward swipe.
    pub fn detect_swipe(&self) -> Option<Classification> {
        let window = self.config.swipe_window.max(2);
        if self.history.len() < window {
            return None;
        }

        let centroids: Option<Vec<(f32, f32)>> =
            self.history.latest(window).map(|e| e.centroid).collect();
        let centroids = centroids?;
        let (x0, y0) = *centroids.first()?;
        let (x1, y1) = *centroids.last()?;
        let (dx, dy) = (x1 - x0, y1 - y0);

        let gesture_type = if dx.abs() >= dy.abs() {
            if dx.abs() < self.config.swipe_min_distance {
                return None;
            }
            if dx < 0.0 {
                GestureType::SwipeLeft
            } else {
                GestureType::SwipeRight
            }
        } else {
            if dy.abs() < self.config.swipe_min_distance {
                return None;
            }
            if dy < 0.0 {
                GestureType::SwipeUp
            } else {
                GestureType::SwipeDown
            }
        };

        log::debug!("stabilizer: palm moved ({dx:.3}, {dy:.3}) → {gesture_type}");
        Some(Classification::new(gesture_type, SWIPE_CONFIDENCE))
    }

    // -----------------------------------------------------------------------
    // Acceptance
    // -----------------------------------------------------------------------

    /// Whether a frame classified as `gesture_type` may be reported at `now`.
    ///
    /// Only swipes are ever refused: while within `swipe_cooldown_ms` of the
    /// last accepted swipe.
    pub fn accept(&self, gesture_type: GestureType, now: u64) -> bool {
        if !gesture_type.is_swipe() {
            return true;
        }
        match self.last_swipe {
            Some(last) => now.saturating_sub(last) >= self.config.swipe_cooldown_ms,
            None => true,
        }
    }

    /// [`accept`](Self::accept), and start the cooldown when an accepted
    /// gesture is a swipe.
    pub fn record_if_accepted(&mut self, gesture_type: GestureType, now: u64) -> bool {
        let accepted = self.accept(gesture_type, now);
        if accepted && gesture_type.is_swipe() {
            self.last_swipe = Some(now);
        } else if !accepted {
            log::debug!("stabilizer: {gesture_type} suppressed by swipe cooldown");
        }
        accepted
    }

    /// Forget history, cooldown and debounce state.
    pub fn reset(&mut self) {
        self.history.clear();
        self.last_processed = None;
        self.last_swipe = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn stabilizer() -> TemporalStabilizer {
        TemporalStabilizer::new(StabilizerConfig::default(), 100)
    }

    fn entry(centroid: Option<(f32, f32)>, timestamp: u64) -> HistoryEntry {
        HistoryEntry {
            gesture_type: GestureType::OpenPalm,
            centroid,
            timestamp,
        }
    }

    /// Record `n` frames with the centroid moving by `(dx, dy)` per frame.
    fn record_motion(s: &mut TemporalStabilizer, n: usize, dx: f32, dy: f32) {
        for i in 0..n {
            let c = (0.5 + dx * i as f32, 0.5 + dy * i as f32);
            s.record(entry(Some(c), i as u64 * 100));
        }
    }

    // ---- Debounce ---

    #[test]
    fn frames_closer_than_debounce_are_dropped() {
        let mut s = stabilizer();
        assert!(s.should_process(1_000));
        assert!(!s.should_process(1_030));
        assert!(!s.should_process(1_099));
        assert!(s.should_process(1_100));
    }

    #[test]
    fn dropped_frames_do_not_move_the_gate() {
        let mut s = stabilizer();
        assert!(s.should_process(0));
        assert!(!s.should_process(60));
        // 100 ms after the last *processed* frame, not after the dropped one.
        assert!(s.should_process(100));
    }

    #[test]
    fn zero_debounce_lets_everything_through() {
        let mut s = TemporalStabilizer::new(StabilizerConfig::default(), 0);
        assert!(s.should_process(5));
        assert!(s.should_process(5));
    }

    // ---- History ---

    #[test]
    fn history_is_bounded_by_config() {
        let mut s = stabilizer();
        for i in 0..25 {
            s.record(entry(None, i));
        }
        assert_eq!(s.history().len(), 10);
        assert_eq!(s.history().last().map(|e| e.timestamp), Some(24));
    }

    #[test]
    fn none_frames_are_recorded_too() {
        let mut s = stabilizer();
        s.record(HistoryEntry::default());
        s.record(entry(Some((0.1, 0.1)), 1));
        assert_eq!(s.recent_types(), vec![GestureType::None, GestureType::OpenPalm]);
    }

    // ---- Swipe heuristic ---

    #[test]
    fn leftward_motion_is_swipe_left() {
        let mut s = stabilizer();
        record_motion(&mut s, 5, -0.05, 0.0);
        let c = s.detect_swipe().unwrap();
        assert_eq!(c.gesture_type, GestureType::SwipeLeft);
        assert_eq!(c.confidence, SWIPE_CONFIDENCE);
    }

    #[test]
    fn each_direction_is_detected() {
        let cases = [
            ((0.05, 0.0), GestureType::SwipeRight),
            ((0.0, -0.05), GestureType::SwipeUp),
            ((0.0, 0.05), GestureType::SwipeDown),
        ];
        for ((dx, dy), expected) in cases {
            let mut s = stabilizer();
            record_motion(&mut s, 5, dx, dy);
            assert_eq!(s.detect_swipe().map(|c| c.gesture_type), Some(expected));
        }
    }

    #[test]
    fn stationary_hand_is_not_a_swipe() {
        let mut s = stabilizer();
        record_motion(&mut s, 8, 0.001, 0.0);
        assert!(s.detect_swipe().is_none());
    }

    #[test]
    fn short_history_is_not_a_swipe() {
        let mut s = stabilizer();
        record_motion(&mut s, 4, -0.1, 0.0);
        assert!(s.detect_swipe().is_none());
    }

    #[test]
    fn missing_hand_inside_window_breaks_the_swipe() {
        let mut s = stabilizer();
        record_motion(&mut s, 4, -0.05, 0.0);
        s.record(entry(None, 400));
        assert!(s.detect_swipe().is_none());
    }

    // ---- Cooldown ---

    #[test]
    fn swipe_within_cooldown_is_suppressed() {
        let mut s = stabilizer();
        assert!(s.record_if_accepted(GestureType::SwipeLeft, 10_000));
        assert!(!s.record_if_accepted(GestureType::SwipeRight, 10_500));
        assert!(!s.accept(GestureType::SwipeLeft, 10_999));
        assert!(s.record_if_accepted(GestureType::SwipeLeft, 11_000));
    }

    #[test]
    fn cooldown_does_not_affect_static_gestures() {
        let mut s = stabilizer();
        assert!(s.record_if_accepted(GestureType::SwipeUp, 0));
        assert!(s.record_if_accepted(GestureType::Fist, 10));
        assert!(s.record_if_accepted(GestureType::None, 20));
        assert!(!s.accept(GestureType::SwipeDown, 30));
    }

    #[test]
    fn rejected_swipe_does_not_extend_cooldown() {
        let mut s = stabilizer();
        assert!(s.record_if_accepted(GestureType::SwipeLeft, 0));
        assert!(!s.record_if_accepted(GestureType::SwipeLeft, 900));
        assert!(s.accept(GestureType::SwipeLeft, 1_000));
    }

    #[test]
    fn reset_clears_everything() {
        let mut s = stabilizer();
        assert!(s.should_process(0));
        s.record(entry(None, 0));
        s.record_if_accepted(GestureType::SwipeLeft, 0);

        s.reset();

        assert!(s.history().is_empty());
        assert!(s.should_process(1));
        assert!(s.accept(GestureType::SwipeLeft, 1));
    }
}
