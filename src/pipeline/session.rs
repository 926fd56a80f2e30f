//! Detection session. Drives frame → provider → classifier → stabilizer →
//! callback.
//!
//! [`DetectionSession`] owns the provider for its whole lifetime and exposes
//! an explicit lifecycle (`initialize` → `start`/`stop` → `close`).  Every
//! method takes `&self`; the mutable state sits behind a `std::sync::Mutex`
//! that is never held across an `.await`, so a session shared through an
//! `Arc` can be stopped while a frame is in flight.
//!
//! # Per-frame flow
//!
//! ```text
//! process_frame(image)
//!   └─▶ not Detecting?          → Ok(None)
//!   └─▶ debounce gate closed?   → Ok(None)                 [frames_debounced]
//!   └─▶ copy into scratch frame → sequencer.submit(provider)
//!         └─ await PendingResult (lock released)
//!   └─▶ stopped / restarted meanwhile? → Ok(None)          [frames_discarded]
//!   └─▶ classify first hand → record history → swipe heuristic
//!   └─▶ confidence ≥ min_confidence && stabilizer accepts?
//!         ├─ yes → current = gesture, callback(&gesture)    [gestures_emitted]
//!         └─ no  → current = None
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::config::{GestureConfig, SessionConfig};
use crate::gesture::{palm_centroid, Gesture, GestureClassifier, GestureType};
use crate::provider::{Frame, ImageData, LandmarkProvider, ProviderOptions};
use crate::stabilizer::{HistoryEntry, TemporalStabilizer};

use super::clock::{Clock, SystemClock};
use super::metrics::{MetricsRecorder, PipelineMetrics};
use super::sequencer::{LandmarkResult, ResultSequencer};
use super::state::SessionPhase;

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// Errors surfaced by [`DetectionSession`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// The provider could not be configured.  The session stays
    /// uninitialized until `initialize` succeeds.
    #[error("failed to initialize gesture detection: {0}")]
    InitializationFailure(String),

    /// `start` (or frame processing) was requested before initialization.
    #[error("gesture detection is not initialized")]
    NotInitialized,

    /// `initialize` was called on a session that already has a provider.
    #[error("gesture detection is already initialized")]
    AlreadyInitialized,

    /// The session has been closed.
    #[error("gesture session has been closed")]
    Disposed,

    /// One frame could not be processed.  Detection continues.
    #[error("error processing frame: {0}")]
    FrameProcessing(String),
}

// ---------------------------------------------------------------------------
// GestureCallback
// ---------------------------------------------------------------------------

/// Receiver of accepted gesture events.
pub type GestureCallback = Arc<dyn Fn(&Gesture) + Send + Sync>;

// ---------------------------------------------------------------------------
// SessionInner
// ---------------------------------------------------------------------------

struct SessionInner {
    phase: SessionPhase,
    provider: Option<Box<dyn LandmarkProvider>>,
    sequencer: ResultSequencer,
    stabilizer: TemporalStabilizer,
    /// Reused for every submission.
    scratch: Frame,
    /// Incremented on every `start()`; results from older runs are ignored.
    run: u64,
    current: Option<Gesture>,
    last_error: Option<String>,
    callback: Option<GestureCallback>,
    metrics: MetricsRecorder,
}

impl SessionInner {
    fn fail_frame(&mut self, err: SessionError) -> SessionError {
        self.metrics.frame_failed();
        self.last_error = Some(err.to_string());
        log::error!("session: {err}");
        err
    }
}

// ---------------------------------------------------------------------------
// DetectionSession
// ---------------------------------------------------------------------------

/// One gesture-recognition pipeline with an owned provider.
///
/// ```rust,no_run
/// use std::path::Path;
/// use gesture_control::config::GestureConfig;
/// use gesture_control::pipeline::DetectionSession;
/// use gesture_control::provider::{ImageData, ReplayProvider};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = GestureConfig::default();
/// let session = DetectionSession::new(&config);
/// session.set_callback(|g| println!("{} ({:.2})", g.gesture_type.label(), g.confidence));
///
/// let provider = ReplayProvider::from_file(Path::new("recording.json"))?;
/// session.initialize(Box::new(provider), &config.provider).await?;
/// session.start()?;
///
/// let pixels = vec![0u8; 640 * 480 * 4];
/// session.process_frame(ImageData::new(640, 480, &pixels)).await?;
///
/// session.close();
/// # Ok(())
/// # }
/// ```
pub struct DetectionSession {
    config: SessionConfig,
    classifier: GestureClassifier,
    clock: Arc<dyn Clock>,
    inner: Mutex<SessionInner>,
}

impl DetectionSession {
    /// Create an uninitialized session using the system clock.
    pub fn new(config: &GestureConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create an uninitialized session reading time from `clock`.
    pub fn with_clock(config: &GestureConfig, clock: Arc<dyn Clock>) -> Self {
        let session = config.session.clone();
        let stabilizer = TemporalStabilizer::new(config.stabilizer.clone(), session.debounce_ms);
        Self {
            classifier: GestureClassifier::new(config.classifier.clone()),
            clock,
            inner: Mutex::new(SessionInner {
                phase: SessionPhase::Uninitialized,
                provider: None,
                sequencer: ResultSequencer::new(),
                stabilizer,
                scratch: Frame::new(),
                run: 0,
                current: None,
                last_error: None,
                callback: None,
                metrics: MetricsRecorder::default(),
            }),
            config: session,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Register the function called for every accepted gesture, replacing
    /// any previous one.
    pub fn set_callback<F>(&self, callback: F)
    where
        F: Fn(&Gesture) + Send + Sync + 'static,
    {
        self.lock().callback = Some(Arc::new(callback));
    }

    /// Hand `provider` to the session and configure it.
    ///
    /// The session's result sink is registered with the provider exactly
    /// once, before `configure`.  On failure the provider is dropped, the
    /// session returns to `Uninitialized` and the message is kept as
    /// [`last_error`](Self::last_error).
    pub async fn initialize(
        &self,
        mut provider: Box<dyn LandmarkProvider>,
        options: &ProviderOptions,
    ) -> Result<(), SessionError> {
        let sink = {
            let mut inner = self.lock();
            match inner.phase {
                SessionPhase::Uninitialized => {}
                SessionPhase::Closed => return Err(SessionError::Disposed),
                _ => return Err(SessionError::AlreadyInitialized),
            }
            inner.phase = SessionPhase::Initializing;
            inner.scratch = Frame::new();
            inner.sequencer.sink()
        };

        log::info!("session: initializing provider with {options:?}");
        provider.register_sink(sink);
        let configured = provider.configure(options).await;

        let mut inner = self.lock();
        if inner.phase == SessionPhase::Closed {
            provider.close();
            return Err(SessionError::Disposed);
        }

        match configured {
            Ok(()) => {
                inner.provider = Some(provider);
                inner.phase = SessionPhase::Ready;
                inner.last_error = None;
                log::info!("session: ready");
                Ok(())
            }
            Err(e) => {
                let err = SessionError::InitializationFailure(e.to_string());
                inner.phase = SessionPhase::Uninitialized;
                inner.last_error = Some(err.to_string());
                log::error!("session: {err}");
                Err(err)
            }
        }
    }

    /// Begin detecting.  A no-op when already detecting.
    pub fn start(&self) -> Result<(), SessionError> {
        let mut inner = self.lock();
        match inner.phase {
            SessionPhase::Detecting => Ok(()),
            SessionPhase::Ready => {
                inner.phase = SessionPhase::Detecting;
                inner.run += 1;
                inner.stabilizer.reset();
                inner.last_error = None;
                log::info!("session: detection started (run {})", inner.run);
                Ok(())
            }
            SessionPhase::Closed => Err(SessionError::Disposed),
            SessionPhase::Uninitialized | SessionPhase::Initializing => {
                let err = SessionError::NotInitialized;
                inner.last_error = Some(err.to_string());
                log::warn!("session: start requested before initialization");
                Err(err)
            }
        }
    }

    /// Stop detecting.  Frames already submitted still resolve but their
    /// results are ignored.
    pub fn stop(&self) -> Result<(), SessionError> {
        let mut inner = self.lock();
        match inner.phase {
            SessionPhase::Detecting => {
                inner.phase = SessionPhase::Ready;
                log::info!(
                    "session: detection stopped ({} request(s) in flight)",
                    inner.sequencer.pending_len()
                );
                Ok(())
            }
            SessionPhase::Closed => Err(SessionError::Disposed),
            _ => Ok(()),
        }
    }

    /// Release the provider and drop pending requests.  Idempotent.
    pub fn close(&self) {
        let mut inner = self.lock();
        if inner.phase == SessionPhase::Closed {
            return;
        }
        if let Some(mut provider) = inner.provider.take() {
            provider.close();
        }
        let dropped = inner.sequencer.clear();
        inner.stabilizer.reset();
        inner.current = None;
        inner.phase = SessionPhase::Closed;
        log::info!("session: closed ({dropped} pending request(s) dropped)");
    }

    // -----------------------------------------------------------------------
    // Frame processing
    // -----------------------------------------------------------------------

    /// Run one frame through the pipeline.
    ///
    /// Returns the gesture handed to the callback, or `None` when the frame
    /// was skipped, debounced, ignored or not accepted.  A
    /// [`SessionError::FrameProcessing`] affects this frame only.
    pub async fn process_frame(
        &self,
        image: ImageData<'_>,
    ) -> Result<Option<Gesture>, SessionError> {
        let submitted_at = self.clock.now_ms();

        let (pending, run) = {
            let mut guard = self.lock();
            let inner = &mut *guard;
            match inner.phase {
                SessionPhase::Detecting => {}
                SessionPhase::Closed => return Err(SessionError::Disposed),
                _ => return Ok(None),
            }

            inner.metrics.frame_received();
            if !inner.stabilizer.should_process(submitted_at) {
                inner.metrics.frame_debounced();
                log::trace!("session: frame at {submitted_at} debounced");
                return Ok(None);
            }

            if let Err(e) = inner.scratch.put_image(&image) {
                return Err(inner.fail_frame(SessionError::FrameProcessing(e.to_string())));
            }

            let Some(provider) = inner.provider.as_mut() else {
                return Err(SessionError::NotInitialized);
            };
            match inner.sequencer.submit(provider.as_mut(), &inner.scratch) {
                Ok(pending) => (pending, inner.run),
                Err(e) => {
                    return Err(inner.fail_frame(SessionError::FrameProcessing(e.to_string())))
                }
            }
        };

        let request = pending.id();
        let result = pending.wait().await;
        let now = self.clock.now_ms();

        let (gesture, callback) = {
            let mut guard = self.lock();
            let inner = &mut *guard;
            if inner.phase == SessionPhase::Closed {
                return Err(SessionError::Disposed);
            }
            if inner.phase != SessionPhase::Detecting || inner.run != run {
                inner.metrics.frame_discarded();
                log::debug!("session: result for {request} arrived after stop, ignored");
                return Ok(None);
            }

            let landmarks = match result {
                Ok(landmarks) => landmarks,
                Err(e) => {
                    return Err(inner.fail_frame(SessionError::FrameProcessing(e.to_string())))
                }
            };

            inner
                .metrics
                .frame_processed(now, now.saturating_sub(submitted_at));
            match self.evaluate(inner, &landmarks, now) {
                Some(gesture) => {
                    inner.current = Some(gesture.clone());
                    inner.metrics.gesture_emitted();
                    (gesture, inner.callback.clone())
                }
                None => {
                    inner.current = None;
                    return Ok(None);
                }
            }
        };

        if let Some(callback) = callback {
            callback(&gesture);
        }
        Ok(Some(gesture))
    }

    /// Classify, update history and decide whether the frame is reported.
    fn evaluate(
        &self,
        inner: &mut SessionInner,
        landmarks: &LandmarkResult,
        now: u64,
    ) -> Option<Gesture> {
        let (classification, hand) = self.classifier.classify_frame(&landmarks.hands);

        inner.stabilizer.record(HistoryEntry {
            gesture_type: classification.gesture_type,
            centroid: hand.and_then(palm_centroid),
            timestamp: now,
        });

        // A swipe refused by the threshold or the cooldown falls back to the
        // frame's own classification.  The cooldown only starts for a swipe
        // that is actually reported.
        let min_confidence = self.config.min_confidence;
        let swipe = inner.stabilizer.detect_swipe().filter(|s| {
            s.confidence >= min_confidence
                && inner.stabilizer.record_if_accepted(s.gesture_type, now)
        });

        let gesture = match hand {
            Some(hand) => Gesture::new(swipe.unwrap_or(classification), hand.clone(), now),
            None => Gesture::empty(now),
        };

        let accepted = swipe.is_some()
            || (gesture.confidence >= min_confidence
                && inner.stabilizer.record_if_accepted(gesture.gesture_type, now));

        log::debug!(
            "session: {} {} ({:.2}) → {}",
            landmarks.request,
            gesture.gesture_type,
            gesture.confidence,
            if accepted { "reported" } else { "held back" }
        );
        accepted.then_some(gesture)
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    pub fn phase(&self) -> SessionPhase {
        self.lock().phase
    }

    pub fn is_detecting(&self) -> bool {
        self.phase() == SessionPhase::Detecting
    }

    /// The last reported gesture, cleared by any frame that is not reported.
    pub fn current_gesture(&self) -> Option<Gesture> {
        self.lock().current.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }

    pub fn metrics(&self) -> PipelineMetrics {
        self.lock().metrics.snapshot()
    }

    /// Submissions still waiting for the provider.
    pub fn pending_requests(&self) -> usize {
        self.lock().sequencer.pending_len()
    }

    /// Gesture types of the remembered frames, oldest first.
    pub fn recent_gestures(&self) -> Vec<GestureType> {
        self.lock().stabilizer.recent_types()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl Drop for DetectionSession {
    fn drop(&mut self) {
        self.close();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
