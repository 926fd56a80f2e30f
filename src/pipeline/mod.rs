//! Gesture pipeline: submission sequencing, session lifecycle and metrics.
//!
//! # Architecture
//!
//! ```text
//! frame source ──ImageData──▶ DetectionSession::process_frame()
//!                                   │
//!                                   ├─ debounce gate (TemporalStabilizer)
//!                                   ├─ ResultSequencer::submit ──▶ LandmarkProvider
//!                                   │        ▲                          │
//!                                   │        └──── ResultSink::deliver ◀┘
//!                                   ├─ await PendingResult
//!                                   ├─ GestureClassifier + swipe heuristic
//!                                   └─ GestureCallback(&Gesture)
//! ```
//!
//! Sessions are independent; several may run side by side, each with its
//! own provider.

pub mod clock;
pub mod metrics;
pub mod sequencer;
pub mod session;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use clock::{Clock, ManualClock, SystemClock};
pub use metrics::PipelineMetrics;
pub use sequencer::{
    LandmarkResult, PendingResult, RequestId, ResultSequencer, ResultSink, SequencerError,
};
pub use session::{DetectionSession, GestureCallback, SessionError};
pub use state::SessionPhase;
