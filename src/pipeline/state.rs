//! Detection session lifecycle states.

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// Lifecycle phase of a [`DetectionSession`](super::DetectionSession).
///
/// The state machine transitions are:
///
/// ```text
/// Uninitialized ──initialize()──▶ Initializing ──provider ok──▶ Ready
///               ◀──provider failed──┘
/// Ready ──start()──▶ Detecting ──stop()──▶ Ready
/// any state ──close()──▶ Closed
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// No provider yet, or the last initialization failed.
    #[default]
    Uninitialized,

    /// The provider is being configured.
    Initializing,

    /// Provider configured; frames are ignored until `start()`.
    Ready,

    /// Frames flow through the pipeline.
    Detecting,

    /// Provider released.  Every further call fails.
    Closed,
}

impl SessionPhase {
    /// `true` once a provider has been configured and until the session is
    /// closed.
    ///
    /// ```
    /// use gesture_control::pipeline::SessionPhase;
    ///
    /// assert!(!SessionPhase::Uninitialized.is_initialized());
    /// assert!(!SessionPhase::Initializing.is_initialized());
    /// assert!(SessionPhase::Ready.is_initialized());
    /// assert!(SessionPhase::Detecting.is_initialized());
    /// assert!(!SessionPhase::Closed.is_initialized());
    /// ```
    pub fn is_initialized(&self) -> bool {
        matches!(self, SessionPhase::Ready | SessionPhase::Detecting)
    }

    /// A short human-readable label for status displays.
    pub fn label(&self) -> &'static str {
        match self {
            SessionPhase::Uninitialized => "Not initialized",
            SessionPhase::Initializing => "Initializing",
            SessionPhase::Ready => "Ready",
            SessionPhase::Detecting => "Detecting",
            SessionPhase::Closed => "Closed",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
