//! Landmark Provider: the pose-estimation capability the pipeline consumes.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              LandmarkProvider (trait)                  │
//! │                                                        │
//! │  register_sink(ResultSink)   ← exactly once            │
//! │  configure(&ProviderOptions) ← async, may fail         │
//! │  submit_frame(&Frame)        ← one frame at a time     │
//! │        │                                               │
//! │        └──(later, same order)──▶ sink.deliver(hands)   │
//! │  close()                                               │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! The provider reports results through the sink with no correlation token;
//! the [`ResultSequencer`](crate::pipeline::ResultSequencer) behind the sink
//! matches them to submissions in FIFO order.  Providers must therefore
//! deliver exactly one result per accepted frame, in submission order.
//!
//! [`ReplayProvider`] plays back a recorded landmark script and is what the
//! binary uses.  A `MockProvider` test double is available under
//! `#[cfg(test)]`.

pub mod frame;
#[cfg(test)]
pub mod mock;
pub mod replay;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::sequencer::ResultSink;

pub use frame::{Frame, FrameError, ImageData};
#[cfg(test)]
pub use mock::{MockHandle, MockProvider};
pub use replay::{RecordedFrame, ReplayProvider, ReplayScript};

// ---------------------------------------------------------------------------
// ProviderError
// ---------------------------------------------------------------------------

/// Errors reported by a [`LandmarkProvider`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// The options were rejected or the model could not be loaded.
    #[error("provider configuration failed: {0}")]
    Configure(String),

    /// A frame could not be handed to the model.
    #[error("frame submission failed: {0}")]
    Submit(String),

    /// `submit_frame` was called before `configure` succeeded.
    #[error("provider is not configured")]
    NotConfigured,

    /// The provider has been closed.
    #[error("provider is closed")]
    Closed,
}

// ---------------------------------------------------------------------------
// ModelComplexity
// ---------------------------------------------------------------------------

/// Landmark model variant.  Serialized as `0` (lite) or `1` (full).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ModelComplexity {
    /// Faster, less accurate model for low-end devices.
    Lite,
    #[default]
    Full,
}

impl TryFrom<u8> for ModelComplexity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ModelComplexity::Lite),
            1 => Ok(ModelComplexity::Full),
            other => Err(format!("model complexity must be 0 or 1, got {other}")),
        }
    }
}

impl From<ModelComplexity> for u8 {
    fn from(c: ModelComplexity) -> Self {
        match c {
            ModelComplexity::Lite => 0,
            ModelComplexity::Full => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// ProviderOptions
// ---------------------------------------------------------------------------

/// Options passed to [`LandmarkProvider::configure`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderOptions {
    /// Maximum number of hands reported per frame.
    pub max_hands: usize,
    pub model_complexity: ModelComplexity,
    /// Minimum palm-detection score (0.0 – 1.0).
    pub min_detection_confidence: f32,
    /// Minimum landmark-tracking score (0.0 – 1.0) before re-detection.
    pub min_tracking_confidence: f32,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            max_hands: 1,
            model_complexity: ModelComplexity::Full,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
        }
    }
}

impl ProviderOptions {
    /// Check ranges; the message names the offending field.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_hands == 0 {
            return Err("max_hands must be at least 1".into());
        }
        for (name, value) in [
            ("min_detection_confidence", self.min_detection_confidence),
            ("min_tracking_confidence", self.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{name} must lie in [0, 1], got {value}"));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LandmarkProvider trait
// ---------------------------------------------------------------------------

/// Opaque hand-landmark estimator.
///
/// Implementations must be `Send` so a session can be shared across tasks.
///
/// # Contract
///
/// - [`register_sink`](Self::register_sink) is called exactly once, before
///   [`configure`](Self::configure).
/// - Every `Ok` from [`submit_frame`](Self::submit_frame) is followed by
///   exactly one `sink.deliver(..)`, in submission order.  Delivery may
///   happen inside `submit_frame` or later from another thread.
/// - The frame is only borrowed for the duration of `submit_frame`; it is
///   overwritten by the next submission.
#[async_trait]
pub trait LandmarkProvider: Send {
    /// Install the single result handler.
    fn register_sink(&mut self, sink: ResultSink);

    /// Apply `options` and load the model.
    async fn configure(&mut self, options: &ProviderOptions) -> Result<(), ProviderError>;

    /// Hand one frame to the model.
    fn submit_frame(&mut self, frame: &Frame) -> Result<(), ProviderError>;

    /// Release the model.  Further submissions fail with
    /// [`ProviderError::Closed`].
    fn close(&mut self);
}

// Compile-time assertion: Box<dyn LandmarkProvider> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn LandmarkProvider>) {}
};
