//! Landmark provider that plays back a recorded JSON script.
//!
//! Script format:
//!
//! ```json
//! {
//!   "frames": [
//!     { "hands": [ { "handedness": "Right", "landmarks": [ {"x": 0.5, "y": 0.4, "z": 0.0}, ... ] } ] },
//!     { "hands": [] }
//!   ]
//! }
//! ```
//!
//! Every submitted frame is answered synchronously with the next recorded
//! entry; the pixels are ignored.  Once the script runs out the provider
//! either starts over (`looping`) or answers with zero hands.

use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::gesture::Hand;
use crate::pipeline::sequencer::ResultSink;

use super::{Frame, LandmarkProvider, ProviderError, ProviderOptions};

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// Hands recorded for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    #[serde(default)]
    pub hands: Vec<Hand>,
}

/// A complete recording.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    pub frames: Vec<RecordedFrame>,
}

impl ReplayScript {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading replay script {}", path.display()))?;
        let script = serde_json::from_str(&content)
            .with_context(|| format!("parsing replay script {}", path.display()))?;
        Ok(script)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ReplayProvider
// ---------------------------------------------------------------------------

/// Plays a [`ReplayScript`] back one entry per submitted frame.
pub struct ReplayProvider {
    script: ReplayScript,
    cursor: usize,
    looping: bool,
    max_hands: Option<usize>,
    sink: Option<ResultSink>,
    closed: bool,
}

impl ReplayProvider {
    pub fn new(script: ReplayScript) -> Self {
        Self {
            script,
            cursor: 0,
            looping: false,
            max_hands: None,
            sink: None,
            closed: false,
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        Ok(Self::new(ReplayScript::load(path)?))
    }

    /// Restart from the first entry once the script is exhausted.
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// `true` once every entry has been played (never for a looping replay).
    pub fn is_exhausted(&self) -> bool {
        !self.looping && self.cursor >= self.script.len()
    }

    pub fn remaining(&self) -> usize {
        self.script.len().saturating_sub(self.cursor)
    }

    fn next_hands(&mut self) -> Vec<Hand> {
        if self.cursor >= self.script.len() {
            if !self.looping || self.script.is_empty() {
                return Vec::new();
            }
            self.cursor = 0;
        }
        let mut hands = self.script.frames[self.cursor].hands.clone();
        self.cursor += 1;
        if let Some(max) = self.max_hands {
            hands.truncate(max);
        }
        hands
    }
}

#[async_trait]
impl LandmarkProvider for ReplayProvider {
    fn register_sink(&mut self, sink: ResultSink) {
        if self.sink.is_some() {
            log::warn!("replay: result sink replaced");
        }
        self.sink = Some(sink);
    }

    async fn configure(&mut self, options: &ProviderOptions) -> Result<(), ProviderError> {
        options.validate().map_err(ProviderError::Configure)?;
        self.max_hands = Some(options.max_hands);
        log::info!(
            "replay: configured with {} recorded frames (max_hands={}, looping={})",
            self.script.len(),
            options.max_hands,
            self.looping
        );
        Ok(())
    }

    fn submit_frame(&mut self, _frame: &Frame) -> Result<(), ProviderError> {
        if self.closed {
            return Err(ProviderError::Closed);
        }
        if self.max_hands.is_none() {
            return Err(ProviderError::NotConfigured);
        }
        let sink = self.sink.clone().ok_or(ProviderError::NotConfigured)?;
        let hands = self.next_hands();
        sink.deliver(hands);
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
        self.sink = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
