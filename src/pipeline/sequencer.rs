//! FIFO correlation of submitted frames with provider results.
//!
//! The provider reports every result through one [`ResultSink`] and gives no
//! hint which frame it belongs to.  [`ResultSequencer::submit`] tags each
//! submission with a fresh [`RequestId`] and queues a oneshot resolver
//! *before* handing the frame over; the sink pops the oldest resolver for
//! every delivery and stamps the result with that id.
//!
//! ```text
//! submit(F1) ─▶ queue [1]        ─▶ provider.submit_frame(F1)
//! submit(F2) ─▶ queue [1, 2]     ─▶ provider.submit_frame(F2)
//! sink.deliver(R) ─▶ pop 1 ─▶ PendingResult(1) resolves with {request: 1, R}
//! sink.deliver(R') ─▶ pop 2 ─▶ PendingResult(2) resolves with {request: 2, R'}
//! ```
//!
//! Correctness relies on the provider answering in order and never dropping
//! a frame.  A dropped frame shifts every later result onto the wrong
//! request; a provider that never answers stalls the queue head forever
//! (no timeout is imposed).

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tokio::sync::oneshot;

use crate::gesture::Hand;
use crate::provider::{Frame, LandmarkProvider, ProviderError};

// ---------------------------------------------------------------------------
// RequestId / LandmarkResult
// ---------------------------------------------------------------------------

/// Identifier assigned to one submission, increasing per sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Landmarks for one submitted frame.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkResult {
    /// The submission this result was matched to.
    pub request: RequestId,
    pub hands: Vec<Hand>,
}

// ---------------------------------------------------------------------------
// SequencerError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SequencerError {
    /// The provider refused the frame; nothing was queued.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The pending queue was cleared before a result arrived.
    #[error("request {0} was cancelled before its result arrived")]
    Cancelled(RequestId),
}

// ---------------------------------------------------------------------------
// Pending queue
// ---------------------------------------------------------------------------

struct PendingRequest {
    id: RequestId,
    resolve: oneshot::Sender<LandmarkResult>,
}

type PendingQueue = Arc<Mutex<VecDeque<PendingRequest>>>;

fn lock(queue: &PendingQueue) -> MutexGuard<'_, VecDeque<PendingRequest>> {
    // The queue holds no invariant a panicking holder could break halfway.
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// ResultSink
// ---------------------------------------------------------------------------

/// The provider's result handler.  Cheap to clone; every clone feeds the
/// same queue.
#[derive(Clone)]
pub struct ResultSink {
    pending: PendingQueue,
}

impl fmt::Debug for ResultSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSink")
            .field("pending", &lock(&self.pending).len())
            .finish()
    }
}

impl ResultSink {
    /// Resolve the oldest pending submission with `hands`.
    ///
    /// Returns the id it was matched to, or `None` when nothing is pending
    /// (the result is discarded).
    pub fn deliver(&self, hands: Vec<Hand>) -> Option<RequestId> {
        let Some(next) = lock(&self.pending).pop_front() else {
            log::warn!("sequencer: result arrived with no pending request, discarded");
            return None;
        };

        let id = next.id;
        if next.resolve.send(LandmarkResult { request: id, hands }).is_err() {
            log::debug!("sequencer: request {id} was abandoned by its caller");
        }
        Some(id)
    }
}

// ---------------------------------------------------------------------------
// PendingResult
// ---------------------------------------------------------------------------

/// Handle to the not-yet-delivered result of one submission.
#[derive(Debug)]
pub struct PendingResult {
    id: RequestId,
    rx: oneshot::Receiver<LandmarkResult>,
}

impl PendingResult {
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Wait for the provider's answer to this submission.
    pub async fn wait(self) -> Result<LandmarkResult, SequencerError> {
        let id = self.id;
        let result = self.rx.await.map_err(|_| SequencerError::Cancelled(id))?;
        debug_assert_eq!(result.request, id);
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// ResultSequencer
// ---------------------------------------------------------------------------

/// Owner of the pending request queue.
pub struct ResultSequencer {
    pending: PendingQueue,
    next_id: u64,
}

impl Default for ResultSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultSequencer {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(Mutex::new(VecDeque::new())),
            next_id: 1,
        }
    }

    /// The handler to register with the provider.
    pub fn sink(&self) -> ResultSink {
        ResultSink {
            pending: Arc::clone(&self.pending),
        }
    }

    /// Queue a resolver for `frame`, then hand the frame to `provider`.
    ///
    /// The queue lock is released before calling the provider, so a provider
    /// that answers synchronously from inside `submit_frame` works.  When the
    /// provider refuses the frame, the resolver is withdrawn again.
    pub fn submit(
        &mut self,
        provider: &mut dyn LandmarkProvider,
        frame: &Frame,
    ) -> Result<PendingResult, SequencerError> {
        let id = RequestId(self.next_id);
        self.next_id += 1;

        let (tx, rx) = oneshot::channel();
        lock(&self.pending).push_back(PendingRequest { id, resolve: tx });

        if let Err(e) = provider.submit_frame(frame) {
            lock(&self.pending).retain(|p| p.id != id);
            log::warn!("sequencer: provider refused request {id}: {e}");
            return Err(e.into());
        }

        log::trace!(
            "sequencer: submitted {id} ({}x{}), {} pending",
            frame.width(),
            frame.height(),
            self.pending_len()
        );
        Ok(PendingResult { id, rx })
    }

    /// Number of submissions still waiting for a result.
    pub fn pending_len(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Drop every pending resolver; their waiters get
    /// [`SequencerError::Cancelled`].  Returns how many were dropped.
    pub fn clear(&self) -> usize {
        let mut queue = lock(&self.pending);
        let dropped = queue.len();
        queue.clear();
        dropped
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
