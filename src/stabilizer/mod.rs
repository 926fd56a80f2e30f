//! Temporal smoothing of per-frame classifications.
//!
//! ```text
//! frame ──should_process?──▶ provider ─▶ classifier ─▶ record(history)
//!                                                         │
//!                                             detect_swipe (centroid Δ)
//!                                                         │
//!                                               record_if_accepted ─▶ event
//! ```

pub mod history;
pub mod temporal;

pub use history::{HistoryEntry, RingBuffer};
pub use temporal::{StabilizerConfig, TemporalStabilizer, SWIPE_CONFIDENCE};
