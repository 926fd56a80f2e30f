//! Fixed-capacity history of recently classified frames.
//!
//! When the buffer is full, a new entry **overwrites** the oldest one so that
//! the most recent `capacity` frames are always available, in chronological
//! order, for motion analysis.
//!
//! # Example
//!
//! ```rust
//! use gesture_control::stabilizer::RingBuffer;
//!
//! let mut buf = RingBuffer::new(3);
//! for i in 1..=5 {
//!     buf.push(i);
//! }
//! assert_eq!(buf.to_vec(), vec![3, 4, 5]);
//! ```

use crate::gesture::GestureType;

// ---------------------------------------------------------------------------
// HistoryEntry
// ---------------------------------------------------------------------------

/// One classified frame as remembered by the stabilizer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HistoryEntry {
    pub gesture_type: GestureType,
    /// Palm centroid in normalized image coordinates; `None` when no complete
    /// hand was in view.
    pub centroid: Option<(f32, f32)>,
    pub timestamp: u64,
}

// ---------------------------------------------------------------------------
// RingBuffer
// ---------------------------------------------------------------------------

/// A fixed-capacity circular buffer.
///
/// Generic over `T: Copy + Default`; the stabilizer stores
/// `RingBuffer<HistoryEntry>`.
///
/// ## Overflow behaviour
///
/// When [`push`](Self::push) would exceed `capacity`, the oldest entry is
/// silently overwritten.  The buffer never allocates beyond its initial
/// capacity.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    buf: Vec<T>,
    capacity: usize,
    /// Index of the *next* write position (wraps around `capacity`).
    write_pos: usize,
    /// Number of valid entries currently stored (≤ `capacity`).
    len: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// Create a new ring buffer with the given `capacity`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingBuffer capacity must be > 0");
        Self {
            buf: vec![T::default(); capacity],
            capacity,
            write_pos: 0,
            len: 0,
        }
    }

    /// Append one entry, overwriting the oldest when full.
    pub fn push(&mut self, item: T) {
        self.buf[self.write_pos] = item;
        self.write_pos = (self.write_pos + 1) % self.capacity;
        if self.len < self.capacity {
            self.len += 1;
        }
    }

    /// Iterate over stored entries from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        // Before the first overflow, valid data starts at 0.  Afterwards the
        // oldest entry sits where the next write would go.
        let read_pos = if self.len < self.capacity {
            0
        } else {
            self.write_pos
        };
        (0..self.len).map(move |i| &self.buf[(read_pos + i) % self.capacity])
    }

    /// The `n` newest entries, oldest first.  Fewer when not enough are stored.
    pub fn latest(&self, n: usize) -> impl Iterator<Item = &T> + '_ {
        self.iter().skip(self.len.saturating_sub(n))
    }

    /// The most recently pushed entry.
    pub fn last(&self) -> Option<&T> {
        self.iter().next_back()
    }

    /// Copy all entries out, oldest first, without clearing.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().copied().collect()
    }

    /// Discard all entries and reset the write position.
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `true` once the next push would overwrite the oldest entry.
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_within_capacity_keeps_order() {
        let mut buf = RingBuffer::new(8);
        buf.push(1);
        buf.push(2);
        buf.push(3);
        assert_eq!(buf.len(), 3);
        assert!(!buf.is_full());
        assert_eq!(buf.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn overflow_drops_oldest() {
        let mut buf = RingBuffer::new(4);
        for i in 1..=5 {
            buf.push(i);
        }
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.to_vec(), vec![2, 3, 4, 5]);
    }

    #[test]
    fn length_never_exceeds_capacity() {
        let mut buf = RingBuffer::new(10);
        for i in 0..137 {
            buf.push(i);
            assert!(buf.len() <= buf.capacity());
        }
        assert!(buf.is_full());
        assert_eq!(buf.to_vec(), (127..137).collect::<Vec<_>>());
    }

    #[test]
    fn latest_returns_newest_in_chronological_order() {
        let mut buf = RingBuffer::new(5);
        for i in 1..=7 {
            buf.push(i);
        }
        assert_eq!(buf.latest(2).copied().collect::<Vec<_>>(), vec![6, 7]);
        assert_eq!(buf.latest(99).count(), 5);
        assert_eq!(buf.last(), Some(&7));
    }

    #[test]
    fn clear_resets_state() {
        let mut buf = RingBuffer::new(3);
        buf.push(1);
        buf.push(2);
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.last(), None);

        buf.push(9);
        assert_eq!(buf.to_vec(), vec![9]);
    }

    #[test]
    fn history_entries_default_to_none() {
        let buf: RingBuffer<HistoryEntry> = RingBuffer::new(2);
        assert!(buf.is_empty());
        assert_eq!(HistoryEntry::default().gesture_type, GestureType::None);
    }

    #[test]
    #[should_panic(expected = "RingBuffer capacity must be > 0")]
    fn zero_capacity_panics() {
        let _buf: RingBuffer<u8> = RingBuffer::new(0);
    }
}
