//! Growable buffer of 64-bit offsets.
//!
//! One buffer holds every offset of a packed index; nodes refer to it by
//! `[start, end)` ranges. Queries use a private buffer of their own as an
//! accumulator.

use crate::types::{IndexError, IndexResult, Offset};

/// Smallest capacity allocated on the first growth.
pub const MIN_GROWTH_CAPACITY: usize = 10;

/// Capacity to grow to once `current` is full.
#[inline]
fn next_capacity(current: usize) -> usize {
    (current + current / 2).max(MIN_GROWTH_CAPACITY)
}

/// An append-only array of offsets with an explicit 1.5x growth policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetBuffer {
    values: Vec<Offset>,
}

impl OffsetBuffer {
    /// Creates an empty buffer without allocating.
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Creates an empty buffer with room for `capacity` offsets.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    /// Appends an offset and returns its position.
    pub fn append(&mut self, value: Offset) -> usize {
        self.reserve_for(1);
        let position = self.values.len();
        self.values.push(value);
        position
    }

    /// Appends a run of offsets.
    pub fn extend_from_slice(&mut self, values: &[Offset]) {
        self.reserve_for(values.len());
        self.values.extend_from_slice(values);
    }

    /// Returns the offset at `index`.
    pub fn get(&self, index: usize) -> IndexResult<Offset> {
        self.values
            .get(index)
            .copied()
            .ok_or(IndexError::OutOfRange {
                index,
                len: self.values.len(),
            })
    }

    /// Returns the offsets in `[start, end)`.
    pub fn slice(&self, start: usize, end: usize) -> IndexResult<&[Offset]> {
        let len = self.values.len();
        if start > end {
            return Err(IndexError::OutOfRange { index: start, len });
        }
        self.values
            .get(start..end)
            .ok_or(IndexError::OutOfRange { index: end, len })
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.values.capacity()
    }

    /// Resets the length to zero, keeping the allocation.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Sorts the stored offsets in ascending order.
    pub fn sort_ascending(&mut self) {
        self.values.sort_unstable();
    }

    pub fn as_slice(&self) -> &[Offset] {
        &self.values
    }

    pub(crate) fn into_vec(self) -> Vec<Offset> {
        self.values
    }

    fn reserve_for(&mut self, additional: usize) {
        let required = self.values.len() + additional;
        let mut capacity = self.values.capacity();
        if required <= capacity {
            return;
        }
        while capacity < required {
            capacity = next_capacity(capacity);
        }
        self.values.reserve_exact(capacity - self.values.len());
    }
}
