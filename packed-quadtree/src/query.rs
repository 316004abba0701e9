//! Window search over a packed tree.
//!
//! The walk collects every offset stored on nodes whose bounds intersect the
//! query, then sorts them so the caller can read the data file front to
//! back. Results are collected eagerly and handed out through
//! [`OffsetRecords`].

use std::iter::FusedIterator;

use crate::envelope::Envelope;
use crate::offset_buffer::OffsetBuffer;
use crate::packed_node::PackedNode;
use crate::types::{IndexError, IndexResult, Offset, OffsetRecord};

/// Appends the offsets under `node` that may intersect `query` to `hits`,
/// in tree order.
pub(crate) fn collect_intersecting(
    node: &PackedNode,
    offsets: &OffsetBuffer,
    query: &Envelope,
    hits: &mut OffsetBuffer,
) -> IndexResult<()> {
    if !node.intersects(query) {
        return Ok(());
    }

    if let Some((start, end)) = node.range() {
        hits.extend_from_slice(local_offsets(offsets, start, end)?);
    }

    for child in node.children() {
        collect_intersecting(child, offsets, query, hits)?;
    }
    Ok(())
}

fn local_offsets(offsets: &OffsetBuffer, start: i64, end: i64) -> IndexResult<&[Offset]> {
    let (Ok(lo), Ok(hi)) = (usize::try_from(start), usize::try_from(end)) else {
        return Err(IndexError::Corrupt(format!(
            "negative offset range [{}, {})",
            start, end
        )));
    };
    offsets.slice(lo, hi).map_err(|e| {
        IndexError::Corrupt(format!("node range [{}, {}) is invalid: {}", start, end, e))
    })
}

/// Position of an [`OffsetRecords`] cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// No record has been read yet.
    NotStarted,
    /// The record at this position was the last one returned.
    Positioned(usize),
    /// Every record has been returned.
    Exhausted,
}

/// Sorted search results, read once from front to back.
///
/// Every item pairs the index's record tag with an offset. Dropping the
/// cursor (or calling [`close`](OffsetRecords::close)) releases the
/// results; searching again yields a fresh cursor.
#[derive(Debug)]
pub struct OffsetRecords {
    tag: i32,
    offsets: Vec<Offset>,
    state: CursorState,
}

impl OffsetRecords {
    pub(crate) fn new(tag: i32, hits: OffsetBuffer) -> Self {
        Self {
            tag,
            offsets: hits.into_vec(),
            state: CursorState::NotStarted,
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Offsets not yet returned.
    pub fn offsets(&self) -> &[Offset] {
        let next = self.next_position().unwrap_or(self.offsets.len());
        &self.offsets[next.min(self.offsets.len())..]
    }

    /// Stops reading and releases the results.
    pub fn close(self) {}

    fn next_position(&self) -> Option<usize> {
        match self.state {
            CursorState::NotStarted => Some(0),
            CursorState::Positioned(i) => Some(i + 1),
            CursorState::Exhausted => None,
        }
    }
}

impl Iterator for OffsetRecords {
    type Item = OffsetRecord;

    fn next(&mut self) -> Option<OffsetRecord> {
        let position = self.next_position()?;
        match self.offsets.get(position) {
            Some(&offset) => {
                self.state = CursorState::Positioned(position);
                Some(OffsetRecord {
                    tag: self.tag,
                    offset,
                })
            }
            None => {
                self.state = CursorState::Exhausted;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.offsets().len();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for OffsetRecords {}

impl FusedIterator for OffsetRecords {}
