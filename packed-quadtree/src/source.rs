//! Traits for the collaborators the builder consumes.
//!
//! A [`SourceNode`] is one node of a mutable, usually disk-resident quadtree.
//! An [`OffsetResolver`] maps its record ids to byte offsets in the data
//! file. Both are only used while a packed index is being built.

use std::io;

use crate::envelope::Envelope;
use crate::types::{Offset, RecordId};

/// A node of the quadtree a packed index is built from.
///
/// The builder takes nodes by value and tears them down as it goes: local
/// ids are released once resolved, and every subnode is moved out with
/// [`take_subnode`](SourceNode::take_subnode) and dropped after conversion.
pub trait SourceNode: Sized {
    /// Bounds of everything stored at or below this node.
    fn bounds(&self) -> Envelope;

    /// Drops tombstoned entries and returns the definitive local record ids.
    fn compact_record_ids(&mut self) -> &[RecordId];

    /// Frees the local record id storage.
    fn release_record_ids(&mut self);

    fn subnode_count(&self) -> usize;

    /// Moves the subnode at `index` out of this node.
    ///
    /// Disk-resident trees read subnodes lazily, so this may fail.
    fn take_subnode(&mut self, index: usize) -> io::Result<Self>;
}

/// Maps record ids to byte offsets in the companion data file.
pub trait OffsetResolver {
    fn resolve(&mut self, record_id: RecordId) -> io::Result<Offset>;
}

impl<F> OffsetResolver for F
where
    F: FnMut(RecordId) -> io::Result<Offset>,
{
    fn resolve(&mut self, record_id: RecordId) -> io::Result<Offset> {
        self(record_id)
    }
}
