//! Mutable in-memory quadtree of record ids.
//!
//! Records are placed in the deepest quadrant that fully contains their
//! envelope, down to a fixed depth. Removal leaves a tombstone that is only
//! dropped when the node is compacted. The tree implements [`SourceNode`]
//! so it can be packed like a tree read from disk.

use std::io;

use crate::envelope::Envelope;
use crate::source::SourceNode;
use crate::types::RecordId;

/// Default maximum number of levels, root included
pub const DEFAULT_MAX_DEPTH: u32 = 8;

/// A quadtree being assembled before it is packed.
#[derive(Debug, Clone)]
pub struct MemoryQuadTree {
    root: MemoryQuadNode,
    max_depth: u32,
    len: usize,
}

impl MemoryQuadTree {
    /// Creates an empty tree covering `bounds` with at most `max_depth`
    /// levels. A depth of 0 is treated as 1.
    pub fn new(bounds: Envelope, max_depth: u32) -> Self {
        Self {
            root: MemoryQuadNode::new(bounds),
            max_depth: max_depth.max(1),
            len: 0,
        }
    }

    /// Creates an empty tree with [`DEFAULT_MAX_DEPTH`] levels.
    pub fn with_bounds(bounds: Envelope) -> Self {
        Self::new(bounds, DEFAULT_MAX_DEPTH)
    }

    pub fn bounds(&self) -> Envelope {
        self.root.bounds
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Number of live (not removed) records.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts a record.
    ///
    /// Records outside the tree bounds are kept on the root, whose bounds
    /// grow to include them.
    pub fn insert(&mut self, record_id: RecordId, envelope: Envelope) {
        if self.root.bounds.contains(&envelope) {
            self.root.insert(record_id, &envelope, self.max_depth);
        } else {
            self.root.bounds = self.root.bounds.union(&envelope);
            self.root.slots.push(Some(record_id));
        }
        self.len += 1;
    }

    /// Tombstones the first entry for `record_id`. Returns false if the id
    /// is not in the tree.
    pub fn remove(&mut self, record_id: RecordId) -> bool {
        let removed = self.root.remove(record_id);
        if removed {
            self.len -= 1;
        }
        removed
    }

    pub fn root(&self) -> &MemoryQuadNode {
        &self.root
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Hands the root over, typically to a
    /// [`PackedIndexBuilder`](crate::PackedIndexBuilder).
    pub fn into_root(self) -> MemoryQuadNode {
        self.root
    }
}

/// A node of a [`MemoryQuadTree`].
#[derive(Debug, Clone)]
pub struct MemoryQuadNode {
    bounds: Envelope,
    slots: Vec<Option<RecordId>>,
    compacted: Vec<RecordId>,
    children: Vec<Option<MemoryQuadNode>>,
}

impl MemoryQuadNode {
    fn new(bounds: Envelope) -> Self {
        Self {
            bounds,
            slots: Vec::new(),
            compacted: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Live record ids stored directly on this node.
    pub fn record_ids(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.compacted
            .iter()
            .copied()
            .chain(self.slots.iter().flatten().copied())
    }

    /// Children still attached to this node.
    pub fn children(&self) -> impl Iterator<Item = &MemoryQuadNode> {
        self.children.iter().flatten()
    }

    fn node_count(&self) -> usize {
        1 + self.children().map(MemoryQuadNode::node_count).sum::<usize>()
    }

    fn insert(&mut self, record_id: RecordId, envelope: &Envelope, levels: u32) {
        if levels > 1 {
            let quadrant = self
                .bounds
                .quadrants()
                .into_iter()
                .find(|q| q.contains(envelope));

            if let Some(quadrant) = quadrant {
                let position = self
                    .children
                    .iter()
                    .position(|c| matches!(c, Some(child) if child.bounds == quadrant));
                let position = match position {
                    Some(p) => p,
                    None => {
                        self.children.push(Some(MemoryQuadNode::new(quadrant)));
                        self.children.len() - 1
                    }
                };
                if let Some(child) = self.children[position].as_mut() {
                    child.insert(record_id, envelope, levels - 1);
                    return;
                }
            }
        }
        self.slots.push(Some(record_id));
    }

    fn remove(&mut self, record_id: RecordId) -> bool {
        if let Some(slot) = self.slots.iter_mut().find(|s| **s == Some(record_id)) {
            *slot = None;
            return true;
        }
        if let Some(position) = self.compacted.iter().position(|&id| id == record_id) {
            self.compacted.remove(position);
            return true;
        }
        self.children
            .iter_mut()
            .flatten()
            .any(|child| child.remove(record_id))
    }
}

impl SourceNode for MemoryQuadNode {
    fn bounds(&self) -> Envelope {
        self.bounds
    }

    fn compact_record_ids(&mut self) -> &[RecordId] {
        let live = self.slots.drain(..).flatten();
        self.compacted.extend(live);
        &self.compacted
    }

    fn release_record_ids(&mut self) {
        self.slots = Vec::new();
        self.compacted = Vec::new();
    }

    fn subnode_count(&self) -> usize {
        self.children.len()
    }

    fn take_subnode(&mut self, index: usize) -> io::Result<Self> {
        self.children
            .get_mut(index)
            .and_then(Option::take)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("subnode {} already released or missing", index),
                )
            })
    }
}
