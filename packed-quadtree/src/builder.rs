//! One-shot translation of a source quadtree into a [`PackedIndex`].
//!
//! The walk is depth-first. For every node the builder:
//! 1. compacts the node's record ids and resolves each to an offset,
//!    appending them to the shared [`OffsetBuffer`];
//! 2. releases the node's id storage;
//! 3. moves each subnode out of the source, converts it and drops it;
//! 4. assembles the [`PackedNode`] from the narrowed bounds, the offset
//!    range and the converted children.
//!
//! Only the nodes on the current recursion path are alive in the source at
//! any time. Any I/O failure aborts the whole build and nothing is returned.

use crate::config::PackedIndexConfig;
use crate::envelope::{BoxRounding, PackedBounds};
use crate::index::PackedIndex;
use crate::offset_buffer::OffsetBuffer;
use crate::packed_node::{PackedNode, NO_RECORDS};
use crate::source::{OffsetResolver, SourceNode};
use crate::types::IndexResult;

/// Builds packed indexes from source quadtrees.
///
/// # Example
///
/// ```rust
/// use packed_quadtree::{Envelope, MemoryQuadTree, PackedIndexBuilder};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut tree = MemoryQuadTree::new(Envelope::new(0.0, 0.0, 100.0, 100.0), 4);
/// tree.insert(0, Envelope::new(1.0, 1.0, 2.0, 2.0));
/// tree.insert(1, Envelope::new(60.0, 60.0, 70.0, 70.0));
///
/// let resolver = |id: u32| -> std::io::Result<i64> { Ok(i64::from(id) * 100) };
/// let index = PackedIndexBuilder::new().build(tree.into_root(), resolver)?;
///
/// let hits = index.search_offsets(&Envelope::new(0.0, 0.0, 5.0, 5.0))?;
/// assert_eq!(hits, vec![0]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct PackedIndexBuilder {
    config: PackedIndexConfig,
}

impl PackedIndexBuilder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self::with_config(PackedIndexConfig::new())
    }

    pub fn with_config(config: PackedIndexConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PackedIndexConfig {
        &self.config
    }

    /// Consumes `root` and converts it into a packed index.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Io`](crate::IndexError::Io) if the resolver or
    /// a subnode read fails. The source tree is consumed either way.
    pub fn build<S, R>(&self, root: S, mut resolver: R) -> IndexResult<PackedIndex>
    where
        S: SourceNode,
        R: OffsetResolver,
    {
        log::debug!("Packing quadtree rooted at {}", root.bounds());

        let mut translation = Translation {
            offsets: OffsetBuffer::with_capacity(self.config.initial_offset_capacity()),
            resolver: &mut resolver,
            rounding: self.config.box_rounding(),
            node_count: 0,
            max_depth: 0,
        };

        let root = match translation.translate(root, 1) {
            Ok(node) => node,
            Err(e) => {
                log::warn!(
                    "Aborting packed index build after {} nodes: {}",
                    translation.node_count,
                    e
                );
                return Err(e);
            }
        };

        log::debug!(
            "Packed {} nodes holding {} offsets (depth {})",
            translation.node_count,
            translation.offsets.size(),
            translation.max_depth
        );

        Ok(PackedIndex::new(root, translation.offsets, self.config.clone()))
    }
}

/// State of one build.
struct Translation<'a, R> {
    offsets: OffsetBuffer,
    resolver: &'a mut R,
    rounding: BoxRounding,
    node_count: u64,
    max_depth: u32,
}

impl<R: OffsetResolver> Translation<'_, R> {
    fn translate<S: SourceNode>(&mut self, mut node: S, depth: u32) -> IndexResult<PackedNode> {
        self.node_count += 1;
        self.max_depth = self.max_depth.max(depth);

        let ids = node.compact_record_ids();
        let (start, end) = if ids.is_empty() {
            (NO_RECORDS, NO_RECORDS)
        } else {
            let start = self.offsets.size();
            for &id in ids {
                let offset = self.resolver.resolve(id)?;
                self.offsets.append(offset);
            }
            (start as i64, self.offsets.size() as i64)
        };
        node.release_record_ids();

        let count = node.subnode_count();
        let mut children = Vec::with_capacity(count);
        for i in 0..count {
            let subnode = node.take_subnode(i)?;
            children.push(self.translate(subnode, depth + 1)?);
        }

        let bounds = PackedBounds::narrow(&node.bounds(), self.rounding);
        Ok(PackedNode::new(bounds, start, end, children.into_boxed_slice()))
    }
}
