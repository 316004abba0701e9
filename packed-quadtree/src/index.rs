use std::sync::Arc;

use crate::config::PackedIndexConfig;
use crate::envelope::Envelope;
use crate::offset_buffer::OffsetBuffer;
use crate::packed_node::PackedNode;
use crate::query::{collect_intersecting, OffsetRecords};
use crate::types::{IndexResult, IndexStats, Offset};

/// An immutable packed quadtree: the root node plus the offset buffer every
/// node points into.
///
/// Built once by [`PackedIndexBuilder`](crate::PackedIndexBuilder), then
/// shared freely. Clones share the same tree. Searches take `&self` and
/// allocate their own result buffer, so any number of threads may search the
/// same index at once.
#[derive(Debug, Clone)]
pub struct PackedIndex {
    inner: Arc<PackedIndexInner>,
}

#[derive(Debug)]
struct PackedIndexInner {
    root: PackedNode,
    offsets: OffsetBuffer,
    config: PackedIndexConfig,
}

impl PackedIndex {
    pub(crate) fn new(root: PackedNode, offsets: OffsetBuffer, config: PackedIndexConfig) -> Self {
        Self {
            inner: Arc::new(PackedIndexInner {
                root,
                offsets,
                config,
            }),
        }
    }

    /// Finds the offsets of every record that may intersect `query`, in
    /// ascending order, each tagged with the configured record tag.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Corrupt`](crate::IndexError::Corrupt) if a node
    /// refers to offsets outside the buffer.
    pub fn search(&self, query: &Envelope) -> IndexResult<OffsetRecords> {
        let mut hits = OffsetBuffer::new();
        self.search_into(query, &mut hits)?;
        Ok(OffsetRecords::new(self.inner.config.record_tag(), hits))
    }

    /// Like [`search`](Self::search) but returns the bare offsets.
    pub fn search_offsets(&self, query: &Envelope) -> IndexResult<Vec<Offset>> {
        let mut hits = OffsetBuffer::new();
        self.search_into(query, &mut hits)?;
        Ok(hits.into_vec())
    }

    /// Runs a search into a caller-owned buffer, replacing its contents.
    ///
    /// Lets a caller issuing many queries reuse one allocation. On error the
    /// buffer is left empty.
    pub fn search_into(&self, query: &Envelope, hits: &mut OffsetBuffer) -> IndexResult<()> {
        hits.clear();
        if let Err(e) = collect_intersecting(&self.inner.root, &self.inner.offsets, query, hits) {
            hits.clear();
            return Err(e);
        }
        hits.sort_ascending();
        log::trace!("Search {} matched {} offsets", query, hits.size());
        Ok(())
    }

    /// True when `query` encloses the whole index, so every record matches.
    pub fn covers(&self, query: &Envelope) -> bool {
        query.contains(&self.bounds())
    }

    /// Root bounds widened back to double precision.
    pub fn bounds(&self) -> Envelope {
        self.inner.root.bounds().widen()
    }

    /// Number of stored offsets.
    pub fn len(&self) -> usize {
        self.inner.offsets.size()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.offsets.is_empty()
    }

    pub fn root(&self) -> &PackedNode {
        &self.inner.root
    }

    /// All stored offsets in tree order.
    pub fn offsets(&self) -> &[Offset] {
        self.inner.offsets.as_slice()
    }

    pub fn config(&self) -> &PackedIndexConfig {
        &self.inner.config
    }

    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats {
            offset_count: self.inner.offsets.size() as u64,
            ..IndexStats::default()
        };
        gather_stats(&self.inner.root, 1, &mut stats);
        stats
    }
}

fn gather_stats(node: &PackedNode, depth: u32, stats: &mut IndexStats) {
    stats.node_count += 1;
    if node.range().is_none() {
        stats.empty_node_count += 1;
    }
    stats.depth = stats.depth.max(depth);
    for child in node.children() {
        gather_stats(child, depth + 1, stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::PackedIndexBuilder;
    use crate::memory_tree::MemoryQuadTree;
    use crate::types::{OffsetRecord, RecordId};
    use std::io;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_index_is_send_and_sync() {
        assert_send_sync::<PackedIndex>();
        assert_send_sync::<PackedNode>();
        assert_send_sync::<OffsetBuffer>();
    }

    /// Four records keyed 0..4 whose offsets are id * 64.
    fn four_record_index() -> PackedIndex {
        let mut tree = MemoryQuadTree::new(Envelope::new(0.0, 0.0, 128.0, 128.0), 4);
        tree.insert(0, Envelope::new(0.0, 0.0, 10.0, 10.0));
        tree.insert(1, Envelope::new(20.0, 20.0, 30.0, 30.0));
        tree.insert(2, Envelope::new(5.0, 5.0, 15.0, 15.0));
        tree.insert(3, Envelope::new(100.0, 100.0, 110.0, 110.0));
        PackedIndexBuilder::new()
            .build(tree.into_root(), |id: RecordId| -> io::Result<Offset> {
                Ok(Offset::from(id) * 64)
            })
            .unwrap()
    }

    #[test]
    fn test_clone_shares_tree() {
        let index = four_record_index();
        let clone = index.clone();
        assert!(Arc::ptr_eq(&index.inner, &clone.inner));
        assert!(std::ptr::eq(index.root(), clone.root()));
        assert_eq!(
            clone.search_offsets(&Envelope::new(0.0, 0.0, 12.0, 12.0)).unwrap(),
            vec![0, 128]
        );
    }

    #[test]
    fn test_search_window() {
        let index = four_record_index();
        let hits = index.search_offsets(&Envelope::new(0.0, 0.0, 12.0, 12.0)).unwrap();
        assert_eq!(hits, vec![0, 128]);
    }

    #[test]
    fn test_search_emits_tagged_records() {
        let index = four_record_index();
        let records: Vec<_> = index
            .search(&Envelope::new(0.0, 0.0, 12.0, 12.0))
            .unwrap()
            .collect();
        assert_eq!(
            records,
            vec![
                OffsetRecord { tag: 0, offset: 0 },
                OffsetRecord { tag: 0, offset: 128 }
            ]
        );
    }

    #[test]
    fn test_search_disjoint() {
        let index = four_record_index();
        let mut records = index.search(&Envelope::new(1000.0, 1000.0, 1001.0, 1001.0)).unwrap();
        assert_eq!(records.len(), 0);
        assert!(records.next().is_none());
    }

    #[test]
    fn test_search_into_reuses_buffer() {
        let index = four_record_index();
        let mut hits = OffsetBuffer::new();

        index.search_into(&Envelope::new(-1.0, -1.0, 200.0, 200.0), &mut hits).unwrap();
        assert_eq!(hits.as_slice(), &[0, 64, 128, 192]);
        let capacity = hits.capacity();

        index.search_into(&Envelope::new(99.0, 99.0, 101.0, 101.0), &mut hits).unwrap();
        assert_eq!(hits.as_slice(), &[192]);
        assert_eq!(hits.capacity(), capacity);
    }

    #[test]
    fn test_covers() {
        let index = four_record_index();
        assert!(index.covers(&Envelope::new(-1.0, -1.0, 200.0, 200.0)));
        assert!(index.covers(&index.bounds()));
        assert!(!index.covers(&Envelope::new(0.0, 0.0, 12.0, 12.0)));
    }

    #[test]
    fn test_stats() {
        let index = four_record_index();
        let stats = index.stats();
        assert_eq!(stats.offset_count, 4);
        assert_eq!(index.len(), 4);
        assert!(!index.is_empty());
        assert!(stats.node_count >= 2);
        assert!(stats.empty_node_count < stats.node_count);
        assert!(stats.depth >= 2 && stats.depth <= 4);
    }

    #[test]
    fn test_empty_source_tree() {
        let tree = MemoryQuadTree::new(Envelope::new(0.0, 0.0, 1.0, 1.0), 4);
        let index = PackedIndexBuilder::new()
            .build(tree.into_root(), |_: RecordId| -> io::Result<Offset> { Ok(0) })
            .unwrap();

        assert!(index.is_empty());
        assert_eq!(index.root().range(), None);
        assert_eq!(
            index.stats(),
            IndexStats {
                node_count: 1,
                empty_node_count: 1,
                offset_count: 0,
                depth: 1,
            }
        );
        assert!(index.search_offsets(&Envelope::new(0.0, 0.0, 1.0, 1.0)).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_index_reports_fault_without_partial_results() {
        use crate::envelope::{BoxRounding, PackedBounds};

        let bounds = PackedBounds::narrow(&Envelope::new(0.0, 0.0, 10.0, 10.0), BoxRounding::Nearest);
        let good = PackedNode::new(bounds, 0, 1, Box::new([]));
        let bad = PackedNode::new(bounds, 1, 9, Box::new([]));
        let root = PackedNode::new(bounds, -1, -1, vec![good, bad].into_boxed_slice());
        let mut offsets = OffsetBuffer::new();
        offsets.append(64);
        let index = PackedIndex::new(root, offsets, PackedIndexConfig::default());

        let mut hits = OffsetBuffer::new();
        let err = index.search_into(&Envelope::new(0.0, 0.0, 10.0, 10.0), &mut hits).unwrap_err();
        assert!(err.is_corrupt());
        assert!(hits.is_empty());
        assert!(index.search(&Envelope::new(0.0, 0.0, 10.0, 10.0)).is_err());
    }
}
