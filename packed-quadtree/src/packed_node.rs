//! Immutable nodes of a packed quadtree.

use crate::envelope::{Envelope, PackedBounds};

/// Range marker for nodes without local records.
pub(crate) const NO_RECORDS: i64 = -1;

/// A node of the packed tree.
///
/// Holds its bounds in single precision, a `[start, end)` range into the
/// index's shared offset buffer, and its children. `start == end == -1`
/// marks a node with no local records.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedNode {
    bounds: PackedBounds,
    start: i64,
    end: i64,
    children: Box<[PackedNode]>,
}

impl PackedNode {
    pub(crate) fn new(
        bounds: PackedBounds,
        start: i64,
        end: i64,
        children: Box<[PackedNode]>,
    ) -> Self {
        Self {
            bounds,
            start,
            end,
            children,
        }
    }

    /// Pruning test against a query window.
    ///
    /// Answers whether any record stored under this node *may* intersect the
    /// query. Records still need an exact geometry test downstream.
    #[inline]
    pub fn intersects(&self, query: &Envelope) -> bool {
        self.bounds.intersects(query)
    }

    pub fn bounds(&self) -> &PackedBounds {
        &self.bounds
    }

    /// The `[start, end)` range of local offsets, or `None` for a node
    /// without local records.
    pub fn range(&self) -> Option<(i64, i64)> {
        if self.start == NO_RECORDS && self.end == NO_RECORDS {
            None
        } else {
            Some((self.start, self.end))
        }
    }

    pub fn children(&self) -> &[PackedNode] {
        &self.children
    }

    /// Number of offsets stored directly on this node.
    pub fn local_count(&self) -> usize {
        match self.range() {
            Some((start, end)) if end > start => (end - start) as usize,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::BoxRounding;

    fn bounds(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> PackedBounds {
        PackedBounds::narrow(&Envelope::new(min_x, min_y, max_x, max_y), BoxRounding::Nearest)
    }

    #[test]
    fn test_empty_range_sentinel() {
        let node = PackedNode::new(bounds(0.0, 0.0, 1.0, 1.0), NO_RECORDS, NO_RECORDS, Box::new([]));
        assert_eq!(node.range(), None);
        assert_eq!(node.local_count(), 0);
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_range_and_count() {
        let node = PackedNode::new(bounds(0.0, 0.0, 1.0, 1.0), 3, 7, Box::new([]));
        assert_eq!(node.range(), Some((3, 7)));
        assert_eq!(node.local_count(), 4);
    }

    #[test]
    fn test_intersects_widens_bounds() {
        let node = PackedNode::new(bounds(0.0, 0.0, 10.0, 10.0), NO_RECORDS, NO_RECORDS, Box::new([]));
        assert!(node.intersects(&Envelope::new(5.0, 5.0, 15.0, 15.0)));
        assert!(node.intersects(&Envelope::new(10.0, 10.0, 20.0, 20.0)));
        assert!(!node.intersects(&Envelope::new(10.5, 0.0, 20.0, 10.0)));
        assert!(!node.intersects(&Envelope::new(0.0, -3.0, 10.0, -0.5)));
    }

    #[test]
    fn test_children_owned() {
        let leaf = PackedNode::new(bounds(0.0, 0.0, 1.0, 1.0), 0, 1, Box::new([]));
        let root = PackedNode::new(
            bounds(0.0, 0.0, 2.0, 2.0),
            NO_RECORDS,
            NO_RECORDS,
            vec![leaf.clone()].into_boxed_slice(),
        );
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.children()[0], leaf);
    }
}
