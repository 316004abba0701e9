//! # Packed Quadtree - In-Memory Window Index for Shape Records
//!
//! This crate converts a mutable quadtree of shape record ids into a compact,
//! immutable index that answers rectangular window queries with the byte
//! offsets of matching records. Once built, the index performs no I/O.
//!
//! ## Features
//!
//! - **One-Shot Build**: The source tree is consumed node by node, so peak
//!   memory follows the recursion path rather than the whole source tree
//! - **Dense Nodes**: Single-precision bounds and one shared offset buffer
//!   addressed by per-node ranges
//! - **Sorted Results**: Offsets come back ascending, ready for a single
//!   forward pass over the data file
//! - **Thread Safe**: The built index is immutable; searches need no locks
//! - **Shape Index Resolver**: Offsets can be read straight from a `.shx` file
//!
//! ## Quick Start
//!
//! ```rust
//! use packed_quadtree::{Envelope, MemoryQuadTree, PackedIndexBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tree = MemoryQuadTree::new(Envelope::new(-180.0, -90.0, 180.0, 90.0), 6);
//! tree.insert(0, Envelope::new(2.2, 48.8, 2.5, 48.9));
//! tree.insert(1, Envelope::new(-74.1, 40.6, -73.8, 40.9));
//!
//! let offsets = [100_i64, 420];
//! let resolver = |id: u32| -> std::io::Result<i64> { Ok(offsets[id as usize]) };
//! let index = PackedIndexBuilder::new().build(tree.into_root(), resolver)?;
//!
//! for record in index.search(&Envelope::new(0.0, 40.0, 10.0, 50.0))? {
//!     assert_eq!(record.offset, 100);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Building from a shape index
//!
//! ```rust,no_run
//! use packed_quadtree::{Envelope, MemoryQuadTree, PackedIndexBuilder, ShxResolver};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tree = MemoryQuadTree::with_bounds(Envelope::new(0.0, 0.0, 1000.0, 1000.0));
//! tree.insert(0, Envelope::new(10.0, 10.0, 20.0, 20.0));
//!
//! let resolver = ShxResolver::open("roads.shx")?;
//! let index = PackedIndexBuilder::new().build(tree.into_root(), resolver)?;
//! let offsets = index.search_offsets(&Envelope::new(0.0, 0.0, 50.0, 50.0))?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod envelope;
pub mod index;
pub mod memory_tree;
pub mod offset_buffer;
pub mod packed_node;
pub mod query;
pub mod shx;
pub mod source;
pub mod types;

pub use builder::PackedIndexBuilder;
pub use config::PackedIndexConfig;
pub use envelope::{BoxRounding, Envelope, PackedBounds};
pub use index::PackedIndex;
pub use memory_tree::{MemoryQuadNode, MemoryQuadTree};
pub use offset_buffer::{OffsetBuffer, MIN_GROWTH_CAPACITY};
pub use packed_node::PackedNode;
pub use query::{CursorState, OffsetRecords};
pub use shx::ShxResolver;
pub use source::{OffsetResolver, SourceNode};
pub use types::{IndexError, IndexResult, IndexStats, Offset, OffsetRecord, RecordId};
