//! Packed index configuration.
//!
//! The configuration is fixed when the builder is created and travels with
//! the built index, which reads the record tag from it on every search.

use serde::{Deserialize, Serialize};

use crate::envelope::BoxRounding;

/// Default record tag emitted with every offset: 0
pub const DEFAULT_RECORD_TAG: i32 = 0;

/// Default initial capacity of the shared offset buffer: 0 (grow on demand)
pub const DEFAULT_INITIAL_OFFSET_CAPACITY: usize = 0;

/// Build and query settings for a packed index.
///
/// # Example
///
/// ```rust
/// use packed_quadtree::{BoxRounding, PackedIndexConfig};
///
/// let config = PackedIndexConfig::new()
///     .with_record_tag(1)
///     .with_box_rounding(BoxRounding::Outward)
///     .with_initial_offset_capacity(4096);
/// assert_eq!(config.record_tag(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedIndexConfig {
    record_tag: i32,
    box_rounding: BoxRounding,
    initial_offset_capacity: usize,
}

impl Default for PackedIndexConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PackedIndexConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self {
            record_tag: DEFAULT_RECORD_TAG,
            box_rounding: BoxRounding::default(),
            initial_offset_capacity: DEFAULT_INITIAL_OFFSET_CAPACITY,
        }
    }

    /// Sets the constant tag written into the first field of every result.
    pub fn with_record_tag(mut self, tag: i32) -> Self {
        self.record_tag = tag;
        self
    }

    /// Sets how node bounds are narrowed to single precision.
    pub fn with_box_rounding(mut self, rounding: BoxRounding) -> Self {
        self.box_rounding = rounding;
        self
    }

    /// Pre-sizes the shared offset buffer, typically to the record count of
    /// the source tree when it is known.
    pub fn with_initial_offset_capacity(mut self, capacity: usize) -> Self {
        self.initial_offset_capacity = capacity;
        self
    }

    pub fn record_tag(&self) -> i32 {
        self.record_tag
    }

    pub fn box_rounding(&self) -> BoxRounding {
        self.box_rounding
    }

    pub fn initial_offset_capacity(&self) -> usize {
        self.initial_offset_capacity
    }
}
