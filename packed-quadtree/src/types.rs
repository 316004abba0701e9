//! Core types shared by the builder, the packed tree and the query engine.
//!
//! This module defines:
//! - Error types and result types
//! - Record identifiers and offsets
//! - The tagged output record
//! - Statistics structures

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while building or querying a packed index
#[derive(Debug, Error)]
pub enum IndexError {
    /// Resolving a record offset or reading a subnode failed during build.
    #[error("IO error while building index: {0}")]
    Io(#[from] io::Error),

    /// A built index violates its own invariants.
    #[error("Corrupt index: {0}")]
    Corrupt(String),

    #[error("Offset position {index} out of range for buffer of length {len}")]
    OutOfRange { index: usize, len: usize },
}

impl IndexError {
    /// Returns true for construction I/O failures.
    pub fn is_io(&self) -> bool {
        matches!(self, IndexError::Io(_))
    }

    /// Returns true for structural faults found in a built index.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, IndexError::Corrupt(_))
    }
}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Identifier of a record in the source tree (a zero-based shape record number)
pub type RecordId = u32;

/// Byte offset of a record in the companion data file
pub type Offset = i64;

// ============================================================================
// Output Records
// ============================================================================

/// One element of a search result: the index's record tag followed by the
/// byte offset of the matching record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetRecord {
    pub tag: i32,
    pub offset: Offset,
}

// ============================================================================
// Statistics
// ============================================================================

/// Statistics about a packed index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Total number of packed nodes, root included
    pub node_count: u64,
    /// Nodes without local records
    pub empty_node_count: u64,
    /// Number of stored offsets
    pub offset_count: u64,
    /// Number of levels (a lone root has depth 1)
    pub depth: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let err: IndexError = io::Error::new(io::ErrorKind::NotFound, "shx missing").into();
        assert!(err.is_io());
        assert!(!err.is_corrupt());
        assert!(err.to_string().contains("shx missing"));
    }

    #[test]
    fn test_corrupt_error() {
        let err = IndexError::Corrupt("bad range".into());
        assert!(err.is_corrupt());
        assert!(!err.is_io());
        assert_eq!(err.to_string(), "Corrupt index: bad range");
    }

    #[test]
    fn test_out_of_range_message() {
        let err = IndexError::OutOfRange { index: 7, len: 3 };
        assert_eq!(
            err.to_string(),
            "Offset position 7 out of range for buffer of length 3"
        );
        assert!(!err.is_io());
        assert!(!err.is_corrupt());
    }

    #[test]
    fn test_stats_serialization() {
        let stats = IndexStats {
            node_count: 5,
            empty_node_count: 2,
            offset_count: 9,
            depth: 3,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"node_count\":5"));
        let back: IndexStats = serde_json::from_str(&json).unwrap();
        assert_eq!(stats, back);
    }
}
