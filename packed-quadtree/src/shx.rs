//! Offset resolution from an ESRI shape index (`.shx`) file.
//!
//! A `.shx` file is a 100-byte header followed by one 8-byte entry per
//! shape record. Each entry starts with the big-endian offset of the record
//! in the `.shp` file, counted in 16-bit words.

use std::fs::File;
use std::io::{self, Read};
use std::ops::Deref;
use std::path::Path;

use crate::source::OffsetResolver;
use crate::types::{Offset, RecordId};

/// File code stored in the first four bytes of every shape file.
pub const SHAPE_FILE_CODE: i32 = 9994;

/// Length of the shape file header.
pub const HEADER_LEN: usize = 100;

/// Length of one `.shx` entry (offset + content length).
pub const ENTRY_LEN: usize = 8;

/// Resolves zero-based record ids through a `.shx` file.
///
/// The resolver owns a copy of the file's bytes and releases them when
/// dropped, so nothing outlives the build it is passed to. Changes made to
/// the file after opening are not seen.
#[derive(Debug)]
pub struct ShxResolver<B = Vec<u8>> {
    data: B,
}

impl ShxResolver<Vec<u8>> {
    /// Reads the `.shx` file at `path` into memory.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, or if it does not carry the shape
    /// file header.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let mut file = File::open(path.as_ref())?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        log::debug!(
            "Loaded shape index {:?} ({} bytes)",
            path.as_ref(),
            data.len()
        );
        Self::from_bytes(data)
    }
}

impl<B: Deref<Target = [u8]>> ShxResolver<B> {
    /// Wraps `.shx` content held in memory.
    pub fn from_bytes(data: B) -> io::Result<Self> {
        let bytes: &[u8] = &data;
        if bytes.len() < HEADER_LEN {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("shape index header truncated at {} bytes", bytes.len()),
            ));
        }
        let code = read_be_i32(bytes, 0)?;
        if code != SHAPE_FILE_CODE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("not a shape index (file code {})", code),
            ));
        }
        Ok(Self { data })
    }

    /// Number of record entries in the file.
    pub fn record_count(&self) -> usize {
        (self.data.len() - HEADER_LEN) / ENTRY_LEN
    }

    /// Byte offset of `record_id` in the `.shp` file.
    pub fn offset_of(&self, record_id: RecordId) -> io::Result<Offset> {
        let entry = usize::try_from(record_id)
            .ok()
            .and_then(|id| id.checked_mul(ENTRY_LEN))
            .and_then(|relative| relative.checked_add(HEADER_LEN))
            .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
            .and_then(|position| read_be_i32(&self.data, position));
        let words = entry.map_err(|_| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "record {} is past the end of the shape index ({} records)",
                    record_id,
                    self.record_count()
                ),
            )
        })?;
        Ok(Offset::from(words) * 2)
    }
}

impl<B: Deref<Target = [u8]>> OffsetResolver for ShxResolver<B> {
    fn resolve(&mut self, record_id: RecordId) -> io::Result<Offset> {
        self.offset_of(record_id)
    }
}

fn read_be_i32(bytes: &[u8], position: usize) -> io::Result<i32> {
    let end = position
        .checked_add(4)
        .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))?;
    bytes
        .get(position..end)
        .and_then(|b| <[u8; 4]>::try_from(b).ok())
        .map(i32::from_be_bytes)
        .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
}
