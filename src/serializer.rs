// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The [`Serializer`] packing policy and its pack/unpack primitives.
//!
//! Every variable-width field in the format belongs to one of three width
//! classes, and the caller fixes all three up front:
//!
//! | Knob                | Widths  | Governs                                      |
//! |---------------------|---------|----------------------------------------------|
//! | `file_offset_bytes` | 3 or 4  | node/entry offsets, the map section offset    |
//! | `result_id_bytes`   | 2, 3, 4 | result indices, alias targets, symbol count   |
//! | `name_size_bytes`   | 1 or 2  | suffix lengths, shared-prefix lengths         |
//!
//! There is no auto-negotiation: exceeding a chosen width is a hard
//! [`CapacityError`], never a silent truncation. The caller sizes the knobs
//! from the expected corpus (symbol count, blob size) and widens on failure.
//!
//! All multi-byte integers are little-endian. Trie child offsets reserve
//! their top bit for the lookahead-barrier flag, so they get one bit less
//! than the other `file_offset_bytes` fields.

use serde::{Deserialize, Serialize};

use crate::error::{CapacityError, FormatError};

/// Field-width configuration shared by every pack/unpack site in the codec.
///
/// A plain value object; construction validates the widths, after which the
/// helpers below are the only way bytes get in or out of a blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Serializer {
    file_offset_bytes: u8,
    result_id_bytes: u8,
    name_size_bytes: u8,
}

impl Serializer {
    /// Create a config from the three width knobs.
    ///
    /// Panics when a width is outside its documented range — the widths are
    /// static caller configuration, not data.
    pub fn new(file_offset_bytes: u8, result_id_bytes: u8, name_size_bytes: u8) -> Self {
        Self::from_widths(file_offset_bytes, result_id_bytes, name_size_bytes)
            .expect("field widths must be 3-4 / 2-4 / 1-2 bytes")
    }

    /// Fallible variant of [`Serializer::new`], used when the widths come
    /// from a deserialized header rather than caller code.
    pub fn from_widths(
        file_offset_bytes: u8,
        result_id_bytes: u8,
        name_size_bytes: u8,
    ) -> Option<Self> {
        if !matches!(file_offset_bytes, 3 | 4)
            || !matches!(result_id_bytes, 2..=4)
            || !matches!(name_size_bytes, 1 | 2)
        {
            return None;
        }
        Some(Self {
            file_offset_bytes,
            result_id_bytes,
            name_size_bytes,
        })
    }

    pub fn file_offset_bytes(&self) -> u8 {
        self.file_offset_bytes
    }

    pub fn result_id_bytes(&self) -> u8 {
        self.result_id_bytes
    }

    pub fn name_size_bytes(&self) -> u8 {
        self.name_size_bytes
    }

    fn max_for(width: u8) -> u64 {
        (1u64 << (8 * u32::from(width))) - 1
    }

    /// Largest representable result id / alias target / symbol count.
    pub fn max_result_id(&self) -> u64 {
        Self::max_for(self.result_id_bytes)
    }

    /// Largest representable file offset (result-map side, all bits used).
    pub fn max_file_offset(&self) -> u64 {
        Self::max_for(self.file_offset_bytes)
    }

    /// Largest representable trie child offset (top bit is the barrier flag).
    pub fn max_child_offset(&self) -> u64 {
        (1u64 << (8 * u32::from(self.file_offset_bytes) - 1)) - 1
    }

    /// Largest representable suffix/prefix length.
    pub fn max_name_size(&self) -> u64 {
        Self::max_for(self.name_size_bytes)
    }

    // ------------------------------------------------------------------
    // pack
    // ------------------------------------------------------------------

    pub fn pack_result_id(&self, id: u64, out: &mut Vec<u8>) -> Result<(), CapacityError> {
        if id > self.max_result_id() {
            return Err(CapacityError::ResultId {
                value: id,
                width: self.result_id_bytes,
            });
        }
        out.extend_from_slice(&id.to_le_bytes()[..self.result_id_bytes as usize]);
        Ok(())
    }

    pub fn pack_file_offset(&self, offset: u64, out: &mut Vec<u8>) -> Result<(), CapacityError> {
        if offset > self.max_file_offset() {
            return Err(CapacityError::FileOffset {
                offset,
                width: self.file_offset_bytes,
            });
        }
        out.extend_from_slice(&offset.to_le_bytes()[..self.file_offset_bytes as usize]);
        Ok(())
    }

    /// Pack a trie child offset with the lookahead-barrier flag in the top
    /// bit of the field.
    pub fn pack_child_offset(
        &self,
        offset: u64,
        barrier: bool,
        out: &mut Vec<u8>,
    ) -> Result<(), CapacityError> {
        if offset > self.max_child_offset() {
            return Err(CapacityError::ChildOffset {
                offset,
                width: self.file_offset_bytes,
            });
        }
        let mut packed = offset;
        if barrier {
            packed |= 1u64 << (8 * u32::from(self.file_offset_bytes) - 1);
        }
        out.extend_from_slice(&packed.to_le_bytes()[..self.file_offset_bytes as usize]);
        Ok(())
    }

    pub fn pack_name_size(&self, value: u64, out: &mut Vec<u8>) -> Result<(), CapacityError> {
        if value > self.max_name_size() {
            return Err(CapacityError::NameSize {
                value,
                width: self.name_size_bytes,
            });
        }
        out.extend_from_slice(&value.to_le_bytes()[..self.name_size_bytes as usize]);
        Ok(())
    }

    // ------------------------------------------------------------------
    // unpack
    // ------------------------------------------------------------------

    pub fn unpack_result_id(&self, bytes: &[u8], pos: usize) -> Result<u64, FormatError> {
        read_le(bytes, pos, self.result_id_bytes, "result ID field")
    }

    pub fn unpack_file_offset(&self, bytes: &[u8], pos: usize) -> Result<u64, FormatError> {
        read_le(bytes, pos, self.file_offset_bytes, "file offset field")
    }

    /// Unpack a trie child offset, returning `(offset, barrier)`.
    pub fn unpack_child_offset(&self, bytes: &[u8], pos: usize) -> Result<(u64, bool), FormatError> {
        let raw = read_le(bytes, pos, self.file_offset_bytes, "child offset field")?;
        let barrier_bit = 1u64 << (8 * u32::from(self.file_offset_bytes) - 1);
        Ok((raw & (barrier_bit - 1), raw & barrier_bit != 0))
    }

    pub fn unpack_name_size(&self, bytes: &[u8], pos: usize) -> Result<u64, FormatError> {
        read_le(bytes, pos, self.name_size_bytes, "name size field")
    }
}

fn read_le(bytes: &[u8], pos: usize, width: u8, what: &'static str) -> Result<u64, FormatError> {
    let end = pos
        .checked_add(width as usize)
        .ok_or(FormatError::Truncated { what })?;
    let slice = bytes
        .get(pos..end)
        .ok_or(FormatError::Truncated { what })?;
    let mut value = 0u64;
    for (i, byte) in slice.iter().enumerate() {
        value |= u64::from(*byte) << (8 * i);
    }
    Ok(value)
}
