// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for the codec.
//!
//! There are exactly two ways a well-formed caller can fail here. Either a
//! computed value doesn't fit the byte width the caller picked
//! ([`CapacityError`] — fix the [`Serializer`](crate::Serializer) config and
//! serialize again), or a blob handed to the deserializer isn't ours
//! ([`FormatError`] — wrong magic, wrong version, or truncated).
//!
//! Everything else (an alias entry without a target, a prefix reference that
//! would cycle) is a programmer error and fails fast with a panic instead of
//! flowing through `Result`. Those states are unreachable from correctly
//! constructed input, so an `Err` would only teach callers to ignore them.

use std::fmt;

/// A computed field value doesn't fit the caller-chosen byte width.
///
/// Each variant names the offending field; the `Display` output additionally
/// names the configuration knob that would resolve it. Capacity failures are
/// deterministic and terminal for the `serialize` call — the input structures
/// are left untouched, so the caller can retry with a wider
/// [`Serializer`](crate::Serializer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityError {
    /// A result index, alias target, prefix donor id, or symbol count
    /// exceeds what `result_id_bytes` can represent.
    ResultId { value: u64, width: u8 },
    /// A byte offset (result-map entry data or the map section itself)
    /// exceeds what `file_offset_bytes` can represent.
    FileOffset { offset: u64, width: u8 },
    /// A trie child offset exceeds the `file_offset_bytes` field with its
    /// top bit reserved for the lookahead-barrier flag.
    ChildOffset { offset: u64, width: u8 },
    /// A suffix length or shared-prefix length exceeds what
    /// `name_size_bytes` can represent.
    NameSize { value: u64, width: u8 },
    /// A single trie node accumulated more than 255 results. This is a hard
    /// structural ceiling of the node header, not a configurable width.
    NodeResults { count: usize },
    /// A single trie node has more than 255 children. Same ceiling as above.
    NodeChildren { count: usize },
}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            CapacityError::ResultId { value, width } => write!(
                f,
                "result ID {} doesn't fit into {} bits, increase result_id_bytes to {}",
                value,
                width * 8,
                width + 1
            ),
            CapacityError::FileOffset { offset, width } => write!(
                f,
                "file offset {} doesn't fit into {} bits, increase file_offset_bytes to {}",
                offset,
                width * 8,
                width + 1
            ),
            CapacityError::ChildOffset { offset, width } => write!(
                f,
                "child offset {} doesn't fit into {} bits (the top bit is the \
                 lookahead-barrier flag), increase file_offset_bytes to {}",
                offset,
                width * 8 - 1,
                width + 1
            ),
            CapacityError::NameSize { value, width } => write!(
                f,
                "name-scale length {} doesn't fit into {} bits, increase name_size_bytes to {}",
                value,
                width * 8,
                width + 1
            ),
            CapacityError::NodeResults { count } => write!(
                f,
                "trie node has {} results, the node header stores at most 255",
                count
            ),
            CapacityError::NodeChildren { count } => write!(
                f,
                "trie node has {} children, the node header stores at most 255",
                count
            ),
        }
    }
}

impl std::error::Error for CapacityError {}

/// The deserializer was handed bytes that aren't a search data blob.
///
/// Terminal and surfaced directly; there is no recovery path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// The first three bytes don't spell the expected magic.
    InvalidMagic { found: [u8; 3] },
    /// The version byte doesn't match the current format version.
    UnsupportedVersion { found: u8, expected: u8 },
    /// The blob ends in the middle of a structure.
    Truncated { what: &'static str },
    /// A field holds a value the format forbids (bad width bits, an offset
    /// table that doesn't line up).
    Malformed { what: &'static str },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FormatError::InvalidMagic { found } => {
                write!(f, "invalid magic bytes {:?}, expected \"MCS\"", found)
            }
            FormatError::UnsupportedVersion { found, expected } => {
                write!(
                    f,
                    "unsupported search data version {}, expected {}",
                    found, expected
                )
            }
            FormatError::Truncated { what } => write!(f, "truncated {}", what),
            FormatError::Malformed { what } => write!(f, "malformed {}", what),
        }
    }
}

impl std::error::Error for FormatError {}
