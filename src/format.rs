// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Top-level blob assembly: header, sections, type map, embeddings.
//!
//! This module is the single source of truth for the file layout. The
//! pretty-printer and any future reader derive every offset from the
//! constants and helpers here, never from their own arithmetic.
//!
//! # Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ HEADER                                                       │
//! │   magic: "MCS"                       3 bytes                 │
//! │   version: 2                         1 byte                  │
//! │   packed type data                   2 bytes LE              │
//! │     bit 0       file_offset_bytes - 3                        │
//! │     bits 1..=2  result_id_bytes - 2                          │
//! │     bit 3       name_size_bytes - 1                          │
//! │     bits 8..=15 type map entry count                         │
//! │   symbol_count                       result_id_bytes         │
//! │   map_offset                         file_offset_bytes       │
//! ├──────────────────────────────────────────────────────────────┤
//! │ TRIE       (4-byte root pointer + post-order node table)     │
//! ├──────────────────────────────────────────────────────────────┤
//! │ RESULT MAP (offset table + entry data)                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │ TYPE MAP   ((count+1) x [class, name offset] + names)        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no dedicated type-map offset: the result map's own offset table
//! ends with its total size, so a reader recovers the type map's position
//! from `map_offset` plus that final record. The whole blob is relocatable —
//! every stored offset is relative to its own section.

use serde::{Deserialize, Serialize};

use crate::error::{CapacityError, FormatError};
use crate::flags::CssClass;
use crate::map::ResultMap;
use crate::serializer::Serializer;
use crate::trie::Trie;

/// First three bytes of every search data blob.
pub const MAGIC: [u8; 3] = *b"MCS";

/// Current format version, fourth byte of the blob.
pub const SEARCHDATA_FORMAT_VERSION: u8 = 2;

/// File name for the raw binary artifact.
pub fn searchdata_filename() -> String {
    format!("searchdata-v{}.bin", SEARCHDATA_FORMAT_VERSION)
}

/// File name for the base85 script-loader artifact.
pub fn searchdata_filename_b85() -> String {
    format!("searchdata-v{}.js", SEARCHDATA_FORMAT_VERSION)
}

/// One caller-defined result type: the CSS class and label the client
/// widget renders it with. Position in the type map determines the type id
/// (`position + 1`; id 0 is reserved for aliases). Opaque to the codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMapEntry {
    pub css_class: CssClass,
    pub name: String,
}

impl TypeMapEntry {
    pub fn new(css_class: CssClass, name: &str) -> Self {
        TypeMapEntry {
            css_class,
            name: name.to_owned(),
        }
    }
}

pub(crate) fn header_size(config: &Serializer) -> usize {
    3 + 1 + 2 + config.result_id_bytes() as usize + config.file_offset_bytes() as usize
}

pub(crate) fn pack_type_data(config: &Serializer, type_count: usize) -> [u8; 2] {
    debug_assert!(type_count <= 15);
    let widths = (config.file_offset_bytes() - 3)
        | (config.result_id_bytes() - 2) << 1
        | (config.name_size_bytes() - 1) << 3;
    [widths, type_count as u8]
}

pub(crate) fn unpack_type_data(packed: [u8; 2]) -> Result<(Serializer, usize), FormatError> {
    let widths = packed[0];
    let config = Serializer::from_widths(
        3 + (widths & 0b1),
        2 + ((widths >> 1) & 0b11),
        1 + ((widths >> 3) & 0b1),
    )
    .ok_or(FormatError::Malformed {
        what: "field width bits",
    })?;
    Ok((config, packed[1] as usize))
}

/// Assemble the complete search data blob.
///
/// `symbol_count` is the caller's count of distinct documented symbols —
/// display metadata for the widget, unrelated to the entry count (aliases
/// and multi-prefix registrations make those diverge). `type_map` supplies
/// the rendering table for type ids `1..=type_map.len()`.
pub fn serialize_search_data(
    config: &Serializer,
    trie: &Trie,
    map: &ResultMap,
    type_map: &[TypeMapEntry],
    symbol_count: usize,
    merge_subtrees: bool,
    merge_prefixes: bool,
) -> Result<Vec<u8>, CapacityError> {
    let serialized_trie = trie.serialize(config, merge_subtrees)?;
    let serialized_map = map.serialize(config, merge_prefixes)?;
    let serialized_types = serialize_type_map(type_map);

    let mut out = Vec::with_capacity(
        header_size(config) + serialized_trie.len() + serialized_map.len() + serialized_types.len(),
    );
    out.extend_from_slice(&MAGIC);
    out.push(SEARCHDATA_FORMAT_VERSION);
    out.extend_from_slice(&pack_type_data(config, type_map.len()));
    config.pack_result_id(symbol_count as u64, &mut out)?;
    config.pack_file_offset((header_size(config) + serialized_trie.len()) as u64, &mut out)?;
    out.extend_from_slice(&serialized_trie);
    out.extend_from_slice(&serialized_map);
    out.extend_from_slice(&serialized_types);
    Ok(out)
}

/// Serialize the trailing type map section.
///
/// `(count + 1)` records of `[css class, name offset]` — the final record
/// carrying class 0 and the section end — followed by the concatenated
/// names. Offsets are one byte; with at most 15 short UI labels that is a
/// structural property of the caller's static table, so violations panic.
pub(crate) fn serialize_type_map(type_map: &[TypeMapEntry]) -> Vec<u8> {
    assert!(
        type_map.len() <= 15,
        "type ids are 4-bit and id 0 is reserved for aliases"
    );
    let names_base = (type_map.len() + 1) * 2;
    let mut records = Vec::with_capacity(names_base);
    let mut names = Vec::new();
    for entry in type_map {
        let offset = names_base + names.len();
        assert!(
            offset <= usize::from(u8::MAX),
            "type map name offsets must fit one byte"
        );
        records.push(entry.css_class.as_u8());
        records.push(offset as u8);
        names.extend_from_slice(entry.name.as_bytes());
    }
    let end = names_base + names.len();
    assert!(
        end <= usize::from(u8::MAX),
        "type map name offsets must fit one byte"
    );
    records.push(0);
    records.push(end as u8);
    records.extend_from_slice(&names);
    records
}

// ============================================================================
// BASE85 EMBEDDING
// ============================================================================

/// RFC 1924 alphabet, matching what the client-side loader decodes.
const BASE85_ALPHABET: &[u8; 85] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!#$%&()*+-;<=>?@^_`{|}~";

/// Base85-encode a byte buffer, zero-padding the final group to four bytes.
///
/// Five output characters per 4-byte big-endian group, most significant
/// digit first. Base85 beats base64 by ~7% and the blob is embedded in a
/// single-quoted JS string, so the alphabet avoiding `'` and `\` matters
/// more than URL safety.
pub fn base85encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(4) * 5);
    for chunk in data.chunks(4) {
        let mut group = [0u8; 4];
        group[..chunk.len()].copy_from_slice(chunk);
        let mut value = u32::from_be_bytes(group);
        let mut digits = [0u8; 5];
        for digit in digits.iter_mut().rev() {
            *digit = BASE85_ALPHABET[(value % 85) as usize];
            value /= 85;
        }
        for digit in digits {
            out.push(digit as char);
        }
    }
    out
}

/// Wrap a serialized blob in the one-line script-loader call that embeds
/// search data without a separate network request.
pub fn base85encode_search_data(data: &[u8]) -> String {
    format!(
        "/* Generated by the documentation search indexer. Do not edit. */\nSearch.load('{}');\n",
        base85encode(data)
    )
}
