// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Pretty-printers: deserialize a blob back into human-readable text.
//!
//! Diagnostics and tests only — nothing in the encode path depends on this
//! module. But it must exactly invert the encode-time layout: any mismatch
//! between a pretty-printed blob and a hand-authored expectation is a bug
//! on one side or the other, which makes these printers the project's
//! primary correctness oracle.
//!
//! The trie renders as an indented tree. Chains of single children stay on
//! one line, `|` bars continue under multi-child nodes, results go in
//! `[...]`, a lookahead barrier prints as `$` and breaks the line, and
//! non-ASCII code units print as `0xNN`:
//!
//! ```text
//! math [0]
//! ||| :$
//! |||  :vector [1]
//! ```
//!
//! The map renders one `index: name [attrs] -> url` line per entry. Entries
//! without a URL (aliases) have no arrow segment.
//!
//! Unlike the serializer's work-stack walk, the tree walk here recurses —
//! this is a diagnostic tool for corpora a human is about to read, and the
//! recursive shape matches the indent threading naturally.

use crate::error::FormatError;
use crate::flags::{CssClass, ResultFlags};
use crate::format::{unpack_type_data, MAGIC, SEARCHDATA_FORMAT_VERSION};
use crate::serializer::Serializer;

/// Structural observations collected while walking a serialized trie.
///
/// The maxima tell a caller how close the corpus is to the current
/// [`Serializer`] limits, which is how the doc pipeline picks widths for
/// the next run instead of discovering overflow by failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrieStats {
    /// Nodes visited; shared (merged) subtrees count once per visit.
    pub node_count: usize,
    pub max_node_results: usize,
    pub max_node_children: usize,
    pub max_node_result_index: u64,
    pub max_node_child_offset: u64,
}

/// Render a serialized trie section.
pub fn pretty_print_trie(
    serialized: &[u8],
    config: &Serializer,
) -> Result<(String, TrieStats), FormatError> {
    let root_bytes = serialized.get(0..4).ok_or(FormatError::Truncated {
        what: "trie root pointer",
    })?;
    let root = u32::from_le_bytes([root_bytes[0], root_bytes[1], root_bytes[2], root_bytes[3]]);
    let mut out = String::new();
    let mut stats = TrieStats::default();
    print_trie_node(serialized, config, root as usize, "", &mut out, &mut stats)?;
    Ok((out, stats))
}

fn print_trie_node(
    bytes: &[u8],
    config: &Serializer,
    offset: usize,
    indent: &str,
    out: &mut String,
    stats: &mut TrieStats,
) -> Result<(), FormatError> {
    let header = bytes.get(offset..offset + 2).ok_or(FormatError::Truncated {
        what: "trie node header",
    })?;
    let result_count = header[0] as usize;
    let child_count = header[1] as usize;
    stats.node_count += 1;
    stats.max_node_results = stats.max_node_results.max(result_count);
    stats.max_node_children = stats.max_node_children.max(child_count);
    let mut pos = offset + 2;

    if result_count > 0 {
        out.push_str(" [");
        for i in 0..result_count {
            if i > 0 {
                out.push_str(", ");
            }
            let result = config.unpack_result_id(bytes, pos)?;
            pos += config.result_id_bytes() as usize;
            stats.max_node_result_index = stats.max_node_result_index.max(result);
            out.push_str(&result.to_string());
        }
        out.push(']');
    }

    for i in 0..child_count {
        let byte = *bytes.get(pos).ok_or(FormatError::Truncated {
            what: "trie child entry",
        })?;
        let (child_offset, barrier) = config.unpack_child_offset(bytes, pos + 1)?;
        pos += 1 + config.file_offset_bytes() as usize;
        stats.max_node_child_offset = stats.max_node_child_offset.max(child_offset);

        if result_count > 0 || i > 0 {
            out.push('\n');
            out.push_str(indent);
        }
        if byte <= 0x7f {
            out.push(byte as char);
        } else {
            out.push_str(&format!("0x{:02x}", byte));
        }
        if barrier {
            out.push('$');
        }
        if byte > 0x7f || barrier {
            out.push('\n');
            out.push_str(indent);
            out.push(' ');
        }

        let child_indent = if child_count > 1 {
            format!("{indent}|")
        } else {
            format!("{indent} ")
        };
        print_trie_node(
            bytes,
            config,
            child_offset as usize,
            &child_indent,
            out,
            stats,
        )?;
    }
    Ok(())
}

/// Render a serialized result map section.
///
/// `type_names` supplies display names for caller-defined type ids,
/// `type_names[0]` naming id 1. Unknown ids fall back to the raw number.
pub fn pretty_print_map(
    serialized: &[u8],
    config: &Serializer,
    type_names: &[&str],
) -> Result<String, FormatError> {
    let count = map_entry_count(serialized, config)?;
    let fob = config.file_offset_bytes() as usize;
    let record = fob + 1;

    let mut lines = Vec::with_capacity(count);
    for index in 0..count {
        let base = index * record;
        let offset = config.unpack_file_offset(serialized, base)? as usize;
        let flags_byte = *serialized.get(base + fob).ok_or(FormatError::Truncated {
            what: "result map offset table",
        })?;
        let flags = ResultFlags::unpack(flags_byte);
        let next = config.unpack_file_offset(serialized, base + record)? as usize;

        let mut pos = offset;
        let mut attrs: Vec<String> = Vec::new();
        if flags.is_alias() {
            let alias = config.unpack_result_id(serialized, pos)?;
            pos += config.result_id_bytes() as usize;
            attrs.push(format!("alias={alias}"));
        }
        if flags.has_prefix {
            let prefix = config.unpack_result_id(serialized, pos)?;
            pos += config.result_id_bytes() as usize;
            let length = config.unpack_name_size(serialized, pos)?;
            pos += config.name_size_bytes() as usize;
            attrs.push(format!("prefix={prefix}[:{length}]"));
        }
        if flags.has_suffix {
            let length = config.unpack_name_size(serialized, pos)?;
            pos += config.name_size_bytes() as usize;
            attrs.push(format!("suffix_length={length}"));
        }
        if flags.deprecated {
            attrs.push("deprecated".to_owned());
        }
        if flags.deleted {
            attrs.push("deleted".to_owned());
        }
        if !flags.is_alias() {
            match type_names.get(flags.type_id as usize - 1) {
                Some(name) => attrs.push(format!("type={name}")),
                None => attrs.push(format!("type={}", flags.type_id)),
            }
        }

        let data = serialized.get(pos..next).ok_or(FormatError::Truncated {
            what: "result map entry data",
        })?;
        let (name, url) = match data.iter().position(|&b| b == 0) {
            Some(nul) => (&data[..nul], &data[nul + 1..]),
            None => (data, &data[..0]),
        };
        let name = String::from_utf8_lossy(name);
        let attrs = attrs.join(", ");
        if url.is_empty() {
            lines.push(format!("{index}: {name} [{attrs}]"));
        } else {
            lines.push(format!(
                "{index}: {name} [{attrs}] -> {}",
                String::from_utf8_lossy(url)
            ));
        }
    }
    Ok(lines.join("\n"))
}

/// Entry count of a serialized map, recovered from its own offset table.
///
/// The first record's offset equals `(count + 1) * (file_offset_bytes + 1)`
/// because entry data starts right after the table.
fn map_entry_count(serialized: &[u8], config: &Serializer) -> Result<usize, FormatError> {
    let record = config.file_offset_bytes() as usize + 1;
    let first = config.unpack_file_offset(serialized, 0)? as usize;
    if first < record || first % record != 0 {
        return Err(FormatError::Malformed {
            what: "result map offset table",
        });
    }
    Ok(first / record - 1)
}

fn print_type_map(
    serialized: &[u8],
    count: usize,
    type_names: &[&str],
) -> Result<String, FormatError> {
    let mut lines = Vec::with_capacity(count);
    for i in 0..count {
        let record = serialized
            .get(i * 2..i * 2 + 2)
            .ok_or(FormatError::Truncated {
                what: "type map record",
            })?;
        let name_start = record[1] as usize;
        let name_end = *serialized.get((i + 1) * 2 + 1).ok_or(FormatError::Truncated {
            what: "type map record",
        })? as usize;
        let title = serialized
            .get(name_start..name_end)
            .ok_or(FormatError::Truncated {
                what: "type map name",
            })?;
        let css_class = CssClass::from_u8(record[0])
            .map(CssClass::name)
            .unwrap_or("UNKNOWN");
        let type_name = type_names.get(i).copied().unwrap_or("?");
        lines.push(format!(
            "({type_name}, CssClass.{css_class}, '{}')",
            String::from_utf8_lossy(title)
        ));
    }
    Ok(lines.join(",\n"))
}

/// Render a complete search data blob: symbol count, trie, map, type map.
///
/// Validates the magic and version, then recovers the [`Serializer`] from
/// the packed type data — the blob is self-describing, so no config is
/// passed in. Returns the rendering together with the trie walk stats.
pub fn pretty_print(
    serialized: &[u8],
    type_names: &[&str],
) -> Result<(String, TrieStats), FormatError> {
    let magic = serialized.get(0..3).ok_or(FormatError::Truncated {
        what: "header magic",
    })?;
    if magic != MAGIC.as_slice() {
        return Err(FormatError::InvalidMagic {
            found: [magic[0], magic[1], magic[2]],
        });
    }
    let version = *serialized.get(3).ok_or(FormatError::Truncated {
        what: "header version",
    })?;
    if version != SEARCHDATA_FORMAT_VERSION {
        return Err(FormatError::UnsupportedVersion {
            found: version,
            expected: SEARCHDATA_FORMAT_VERSION,
        });
    }
    let packed = serialized.get(4..6).ok_or(FormatError::Truncated {
        what: "header type data",
    })?;
    let (config, type_count) = unpack_type_data([packed[0], packed[1]])?;

    let mut pos = 6;
    let symbol_count = config.unpack_result_id(serialized, pos)?;
    pos += config.result_id_bytes() as usize;
    let map_offset = config.unpack_file_offset(serialized, pos)? as usize;
    pos += config.file_offset_bytes() as usize;

    let trie_bytes = serialized
        .get(pos..map_offset)
        .ok_or(FormatError::Truncated {
            what: "trie section",
        })?;
    let tail = serialized.get(map_offset..).ok_or(FormatError::Truncated {
        what: "result map section",
    })?;
    let record = config.file_offset_bytes() as usize + 1;
    let entry_count = map_entry_count(tail, &config)?;
    let map_size = config.unpack_file_offset(tail, entry_count * record)? as usize;
    let map_bytes = tail.get(..map_size).ok_or(FormatError::Truncated {
        what: "result map section",
    })?;
    let type_map_bytes = &tail[map_size..];

    let (pretty_trie, stats) = pretty_print_trie(trie_bytes, &config)?;
    let pretty_map = pretty_print_map(map_bytes, &config, type_names)?;
    let pretty_types = print_type_map(type_map_bytes, type_count, type_names)?;

    let mut out = format!("{symbol_count} symbols");
    for section in [pretty_trie, pretty_map, pretty_types] {
        if !section.is_empty() {
            out.push('\n');
            out.push_str(&section);
        }
    }
    Ok((out, stats))
}
