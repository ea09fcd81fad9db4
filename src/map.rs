// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The result map: the authoritative table of searchable results.
//!
//! Entries are append-only. `add` returns a stable index that the trie's
//! result lists, alias entries, and prefix back-references all use; nothing
//! is ever removed or renumbered while the caller is building. Prefix
//! merging happens on a scratch copy at serialize time only, so a capacity
//! failure can be retried with a wider config against the untouched map.
//!
//! # Entry wire format
//!
//! The section opens with an offset table of `entry_count + 1` records,
//! each `file_offset_bytes` of data offset plus one flags byte. The final
//! record holds the total section size (its flags byte is meaningless and
//! written as zero). Entry data follows back-to-back:
//!
//! ```text
//! if type == ALIAS   result_id_bytes                    alias target
//! if HAS_PREFIX      result_id_bytes + name_size_bytes  donor id, shared URL length
//! if HAS_SUFFIX      name_size_bytes                    suffix length
//! name bytes                                            possibly shortened
//! if name and url both non-empty: NUL, url bytes        possibly shortened
//! ```
//!
//! Prefix merging stores, for an entry whose name extends some earlier-known
//! full name, only the tail bytes of the name and URL plus a back-reference
//! to the donor entry. On documentation corpora where every member of a
//! namespace repeats the namespace's name and URL root, this is where most
//! of the size win comes from.

use crate::error::CapacityError;
use crate::flags::ResultFlags;
use crate::serializer::Serializer;
use crate::trie::Trie;

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    url: String,
    flags: ResultFlags,
    alias: Option<usize>,
    /// Donor entry index; meaningful only when `flags.has_prefix`.
    prefix: usize,
    /// Shared URL prefix length in bytes; meaningful only with `has_prefix`.
    prefix_length: usize,
    suffix_length: usize,
}

/// Optional parts of [`ResultMap::add`].
#[derive(Debug, Clone, Default)]
pub struct EntryOptions {
    /// Redirect target. Only valid together with the alias type in `flags`,
    /// and only for entries with no URL of their own.
    pub alias: Option<usize>,
    /// Trailing bytes of the name (an argument list, say) that prefix
    /// lookups must ignore. Non-zero sets `HAS_SUFFIX` automatically.
    pub suffix_length: usize,
    pub flags: ResultFlags,
}

/// Append-only table of searchable results.
#[derive(Debug, Default)]
pub struct ResultMap {
    entries: Vec<Entry>,
}

impl ResultMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry, returning its stable 0-based index.
    ///
    /// Panics when `alias` is combined with a non-alias type or a URL —
    /// both are caller bugs, not data conditions.
    pub fn add(&mut self, name: &str, url: &str, options: EntryOptions) -> usize {
        let mut flags = options.flags;
        if options.suffix_length != 0 {
            flags.has_suffix = true;
        }
        if options.alias.is_some() {
            assert!(flags.is_alias(), "alias entries must use the alias type");
            assert!(url.is_empty(), "alias entries carry no URL of their own");
        }
        self.entries.push(Entry {
            name: name.to_owned(),
            url: url.to_owned(),
            flags,
            alias: options.alias,
            prefix: 0,
            prefix_length: 0,
            suffix_length: options.suffix_length,
        });
        self.entries.len() - 1
    }

    /// Sort rank for a result: availability, type, suffix length, name
    /// length. Used by [`Trie::sort`].
    pub(crate) fn sort_key(&self, index: usize) -> (u8, u8, usize, usize) {
        let entry = &self.entries[index];
        let availability = if entry.flags.deprecated {
            2
        } else if entry.flags.deleted {
            1
        } else {
            0
        };
        (
            availability,
            entry.flags.type_id,
            entry.suffix_length,
            entry.name.len(),
        )
    }

    /// Serialize the table, optionally rewriting entries to share name/URL
    /// prefixes with earlier-known entries.
    pub fn serialize(
        &self,
        config: &Serializer,
        merge_prefixes: bool,
    ) -> Result<Vec<u8>, CapacityError> {
        let merged;
        let entries: &[Entry] = if merge_prefixes {
            merged = self.merged_entries();
            &merged
        } else {
            &self.entries
        };

        // Offset table. Entry data begins right after the table and the
        // trailing total-size record.
        let record = config.file_offset_bytes() as usize + 1;
        let mut offset = (entries.len() + 1) * record;
        let mut out = Vec::new();
        for entry in entries {
            config.pack_file_offset(offset as u64, &mut out)?;
            out.push(entry.flags.pack());
            offset += Self::entry_data_len(config, entry);
        }
        config.pack_file_offset(offset as u64, &mut out)?;
        out.push(0);

        // Entry data.
        for entry in entries {
            if entry.flags.is_alias() {
                let alias = entry
                    .alias
                    .expect("alias entries always reference a target result");
                config.pack_result_id(alias as u64, &mut out)?;
            }
            if entry.flags.has_prefix {
                config.pack_result_id(entry.prefix as u64, &mut out)?;
                config.pack_name_size(entry.prefix_length as u64, &mut out)?;
            }
            if entry.flags.has_suffix {
                config.pack_name_size(entry.suffix_length as u64, &mut out)?;
            }
            out.extend_from_slice(entry.name.as_bytes());
            if !entry.name.is_empty() && !entry.url.is_empty() {
                out.push(0);
                out.extend_from_slice(entry.url.as_bytes());
            }
        }

        debug_assert_eq!(out.len(), offset, "offset table disagrees with entry data");
        Ok(out)
    }

    fn entry_data_len(config: &Serializer, entry: &Entry) -> usize {
        let mut len = 0;
        if entry.flags.is_alias() {
            len += config.result_id_bytes() as usize;
        }
        if entry.flags.has_prefix {
            len += config.result_id_bytes() as usize + config.name_size_bytes() as usize;
        }
        if entry.flags.has_suffix {
            len += config.name_size_bytes() as usize;
        }
        len += entry.name.len();
        if !entry.name.is_empty() && !entry.url.is_empty() {
            len += entry.url.len() + 1;
        }
        len
    }

    /// One-time preprocessing pass producing the prefix-merged entry list.
    ///
    /// An auxiliary trie over all full names (case-preserved, unlike the
    /// search trie) finds, for each entry, the deepest point along its name
    /// where some other entry's full name ends. Among those candidates the
    /// donor sharing the longest URL prefix wins, first match taking ties.
    ///
    /// A same-named candidate is admitted only when its suffix length is
    /// strictly greater than the current entry's. That covers a function
    /// registered both as `foo` and `foo()` — identical names, different
    /// suffix lengths — while the strict ordering rules out two same-named
    /// entries referencing each other.
    fn merged_entries(&self) -> Vec<Entry> {
        let mut names = Trie::new();
        for (index, entry) in self.entries.iter().enumerate() {
            names.insert(&entry.name, index);
        }

        let mut merged = Vec::with_capacity(self.entries.len());
        for (index, entry) in self.entries.iter().enumerate() {
            let mut node = names.root();
            let mut longest: Option<(usize, usize)> = None; // (node, name depth)
            for (position, byte) in entry.name.bytes().enumerate() {
                node = names
                    .child(node, byte)
                    .expect("every name walks its own trie path");
                let results = names.results(node);
                if results.contains(&index) {
                    if results
                        .iter()
                        .any(|&i| self.entries[i].suffix_length > entry.suffix_length)
                    {
                        longest = Some((node, position + 1));
                    }
                } else if !results.is_empty() {
                    longest = Some((node, position + 1));
                }
            }

            let Some((node, depth)) = longest else {
                merged.push(entry.clone());
                continue;
            };

            let mut best: Option<(usize, usize)> = None; // (donor, shared url bytes)
            for &candidate in names.results(node) {
                if candidate == index {
                    continue;
                }
                let shared =
                    common_prefix_len(entry.url.as_bytes(), self.entries[candidate].url.as_bytes());
                if best.map_or(true, |(_, len)| shared > len) {
                    best = Some((candidate, shared));
                }
            }
            let (donor, shared_url) =
                best.expect("a shared-prefix node always holds another entry");

            // The byte-level comparison can land inside a multi-byte
            // character; back off so the stored tail stays valid UTF-8.
            let mut shared_url = shared_url;
            while !entry.url.is_char_boundary(shared_url) {
                shared_url -= 1;
            }

            let mut rewritten = entry.clone();
            rewritten.name = entry.name[depth..].to_owned();
            rewritten.url = entry.url[shared_url..].to_owned();
            rewritten.flags.has_prefix = true;
            rewritten.prefix = donor;
            rewritten.prefix_length = shared_url;
            merged.push(rewritten);
        }
        merged
    }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
