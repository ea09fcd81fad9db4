// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Compact binary search-index codec for documentation search.
//!
//! A doc generator crawls symbols and pages, hands each searchable result to
//! this crate, and gets back one relocatable binary blob that a client-side
//! widget consumes: a byte-indexed prefix trie for lookup, a deduplicated
//! result table for display, and a small type map for rendering.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌───────────────┐
//! │   trie.rs    │     │    map.rs    │     │  format.rs    │
//! │ (Trie:       │     │ (ResultMap:  │────▶│ (header,      │
//! │  insert,     │────▶│  add,        │     │  assembly,    │
//! │  serialize)  │     │  serialize)  │     │  base85)      │
//! └──────────────┘     └──────────────┘     └───────────────┘
//!        │                    │                     │
//!        ▼                    ▼                     ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │           serializer.rs / flags.rs / error.rs           │
//! │   (field widths, bit-packed flags, capacity taxonomy)   │
//! └─────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//!                      ┌───────────┐
//!                      │ pretty.rs │  (deserializing oracle)
//!                      └───────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use mcsearch::{
//!     serialize_search_data, CssClass, EntryOptions, ResultFlags, ResultMap, Serializer,
//!     Trie, TypeMapEntry,
//! };
//!
//! let mut trie = Trie::new();
//! let mut map = ResultMap::new();
//!
//! let index = map.add(
//!     "Magnum",
//!     "namespaceMagnum.html",
//!     EntryOptions {
//!         flags: ResultFlags::from_type(1),
//!         ..EntryOptions::default()
//!     },
//! );
//! trie.insert("magnum", index);
//!
//! let type_map = [TypeMapEntry::new(CssClass::Primary, "namespace")];
//! let config = Serializer::new(3, 2, 1);
//! let blob = serialize_search_data(&config, &trie, &map, &type_map, 1, true, true).unwrap();
//! assert_eq!(&blob[..3], b"MCS");
//! ```
//!
//! # Guarantees
//!
//! - **Deterministic**: identical inputs and config produce byte-identical
//!   output. Required for reproducible doc builds.
//! - **No silent truncation**: a value exceeding its configured width is a
//!   [`CapacityError`] naming the knob to widen; never clipped.
//! - **Merging is content-preserving**: subtree and prefix merging change
//!   blob size, never what a reader decodes.
//!
//! Everything is single-threaded, synchronous, and in-memory; the crate
//! performs no I/O and holds no state between calls.

// Module declarations
mod error;
mod flags;
mod format;
mod map;
mod pretty;
mod serializer;
mod trie;

// Re-exports for public API
pub use error::{CapacityError, FormatError};
pub use flags::{CssClass, ResultFlags, TYPE_ALIAS};
pub use format::{
    base85encode, base85encode_search_data, searchdata_filename, searchdata_filename_b85,
    serialize_search_data, TypeMapEntry, MAGIC, SEARCHDATA_FORMAT_VERSION,
};
pub use map::{EntryOptions, ResultMap};
pub use pretty::{pretty_print, pretty_print_map, pretty_print_trie, TrieStats};
pub use serializer::Serializer;
pub use trie::Trie;
