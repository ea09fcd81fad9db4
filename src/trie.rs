// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search trie: lowercased UTF-8 strings mapped to result index lists.
//!
//! The trie is byte-indexed, not codepoint-indexed. Multi-byte UTF-8
//! sequences simply become chains of single-byte edges, which keeps the
//! node format trivial (one byte per edge label) and lets the client widget
//! match incrementally on raw code units. Lowercasing is the caller's job;
//! the trie never looks inside the bytes it's given.
//!
//! Nodes live in an arena (`Vec<Node>` with index references) rather than a
//! boxed tree. That makes the post-order serialization walk an explicit
//! work stack over indices, so a pathological input — say one ten-kilobyte
//! symbol name, which is a ten-thousand-level chain — costs heap, not call
//! stack.
//!
//! # Node wire format
//!
//! ```text
//! result_count : 1 byte            (hard ceiling 255)
//! child_count  : 1 byte            (hard ceiling 255)
//! result[i]    : result_id_bytes   little-endian
//! child[i]     : 1 byte edge label
//!                file_offset_bytes packed: low bits = absolute offset of
//!                the child node, top bit = lookahead-barrier flag
//! ```
//!
//! Children are serialized before parents, and the first four bytes of the
//! blob point at the root, which lands last. With subtree merging enabled,
//! a node whose serialized bytes already appeared is not re-emitted — the
//! earlier offset is reused. Identical encodings imply identical subtrees
//! (offsets embedded in the bytes are themselves deduplicated), so this is
//! pure hash-consing with no semantic analysis.

use ahash::AHashMap;

use crate::error::CapacityError;
use crate::map::ResultMap;
use crate::serializer::Serializer;

/// Ceiling on per-node result and child counts, fixed by the 1-byte header.
const MAX_NODE_ENTRIES: usize = 255;

#[derive(Debug, Default)]
struct Node {
    /// Result indices in insertion order. Duplicates are allowed and
    /// preserved — overload sets register the same node repeatedly.
    results: Vec<usize>,
    /// Outgoing edges in insertion order.
    children: Vec<Edge>,
}

#[derive(Debug)]
struct Edge {
    byte: u8,
    /// Once set by any insertion, the flag stays set.
    barrier: bool,
    node: usize,
}

/// Character-indexed prefix tree over search strings.
#[derive(Debug)]
pub struct Trie {
    /// Arena; index 0 is the root.
    nodes: Vec<Node>,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        Trie {
            nodes: vec![Node::default()],
        }
    }

    /// Insert `path`, appending `result` to the terminal node's list.
    pub fn insert(&mut self, path: &str, result: usize) {
        self.insert_with_barriers(path, result, &[]);
    }

    /// Insert `path` and flag the edges consumed at the given byte offsets
    /// as lookahead barriers.
    ///
    /// A barrier at offset `i` marks the edge for `path`'s `i`-th byte —
    /// the point past which the search UI must not auto-extend a match into
    /// an unrelated, longer result family. Offsets are expected sorted
    /// ascending, which is how joined-name callers produce them.
    pub fn insert_with_barriers(&mut self, path: &str, result: usize, lookahead_barriers: &[usize]) {
        let mut node = 0usize;
        for (offset, byte) in path.bytes().enumerate() {
            let barrier = lookahead_barriers.contains(&offset);
            node = self.descend(node, byte, barrier);
        }
        self.nodes[node].results.push(result);
    }

    fn descend(&mut self, node: usize, byte: u8, barrier: bool) -> usize {
        if let Some(edge) = self.nodes[node].children.iter_mut().find(|e| e.byte == byte) {
            if barrier {
                edge.barrier = true;
            }
            return edge.node;
        }
        let child = self.nodes.len();
        self.nodes.push(Node::default());
        self.nodes[node].children.push(Edge {
            byte,
            barrier,
            node: child,
        });
        child
    }

    /// Stable-sort every node's result list so equally-named symbols rank
    /// deterministically: usable results first (deleted after them,
    /// deprecated last), then by type id, then shortest suffix, then
    /// shortest name.
    ///
    /// Optional pass — `serialize` itself never reorders results.
    pub fn sort(&mut self, map: &ResultMap) {
        for node in &mut self.nodes {
            node.results.sort_by_key(|&result| map.sort_key(result));
        }
    }

    // ------------------------------------------------------------------
    // accessors for the result map's prefix-merging walk
    // ------------------------------------------------------------------

    pub(crate) fn root(&self) -> usize {
        0
    }

    pub(crate) fn child(&self, node: usize, byte: u8) -> Option<usize> {
        self.nodes[node]
            .children
            .iter()
            .find(|e| e.byte == byte)
            .map(|e| e.node)
    }

    pub(crate) fn results(&self, node: usize) -> &[usize] {
        &self.nodes[node].results
    }

    // ------------------------------------------------------------------
    // serialization
    // ------------------------------------------------------------------

    /// Serialize to the compact node format.
    ///
    /// Post-order over an explicit work stack; children land before their
    /// parents so every child offset is known when a node is encoded. With
    /// `merge_subtrees`, byte-identical nodes are emitted once and shared.
    /// The dedup table is scoped to this call, so serialization can be
    /// re-run (after a capacity failure, with a wider config) against the
    /// same unmutated trie.
    pub fn serialize(
        &self,
        config: &Serializer,
        merge_subtrees: bool,
    ) -> Result<Vec<u8>, CapacityError> {
        let mut out = vec![0u8; 4];
        let mut offsets: Vec<u64> = vec![0; self.nodes.len()];
        let mut dedup: AHashMap<Vec<u8>, u64> = AHashMap::new();

        // (node, emit): first visit pushes the children, second emits.
        let mut stack: Vec<(usize, bool)> = vec![(0, false)];
        while let Some((index, emit)) = stack.pop() {
            let node = &self.nodes[index];
            if !emit {
                stack.push((index, true));
                for edge in node.children.iter().rev() {
                    stack.push((edge.node, false));
                }
                continue;
            }

            if node.results.len() > MAX_NODE_ENTRIES {
                return Err(CapacityError::NodeResults {
                    count: node.results.len(),
                });
            }
            if node.children.len() > MAX_NODE_ENTRIES {
                return Err(CapacityError::NodeChildren {
                    count: node.children.len(),
                });
            }

            let mut serialized = Vec::with_capacity(
                2 + node.results.len() * config.result_id_bytes() as usize
                    + node.children.len() * (1 + config.file_offset_bytes() as usize),
            );
            serialized.push(node.results.len() as u8);
            serialized.push(node.children.len() as u8);
            for &result in &node.results {
                config.pack_result_id(result as u64, &mut serialized)?;
            }
            for edge in &node.children {
                serialized.push(edge.byte);
                config.pack_child_offset(offsets[edge.node], edge.barrier, &mut serialized)?;
            }

            offsets[index] = if merge_subtrees {
                if let Some(&existing) = dedup.get(&serialized) {
                    existing
                } else {
                    let offset = out.len() as u64;
                    out.extend_from_slice(&serialized);
                    dedup.insert(serialized, offset);
                    offset
                }
            } else {
                let offset = out.len() as u64;
                out.extend_from_slice(&serialized);
                offset
            };
        }

        let root = offsets[0];
        if root > u64::from(u32::MAX) {
            return Err(CapacityError::FileOffset {
                offset: root,
                width: 4,
            });
        }
        out[0..4].copy_from_slice(&(root as u32).to_le_bytes());
        Ok(out)
    }
}
