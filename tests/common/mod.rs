//! Shared test fixtures and decode helpers.

#![allow(dead_code)]

use mcsearch::{CssClass, EntryOptions, ResultFlags, Serializer, TypeMapEntry};

// ============================================================================
// RESULT TYPE FIXTURE
// ============================================================================
//
// A minimal C++-flavored type table. The codec doesn't care what the types
// mean; the ids only have to stay in sync between the flags and the type
// map (id = position + 1, id 0 is the alias marker).

pub const PAGE: u8 = 1;
pub const NAMESPACE: u8 = 2;
pub const CLASS: u8 = 3;
pub const FUNC: u8 = 4;

pub const TYPE_NAMES: &[&str] = &["PAGE", "NAMESPACE", "CLASS", "FUNC"];

pub fn test_type_map() -> Vec<TypeMapEntry> {
    vec![
        TypeMapEntry::new(CssClass::Success, "page"),
        TypeMapEntry::new(CssClass::Primary, "namespace"),
        TypeMapEntry::new(CssClass::Primary, "class"),
        TypeMapEntry::new(CssClass::Info, "func"),
    ]
}

/// The narrowest config; what a small docs project would pick.
pub fn default_config() -> Serializer {
    Serializer::new(3, 2, 1)
}

/// Every valid width combination, for monotonicity sweeps.
pub fn all_configs() -> Vec<Serializer> {
    let mut configs = Vec::new();
    for fob in 3..=4 {
        for rib in 2..=4 {
            for nsb in 1..=2 {
                configs.push(Serializer::new(fob, rib, nsb));
            }
        }
    }
    configs
}

pub fn typed(type_id: u8) -> EntryOptions {
    EntryOptions {
        flags: ResultFlags::from_type(type_id),
        ..EntryOptions::default()
    }
}

// ============================================================================
// RESULT MAP DECODER
// ============================================================================

/// A result map entry decoded back out of a serialized section, with any
/// prefix references resolved to the full name and URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEntry {
    pub name: String,
    pub url: String,
    pub flags: ResultFlags,
    pub alias: Option<u64>,
    pub suffix_length: u64,
}

/// Decode a serialized result map and resolve prefix merging, so that a
/// merged and an unmerged serialization of the same map compare equal.
pub fn decode_map_entries(serialized: &[u8], config: &Serializer) -> Vec<DecodedEntry> {
    let fob = config.file_offset_bytes() as usize;
    let rib = config.result_id_bytes() as usize;
    let nsb = config.name_size_bytes() as usize;
    let record = fob + 1;

    let first = config.unpack_file_offset(serialized, 0).unwrap() as usize;
    let count = first / record - 1;

    struct Raw {
        flags: ResultFlags,
        alias: Option<u64>,
        prefix: Option<(usize, usize)>, // (donor, shared url bytes)
        suffix_length: u64,
        name: Vec<u8>,
        url: Vec<u8>,
    }

    let mut raw = Vec::with_capacity(count);
    for index in 0..count {
        let base = index * record;
        let offset = config.unpack_file_offset(serialized, base).unwrap() as usize;
        let flags = ResultFlags::unpack(serialized[base + fob]);
        let next = config.unpack_file_offset(serialized, base + record).unwrap() as usize;

        let mut pos = offset;
        let mut alias = None;
        let mut prefix = None;
        let mut suffix_length = 0;
        if flags.is_alias() {
            alias = Some(config.unpack_result_id(serialized, pos).unwrap());
            pos += rib;
        }
        if flags.has_prefix {
            let donor = config.unpack_result_id(serialized, pos).unwrap() as usize;
            pos += rib;
            let shared = config.unpack_name_size(serialized, pos).unwrap() as usize;
            pos += nsb;
            prefix = Some((donor, shared));
        }
        if flags.has_suffix {
            suffix_length = config.unpack_name_size(serialized, pos).unwrap();
            pos += nsb;
        }
        let data = &serialized[pos..next];
        let (name, url) = match data.iter().position(|&b| b == 0) {
            Some(nul) => (data[..nul].to_vec(), data[nul + 1..].to_vec()),
            None => (data.to_vec(), Vec::new()),
        };
        raw.push(Raw {
            flags,
            alias,
            prefix,
            suffix_length,
            name,
            url,
        });
    }

    // Resolve prefix chains. Donors can sit at higher indices than their
    // dependents, so resolution recurses with memoization; the encoder's
    // same-name ordering rule guarantees the chains are acyclic.
    fn resolve(
        index: usize,
        raw: &[Raw],
        resolved: &mut Vec<Option<(String, String)>>,
    ) -> (String, String) {
        if let Some(done) = &resolved[index] {
            return done.clone();
        }
        let entry = &raw[index];
        let (name, url) = match entry.prefix {
            None => (
                String::from_utf8(entry.name.clone()).unwrap(),
                String::from_utf8(entry.url.clone()).unwrap(),
            ),
            Some((donor, shared)) => {
                let (donor_name, donor_url) = resolve(donor, raw, resolved);
                let mut name = donor_name;
                name.push_str(std::str::from_utf8(&entry.name).unwrap());
                let mut url = donor_url[..shared].to_owned();
                url.push_str(std::str::from_utf8(&entry.url).unwrap());
                (name, url)
            }
        };
        resolved[index] = Some((name.clone(), url.clone()));
        (name, url)
    }

    let mut resolved = vec![None; raw.len()];
    (0..raw.len())
        .map(|index| {
            let (name, url) = resolve(index, &raw, &mut resolved);
            let mut flags = raw[index].flags;
            flags.has_prefix = false;
            DecodedEntry {
                name,
                url,
                flags,
                alias: raw[index].alias,
                suffix_length: raw[index].suffix_length,
            }
        })
        .collect()
}
