//! Byte-exact serialization oracle tests.
//!
//! Every case serializes a hand-built structure, pretty-prints the bytes
//! back, and compares against a hand-authored rendering plus an exact byte
//! count. Because the pretty-printer is a full deserializer, a pass means
//! encode and decode agree on every field boundary.

mod common;

use common::{default_config, test_type_map, typed, CLASS, FUNC, NAMESPACE, PAGE, TYPE_NAMES};
use mcsearch::{
    pretty_print, pretty_print_map, pretty_print_trie, serialize_search_data, CapacityError,
    EntryOptions, FormatError, ResultMap, Serializer, Trie,
};

fn compare_trie(serialized: &[u8], expected: &str) {
    let (pretty, _) = pretty_print_trie(serialized, &default_config()).unwrap();
    assert_eq!(pretty, expected.trim_matches('\n'));
}

fn compare_map(serialized: &[u8], expected: &str) {
    let pretty = pretty_print_map(serialized, &default_config(), TYPE_NAMES).unwrap();
    assert_eq!(pretty, expected.trim_matches('\n'));
}

// ============================================================================
// TRIE
// ============================================================================

#[test]
fn trie_empty() {
    let trie = Trie::new();
    let serialized = trie.serialize(&default_config(), true).unwrap();
    compare_trie(&serialized, "");
    assert_eq!(serialized.len(), 6);
}

#[test]
fn trie_single() {
    let mut trie = Trie::new();
    trie.insert("magnum", 1337);
    trie.insert("magnum", 21);

    let serialized = trie.serialize(&default_config(), true).unwrap();
    compare_trie(&serialized, "magnum [1337, 21]");
    assert_eq!(serialized.len(), 46);

    let (_, stats) = pretty_print_trie(&serialized, &default_config()).unwrap();
    assert_eq!(stats.node_count, 7);
    assert_eq!(stats.max_node_results, 2);
    assert_eq!(stats.max_node_children, 1);
    assert_eq!(stats.max_node_result_index, 1337);
}

#[test]
fn trie_multiple() {
    let mut trie = Trie::new();

    trie.insert("math", 0);
    trie.insert_with_barriers("math::vector", 1, &[4]);
    trie.insert("vector", 1);
    trie.insert("math::range", 2);
    trie.insert("range", 2);

    trie.insert("math::min", 3);
    trie.insert("min", 3);
    trie.insert("math::max", 4);
    trie.insert("max", 4);
    trie.insert("math::minmax", 5);
    trie.insert("minmax", 5);

    trie.insert_with_barriers("math::vector::minmax", 6, &[4, 12]);
    trie.insert_with_barriers("vector::minmax", 6, &[6]);
    trie.insert("minmax", 6);
    trie.insert("math::vector::min", 7);
    trie.insert("vector::min", 7);
    trie.insert("min", 7);
    trie.insert("math::vector::max", 8);
    trie.insert("vector::max", 8);
    trie.insert("max", 8);

    trie.insert_with_barriers("math::range::min", 9, &[4, 11]);
    trie.insert_with_barriers("range::min", 9, &[5]);
    trie.insert("min", 9);

    trie.insert("math::range::max", 10);
    trie.insert("range::max", 10);
    trie.insert("max", 10);

    let serialized = trie.serialize(&default_config(), true).unwrap();
    compare_trie(
        &serialized,
        "
math [0]
||| :$
|||  :vector [1]
|||   |     :$
|||   |      :min [7]
|||   |        | max [6]
|||   |        ax [8]
|||   range [2]
|||   |    :$
|||   |     :min [9]
|||   |       ax [10]
|||   min [3]
|||   || max [5]
|||   |ax [4]
||x [4, 8, 10]
|in [3, 7, 9]
|| max [5, 6]
vector [1]
|     :$
|      :min [7]
|        | max [6]
|        ax [8]
range [2]
|    :$
|     :min [9]
|       ax [10]
",
    );
    assert_eq!(serialized.len(), 340);
}

#[test]
fn trie_unicode() {
    let mut trie = Trie::new();

    trie.insert("hýždě", 0);
    trie.insert("hárá", 1);

    let serialized = trie.serialize(&default_config(), true).unwrap();
    compare_trie(
        &serialized,
        "
h0xc3
  0xbd
   0xc5
  | 0xbe
  |  d0xc4
  |    0x9b
  |      [0]
  0xa1
   r0xc3
  |  0xa1
  |    [1]
",
    );
    assert_eq!(serialized.len(), 82);
}

#[test]
fn trie_subtree_merging_preserves_content() {
    let mut trie = Trie::new();
    trie.insert("math::vector", 0);
    trie.insert("vector", 0);
    trie.insert("math::range", 1);
    trie.insert("range", 1);

    let merged = trie.serialize(&default_config(), true).unwrap();
    let unmerged = trie.serialize(&default_config(), false).unwrap();
    assert!(merged.len() < unmerged.len());

    let (pretty_merged, _) = pretty_print_trie(&merged, &default_config()).unwrap();
    let (pretty_unmerged, _) = pretty_print_trie(&unmerged, &default_config()).unwrap();
    assert_eq!(pretty_merged, pretty_unmerged);
}

#[test]
fn trie_sorts_results_by_map_rank() {
    let mut map = ResultMap::new();
    // FUNC with a suffix, plain NAMESPACE, deprecated CLASS
    map.add(
        "rect()",
        "rect.html",
        EntryOptions {
            suffix_length: 2,
            ..typed(FUNC)
        },
    );
    map.add("rect", "namespaceRect.html", typed(NAMESPACE));
    map.add(
        "rect",
        "classRect.html",
        EntryOptions {
            flags: mcsearch::ResultFlags::from_type(CLASS).with_deprecated(),
            ..EntryOptions::default()
        },
    );

    let mut trie = Trie::new();
    trie.insert("rect", 0);
    trie.insert("rect", 1);
    trie.insert("rect", 2);
    trie.sort(&map);

    let serialized = trie.serialize(&default_config(), true).unwrap();
    // namespace outranks the function, deprecated sinks to the bottom
    compare_trie(&serialized, "rect [1, 0, 2]");
}

// ============================================================================
// RESULT MAP
// ============================================================================

#[test]
fn map_empty() {
    let map = ResultMap::new();
    let serialized = map.serialize(&default_config(), true).unwrap();
    compare_map(&serialized, "");
    assert_eq!(serialized.len(), 4);
}

#[test]
fn map_single() {
    let mut map = ResultMap::new();
    assert_eq!(
        map.add(
            "Magnum",
            "namespaceMagnum.html",
            EntryOptions {
                suffix_length: 11,
                ..typed(NAMESPACE)
            },
        ),
        0
    );

    let serialized = map.serialize(&default_config(), true).unwrap();
    compare_map(
        &serialized,
        "0: Magnum [suffix_length=11, type=NAMESPACE] -> namespaceMagnum.html",
    );
    assert_eq!(serialized.len(), 36);
}

fn build_multiple_map() -> ResultMap {
    let mut map = ResultMap::new();
    assert_eq!(map.add("Math", "namespaceMath.html", typed(NAMESPACE)), 0);
    assert_eq!(
        map.add("Math::Vector", "classMath_1_1Vector.html", typed(CLASS)),
        1
    );
    assert_eq!(
        map.add("Math::Range", "classMath_1_1Range.html", typed(CLASS)),
        2
    );
    assert_eq!(
        map.add("Math::min()", "namespaceMath.html#abcdef2875", typed(FUNC)),
        3
    );
    assert_eq!(
        map.add(
            "Math::max(int, int)",
            "namespaceMath.html#abcdef1234",
            EntryOptions {
                suffix_length: 8,
                flags: mcsearch::ResultFlags::from_type(FUNC)
                    .with_deprecated()
                    .with_deleted(),
                ..EntryOptions::default()
            },
        ),
        4
    );
    assert_eq!(
        map.add(
            "Rectangle",
            "",
            EntryOptions {
                alias: Some(2),
                ..EntryOptions::default()
            },
        ),
        5
    );
    assert_eq!(
        map.add(
            "Rectangle::Rect()",
            "",
            EntryOptions {
                alias: Some(2),
                suffix_length: 2,
                ..EntryOptions::default()
            },
        ),
        6
    );
    map
}

#[test]
fn map_multiple() {
    let map = build_multiple_map();
    let serialized = map.serialize(&default_config(), true).unwrap();
    compare_map(
        &serialized,
        "
0: Math [type=NAMESPACE] -> namespaceMath.html
1: ::Vector [prefix=0[:0], type=CLASS] -> classMath_1_1Vector.html
2: ::Range [prefix=0[:0], type=CLASS] -> classMath_1_1Range.html
3: ::min() [prefix=0[:18], type=FUNC] -> #abcdef2875
4: ::max(int, int) [prefix=0[:18], suffix_length=8, deprecated, deleted, type=FUNC] -> #abcdef1234
5: Rectangle [alias=2]
6: ::Rect() [alias=2, prefix=5[:0], suffix_length=2]
",
    );
    assert_eq!(serialized.len(), 203);
}

#[test]
fn map_multiple_unmerged_keeps_full_names() {
    let map = build_multiple_map();
    let serialized = map.serialize(&default_config(), false).unwrap();
    compare_map(
        &serialized,
        "
0: Math [type=NAMESPACE] -> namespaceMath.html
1: Math::Vector [type=CLASS] -> classMath_1_1Vector.html
2: Math::Range [type=CLASS] -> classMath_1_1Range.html
3: Math::min() [type=FUNC] -> namespaceMath.html#abcdef2875
4: Math::max(int, int) [suffix_length=8, deprecated, deleted, type=FUNC] -> namespaceMath.html#abcdef1234
5: Rectangle [alias=2]
6: Rectangle::Rect() [alias=2, suffix_length=2]
",
    );
}

#[test]
fn map_alias_has_no_url_segment() {
    let mut map = ResultMap::new();
    map.add("Math", "namespaceMath.html", typed(NAMESPACE));
    map.add("Rect", "classRect.html", typed(CLASS));
    map.add("Square", "classSquare.html", typed(CLASS));
    map.add(
        "Box",
        "",
        EntryOptions {
            alias: Some(2),
            ..EntryOptions::default()
        },
    );

    let serialized = map.serialize(&default_config(), true).unwrap();
    let pretty = pretty_print_map(&serialized, &default_config(), TYPE_NAMES).unwrap();
    let alias_line = pretty.lines().nth(3).unwrap();
    assert_eq!(alias_line, "3: Box [alias=2]");
    assert!(!alias_line.contains("->"));
}

// ============================================================================
// CAPACITY
// ============================================================================

#[test]
fn map_suffix_length_overflow() {
    let name = format!("operator()({})", "int, ".repeat(60));
    let mut map = ResultMap::new();
    map.add(
        &name,
        "op.html",
        EntryOptions {
            suffix_length: 300,
            ..typed(FUNC)
        },
    );

    let err = map.serialize(&Serializer::new(3, 2, 1), true).unwrap_err();
    assert_eq!(
        err,
        CapacityError::NameSize {
            value: 300,
            width: 1
        }
    );
    assert!(err.to_string().contains("name_size_bytes to 2"));
    assert!(map.serialize(&Serializer::new(3, 2, 2), true).is_ok());
}

#[test]
fn map_alias_target_overflow() {
    let mut map = ResultMap::new();
    map.add(
        "Shortcut",
        "",
        EntryOptions {
            alias: Some(70_000),
            ..EntryOptions::default()
        },
    );

    let err = map.serialize(&Serializer::new(3, 2, 1), true).unwrap_err();
    assert_eq!(
        err,
        CapacityError::ResultId {
            value: 70_000,
            width: 2
        }
    );
    assert!(map.serialize(&Serializer::new(3, 3, 1), true).is_ok());
}

#[test]
fn map_file_offset_overflow() {
    // One pathological URL pushes the section size past 24 bits.
    let mut map = ResultMap::new();
    map.add("A", &"a".repeat(1 << 24), typed(PAGE));

    let err = map.serialize(&Serializer::new(3, 2, 1), true).unwrap_err();
    assert!(matches!(err, CapacityError::FileOffset { width: 3, .. }));
    assert!(err.to_string().contains("file_offset_bytes to 4"));
    assert!(map.serialize(&Serializer::new(4, 2, 1), true).is_ok());
}

// ============================================================================
// FULL BLOB
// ============================================================================

#[test]
fn search_data() {
    let mut trie = Trie::new();
    let mut map = ResultMap::new();

    trie.insert(
        "math",
        map.add("Math", "namespaceMath.html", typed(NAMESPACE)),
    );
    let index = map.add("Math::Vector", "classMath_1_1Vector.html", typed(CLASS));
    trie.insert("math::vector", index);
    trie.insert("vector", index);
    let index = map.add("Math::Range", "classMath_1_1Range.html", typed(CLASS));
    trie.insert("math::range", index);
    trie.insert("range", index);

    let serialized = serialize_search_data(
        &default_config(),
        &trie,
        &map,
        &test_type_map(),
        3,
        true,
        true,
    )
    .unwrap();

    let (pretty, _) = pretty_print(&serialized, TYPE_NAMES).unwrap();
    assert_eq!(
        pretty,
        "3 symbols
math [0]
|   ::vector [1]
|     range [2]
vector [1]
range [2]
0: Math [type=NAMESPACE] -> namespaceMath.html
1: ::Vector [prefix=0[:0], type=CLASS] -> classMath_1_1Vector.html
2: ::Range [prefix=0[:0], type=CLASS] -> classMath_1_1Range.html
(PAGE, CssClass.SUCCESS, 'page'),
(NAMESPACE, CssClass.PRIMARY, 'namespace'),
(CLASS, CssClass.PRIMARY, 'class'),
(FUNC, CssClass.INFO, 'func')",
    );
    assert_eq!(serialized.len(), 274);
}

#[test]
fn search_data_empty() {
    let serialized = serialize_search_data(
        &default_config(),
        &Trie::new(),
        &ResultMap::new(),
        &test_type_map(),
        0,
        true,
        true,
    )
    .unwrap();
    // header 11 + trie 6 + map 4 + type map 32
    assert_eq!(serialized.len(), 53);
    let (pretty, _) = pretty_print(&serialized, TYPE_NAMES).unwrap();
    assert!(pretty.starts_with("0 symbols\n"));
}

#[test]
fn search_data_rejects_wrong_magic() {
    let mut trie = Trie::new();
    trie.insert("a", 0);
    let mut serialized = serialize_search_data(
        &default_config(),
        &trie,
        &ResultMap::new(),
        &test_type_map(),
        1,
        true,
        true,
    )
    .unwrap();
    serialized[0] = b'X';

    assert_eq!(
        pretty_print(&serialized, TYPE_NAMES).unwrap_err(),
        FormatError::InvalidMagic {
            found: [b'X', b'C', b'S']
        }
    );
}

#[test]
fn search_data_rejects_wrong_version() {
    let mut serialized = serialize_search_data(
        &default_config(),
        &Trie::new(),
        &ResultMap::new(),
        &test_type_map(),
        0,
        true,
        true,
    )
    .unwrap();
    serialized[3] = 1;

    assert_eq!(
        pretty_print(&serialized, TYPE_NAMES).unwrap_err(),
        FormatError::UnsupportedVersion {
            found: 1,
            expected: mcsearch::SEARCHDATA_FORMAT_VERSION
        }
    );
}
