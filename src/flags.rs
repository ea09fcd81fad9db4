// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-result flags and the CSS class palette of the type map.
//!
//! A result's flags byte carries a 4-bit type discriminant plus four
//! independent booleans, all sharing one byte on the wire:
//!
//! ```text
//! bit 0      HAS_SUFFIX   trailing bytes of the name are a suffix
//! bit 1      DEPRECATED
//! bit 2      DELETED
//! bit 3      HAS_PREFIX   entry stores only a tail, plus a back-reference
//! bits 4..=7 type id      0 = alias, 1..=15 caller-defined
//! ```
//!
//! Rather than juggling bit arithmetic at every use site, the struct keeps
//! the fields separate and funnels everything through [`ResultFlags::pack`]
//! and [`ResultFlags::unpack`]. The two are exact inverses over all 256
//! byte values.

use serde::{Deserialize, Serialize};

/// Type id reserved for alias entries. An alias inherits its effective type
/// from the referenced result.
pub const TYPE_ALIAS: u8 = 0;

/// Decoded form of a result entry's flags byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResultFlags {
    /// 4-bit result kind; [`TYPE_ALIAS`] or a caller-defined id `1..=15`.
    /// The id doubles as the sort rank for equally-named symbols.
    pub type_id: u8,
    pub has_suffix: bool,
    pub has_prefix: bool,
    pub deprecated: bool,
    pub deleted: bool,
}

impl ResultFlags {
    /// No flags, alias type. What alias entries pass to `add`.
    pub const NONE: ResultFlags = ResultFlags {
        type_id: TYPE_ALIAS,
        has_suffix: false,
        has_prefix: false,
        deprecated: false,
        deleted: false,
    };

    /// Flags for a regular result of the given caller-defined type.
    ///
    /// Panics when `type_id` doesn't fit the 4-bit field.
    pub fn from_type(type_id: u8) -> Self {
        assert!(type_id <= 0xf, "type ids are 4-bit");
        ResultFlags {
            type_id,
            ..Self::NONE
        }
    }

    pub fn with_deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    pub fn with_deleted(mut self) -> Self {
        self.deleted = true;
        self
    }

    pub fn is_alias(&self) -> bool {
        self.type_id == TYPE_ALIAS
    }

    /// Pack into the wire byte.
    pub fn pack(&self) -> u8 {
        debug_assert!(self.type_id <= 0xf, "type ids are 4-bit");
        u8::from(self.has_suffix)
            | u8::from(self.deprecated) << 1
            | u8::from(self.deleted) << 2
            | u8::from(self.has_prefix) << 3
            | self.type_id << 4
    }

    /// Decode a wire byte. Total over all 256 values.
    pub fn unpack(byte: u8) -> Self {
        ResultFlags {
            type_id: byte >> 4,
            has_suffix: byte & 1 != 0,
            deprecated: byte & (1 << 1) != 0,
            deleted: byte & (1 << 2) != 0,
            has_prefix: byte & (1 << 3) != 0,
        }
    }
}

/// CSS class a result type renders with in the search widget.
///
/// Opaque to the codec; it travels through the type map so the client can
/// badge results without shipping a stylesheet mapping of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CssClass {
    Default = 0,
    Primary = 1,
    Success = 2,
    Warning = 3,
    Danger = 4,
    Info = 5,
    Dim = 6,
}

impl CssClass {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(CssClass::Default),
            1 => Some(CssClass::Primary),
            2 => Some(CssClass::Success),
            3 => Some(CssClass::Warning),
            4 => Some(CssClass::Danger),
            5 => Some(CssClass::Info),
            6 => Some(CssClass::Dim),
            _ => None,
        }
    }

    /// Constant-style name, as the pretty-printer spells it.
    pub fn name(self) -> &'static str {
        match self {
            CssClass::Default => "DEFAULT",
            CssClass::Primary => "PRIMARY",
            CssClass::Success => "SUCCESS",
            CssClass::Warning => "WARNING",
            CssClass::Danger => "DANGER",
            CssClass::Info => "INFO",
            CssClass::Dim => "DIM",
        }
    }
}
