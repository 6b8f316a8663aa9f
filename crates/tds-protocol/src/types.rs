//! TDS data type and column flag definitions.
//!
//! This module defines the type bytes and COLMETADATA flag bits as they
//! appear on the wire.

use bitflags::bitflags;

/// TDS data type identifiers.
///
/// These correspond to the type bytes sent in column metadata. Bulk load
/// always uses the nullable ("N") variants of the fixed-size types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeId {
    /// Variable-length GUID.
    Guid = 0x24,
    /// Variable-length integer.
    IntN = 0x26,
    /// Date (3 bytes).
    Date = 0x28,
    /// Time with variable precision.
    Time = 0x29,
    /// DateTime2 with variable precision.
    DateTime2 = 0x2A,
    /// DateTimeOffset with variable precision.
    DateTimeOffset = 0x2B,
    /// Variable-length bit.
    BitN = 0x68,
    /// Variable-length decimal.
    DecimalN = 0x6A,
    /// Variable-length numeric.
    NumericN = 0x6C,
    /// Variable-length float.
    FloatN = 0x6D,
    /// Large variable-length binary.
    BigVarBinary = 0xA5,
    /// Large variable-length character.
    BigVarChar = 0xA7,
    /// Variable-length Unicode character.
    NVarChar = 0xE7,
}

impl TypeId {
    /// Create a type ID from a raw byte.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x24 => Some(Self::Guid),
            0x26 => Some(Self::IntN),
            0x28 => Some(Self::Date),
            0x29 => Some(Self::Time),
            0x2A => Some(Self::DateTime2),
            0x2B => Some(Self::DateTimeOffset),
            0x68 => Some(Self::BitN),
            0x6A => Some(Self::DecimalN),
            0x6C => Some(Self::NumericN),
            0x6D => Some(Self::FloatN),
            0xA5 => Some(Self::BigVarBinary),
            0xA7 => Some(Self::BigVarChar),
            0xE7 => Some(Self::NVarChar),
            _ => None,
        }
    }

    /// Whether TYPE_INFO for this type carries a 2-byte maximum length
    /// (USHORTLEN_TYPE).
    #[must_use]
    pub const fn has_ushort_length(&self) -> bool {
        matches!(self, Self::BigVarBinary | Self::BigVarChar | Self::NVarChar)
    }

    /// Whether TYPE_INFO for this type carries a collation.
    #[must_use]
    pub const fn has_collation(&self) -> bool {
        matches!(self, Self::BigVarChar | Self::NVarChar)
    }

    /// Whether TYPE_INFO for this type carries a fractional-seconds scale.
    #[must_use]
    pub const fn has_time_scale(&self) -> bool {
        matches!(self, Self::Time | Self::DateTime2 | Self::DateTimeOffset)
    }
}

/// Maximum length marker for `(max)` variable-length types.
pub const MAX_LENGTH_MARKER: u16 = 0xFFFF;

/// Default collation sent with character columns.
///
/// LCID 0x0409 (en-US), case-insensitive, sort id 52: Latin1_General_CI_AS,
/// whose code page is Windows-1252.
pub const DEFAULT_COLLATION: [u8; 5] = [0x09, 0x04, 0xD0, 0x00, 0x34];

bitflags! {
    /// Column flags from COLMETADATA.
    ///
    /// `usUpdateable` is a two-bit field; `UPDATEABLE_READ_WRITE` and
    /// `UPDATEABLE_UNKNOWN` are its two non-zero values. `NULLABLE` and
    /// `NULLABLE_UNKNOWN` are never set together.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ColumnFlags: u16 {
        /// Column is nullable.
        const NULLABLE = 0x0001;
        /// Column allows case-sensitive comparison.
        const CASE_SENSITIVE = 0x0002;
        /// Column is read-write.
        const UPDATEABLE_READ_WRITE = 0x0004;
        /// Column updateability is unknown.
        const UPDATEABLE_UNKNOWN = 0x0008;
        /// Column is an identity column.
        const IDENTITY = 0x0010;
        /// Column is computed.
        const COMPUTED = 0x0020;
        /// Column has fixed-length CLR type.
        const FIXED_LEN_CLR_TYPE = 0x0100;
        /// Column is a sparse column set.
        const SPARSE_COLUMN_SET = 0x0400;
        /// Column is encrypted (Always Encrypted).
        const ENCRYPTED = 0x0800;
        /// Column is hidden.
        const HIDDEN = 0x2000;
        /// Column is a key column.
        const KEY = 0x4000;
        /// Column nullability is unknown.
        const NULLABLE_UNKNOWN = 0x8000;
    }
}

impl ColumnFlags {
    /// Flags for a column sent in a bulk-load COLMETADATA token.
    ///
    /// `nullable` is `None` when the caller never stated nullability. That
    /// maps to `NULLABLE_UNKNOWN` only when the protocol version knows the
    /// bit; older versions send neither bit.
    #[must_use]
    pub fn for_bulk_column(nullable: Option<bool>, nullable_unknown_supported: bool) -> Self {
        let mut flags = Self::UPDATEABLE_READ_WRITE;
        match nullable {
            Some(true) => flags |= Self::NULLABLE,
            None if nullable_unknown_supported => flags |= Self::NULLABLE_UNKNOWN,
            _ => {}
        }
        flags
    }
}
