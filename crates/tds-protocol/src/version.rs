//! TDS protocol version definitions.
//!
//! The bulk-load payload changes shape at TDS 7.2: user types widen from
//! 16 to 32 bits, DONE row counts from 32 to 64 bits, and the
//! `fNullableUnknown` column flag becomes available.

use core::fmt;

use crate::error::ProtocolError;
use crate::prelude::*;

/// TDS protocol version.
///
/// Represents the version of the TDS protocol negotiated with SQL Server.
/// Ordering follows protocol age, with TDS 8.0 sorting above every 7.x
/// version even though its wire value is numerically lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TdsVersion(u32);

impl TdsVersion {
    /// TDS 7.0 (SQL Server 7.0)
    pub const V7_0: Self = Self(0x70000000);

    /// TDS 7.1 (SQL Server 2000)
    pub const V7_1: Self = Self(0x71000000);

    /// TDS 7.1 Revision 1 (SQL Server 2000 SP1)
    pub const V7_1_REV1: Self = Self(0x71000001);

    /// TDS 7.2 (SQL Server 2005)
    pub const V7_2: Self = Self(0x72090002);

    /// TDS 7.3A (SQL Server 2008)
    pub const V7_3A: Self = Self(0x730A0003);

    /// TDS 7.3B (SQL Server 2008 R2)
    pub const V7_3B: Self = Self(0x730B0003);

    /// TDS 7.4 (SQL Server 2012+)
    pub const V7_4: Self = Self(0x74000004);

    /// TDS 8.0 (SQL Server 2022+ strict encryption mode)
    pub const V8_0: Self = Self(0x08000000);

    /// Create a new TDS version from its wire value.
    #[must_use]
    pub const fn new(version: u32) -> Self {
        Self(version)
    }

    /// Get the raw wire value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this is TDS 8.0.
    #[must_use]
    pub const fn is_tds_8(self) -> bool {
        self.0 == Self::V8_0.0
    }

    /// Check whether this version is the same as or newer than `other`.
    #[must_use]
    pub const fn at_least(self, other: Self) -> bool {
        match (self.is_tds_8(), other.is_tds_8()) {
            (true, _) => true,
            (false, true) => false,
            (false, false) => self.0 >= other.0,
        }
    }

    /// Whether COLMETADATA user types are 32 bits wide (TDS 7.2+).
    #[must_use]
    pub const fn has_wide_user_type(self) -> bool {
        self.at_least(Self::V7_2)
    }

    /// Whether DONE row counts are 64 bits wide (TDS 7.2+).
    #[must_use]
    pub const fn has_wide_row_count(self) -> bool {
        self.at_least(Self::V7_2)
    }

    /// Whether the `fNullableUnknown` column flag may be sent (TDS 7.2+).
    #[must_use]
    pub const fn supports_nullable_unknown(self) -> bool {
        self.at_least(Self::V7_2)
    }

    /// Check if this version supports DATE, TIME, DATETIME2, and DATETIMEOFFSET types.
    ///
    /// These types were introduced in TDS 7.3 (SQL Server 2008).
    #[must_use]
    pub const fn supports_date_time_types(self) -> bool {
        self.at_least(Self::V7_3A)
    }

    /// Parse a TDS version from a string representation.
    ///
    /// Accepts dotted and underscored forms: "7.1", "7_1", "7.2", "7.3",
    /// "7.3A", "7_3_B", "7.4", "8.0", "8".
    pub fn parse(s: &str) -> Result<Self, ProtocolError> {
        let normalized = s.trim().to_lowercase().replace('_', ".");
        match normalized.as_str() {
            "7.0" => Ok(Self::V7_0),
            "7.1" => Ok(Self::V7_1),
            "7.1.1" => Ok(Self::V7_1_REV1),
            "7.2" => Ok(Self::V7_2),
            "7.3" | "7.3a" | "7.3.a" => Ok(Self::V7_3A),
            "7.3b" | "7.3.b" => Ok(Self::V7_3B),
            "7.4" => Ok(Self::V7_4),
            "8.0" | "8" => Ok(Self::V8_0),
            _ => Err(ProtocolError::UnsupportedVersion(s.to_string())),
        }
    }

    /// Get the logical minor version (0-4 for TDS 7.x, 0 for TDS 8.0).
    #[must_use]
    pub const fn minor(self) -> u8 {
        match self.0 {
            0x70000000 => 0,
            0x71000000 | 0x71000001 => 1,
            0x72090002 => 2,
            0x730A0003 | 0x730B0003 => 3,
            0x74000004 => 4,
            0x08000000 => 0,
            _ => ((self.0 >> 24) & 0x0F) as u8,
        }
    }

    /// Revision suffix for TDS 7.3 ('A' or 'B').
    #[must_use]
    pub const fn revision_suffix(self) -> Option<char> {
        match self.0 {
            0x730A0003 => Some('A'),
            0x730B0003 => Some('B'),
            _ => None,
        }
    }
}

impl PartialOrd for TdsVersion {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TdsVersion {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        match (self.is_tds_8(), other.is_tds_8()) {
            (true, true) => core::cmp::Ordering::Equal,
            (true, false) => core::cmp::Ordering::Greater,
            (false, true) => core::cmp::Ordering::Less,
            (false, false) => self.0.cmp(&other.0),
        }
    }
}

impl Default for TdsVersion {
    fn default() -> Self {
        Self::V7_4
    }
}

impl fmt::Display for TdsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_tds_8() {
            write!(f, "TDS 8.0")
        } else if let Some(suffix) = self.revision_suffix() {
            write!(f, "TDS 7.{}{}", self.minor(), suffix)
        } else {
            write!(f, "TDS 7.{}", self.minor())
        }
    }
}

impl core::str::FromStr for TdsVersion {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u32> for TdsVersion {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
