//! TDS token definitions for the bulk-load stream.
//!
//! A bulk-load message body is a token stream written by the client:
//!
//! ```text
//! COLMETADATA  *ROW  DONE
//! ```
//!
//! Each token begins with a 1-byte token type identifier followed by
//! token-specific data.

use bytes::{Buf, BufMut};

use crate::error::ProtocolError;
use crate::version::TdsVersion;

/// Token type identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenType {
    /// Column metadata (COLMETADATA).
    ColMetaData = 0x81,
    /// Row data (ROW).
    Row = 0xD1,
    /// Done (DONE).
    Done = 0xFD,
}

impl TokenType {
    /// Create a token type from a raw byte.
    pub fn from_u8(value: u8) -> Result<Self, ProtocolError> {
        match value {
            0x81 => Ok(Self::ColMetaData),
            0xD1 => Ok(Self::Row),
            0xFD => Ok(Self::Done),
            _ => Err(ProtocolError::InvalidTokenType(value)),
        }
    }
}

/// Write the COLMETADATA `UserType` field.
///
/// The field is a USHORT before TDS 7.2 and a ULONG from TDS 7.2 on.
pub fn write_user_type(dst: &mut impl BufMut, user_type: u32, version: TdsVersion) {
    if version.has_wide_user_type() {
        dst.put_u32_le(user_type);
    } else {
        dst.put_u16_le(user_type as u16);
    }
}

/// Width in bytes of the COLMETADATA `UserType` field.
#[must_use]
pub const fn user_type_len(version: TdsVersion) -> usize {
    if version.has_wide_user_type() { 4 } else { 2 }
}

mod done_status_bits {
    pub const DONE_FINAL: u16 = 0x0000;
    pub const DONE_MORE: u16 = 0x0001;
    pub const DONE_ERROR: u16 = 0x0002;
    pub const DONE_INXACT: u16 = 0x0004;
    pub const DONE_COUNT: u16 = 0x0010;
    pub const DONE_ATTN: u16 = 0x0020;
    pub const DONE_SRVERROR: u16 = 0x0100;
}

/// Done status flags.
///
/// The all-clear value is `DONE_FINAL` (zero), the only status a client
/// sends at the end of a bulk-load row stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoneStatus {
    /// More results follow.
    pub more: bool,
    /// Error occurred.
    pub error: bool,
    /// Transaction in progress.
    pub in_xact: bool,
    /// Row count is valid.
    pub count: bool,
    /// Attention acknowledgment.
    pub attn: bool,
    /// Server error caused statement termination.
    pub srverror: bool,
}

impl DoneStatus {
    /// The final-done status: no bits set.
    pub const FINAL: Self = Self {
        more: false,
        error: false,
        in_xact: false,
        count: false,
        attn: false,
        srverror: false,
    };

    /// Parse done status from raw bits.
    #[must_use]
    pub fn from_bits(bits: u16) -> Self {
        use done_status_bits::*;
        Self {
            more: (bits & DONE_MORE) != 0,
            error: (bits & DONE_ERROR) != 0,
            in_xact: (bits & DONE_INXACT) != 0,
            count: (bits & DONE_COUNT) != 0,
            attn: (bits & DONE_ATTN) != 0,
            srverror: (bits & DONE_SRVERROR) != 0,
        }
    }

    /// Convert to raw bits.
    #[must_use]
    pub fn to_bits(&self) -> u16 {
        use done_status_bits::*;
        [
            (self.more, DONE_MORE),
            (self.error, DONE_ERROR),
            (self.in_xact, DONE_INXACT),
            (self.count, DONE_COUNT),
            (self.attn, DONE_ATTN),
            (self.srverror, DONE_SRVERROR),
        ]
        .into_iter()
        .filter(|(set, _)| *set)
        .fold(DONE_FINAL, |bits, (_, bit)| bits | bit)
    }
}

/// Done token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Done {
    /// Status flags.
    pub status: DoneStatus,
    /// Current command.
    pub cur_cmd: u16,
    /// Row count. Truncated to 32 bits before TDS 7.2.
    pub row_count: u64,
}

impl Done {
    /// The DONE token closing a bulk-load row stream.
    ///
    /// The row count is advisory for this message and is always sent as zero.
    pub const BULK_LOAD_END: Self = Self {
        status: DoneStatus::FINAL,
        cur_cmd: 0,
        row_count: 0,
    };

    /// Encoded size including the token type byte: 9 bytes before TDS 7.2,
    /// 13 bytes from TDS 7.2 on.
    #[must_use]
    pub const fn encoded_len(version: TdsVersion) -> usize {
        1 + 2 + 2 + if version.has_wide_row_count() { 8 } else { 4 }
    }

    /// Encode the DONE token for the given protocol version.
    ///
    /// The 64-bit row count is written as two little-endian 32-bit halves,
    /// low half first.
    pub fn encode(&self, dst: &mut impl BufMut, version: TdsVersion) {
        dst.put_u8(TokenType::Done as u8);
        dst.put_u16_le(self.status.to_bits());
        dst.put_u16_le(self.cur_cmd);
        if version.has_wide_row_count() {
            dst.put_u32_le(self.row_count as u32);
            dst.put_u32_le((self.row_count >> 32) as u32);
        } else {
            dst.put_u32_le(self.row_count as u32);
        }
    }

    /// Decode a DONE token body (the token type byte already consumed).
    pub fn decode(src: &mut impl Buf, version: TdsVersion) -> Result<Self, ProtocolError> {
        let size = Self::encoded_len(version) - 1;
        if src.remaining() < size {
            return Err(ProtocolError::IncompletePacket {
                expected: size,
                actual: src.remaining(),
            });
        }

        let status = DoneStatus::from_bits(src.get_u16_le());
        let cur_cmd = src.get_u16_le();
        let row_count = if version.has_wide_row_count() {
            src.get_u64_le()
        } else {
            u64::from(src.get_u32_le())
        };

        Ok(Self {
            status,
            cur_cmd,
            row_count,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn test_token_type_from_u8() {
        assert_eq!(TokenType::from_u8(0x81).unwrap(), TokenType::ColMetaData);
        assert_eq!(TokenType::from_u8(0xD1).unwrap(), TokenType::Row);
        assert_eq!(TokenType::from_u8(0xFD).unwrap(), TokenType::Done);
        assert_eq!(
            TokenType::from_u8(0xAA),
            Err(ProtocolError::InvalidTokenType(0xAA))
        );
    }

    #[test]
    fn test_done_status_bits() {
        assert_eq!(DoneStatus::FINAL.to_bits(), 0);
        let status = DoneStatus {
            count: true,
            srverror: true,
            ..Default::default()
        };
        assert_eq!(status.to_bits(), 0x0110);
        assert_eq!(DoneStatus::from_bits(0x0110), status);
    }

    #[test]
    fn test_bulk_load_done_legacy() {
        let mut buf = BytesMut::new();
        Done::BULK_LOAD_END.encode(&mut buf, TdsVersion::V7_1);
        assert_eq!(buf.len(), Done::encoded_len(TdsVersion::V7_1));
        assert_eq!(&buf[..], &[0xFD, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_bulk_load_done_wide() {
        let mut buf = BytesMut::new();
        Done::BULK_LOAD_END.encode(&mut buf, TdsVersion::V7_4);
        assert_eq!(buf.len(), 13);
        assert_eq!(buf[0], 0xFD);
        assert!(buf[1..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_done_row_count_halves() {
        let done = Done {
            status: DoneStatus::FINAL,
            cur_cmd: 0,
            row_count: 0x0000_0002_0000_0001,
        };
        let mut buf = BytesMut::new();
        done.encode(&mut buf, TdsVersion::V7_2);
        assert_eq!(&buf[5..9], &1u32.to_le_bytes());
        assert_eq!(&buf[9..13], &2u32.to_le_bytes());

        let mut body = &buf[1..];
        assert_eq!(Done::decode(&mut body, TdsVersion::V7_2).unwrap(), done);
    }

    #[test]
    fn test_user_type_width() {
        let mut buf = BytesMut::new();
        write_user_type(&mut buf, 0, TdsVersion::V7_1);
        assert_eq!(buf.len(), user_type_len(TdsVersion::V7_1));
        assert_eq!(buf.len(), 2);

        let mut buf = BytesMut::new();
        write_user_type(&mut buf, 0, TdsVersion::V7_2);
        assert_eq!(buf.len(), 4);
    }
}
