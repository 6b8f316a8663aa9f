//! Protocol-level error types.

use thiserror::Error;

use crate::prelude::*;

/// Errors raised while encoding or decoding TDS protocol structures.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProtocolError {
    /// Not enough bytes were available to decode a structure.
    #[error("incomplete packet: expected {expected} bytes, got {actual}")]
    IncompletePacket {
        /// Bytes required.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },

    /// Unknown packet type byte.
    #[error("invalid packet type: 0x{0:02X}")]
    InvalidPacketType(u8),

    /// Unknown packet status bits.
    #[error("invalid packet status: 0x{0:02X}")]
    InvalidPacketStatus(u8),

    /// Unknown token type byte.
    #[error("invalid token type: 0x{0:02X}")]
    InvalidTokenType(u8),

    /// A string does not fit its length prefix.
    #[error("string too long: {actual} UTF-16 code units, maximum is {max}")]
    StringTooLong {
        /// Maximum code units the prefix can describe.
        max: usize,
        /// Actual code units.
        actual: usize,
    },

    /// A protocol version string could not be recognized.
    #[error("unsupported TDS version: {0}")]
    UnsupportedVersion(String),

    /// Negotiated packet size is outside the range allowed by the protocol.
    #[error("invalid packet size {0}: must be between 512 and 32767")]
    InvalidPacketSize(usize),
}
