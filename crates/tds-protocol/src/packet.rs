//! TDS packet header definitions and message framing.

use bitflags::bitflags;
use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::ProtocolError;
use crate::prelude::*;

/// TDS packet header size in bytes.
pub const PACKET_HEADER_SIZE: usize = 8;

/// Smallest packet size a server will negotiate.
pub const MIN_PACKET_SIZE: usize = 512;

/// Largest packet size a server will negotiate.
pub const MAX_PACKET_SIZE: usize = 32767;

/// Default TDS packet size.
pub const DEFAULT_PACKET_SIZE: usize = 4096;

/// TDS packet type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketType {
    /// Bulk load data.
    BulkLoad = 0x07,
}

impl PacketType {
    /// Create a packet type from a raw byte value.
    pub fn from_u8(value: u8) -> Result<Self, ProtocolError> {
        match value {
            0x07 => Ok(Self::BulkLoad),
            _ => Err(ProtocolError::InvalidPacketType(value)),
        }
    }
}

bitflags! {
    /// TDS packet status flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PacketStatus: u8 {
        /// Normal packet, more packets to follow.
        const NORMAL = 0x00;
        /// End of message (last packet).
        const END_OF_MESSAGE = 0x01;
    }
}

/// TDS packet header.
///
/// Every TDS packet begins with an 8-byte header. Unlike token data, the
/// header's multi-byte fields are big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    /// Type of packet.
    pub packet_type: PacketType,
    /// Status flags.
    pub status: PacketStatus,
    /// Total packet length including header.
    pub length: u16,
    /// Server process ID (SPID).
    pub spid: u16,
    /// Packet sequence number (wraps at 255).
    pub packet_id: u8,
    /// Window (unused, should be 0).
    pub window: u8,
}

impl PacketHeader {
    /// Create a new packet header.
    #[must_use]
    pub const fn new(packet_type: PacketType, status: PacketStatus, length: u16) -> Self {
        Self {
            packet_type,
            status,
            length,
            spid: 0,
            packet_id: 0,
            window: 0,
        }
    }

    /// Parse a packet header from bytes.
    pub fn decode(src: &mut impl Buf) -> Result<Self, ProtocolError> {
        if src.remaining() < PACKET_HEADER_SIZE {
            return Err(ProtocolError::IncompletePacket {
                expected: PACKET_HEADER_SIZE,
                actual: src.remaining(),
            });
        }

        let packet_type = PacketType::from_u8(src.get_u8())?;
        let status_byte = src.get_u8();
        let status = PacketStatus::from_bits(status_byte)
            .ok_or(ProtocolError::InvalidPacketStatus(status_byte))?;

        Ok(Self {
            packet_type,
            status,
            length: src.get_u16(),
            spid: src.get_u16(),
            packet_id: src.get_u8(),
            window: src.get_u8(),
        })
    }

    /// Encode the packet header to bytes.
    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_u8(self.packet_type as u8);
        dst.put_u8(self.status.bits());
        dst.put_u16(self.length);
        dst.put_u16(self.spid);
        dst.put_u8(self.packet_id);
        dst.put_u8(self.window);
    }

    /// Get the payload length (total length minus header).
    #[must_use]
    pub const fn payload_length(&self) -> usize {
        self.length.saturating_sub(PACKET_HEADER_SIZE as u16) as usize
    }

    /// Check if this is the last packet in a message.
    #[must_use]
    pub const fn is_end_of_message(&self) -> bool {
        self.status.contains(PacketStatus::END_OF_MESSAGE)
    }

    /// Set the packet ID (sequence number).
    #[must_use]
    pub const fn with_packet_id(mut self, id: u8) -> Self {
        self.packet_id = id;
        self
    }
}

/// Validate a negotiated packet size.
pub fn validate_packet_size(packet_size: usize) -> Result<(), ProtocolError> {
    if (MIN_PACKET_SIZE..=MAX_PACKET_SIZE).contains(&packet_size) {
        Ok(())
    } else {
        Err(ProtocolError::InvalidPacketSize(packet_size))
    }
}

/// Split a message body into framed packets.
///
/// Packet ids start at 1 and wrap. The last packet carries
/// `END_OF_MESSAGE`; an empty body still produces one header-only packet.
pub fn split_message(
    packet_type: PacketType,
    body: &[u8],
    packet_size: usize,
) -> Result<Vec<Bytes>, ProtocolError> {
    validate_packet_size(packet_size)?;
    let max_payload = packet_size - PACKET_HEADER_SIZE;

    let chunk_count = body.len().div_ceil(max_payload).max(1);
    let mut packets = Vec::with_capacity(chunk_count);
    let mut packet_id: u8 = 1;

    for index in 0..chunk_count {
        let start = index * max_payload;
        let end = (start + max_payload).min(body.len());
        let chunk = &body[start..end];
        let status = if index + 1 == chunk_count {
            PacketStatus::END_OF_MESSAGE
        } else {
            PacketStatus::NORMAL
        };

        let header = PacketHeader::new(packet_type, status, (PACKET_HEADER_SIZE + chunk.len()) as u16)
            .with_packet_id(packet_id);

        let mut packet = BytesMut::with_capacity(PACKET_HEADER_SIZE + chunk.len());
        header.encode(&mut packet);
        packet.put_slice(chunk);
        packets.push(packet.freeze());

        packet_id = packet_id.wrapping_add(1);
    }

    Ok(packets)
}
