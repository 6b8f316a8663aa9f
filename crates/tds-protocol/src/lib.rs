//! # tds-protocol
//!
//! Wire-level building blocks of the MS-TDS (Tabular Data Stream) protocol
//! used by Microsoft SQL Server, scoped to what a client needs to write a
//! bulk-load message.
//!
//! This crate provides `no_std` compatible token constants, column flag
//! packing, version gating, string codecs, and packet framing for TDS
//! protocol versions 7.0 through 8.0.
//!
//! ## Features
//!
//! - `std` (default): Enable standard library support
//! - `alloc`: Enable allocation without full std (requires `alloc` crate)
//!
//! ## Design Philosophy
//!
//! This crate is IO-agnostic. It contains no networking logic; higher-level
//! crates assemble complete messages from these pieces and hand them to a
//! transport.
//!
//! ## Example
//!
//! ```rust
//! use bytes::BytesMut;
//! use tds_protocol::{Done, TdsVersion};
//!
//! let mut buf = BytesMut::new();
//! Done::BULK_LOAD_END.encode(&mut buf, TdsVersion::V7_4);
//! assert_eq!(buf.len(), Done::encoded_len(TdsVersion::V7_4));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod codec;
pub mod error;
pub mod packet;
mod prelude;
pub mod token;
pub mod types;
pub mod version;

pub use error::ProtocolError;
pub use packet::{
    DEFAULT_PACKET_SIZE, MAX_PACKET_SIZE, MIN_PACKET_SIZE, PACKET_HEADER_SIZE, PacketHeader,
    PacketStatus, PacketType, split_message, validate_packet_size,
};
pub use token::{Done, DoneStatus, TokenType};
pub use types::{ColumnFlags, DEFAULT_COLLATION, MAX_LENGTH_MARKER, TypeId};
pub use version::TdsVersion;
