//! Codec utilities for TDS string encoding and decoding.

use bytes::{Buf, BufMut};

use crate::error::ProtocolError;
use crate::prelude::*;

/// Write a length-prefixed UTF-16LE string (B_VARCHAR, 1-byte length in
/// code units).
///
/// Unlike a truncating writer, a string longer than 255 code units is
/// rejected so column names never reach the server shortened.
pub fn write_b_varchar(dst: &mut impl BufMut, s: &str) -> Result<(), ProtocolError> {
    let len = s.encode_utf16().count();
    if len > u8::MAX as usize {
        return Err(ProtocolError::StringTooLong {
            max: u8::MAX as usize,
            actual: len,
        });
    }
    dst.put_u8(len as u8);
    write_utf16_string(dst, s);
    Ok(())
}

/// Encoded size of a B_VARCHAR, including its length byte.
#[must_use]
pub fn b_varchar_len(s: &str) -> usize {
    1 + utf16_byte_len(s)
}

/// Write a UTF-16LE string without length prefix.
pub fn write_utf16_string(dst: &mut impl BufMut, s: &str) {
    for c in s.encode_utf16() {
        dst.put_u16_le(c);
    }
}

/// Read a B_VARCHAR string.
pub fn read_b_varchar(src: &mut impl Buf) -> Option<String> {
    if src.remaining() < 1 {
        return None;
    }
    let len = src.get_u8() as usize;
    read_utf16_string(src, len)
}

/// Read a UTF-16LE string of specified code-unit length.
pub fn read_utf16_string(src: &mut impl Buf, char_count: usize) -> Option<String> {
    if src.remaining() < char_count * 2 {
        return None;
    }

    let units: Vec<u16> = (0..char_count).map(|_| src.get_u16_le()).collect();
    String::from_utf16(&units).ok()
}

/// Calculate the byte length of a UTF-16 encoded string.
#[must_use]
pub fn utf16_byte_len(s: &str) -> usize {
    s.encode_utf16().count() * 2
}
