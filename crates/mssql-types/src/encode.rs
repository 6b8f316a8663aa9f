//! TDS binary encoding primitives for SQL values.
//!
//! These helpers write the value bodies used in ROW tokens. The
//! column-level framing (length prefixes, NULL markers) is chosen by
//! [`SqlType`](crate::SqlType), which calls into this module.

use bytes::{BufMut, BytesMut};

use crate::error::TypeError;

/// PLP total-length marker for a NULL value.
pub const PLP_NULL: u64 = 0xFFFF_FFFF_FFFF_FFFF;

/// Encode UTF-16 code units using PLP (Partially Length-Prefixed) format.
///
/// PLP format (per MS-TDS):
/// - 8 bytes: total length in bytes (little-endian)
/// - Chunks: 4-byte chunk length + data, repeated
/// - Terminator: 4 bytes of zero
///
/// The whole value goes out as a single chunk.
pub fn encode_plp_utf16(utf16: &[u16], buf: &mut BytesMut) {
    let byte_len = utf16.len() * 2;
    buf.put_u64_le(byte_len as u64);
    if byte_len > 0 {
        buf.put_u32_le(byte_len as u32);
        for code_unit in utf16 {
            buf.put_u16_le(*code_unit);
        }
    }
    buf.put_u32_le(0);
}

/// Encode binary data using PLP format as a single chunk.
pub fn encode_plp_bytes(data: &[u8], buf: &mut BytesMut) {
    buf.put_u64_le(data.len() as u64);
    if !data.is_empty() {
        buf.put_u32_le(data.len() as u32);
        buf.put_slice(data);
    }
    buf.put_u32_le(0);
}

/// Encode a UUID in SQL Server's mixed-endian format.
///
/// The first three groups are little-endian, the last 8 bytes are kept
/// as-is.
#[cfg(feature = "uuid")]
pub fn encode_uuid(uuid: uuid::Uuid, buf: &mut BytesMut) {
    let bytes = uuid.as_bytes();
    buf.put_slice(&[bytes[3], bytes[2], bytes[1], bytes[0]]);
    buf.put_slice(&[bytes[5], bytes[4]]);
    buf.put_slice(&[bytes[7], bytes[6]]);
    buf.put_slice(&bytes[8..16]);
}

/// Byte length of a DECIMAL/NUMERIC value (sign byte included) for a
/// given precision.
#[must_use]
pub const fn decimal_byte_length(precision: u8) -> u8 {
    match precision {
        0..=9 => 5,
        10..=19 => 9,
        20..=28 => 13,
        _ => 17,
    }
}

/// Encode a DECIMAL/NUMERIC value body: sign byte followed by the
/// magnitude, scaled to `scale`, in `decimal_byte_length(precision) - 1`
/// little-endian bytes.
///
/// Scales above 28 are reached by widening the mantissa in `u128`, so
/// every scale up to 38 is writable.
#[cfg(feature = "decimal")]
pub fn encode_decimal(
    value: rust_decimal::Decimal,
    precision: u8,
    scale: u8,
    buf: &mut BytesMut,
) -> Result<(), TypeError> {
    let out_of_range = || TypeError::OutOfRange {
        target_type: "DECIMAL",
    };

    let limit = 10u128
        .checked_pow(u32::from(precision))
        .ok_or_else(out_of_range)?;

    let target = u32::from(scale);
    let magnitude = if target <= value.scale() {
        let mut scaled = value;
        scaled.rescale(target);
        scaled.mantissa().unsigned_abs()
    } else {
        10u128
            .checked_pow(target - value.scale())
            .and_then(|factor| value.mantissa().unsigned_abs().checked_mul(factor))
            .ok_or_else(out_of_range)?
    };
    if magnitude >= limit {
        return Err(out_of_range());
    }

    let len = decimal_byte_length(precision);
    buf.put_u8(len);
    buf.put_u8(if value.is_sign_negative() { 0 } else { 1 });
    buf.put_slice(&magnitude.to_le_bytes()[..usize::from(len - 1)]);
    Ok(())
}

/// Encode a DATE value body: days since 0001-01-01 as 3 little-endian bytes.
#[cfg(feature = "chrono")]
pub fn encode_date(date: chrono::NaiveDate, buf: &mut BytesMut) -> Result<(), TypeError> {
    use chrono::Datelike;

    let days = date.num_days_from_ce() - 1;
    if !(0..=0x00FF_FFFF).contains(&days) || date.year() > 9999 {
        return Err(TypeError::InvalidDateTime(format!(
            "{date} is outside 0001-01-01..9999-12-31"
        )));
    }

    let days = days as u32;
    buf.put_slice(&days.to_le_bytes()[..3]);
    Ok(())
}

/// Byte length of a TIME value body for a given fractional-seconds scale.
#[must_use]
pub const fn time_byte_length(scale: u8) -> u8 {
    match scale {
        0..=2 => 3,
        3..=4 => 4,
        _ => 5,
    }
}

/// Encode a TIME value body at the given scale: 10^-scale second units
/// since midnight in `time_byte_length(scale)` little-endian bytes.
#[cfg(feature = "chrono")]
pub fn encode_time(time: chrono::NaiveTime, scale: u8, buf: &mut BytesMut) {
    use chrono::Timelike;

    let nanos =
        u64::from(time.num_seconds_from_midnight()) * 1_000_000_000 + u64::from(time.nanosecond());
    let units = nanos / 10u64.pow(9 - u32::from(scale.min(7)));
    let len = usize::from(time_byte_length(scale));
    buf.put_slice(&units.to_le_bytes()[..len]);
}

/// Encode a DATETIME2 value body: TIME followed by DATE.
#[cfg(feature = "chrono")]
pub fn encode_datetime2(
    datetime: chrono::NaiveDateTime,
    scale: u8,
    buf: &mut BytesMut,
) -> Result<(), TypeError> {
    encode_time(datetime.time(), scale, buf);
    encode_date(datetime.date(), buf)
}

/// Encode a DATETIMEOFFSET value body: UTC TIME, UTC DATE, then the
/// offset in minutes as a signed 16-bit integer.
#[cfg(feature = "chrono")]
pub fn encode_datetimeoffset(
    datetime: chrono::DateTime<chrono::FixedOffset>,
    scale: u8,
    buf: &mut BytesMut,
) -> Result<(), TypeError> {
    let utc = datetime.naive_utc();
    encode_time(utc.time(), scale, buf);
    encode_date(utc.date(), buf)?;
    let offset_minutes = (datetime.offset().local_minus_utc() / 60) as i16;
    buf.put_i16_le(offset_minutes);
    Ok(())
}
