//! Column type descriptors.
//!
//! [`SqlType`] is the closed set of SQL Server column types a bulk load can
//! target. Each variant knows how to default and validate its
//! length/precision/scale, how to write its COLMETADATA `TYPE_INFO`, how to
//! write a value into a ROW token, and how to declare itself in SQL text.
//!
//! Bulk load always uses the nullable wire variants (`INTN`, `BITN`,
//! `FLTN`, ...) so that any column can carry NULL as a zero length byte.

use bytes::{BufMut, BytesMut};
use tds_protocol::{DEFAULT_COLLATION, MAX_LENGTH_MARKER, TdsVersion, TypeId};

use crate::encode::{self, PLP_NULL, decimal_byte_length};
use crate::error::TypeError;
use crate::value::SqlValue;

/// Maximum declared length of a sized NVARCHAR column, in characters.
pub const NVARCHAR_MAX_CHARS: u32 = 4000;

/// Maximum declared length of a sized VARCHAR/VARBINARY column, in bytes.
pub const VARLEN_MAX_BYTES: u32 = 8000;

/// Maximum DECIMAL/NUMERIC precision.
pub const MAX_PRECISION: u8 = 38;

/// Maximum fractional-seconds scale for TIME-based types.
pub const MAX_TIME_SCALE: u8 = 7;

/// Largest explicit length any type accepts.
const MAX_EXPLICIT_LENGTH: i64 = i32::MAX as i64;

/// SQL Server column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SqlType {
    /// BIT.
    Bit,
    /// TINYINT.
    TinyInt,
    /// SMALLINT.
    SmallInt,
    /// INT.
    Int,
    /// BIGINT.
    BigInt,
    /// REAL.
    Real,
    /// FLOAT.
    Float,
    /// DECIMAL(p, s).
    Decimal,
    /// NUMERIC(p, s).
    Numeric,
    /// NVARCHAR(n | max). Length is in characters.
    NVarChar,
    /// VARCHAR(n | max). Length is in bytes.
    VarChar,
    /// VARBINARY(n | max).
    VarBinary,
    /// UNIQUEIDENTIFIER.
    UniqueIdentifier,
    /// DATE.
    Date,
    /// TIME(s).
    Time,
    /// DATETIME2(s).
    DateTime2,
    /// DATETIMEOFFSET(s).
    DateTimeOffset,
}

/// Resolved length, precision and scale of a column.
///
/// Attributes the type does not use are ignored. Unset attributes fall back
/// to the type's defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeParams {
    /// Declared length (characters for NVARCHAR, bytes otherwise).
    pub length: Option<u32>,
    /// Decimal precision.
    pub precision: Option<u8>,
    /// Decimal or fractional-seconds scale.
    pub scale: Option<u8>,
}

impl TypeParams {
    /// Params with only a length.
    #[must_use]
    pub const fn with_length(length: u32) -> Self {
        Self {
            length: Some(length),
            precision: None,
            scale: None,
        }
    }

    /// Params with precision and scale.
    #[must_use]
    pub const fn with_precision_scale(precision: u8, scale: u8) -> Self {
        Self {
            length: None,
            precision: Some(precision),
            scale: Some(scale),
        }
    }

    /// Params with only a scale.
    #[must_use]
    pub const fn with_scale(scale: u8) -> Self {
        Self {
            length: None,
            precision: None,
            scale: Some(scale),
        }
    }
}

impl SqlType {
    /// Upper-case SQL name, used in error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Bit => "BIT",
            Self::TinyInt => "TINYINT",
            Self::SmallInt => "SMALLINT",
            Self::Int => "INT",
            Self::BigInt => "BIGINT",
            Self::Real => "REAL",
            Self::Float => "FLOAT",
            Self::Decimal => "DECIMAL",
            Self::Numeric => "NUMERIC",
            Self::NVarChar => "NVARCHAR",
            Self::VarChar => "VARCHAR",
            Self::VarBinary => "VARBINARY",
            Self::UniqueIdentifier => "UNIQUEIDENTIFIER",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::DateTime2 => "DATETIME2",
            Self::DateTimeOffset => "DATETIMEOFFSET",
        }
    }

    /// TDS type byte written in `TYPE_INFO`.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        match self {
            Self::Bit => TypeId::BitN,
            Self::TinyInt | Self::SmallInt | Self::Int | Self::BigInt => TypeId::IntN,
            Self::Real | Self::Float => TypeId::FloatN,
            Self::Decimal => TypeId::DecimalN,
            Self::Numeric => TypeId::NumericN,
            Self::NVarChar => TypeId::NVarChar,
            Self::VarChar => TypeId::BigVarChar,
            Self::VarBinary => TypeId::BigVarBinary,
            Self::UniqueIdentifier => TypeId::Guid,
            Self::Date => TypeId::Date,
            Self::Time => TypeId::Time,
            Self::DateTime2 => TypeId::DateTime2,
            Self::DateTimeOffset => TypeId::DateTimeOffset,
        }
    }

    /// Whether the type carries a declared length.
    #[must_use]
    pub const fn has_length(&self) -> bool {
        self.type_id().has_ushort_length()
    }

    /// Whether the type carries a precision.
    #[must_use]
    pub const fn has_precision(&self) -> bool {
        matches!(self, Self::Decimal | Self::Numeric)
    }

    /// Whether the type carries a scale.
    #[must_use]
    pub const fn has_scale(&self) -> bool {
        matches!(
            self,
            Self::Decimal | Self::Numeric | Self::Time | Self::DateTime2 | Self::DateTimeOffset
        )
    }

    /// Whether the type only exists from TDS 7.3 on.
    #[must_use]
    pub const fn requires_date_time_support(&self) -> bool {
        matches!(
            self,
            Self::Date | Self::Time | Self::DateTime2 | Self::DateTimeOffset
        )
    }

    /// Default length for length-carrying types.
    #[must_use]
    pub const fn resolve_length(&self) -> Option<u32> {
        match self {
            Self::NVarChar => Some(NVARCHAR_MAX_CHARS),
            Self::VarChar | Self::VarBinary => Some(VARLEN_MAX_BYTES),
            _ => None,
        }
    }

    /// Default precision for types with precision.
    #[must_use]
    pub const fn resolve_precision(&self) -> Option<u8> {
        match self {
            Self::Decimal | Self::Numeric => Some(18),
            _ => None,
        }
    }

    /// Default scale for types with scale.
    #[must_use]
    pub const fn resolve_scale(&self) -> Option<u8> {
        match self {
            Self::Decimal | Self::Numeric => Some(0),
            Self::Time | Self::DateTime2 | Self::DateTimeOffset => Some(MAX_TIME_SCALE),
            _ => None,
        }
    }

    /// Validate an explicitly requested length.
    ///
    /// Negative or oversized lengths are rejected for every type. Zero is
    /// rejected for length-carrying types. Types without a length keep a
    /// valid value but never encode it.
    pub fn validate_length(&self, length: i64) -> Result<u32, TypeError> {
        let invalid = || TypeError::InvalidLength {
            length,
            type_name: self.name(),
        };
        if !(0..=MAX_EXPLICIT_LENGTH).contains(&length) || (self.has_length() && length == 0) {
            return Err(invalid());
        }
        u32::try_from(length).map_err(|_| invalid())
    }

    /// Validate an explicitly requested precision.
    pub fn validate_precision(&self, precision: u8) -> Result<u8, TypeError> {
        if self.has_precision() && !(1..=MAX_PRECISION).contains(&precision) {
            return Err(TypeError::InvalidPrecision {
                precision,
                type_name: self.name(),
            });
        }
        Ok(precision)
    }

    /// Validate an explicitly requested scale against the column's
    /// (resolved) precision.
    pub fn validate_scale(&self, scale: u8, precision: Option<u8>) -> Result<u8, TypeError> {
        let max = match self {
            Self::Decimal | Self::Numeric => precision
                .or(self.resolve_precision())
                .unwrap_or(MAX_PRECISION),
            Self::Time | Self::DateTime2 | Self::DateTimeOffset => MAX_TIME_SCALE,
            _ => return Ok(scale),
        };
        if scale > max {
            return Err(TypeError::InvalidScale {
                scale,
                max,
                type_name: self.name(),
            });
        }
        Ok(scale)
    }

    fn length(&self, params: &TypeParams) -> u32 {
        params.length.or(self.resolve_length()).unwrap_or(0)
    }

    fn precision(&self, params: &TypeParams) -> u8 {
        params.precision.or(self.resolve_precision()).unwrap_or(0)
    }

    fn scale(&self, params: &TypeParams) -> u8 {
        params.scale.or(self.resolve_scale()).unwrap_or(0)
    }

    /// Whether the column is a `(max)` column, sent with PLP encoding.
    #[must_use]
    pub fn is_max(&self, params: &TypeParams) -> bool {
        match self {
            Self::NVarChar => self.length(params) > NVARCHAR_MAX_CHARS,
            Self::VarChar | Self::VarBinary => self.length(params) > VARLEN_MAX_BYTES,
            _ => false,
        }
    }

    /// Fixed value size of the integer and float types.
    const fn fixed_size(&self) -> Option<u8> {
        match self {
            Self::Bit | Self::TinyInt => Some(1),
            Self::SmallInt => Some(2),
            Self::Int | Self::Real => Some(4),
            Self::BigInt | Self::Float => Some(8),
            Self::UniqueIdentifier => Some(16),
            _ => None,
        }
    }

    /// Encoded size of this type's `TYPE_INFO`.
    #[must_use]
    pub fn type_info_len(&self) -> usize {
        let type_id = self.type_id();
        1 + match self {
            Self::Decimal | Self::Numeric => 3,
            Self::Date => 0,
            _ if type_id.has_time_scale() => 1,
            _ if type_id.has_collation() => 2 + DEFAULT_COLLATION.len(),
            _ if type_id.has_ushort_length() => 2,
            _ => 1,
        }
    }

    /// Write the COLMETADATA `TYPE_INFO` for this type.
    pub fn write_type_info(&self, params: &TypeParams, buf: &mut BytesMut) {
        buf.put_u8(self.type_id() as u8);

        match self {
            Self::Decimal | Self::Numeric => {
                let precision = self.precision(params);
                buf.put_u8(decimal_byte_length(precision));
                buf.put_u8(precision);
                buf.put_u8(self.scale(params));
            }
            Self::NVarChar | Self::VarChar | Self::VarBinary => {
                let max_length = if self.is_max(params) {
                    MAX_LENGTH_MARKER
                } else if *self == Self::NVarChar {
                    (self.length(params) * 2) as u16
                } else {
                    self.length(params) as u16
                };
                buf.put_u16_le(max_length);
                if self.type_id().has_collation() {
                    buf.put_slice(&DEFAULT_COLLATION);
                }
            }
            Self::Date => {}
            Self::Time | Self::DateTime2 | Self::DateTimeOffset => {
                buf.put_u8(self.scale(params));
            }
            _ => {
                if let Some(size) = self.fixed_size() {
                    buf.put_u8(size);
                }
            }
        }
    }

    /// SQL declaration of the column type, e.g. `nvarchar(50)` or
    /// `decimal(18, 2)`.
    #[must_use]
    pub fn declaration(&self, params: &TypeParams) -> String {
        let varlen = |name: &str| {
            if self.is_max(params) {
                format!("{name}(max)")
            } else {
                format!("{name}({})", self.length(params))
            }
        };

        match self {
            Self::Decimal | Self::Numeric => format!(
                "{}({}, {})",
                self.name().to_lowercase(),
                self.precision(params),
                self.scale(params)
            ),
            Self::NVarChar => varlen("nvarchar"),
            Self::VarChar => varlen("varchar"),
            Self::VarBinary => varlen("varbinary"),
            Self::Time | Self::DateTime2 | Self::DateTimeOffset => {
                format!("{}({})", self.name().to_lowercase(), self.scale(params))
            }
            _ => self.name().to_lowercase(),
        }
    }

    fn mismatch(&self, value: &SqlValue) -> TypeError {
        TypeError::TypeMismatch {
            expected: self.name(),
            actual: value.type_name().to_string(),
        }
    }

    fn write_null(&self, params: &TypeParams, buf: &mut BytesMut) {
        if !self.has_length() {
            buf.put_u8(0);
        } else if self.is_max(params) {
            buf.put_u64_le(PLP_NULL);
        } else {
            buf.put_u16_le(0xFFFF);
        }
    }

    /// Write a value as column data in a ROW token.
    ///
    /// NULL is accepted for every type; nullability is enforced by the
    /// server.
    pub fn write_value(
        &self,
        params: &TypeParams,
        value: &SqlValue,
        version: TdsVersion,
        buf: &mut BytesMut,
    ) -> Result<(), TypeError> {
        if self.requires_date_time_support() && !version.supports_date_time_types() {
            return Err(TypeError::UnsupportedConversion {
                from: version.to_string(),
                to: self.name(),
            });
        }

        if value.is_null() {
            self.write_null(params, buf);
            return Ok(());
        }

        match self {
            Self::Bit => {
                let bit = match value {
                    SqlValue::Bool(v) => *v,
                    other => other.as_i64().ok_or_else(|| self.mismatch(other))? != 0,
                };
                buf.put_u8(1);
                buf.put_u8(u8::from(bit));
            }
            Self::TinyInt | Self::SmallInt | Self::Int | Self::BigInt => {
                let v = value.as_i64().ok_or_else(|| self.mismatch(value))?;
                let out_of_range = || TypeError::OutOfRange {
                    target_type: self.name(),
                };
                match self {
                    Self::TinyInt => {
                        buf.put_u8(1);
                        buf.put_u8(u8::try_from(v).map_err(|_| out_of_range())?);
                    }
                    Self::SmallInt => {
                        buf.put_u8(2);
                        buf.put_i16_le(i16::try_from(v).map_err(|_| out_of_range())?);
                    }
                    Self::Int => {
                        buf.put_u8(4);
                        buf.put_i32_le(i32::try_from(v).map_err(|_| out_of_range())?);
                    }
                    _ => {
                        buf.put_u8(8);
                        buf.put_i64_le(v);
                    }
                }
            }
            Self::Real | Self::Float => {
                let v = value
                    .as_f64()
                    .or_else(|| value.as_i64().map(|i| i as f64))
                    .ok_or_else(|| self.mismatch(value))?;
                if *self == Self::Real {
                    buf.put_u8(4);
                    buf.put_f32_le(v as f32);
                } else {
                    buf.put_u8(8);
                    buf.put_f64_le(v);
                }
            }
            Self::Decimal | Self::Numeric => self.write_decimal(params, value, buf)?,
            Self::NVarChar => {
                let s = value.as_str().ok_or_else(|| self.mismatch(value))?;
                let utf16: Vec<u16> = s.encode_utf16().collect();
                if self.is_max(params) {
                    encode::encode_plp_utf16(&utf16, buf);
                } else {
                    self.check_length(utf16.len(), params)?;
                    buf.put_u16_le((utf16.len() * 2) as u16);
                    for code_unit in utf16 {
                        buf.put_u16_le(code_unit);
                    }
                }
            }
            Self::VarChar => {
                let s = value.as_str().ok_or_else(|| self.mismatch(value))?;
                let bytes = encode_varchar(s)?;
                self.write_varlen_bytes(params, &bytes, buf)?;
            }
            Self::VarBinary => {
                let bytes = value.as_bytes().ok_or_else(|| self.mismatch(value))?;
                self.write_varlen_bytes(params, bytes, buf)?;
            }
            _ => self.write_feature_value(params, value, buf)?,
        }

        Ok(())
    }

    fn check_length(&self, len: usize, params: &TypeParams) -> Result<(), TypeError> {
        let max = self.length(params) as usize;
        if len > max {
            return Err(TypeError::Truncation(format!(
                "{len} units exceed {} declared length {max}",
                self.name()
            )));
        }
        Ok(())
    }

    fn write_varlen_bytes(
        &self,
        params: &TypeParams,
        bytes: &[u8],
        buf: &mut BytesMut,
    ) -> Result<(), TypeError> {
        if self.is_max(params) {
            encode::encode_plp_bytes(bytes, buf);
        } else {
            self.check_length(bytes.len(), params)?;
            buf.put_u16_le(bytes.len() as u16);
            buf.put_slice(bytes);
        }
        Ok(())
    }

    #[cfg(feature = "decimal")]
    fn write_decimal(
        &self,
        params: &TypeParams,
        value: &SqlValue,
        buf: &mut BytesMut,
    ) -> Result<(), TypeError> {
        use rust_decimal::Decimal;

        let decimal = match value {
            SqlValue::Decimal(d) => *d,
            SqlValue::Float(_) | SqlValue::Double(_) => value
                .as_f64()
                .and_then(|f| Decimal::try_from(f).ok())
                .ok_or(TypeError::OutOfRange {
                    target_type: self.name(),
                })?,
            other => Decimal::from(other.as_i64().ok_or_else(|| self.mismatch(other))?),
        };
        encode::encode_decimal(decimal, self.precision(params), self.scale(params), buf)
    }

    #[cfg(not(feature = "decimal"))]
    fn write_decimal(
        &self,
        _params: &TypeParams,
        value: &SqlValue,
        _buf: &mut BytesMut,
    ) -> Result<(), TypeError> {
        Err(TypeError::UnsupportedConversion {
            from: value.type_name().to_string(),
            to: self.name(),
        })
    }

    /// Types whose values need the `uuid` or `chrono` features.
    fn write_feature_value(
        &self,
        params: &TypeParams,
        value: &SqlValue,
        buf: &mut BytesMut,
    ) -> Result<(), TypeError> {
        #[cfg(feature = "uuid")]
        if *self == Self::UniqueIdentifier {
            let uuid = match value {
                SqlValue::Uuid(u) => *u,
                SqlValue::String(s) => {
                    uuid::Uuid::parse_str(s).map_err(|_| self.mismatch(value))?
                }
                other => return Err(self.mismatch(other)),
            };
            buf.put_u8(16);
            encode::encode_uuid(uuid, buf);
            return Ok(());
        }

        #[cfg(feature = "chrono")]
        if self.requires_date_time_support() {
            return self.write_date_time(params, value, buf);
        }

        let _ = (params, buf);
        Err(TypeError::UnsupportedConversion {
            from: value.type_name().to_string(),
            to: self.name(),
        })
    }

    #[cfg(feature = "chrono")]
    fn write_date_time(
        &self,
        params: &TypeParams,
        value: &SqlValue,
        buf: &mut BytesMut,
    ) -> Result<(), TypeError> {
        let scale = self.scale(params);
        let time_len = encode::time_byte_length(scale);

        match (self, value) {
            (Self::Date, SqlValue::Date(d)) => {
                buf.put_u8(3);
                encode::encode_date(*d, buf)
            }
            (Self::Date, SqlValue::DateTime(dt)) => {
                buf.put_u8(3);
                encode::encode_date(dt.date(), buf)
            }
            (Self::Time, SqlValue::Time(t)) => {
                buf.put_u8(time_len);
                encode::encode_time(*t, scale, buf);
                Ok(())
            }
            (Self::Time, SqlValue::DateTime(dt)) => {
                buf.put_u8(time_len);
                encode::encode_time(dt.time(), scale, buf);
                Ok(())
            }
            (Self::DateTime2, SqlValue::DateTime(dt)) => {
                buf.put_u8(time_len + 3);
                encode::encode_datetime2(*dt, scale, buf)
            }
            (Self::DateTime2, SqlValue::Date(d)) => {
                buf.put_u8(time_len + 3);
                encode::encode_datetime2(d.and_time(chrono::NaiveTime::MIN), scale, buf)
            }
            (Self::DateTimeOffset, SqlValue::DateTimeOffset(dto)) => {
                buf.put_u8(time_len + 5);
                encode::encode_datetimeoffset(*dto, scale, buf)
            }
            (Self::DateTimeOffset, SqlValue::DateTime(dt)) => {
                buf.put_u8(time_len + 5);
                encode::encode_datetimeoffset(dt.and_utc().fixed_offset(), scale, buf)
            }
            (_, other) => Err(self.mismatch(other)),
        }
    }

    /// Parse a SQL type declaration such as `INT`, `NVARCHAR(100)`,
    /// `VARBINARY(MAX)` or `DECIMAL(10,2)`.
    ///
    /// `MAX` maps to a length just above the sized limit so the column is
    /// sent as a `(max)` column.
    pub fn parse_declaration(declaration: &str) -> Result<(Self, TypeParams), TypeError> {
        let upper = declaration.trim().to_uppercase();
        let (base, args) = match upper.find('(') {
            Some(open) => {
                let args = upper[open + 1..].trim_end().trim_end_matches(')');
                (upper[..open].trim(), Some(args))
            }
            None => (upper.as_str(), None),
        };

        let unknown = || TypeError::UnsupportedConversion {
            from: declaration.to_string(),
            to: "SQL type declaration",
        };

        let ty = match base {
            "BIT" => Self::Bit,
            "TINYINT" => Self::TinyInt,
            "SMALLINT" => Self::SmallInt,
            "INT" => Self::Int,
            "BIGINT" => Self::BigInt,
            "REAL" => Self::Real,
            "FLOAT" => Self::Float,
            "DECIMAL" => Self::Decimal,
            "NUMERIC" => Self::Numeric,
            "NVARCHAR" => Self::NVarChar,
            "VARCHAR" => Self::VarChar,
            "VARBINARY" => Self::VarBinary,
            "UNIQUEIDENTIFIER" => Self::UniqueIdentifier,
            "DATE" => Self::Date,
            "TIME" => Self::Time,
            "DATETIME2" => Self::DateTime2,
            "DATETIMEOFFSET" => Self::DateTimeOffset,
            _ => return Err(unknown()),
        };

        let mut params = TypeParams::default();
        let Some(args) = args else {
            return Ok((ty, params));
        };
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        let number = |s: &str| s.parse::<u8>().map_err(|_| unknown());

        if ty.has_length() {
            params.length = Some(match parts.as_slice() {
                ["MAX"] => match ty {
                    Self::NVarChar => NVARCHAR_MAX_CHARS + 1,
                    _ => VARLEN_MAX_BYTES + 1,
                },
                [n] => ty.validate_length(n.parse::<i64>().map_err(|_| unknown())?)?,
                _ => return Err(unknown()),
            });
        } else if ty.has_precision() {
            let precision = ty.validate_precision(number(parts[0])?)?;
            params.precision = Some(precision);
            if let Some(&scale) = parts.get(1) {
                params.scale = Some(ty.validate_scale(number(scale)?, Some(precision))?);
            }
        } else if ty.has_scale() {
            params.scale = Some(ty.validate_scale(number(parts[0])?, None)?);
        } else {
            return Err(unknown());
        }

        Ok((ty, params))
    }
}

/// Encode a VARCHAR value in the default collation's code page.
#[cfg(feature = "encoding")]
fn encode_varchar(s: &str) -> Result<Vec<u8>, TypeError> {
    let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(s);
    if had_errors {
        return Err(TypeError::InvalidEncoding(format!(
            "{s:?} is not representable in Windows-1252"
        )));
    }
    Ok(bytes.into_owned())
}

/// Encode a VARCHAR value; only ASCII is accepted without code page support.
#[cfg(not(feature = "encoding"))]
fn encode_varchar(s: &str) -> Result<Vec<u8>, TypeError> {
    if !s.is_ascii() {
        return Err(TypeError::InvalidEncoding(format!(
            "{s:?} is not ASCII"
        )));
    }
    Ok(s.as_bytes().to_vec())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn type_info(ty: SqlType, params: TypeParams) -> Vec<u8> {
        let mut buf = BytesMut::new();
        ty.write_type_info(&params, &mut buf);
        assert_eq!(buf.len(), ty.type_info_len());
        buf.to_vec()
    }

    fn value(ty: SqlType, params: TypeParams, v: SqlValue) -> Result<Vec<u8>, TypeError> {
        let mut buf = BytesMut::new();
        ty.write_value(&params, &v, TdsVersion::V7_4, &mut buf)?;
        Ok(buf.to_vec())
    }

    #[test]
    fn test_int_type_info_and_value() {
        assert_eq!(type_info(SqlType::Int, TypeParams::default()), vec![0x26, 4]);
        assert_eq!(
            value(SqlType::Int, TypeParams::default(), SqlValue::Int(42)).unwrap(),
            vec![4, 42, 0, 0, 0]
        );
        assert_eq!(
            value(SqlType::Int, TypeParams::default(), SqlValue::Null).unwrap(),
            vec![0]
        );
    }

    #[test]
    fn test_integer_range_checks() {
        assert_eq!(
            value(SqlType::TinyInt, TypeParams::default(), SqlValue::Int(256)),
            Err(TypeError::OutOfRange {
                target_type: "TINYINT"
            })
        );
        assert_eq!(
            value(SqlType::Int, TypeParams::default(), SqlValue::BigInt(i64::MAX)),
            Err(TypeError::OutOfRange { target_type: "INT" })
        );
        assert_eq!(
            value(SqlType::BigInt, TypeParams::default(), SqlValue::TinyInt(1)).unwrap(),
            vec![8, 1, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_type_mismatch() {
        assert_eq!(
            value(SqlType::Int, TypeParams::default(), "x".into()),
            Err(TypeError::TypeMismatch {
                expected: "INT",
                actual: "NVARCHAR".into()
            })
        );
    }

    #[test]
    fn test_nvarchar_type_info() {
        let info = type_info(SqlType::NVarChar, TypeParams::with_length(50));
        assert_eq!(&info[..3], &[0xE7, 100, 0]);
        assert_eq!(&info[3..], &DEFAULT_COLLATION);

        let info = type_info(SqlType::NVarChar, TypeParams::with_length(5000));
        assert_eq!(&info[..3], &[0xE7, 0xFF, 0xFF]);

        // Default length is the sized maximum, not MAX
        let info = type_info(SqlType::NVarChar, TypeParams::default());
        assert_eq!(&info[1..3], &8000u16.to_le_bytes());
    }

    #[test]
    fn test_nvarchar_values() {
        let params = TypeParams::with_length(3);
        assert_eq!(
            value(SqlType::NVarChar, params, "ab".into()).unwrap(),
            vec![4, 0, b'a', 0, b'b', 0]
        );
        assert!(matches!(
            value(SqlType::NVarChar, params, "abcd".into()),
            Err(TypeError::Truncation(_))
        ));
        assert_eq!(
            value(SqlType::NVarChar, params, SqlValue::Null).unwrap(),
            vec![0xFF, 0xFF]
        );

        let max = TypeParams::with_length(NVARCHAR_MAX_CHARS + 1);
        assert_eq!(
            value(SqlType::NVarChar, max, SqlValue::Null).unwrap(),
            vec![0xFF; 8]
        );
        assert_eq!(value(SqlType::NVarChar, max, "a".into()).unwrap().len(), 8 + 4 + 2 + 4);
    }

    #[test]
    fn test_varchar_code_page() {
        let params = TypeParams::with_length(10);
        assert_eq!(
            value(SqlType::VarChar, params, "hi".into()).unwrap(),
            vec![2, 0, b'h', b'i']
        );
        assert!(matches!(
            value(SqlType::VarChar, params, "世".into()),
            Err(TypeError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_varbinary_value() {
        let params = TypeParams::with_length(4);
        assert_eq!(
            value(SqlType::VarBinary, params, vec![1u8, 2].into()).unwrap(),
            vec![2, 0, 1, 2]
        );
        assert_eq!(type_info(SqlType::VarBinary, params), vec![0xA5, 4, 0]);
    }

    #[test]
    fn test_decimal_type_info() {
        assert_eq!(
            type_info(SqlType::Decimal, TypeParams::default()),
            vec![0x6A, 9, 18, 0]
        );
        assert_eq!(
            type_info(SqlType::Numeric, TypeParams::with_precision_scale(5, 2)),
            vec![0x6C, 5, 5, 2]
        );
    }

    #[cfg(feature = "decimal")]
    #[test]
    fn test_decimal_from_integer() {
        let params = TypeParams::with_precision_scale(5, 2);
        assert_eq!(
            value(SqlType::Decimal, params, SqlValue::Int(3)).unwrap(),
            vec![5, 1, 0x2C, 0x01, 0, 0]
        );
    }

    #[test]
    fn test_time_type_info() {
        assert_eq!(type_info(SqlType::Time, TypeParams::default()), vec![0x29, 7]);
        assert_eq!(
            type_info(SqlType::DateTime2, TypeParams::with_scale(3)),
            vec![0x2A, 3]
        );
        assert_eq!(type_info(SqlType::Date, TypeParams::default()), vec![0x28]);
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn test_date_types_need_tds_7_3() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let mut buf = BytesMut::new();
        let err = SqlType::Date
            .write_value(&TypeParams::default(), &date.into(), TdsVersion::V7_2, &mut buf)
            .unwrap_err();
        assert!(matches!(err, TypeError::UnsupportedConversion { to: "DATE", .. }));
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn test_datetime2_value_length() {
        let dt = chrono::NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        let bytes = value(SqlType::DateTime2, TypeParams::with_scale(3), dt.into()).unwrap();
        assert_eq!(bytes[0], 7);
        assert_eq!(bytes.len(), 8);
    }

    #[test]
    fn test_validate_length() {
        assert_eq!(
            SqlType::Int.validate_length(-1),
            Err(TypeError::InvalidLength {
                length: -1,
                type_name: "INT"
            })
        );
        assert_eq!(SqlType::Int.validate_length(4), Ok(4));
        assert!(SqlType::NVarChar.validate_length(0).is_err());
        assert_eq!(SqlType::NVarChar.validate_length(20), Ok(20));
    }

    #[test]
    fn test_validate_precision_and_scale() {
        assert!(SqlType::Decimal.validate_precision(0).is_err());
        assert!(SqlType::Decimal.validate_precision(39).is_err());
        assert_eq!(SqlType::Decimal.validate_scale(4, Some(4)), Ok(4));
        assert!(SqlType::Decimal.validate_scale(5, Some(4)).is_err());
        assert!(SqlType::Time.validate_scale(8, None).is_err());
        assert_eq!(SqlType::Int.validate_scale(9, None), Ok(9));
    }

    #[test]
    fn test_declarations() {
        assert_eq!(SqlType::Int.declaration(&TypeParams::default()), "int");
        assert_eq!(
            SqlType::NVarChar.declaration(&TypeParams::with_length(50)),
            "nvarchar(50)"
        );
        assert_eq!(
            SqlType::VarBinary.declaration(&TypeParams::with_length(9000)),
            "varbinary(max)"
        );
        assert_eq!(
            SqlType::Decimal.declaration(&TypeParams::default()),
            "decimal(18, 0)"
        );
        assert_eq!(SqlType::Time.declaration(&TypeParams::default()), "time(7)");
    }

    #[test]
    fn test_parse_declaration() {
        assert_eq!(
            SqlType::parse_declaration("INT").unwrap(),
            (SqlType::Int, TypeParams::default())
        );
        assert_eq!(
            SqlType::parse_declaration("nvarchar(100)").unwrap(),
            (SqlType::NVarChar, TypeParams::with_length(100))
        );
        let (ty, params) = SqlType::parse_declaration("VARBINARY(MAX)").unwrap();
        assert!(ty.is_max(&params));
        assert_eq!(
            SqlType::parse_declaration("DECIMAL(10, 2)").unwrap(),
            (SqlType::Decimal, TypeParams::with_precision_scale(10, 2))
        );
        assert_eq!(
            SqlType::parse_declaration("datetime2(3)").unwrap(),
            (SqlType::DateTime2, TypeParams::with_scale(3))
        );
        assert!(SqlType::parse_declaration("GEOGRAPHY").is_err());
        assert!(SqlType::parse_declaration("INT(4)").is_err());
    }
}
