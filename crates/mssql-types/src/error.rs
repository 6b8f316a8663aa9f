//! Type conversion and encoding error types.

use thiserror::Error;

/// Errors raised by a type descriptor while resolving column attributes
/// or encoding a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TypeError {
    /// Value kind does not fit the column type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Expected type name.
        expected: &'static str,
        /// Actual type name.
        actual: String,
    },

    /// Value is out of range for target type.
    #[error("value out of range for {target_type}")]
    OutOfRange {
        /// Target type name.
        target_type: &'static str,
    },

    /// Invalid encoding in string data.
    #[error("invalid string encoding: {0}")]
    InvalidEncoding(String),

    /// Invalid date/time value.
    #[error("invalid date/time: {0}")]
    InvalidDateTime(String),

    /// Value longer than the column's declared length.
    #[error("value truncated: {0}")]
    Truncation(String),

    /// Explicit column length the type cannot accept.
    #[error("invalid length {length} for {type_name}")]
    InvalidLength {
        /// Requested length.
        length: i64,
        /// Column type.
        type_name: &'static str,
    },

    /// Explicit precision the type cannot accept.
    #[error("invalid precision {precision} for {type_name}: must be between 1 and 38")]
    InvalidPrecision {
        /// Requested precision.
        precision: u8,
        /// Column type.
        type_name: &'static str,
    },

    /// Explicit scale the type cannot accept.
    #[error("invalid scale {scale} for {type_name}: maximum is {max}")]
    InvalidScale {
        /// Requested scale.
        scale: u8,
        /// Largest scale allowed.
        max: u8,
        /// Column type.
        type_name: &'static str,
    },

    /// Unsupported type conversion.
    #[error("unsupported conversion from {from} to {to}")]
    UnsupportedConversion {
        /// Source type.
        from: String,
        /// Target type.
        to: &'static str,
    },
}
