//! # mssql-types
//!
//! SQL Server column type descriptors for bulk load.
//!
//! A [`SqlType`] describes one column type: its length/precision/scale
//! defaults and validation, its COLMETADATA `TYPE_INFO`, its value encoding
//! for ROW tokens and its SQL declaration. [`SqlValue`] carries the values
//! written through it.
//!
//! ## Features
//!
//! - `chrono` (default): DATE, TIME, DATETIME2 and DATETIMEOFFSET values
//! - `uuid` (default): UNIQUEIDENTIFIER values
//! - `decimal` (default): DECIMAL/NUMERIC values via rust_decimal
//! - `encoding` (default): Windows-1252 VARCHAR values via encoding_rs;
//!   without it VARCHAR accepts ASCII only
//!
//! ## Type Mappings
//!
//! | SQL Server Type | Wire type | Rust Type |
//! |-----------------|-----------|-----------|
//! | `BIT` | `BITN` | `bool` |
//! | `TINYINT` | `INTN` | `u8` |
//! | `SMALLINT` | `INTN` | `i16` |
//! | `INT` | `INTN` | `i32` |
//! | `BIGINT` | `INTN` | `i64` |
//! | `REAL` | `FLTN` | `f32` |
//! | `FLOAT` | `FLTN` | `f64` |
//! | `DECIMAL`/`NUMERIC` | `DECIMALN`/`NUMERICN` | `rust_decimal::Decimal` |
//! | `VARCHAR` | `BIGVARCHAR` | `String` |
//! | `NVARCHAR` | `NVARCHAR` | `String` |
//! | `VARBINARY` | `BIGVARBINARY` | `bytes::Bytes` |
//! | `UNIQUEIDENTIFIER` | `GUID` | `uuid::Uuid` |
//! | `DATE` | `DATEN` | `chrono::NaiveDate` |
//! | `TIME` | `TIMEN` | `chrono::NaiveTime` |
//! | `DATETIME2` | `DATETIME2N` | `chrono::NaiveDateTime` |
//! | `DATETIMEOFFSET` | `DATETIMEOFFSETN` | `chrono::DateTime<FixedOffset>` |
//!
//! ```rust
//! use bytes::BytesMut;
//! use mssql_types::{SqlType, SqlValue, TypeParams};
//! use tds_protocol::TdsVersion;
//!
//! let mut buf = BytesMut::new();
//! SqlType::Int
//!     .write_value(&TypeParams::default(), &SqlValue::Int(7), TdsVersion::V7_4, &mut buf)
//!     .unwrap();
//! assert_eq!(&buf[..], &[4, 7, 0, 0, 0]);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod encode;
pub mod error;
pub mod sql_type;
pub mod value;

pub use error::TypeError;
pub use sql_type::{SqlType, TypeParams};
pub use value::SqlValue;
