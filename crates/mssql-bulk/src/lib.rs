//! # mssql-bulk
//!
//! Byte-exact bulk-load payloads for SQL Server.
//!
//! A bulk load is started with an `INSERT BULK` statement and followed by a
//! BulkLoad message (packet type 0x07) whose body is a token stream:
//!
//! - a COLMETADATA token (0x81) describing the target columns,
//! - one ROW token (0xD1) per row,
//! - a DONE token (0xFD) closing the stream.
//!
//! This crate builds that body and the accompanying SQL text. It performs
//! no I/O; the bytes are handed to whatever connection runs the load.
//!
//! ## Example
//!
//! ```rust
//! use mssql_bulk::{BulkLoad, BulkLoadConfig, BulkOptions, ColumnOptions, SqlType, SqlValue};
//!
//! let mut bulk = BulkLoad::new(
//!     "dbo.Users",
//!     BulkOptions::new().fire_triggers(true).lock_table(true),
//!     BulkLoadConfig::default(),
//! )?;
//! bulk.add_column("id", SqlType::Int, ColumnOptions::new().nullable(false))?;
//! bulk.add_column("name", SqlType::NVarChar, ColumnOptions::new().length(100))?;
//!
//! bulk.add_row(vec![SqlValue::Int(1), SqlValue::from("Ada")])?;
//!
//! assert_eq!(
//!     bulk.insert_bulk_sql(),
//!     "INSERT BULK dbo.Users([id] int, [name] nvarchar(100)) WITH (FIRE_TRIGGERS,TABLOCK)"
//! );
//! let payload = bulk.build_payload()?;
//! assert_eq!(payload[0], 0x81);
//! # Ok::<(), mssql_bulk::BulkError>(())
//! ```
//!
//! ## Protocol versions
//!
//! Three parts of the payload depend on the TDS version, all switching at
//! TDS 7.2: the COLMETADATA user type widens from 2 to 4 bytes, the DONE
//! row count from 4 to 8 bytes, and columns with unstated nullability get
//! the `NULLABLE_UNKNOWN` flag.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod bulk_load;
pub mod column;
pub mod config;
pub mod error;
pub mod options;
pub mod row;
pub mod sql;

pub use bulk_load::BulkLoad;
pub use column::{ColumnDefinition, ColumnOptions, ColumnRegistry};
pub use config::BulkLoadConfig;
pub use error::{BulkError, Result};
pub use options::BulkOptions;
pub use row::RowValues;

pub use mssql_types::{SqlType, SqlValue, TypeError, TypeParams};
pub use tds_protocol::TdsVersion;
