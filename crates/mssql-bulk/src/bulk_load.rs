//! The bulk load builder.
//!
//! A [`BulkLoad`] collects a table's columns and its rows and produces the
//! message body sent after `INSERT BULK`:
//!
//! ```text
//! COLMETADATA  ROW*  DONE
//! ```
//!
//! Column registration is closed by the first [`BulkLoad::add_row`] call.
//! Rows are encoded as they arrive into a single growable buffer;
//! [`BulkLoad::build_payload`] frames that buffer with the metadata and
//! completion tokens in one exactly-sized allocation.

use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};
use mssql_types::{SqlType, SqlValue};
use tds_protocol::token::TokenType;
use tds_protocol::{Done, PacketType, TdsVersion, split_message};

use crate::column::{ColumnDefinition, ColumnOptions, ColumnRegistry};
use crate::config::BulkLoadConfig;
use crate::error::{BulkError, Result};
use crate::options::BulkOptions;
use crate::row::RowValues;
use crate::sql;

/// Size of the COLMETADATA token header: marker byte and column count.
const METADATA_HEADER_LEN: usize = 1 + 2;

/// Builder for one bulk-load message.
#[derive(Debug)]
pub struct BulkLoad {
    table: String,
    options: BulkOptions,
    config: BulkLoadConfig,
    columns: ColumnRegistry,
    rows: BytesMut,
    row_count: u64,
    first_row_written: bool,
    canceled: bool,
}

impl BulkLoad {
    /// Create a bulk load for `table`.
    ///
    /// The table name is used verbatim in the SQL text, so it may be
    /// qualified (`dbo.Users`) or a temp table (`#staging`).
    pub fn new(
        table: impl Into<String>,
        options: BulkOptions,
        config: BulkLoadConfig,
    ) -> Result<Self> {
        let table = table.into();
        if table.trim().is_empty() {
            return Err(BulkError::InvalidIdentifier(
                "table name cannot be empty".into(),
            ));
        }
        config.validate()?;

        tracing::debug!(
            table = %table,
            tds_version = %config.tds_version,
            "creating bulk load"
        );

        Ok(Self {
            table,
            options,
            config,
            columns: ColumnRegistry::new(),
            rows: BytesMut::new(),
            row_count: 0,
            first_row_written: false,
            canceled: false,
        })
    }

    /// Target table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Load options.
    #[must_use]
    pub fn options(&self) -> &BulkOptions {
        &self.options
    }

    /// Load configuration.
    #[must_use]
    pub fn config(&self) -> &BulkLoadConfig {
        &self.config
    }

    /// Protocol version the payload is encoded for.
    #[must_use]
    pub fn tds_version(&self) -> TdsVersion {
        self.config.tds_version
    }

    /// Timeout for the owning operation.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.config.timeout
    }

    /// Registered columns in order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDefinition] {
        self.columns.as_slice()
    }

    /// Look up a column by its row key.
    #[must_use]
    pub fn column(&self, obj_name: &str) -> Option<&ColumnDefinition> {
        self.columns.get(obj_name)
    }

    /// Whether the column set is closed.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.first_row_written
    }

    /// Number of rows added so far.
    ///
    /// Informational only; the DONE token always reports zero.
    #[must_use]
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Mark the load as canceled.
    ///
    /// Encoding is unaffected; the owning operation checks the flag.
    pub fn cancel(&mut self) {
        if !self.canceled {
            tracing::debug!(table = %self.table, rows = self.row_count, "bulk load canceled");
        }
        self.canceled = true;
    }

    /// Whether [`cancel`](Self::cancel) was called.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.canceled
    }

    /// Register a column.
    ///
    /// Fails with [`BulkError::State`] once a row has been added. Attribute
    /// validation errors from the column type are returned unchanged.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        sql_type: SqlType,
        options: ColumnOptions,
    ) -> Result<()> {
        let name = name.into();
        if self.first_row_written {
            return Err(BulkError::State(format!(
                "cannot add column {name:?} after the first row has been added"
            )));
        }

        let column = ColumnDefinition::new(name, sql_type, options)?;
        tracing::debug!(
            column = column.name(),
            sql_type = sql_type.name(),
            length = ?column.length(),
            precision = ?column.precision(),
            scale = ?column.scale(),
            nullable = ?column.nullable(),
            "registered bulk load column"
        );
        self.columns.push(column)
    }

    /// Add a row.
    ///
    /// The first call freezes the column set. Positional rows may be
    /// shorter than the column list; missing values, like absent keys of a
    /// named row, are sent as NULL. If any value fails to encode, the row
    /// buffer is left exactly as it was.
    pub fn add_row(&mut self, row: impl Into<RowValues>) -> Result<()> {
        let row = row.into();

        if !self.first_row_written {
            self.first_row_written = true;
            tracing::debug!(
                table = %self.table,
                columns = self.columns.len(),
                "column set frozen"
            );
        }

        if let RowValues::Positional(values) = &row {
            if values.len() > self.columns.len() {
                return Err(BulkError::ColumnCount {
                    expected: self.columns.len(),
                    actual: values.len(),
                });
            }
        }

        let start = self.rows.len();
        if let Err(e) = self.write_row(&row) {
            self.rows.truncate(start);
            return Err(e);
        }

        self.row_count += 1;
        tracing::trace!(
            row = self.row_count,
            bytes = self.rows.len() - start,
            "encoded bulk load row"
        );
        Ok(())
    }

    /// Add several rows, stopping at the first failure.
    pub fn add_rows<I>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<RowValues>,
    {
        for row in rows {
            self.add_row(row)?;
        }
        Ok(())
    }

    fn write_row(&mut self, row: &RowValues) -> Result<()> {
        let version = self.config.tds_version;
        let null = SqlValue::Null;

        self.rows.put_u8(TokenType::Row as u8);
        for (index, column) in self.columns.iter().enumerate() {
            let value = row.get(index, column.obj_name()).unwrap_or(&null);
            column
                .sql_type()
                .write_value(column.params(), value, version, &mut self.rows)?;
        }
        Ok(())
    }

    /// Encoded size of the COLMETADATA token.
    #[must_use]
    pub fn metadata_len(&self) -> usize {
        let version = self.config.tds_version;
        METADATA_HEADER_LEN
            + self
                .columns
                .iter()
                .map(|column| column.metadata_len(version))
                .sum::<usize>()
    }

    fn write_metadata(&self, dst: &mut BytesMut) -> Result<()> {
        let version = self.config.tds_version;
        dst.put_u8(TokenType::ColMetaData as u8);
        dst.put_u16_le(self.columns.len() as u16);
        for column in &self.columns {
            column.write_metadata(dst, version)?;
        }
        Ok(())
    }

    /// Build the COLMETADATA token.
    pub fn build_metadata(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.metadata_len());
        self.write_metadata(&mut buf)?;
        Ok(buf.freeze())
    }

    /// Build the DONE token that ends the row stream.
    #[must_use]
    pub fn build_completion(&self) -> Bytes {
        let version = self.config.tds_version;
        let mut buf = BytesMut::with_capacity(Done::encoded_len(version));
        Done::BULK_LOAD_END.encode(&mut buf, version);
        buf.freeze()
    }

    /// Encoded rows added so far, without framing tokens.
    #[must_use]
    pub fn row_data(&self) -> &[u8] {
        &self.rows
    }

    /// Build the full message body: metadata, rows, then completion.
    ///
    /// Can be called any number of times; the result only changes when
    /// rows are added.
    pub fn build_payload(&self) -> Result<Bytes> {
        let version = self.config.tds_version;
        let metadata_len = self.metadata_len();
        let done_len = Done::encoded_len(version);
        let total = metadata_len + self.rows.len() + done_len;

        let mut payload = BytesMut::with_capacity(total);
        self.write_metadata(&mut payload)?;
        payload.put_slice(&self.rows);
        Done::BULK_LOAD_END.encode(&mut payload, version);
        debug_assert_eq!(payload.len(), total);

        tracing::debug!(
            table = %self.table,
            metadata_bytes = metadata_len,
            row_bytes = self.rows.len(),
            done_bytes = done_len,
            rows = self.row_count,
            "built bulk load payload"
        );
        Ok(payload.freeze())
    }

    /// Build the payload and split it into BulkLoad packets of the
    /// configured packet size.
    pub fn packets(&self) -> Result<Vec<Bytes>> {
        let payload = self.build_payload()?;
        let packets = split_message(PacketType::BulkLoad, &payload, self.config.packet_size)?;
        tracing::debug!(
            packets = packets.len(),
            packet_size = self.config.packet_size,
            "split bulk load payload into packets"
        );
        Ok(packets)
    }

    /// The `INSERT BULK` statement for this load.
    #[must_use]
    pub fn insert_bulk_sql(&self) -> String {
        sql::insert_bulk_sql(&self.table, self.columns(), &self.options)
    }

    /// A `CREATE TABLE` statement matching the registered columns.
    #[must_use]
    pub fn create_table_sql(&self) -> String {
        sql::create_table_sql(&self.table, self.columns())
    }
}
