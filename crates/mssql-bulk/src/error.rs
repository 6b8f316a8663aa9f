//! Bulk load error types.

use mssql_types::TypeError;
use tds_protocol::ProtocolError;
use thiserror::Error;

/// Errors that can occur while building a bulk load.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BulkError {
    /// An option or input value has the wrong kind.
    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    /// Operation is not allowed in the current state, e.g. adding a column
    /// after the first row.
    #[error("invalid bulk load state: {0}")]
    State(String),

    /// A column type rejected an attribute or a value.
    #[error(transparent)]
    Encoding(#[from] TypeError),

    /// Positional row has more values than there are columns.
    #[error("row has {actual} values but the table has {expected} columns")]
    ColumnCount {
        /// Number of registered columns.
        expected: usize,
        /// Number of values in the row.
        actual: usize,
    },

    /// Table or column name is not usable.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Protocol framing error.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl BulkError {
    /// Check if this error was raised by a column type.
    #[must_use]
    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::Encoding(_))
    }

    /// Check if this error is caused by the order of calls rather than by
    /// the data.
    #[must_use]
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State(_))
    }
}

/// Result type for bulk load operations.
pub type Result<T> = std::result::Result<T, BulkError>;
