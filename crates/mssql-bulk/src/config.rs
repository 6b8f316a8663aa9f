//! Bulk load configuration.

use std::time::Duration;

use tds_protocol::{DEFAULT_PACKET_SIZE, TdsVersion, validate_packet_size};

use crate::error::{BulkError, Result};

/// Configuration for building a bulk load.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct BulkLoadConfig {
    /// Negotiated TDS protocol version.
    ///
    /// Controls the width of the COLMETADATA user type, the width of the
    /// DONE row count and whether unknown nullability can be signaled.
    pub tds_version: TdsVersion,

    /// Timeout for the load, enforced by the connection that sends it.
    pub timeout: Option<Duration>,

    /// TDS packet size used when splitting the payload into packets.
    pub packet_size: usize,
}

impl Default for BulkLoadConfig {
    fn default() -> Self {
        Self {
            tds_version: TdsVersion::V7_4,
            timeout: None,
            packet_size: DEFAULT_PACKET_SIZE,
        }
    }
}

impl BulkLoadConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the TDS version.
    #[must_use]
    pub fn tds_version(mut self, version: TdsVersion) -> Self {
        self.tds_version = version;
        self
    }

    /// Set the TDS version from a string such as `"7.2"`, `"7_4"` or
    /// `"7.3B"`.
    pub fn with_tds_version_str(mut self, version: &str) -> Result<Self> {
        self.tds_version = TdsVersion::parse(version).map_err(|_| {
            BulkError::Config(format!(
                "invalid TDS version: {version}. Supported values: 7.0, 7.1, 7.2, 7.3, 7.3A, 7.3B, 7.4, 8.0"
            ))
        })?;
        Ok(self)
    }

    /// Set the load timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the packet size.
    #[must_use]
    pub fn packet_size(mut self, size: usize) -> Self {
        self.packet_size = size;
        self
    }

    /// Check that the configuration can be used.
    pub fn validate(&self) -> Result<()> {
        validate_packet_size(self.packet_size)
            .map_err(|e| BulkError::Config(e.to_string()))
    }

    /// Parse a configuration from `key=value;` pairs.
    ///
    /// Recognized keys (case-insensitive): `TDS Version`, `Packet Size` and
    /// `Timeout` (seconds, `0` for none). Other keys, such as the
    /// connection settings of a full connection string, are ignored.
    pub fn from_connection_string(conn_str: &str) -> Result<Self> {
        let mut config = Self::default();

        for part in conn_str.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| BulkError::Config(format!("invalid key-value: {part}")))?;

            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "tdsversion" | "tds version" | "protocolversion" | "protocol version" => {
                    config = config.with_tds_version_str(value)?;
                }
                "packet size" => {
                    config.packet_size = value.parse().map_err(|_| {
                        BulkError::Config(format!("invalid packet size: {value}"))
                    })?;
                }
                "timeout" | "command timeout" => {
                    let secs: u64 = value
                        .parse()
                        .map_err(|_| BulkError::Config(format!("invalid timeout: {value}")))?;
                    config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
                }
                // Values are never logged; they may hold credentials.
                _ => {
                    tracing::debug!(key = key, "ignoring unrelated connection string option");
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}
