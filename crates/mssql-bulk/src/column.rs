//! Column definitions and the ordered column registry.

use bytes::{BufMut, BytesMut};
use hashbrown::HashMap;
use mssql_types::{SqlType, TypeError, TypeParams};
use tds_protocol::codec::{b_varchar_len, write_b_varchar};
use tds_protocol::token::{user_type_len, write_user_type};
use tds_protocol::{ColumnFlags, TdsVersion};

use crate::error::{BulkError, Result};

/// Longest column name a B_VARCHAR can carry, in UTF-16 code units.
const MAX_NAME_UNITS: usize = u8::MAX as usize;

/// Per-column options supplied when registering a column.
///
/// Unset length, precision and scale are resolved from the column type's
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnOptions {
    /// Explicit length. Validated by the column type.
    pub length: Option<i64>,
    /// Explicit precision.
    pub precision: Option<u8>,
    /// Explicit scale.
    pub scale: Option<u8>,
    /// Nullability; `None` leaves it unknown, which the server treats as
    /// nullable.
    pub nullable: Option<bool>,
    /// Key used to find the column's value in by-name rows. Defaults to
    /// the column name.
    pub obj_name: Option<String>,
    /// Output column marker. Not part of the payload.
    pub output: bool,
}

impl ColumnOptions {
    /// Create options with everything unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an explicit length.
    #[must_use]
    pub fn length(mut self, length: i64) -> Self {
        self.length = Some(length);
        self
    }

    /// Set an explicit precision.
    #[must_use]
    pub fn precision(mut self, precision: u8) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Set an explicit scale.
    #[must_use]
    pub fn scale(mut self, scale: u8) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Set nullability.
    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    /// Set the by-name row key.
    #[must_use]
    pub fn obj_name(mut self, obj_name: impl Into<String>) -> Self {
        self.obj_name = Some(obj_name.into());
        self
    }

    /// Mark the column as an output column.
    #[must_use]
    pub fn output(mut self, output: bool) -> Self {
        self.output = output;
        self
    }
}

/// A registered column with its attributes resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    name: String,
    obj_name: String,
    sql_type: SqlType,
    params: TypeParams,
    nullable: Option<bool>,
    output: bool,
}

impl ColumnDefinition {
    /// Resolve a column definition.
    ///
    /// Explicit attributes go through the type's validation and its error
    /// is returned unchanged. Missing attributes take the type's defaults
    /// when the type carries them.
    pub fn new(name: impl Into<String>, sql_type: SqlType, options: ColumnOptions) -> Result<Self> {
        let name = name.into();
        let name_units = name.encode_utf16().count();
        if name_units > MAX_NAME_UNITS {
            return Err(BulkError::InvalidIdentifier(format!(
                "column name is {name_units} UTF-16 units, the limit is {MAX_NAME_UNITS}"
            )));
        }

        let length = match options.length {
            Some(length) => Some(sql_type.validate_length(length)?),
            None if sql_type.has_length() => sql_type.resolve_length(),
            None => None,
        };
        let precision = match options.precision {
            Some(precision) => Some(sql_type.validate_precision(precision)?),
            None if sql_type.has_precision() => sql_type.resolve_precision(),
            None => None,
        };
        let scale = match options.scale {
            Some(scale) => Some(sql_type.validate_scale(scale, precision)?),
            None if sql_type.has_scale() => sql_type.resolve_scale(),
            None => None,
        };

        Ok(Self {
            obj_name: options.obj_name.unwrap_or_else(|| name.clone()),
            name,
            sql_type,
            params: TypeParams {
                length,
                precision,
                scale,
            },
            nullable: options.nullable,
            output: options.output,
        })
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key used for by-name rows.
    #[must_use]
    pub fn obj_name(&self) -> &str {
        &self.obj_name
    }

    /// Column type.
    #[must_use]
    pub fn sql_type(&self) -> SqlType {
        self.sql_type
    }

    /// Resolved length/precision/scale.
    #[must_use]
    pub fn params(&self) -> &TypeParams {
        &self.params
    }

    /// Resolved length.
    #[must_use]
    pub fn length(&self) -> Option<u32> {
        self.params.length
    }

    /// Resolved precision.
    #[must_use]
    pub fn precision(&self) -> Option<u8> {
        self.params.precision
    }

    /// Resolved scale.
    #[must_use]
    pub fn scale(&self) -> Option<u8> {
        self.params.scale
    }

    /// Declared nullability.
    #[must_use]
    pub fn nullable(&self) -> Option<bool> {
        self.nullable
    }

    /// Whether this is an output column.
    #[must_use]
    pub fn is_output(&self) -> bool {
        self.output
    }

    /// COLMETADATA flags for this column.
    #[must_use]
    pub fn flags(&self, version: TdsVersion) -> ColumnFlags {
        ColumnFlags::for_bulk_column(self.nullable, version.supports_nullable_unknown())
    }

    /// SQL type declaration, e.g. `nvarchar(50)`.
    #[must_use]
    pub fn declaration(&self) -> String {
        self.sql_type.declaration(&self.params)
    }

    /// Encoded size of this column's COLMETADATA entry.
    #[must_use]
    pub fn metadata_len(&self, version: TdsVersion) -> usize {
        user_type_len(version) + 2 + self.sql_type.type_info_len() + b_varchar_len(&self.name)
    }

    /// Write this column's COLMETADATA entry.
    pub fn write_metadata(&self, dst: &mut BytesMut, version: TdsVersion) -> Result<()> {
        write_user_type(dst, 0, version);
        dst.put_u16_le(self.flags(version).bits());
        self.sql_type.write_type_info(&self.params, dst);
        write_b_varchar(dst, &self.name)?;
        Ok(())
    }
}

/// Ordered set of columns, indexed by row key.
#[derive(Debug, Clone, Default)]
pub struct ColumnRegistry {
    columns: Vec<ColumnDefinition>,
    by_obj_name: HashMap<String, usize>,
}

impl ColumnRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. The first column registered under a row key wins
    /// lookups by that key.
    pub fn push(&mut self, column: ColumnDefinition) -> Result<()> {
        if self.columns.len() >= usize::from(u16::MAX) {
            return Err(TypeError::OutOfRange {
                target_type: "COLMETADATA column count",
            }
            .into());
        }

        self.by_obj_name
            .entry(column.obj_name.clone())
            .or_insert(self.columns.len());
        self.columns.push(column);
        Ok(())
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether no columns are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Columns in registration order.
    #[must_use]
    pub fn as_slice(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Iterate over columns in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, ColumnDefinition> {
        self.columns.iter()
    }

    /// Look up a column by its row key.
    #[must_use]
    pub fn get(&self, obj_name: &str) -> Option<&ColumnDefinition> {
        self.by_obj_name
            .get(obj_name)
            .and_then(|&index| self.columns.get(index))
    }

    /// Position of a column by its row key.
    #[must_use]
    pub fn position(&self, obj_name: &str) -> Option<usize> {
        self.by_obj_name.get(obj_name).copied()
    }
}

impl<'a> IntoIterator for &'a ColumnRegistry {
    type Item = &'a ColumnDefinition;
    type IntoIter = std::slice::Iter<'a, ColumnDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_defaults() {
        let col = ColumnDefinition::new("name", SqlType::NVarChar, ColumnOptions::new()).unwrap();
        assert_eq!(col.length(), Some(4000));
        assert_eq!(col.precision(), None);
        assert_eq!(col.obj_name(), "name");

        let col = ColumnDefinition::new("amount", SqlType::Decimal, ColumnOptions::new()).unwrap();
        assert_eq!(col.precision(), Some(18));
        assert_eq!(col.scale(), Some(0));

        let col = ColumnDefinition::new("at", SqlType::Time, ColumnOptions::new()).unwrap();
        assert_eq!(col.scale(), Some(7));
        assert_eq!(col.length(), None);
    }

    #[test]
    fn test_explicit_attributes() {
        let col = ColumnDefinition::new(
            "amount",
            SqlType::Numeric,
            ColumnOptions::new().precision(10).scale(4).obj_name("amt"),
        )
        .unwrap();
        assert_eq!(col.precision(), Some(10));
        assert_eq!(col.scale(), Some(4));
        assert_eq!(col.obj_name(), "amt");
        assert_eq!(col.declaration(), "numeric(10, 4)");
    }

    #[test]
    fn test_scale_above_precision() {
        let err = ColumnDefinition::new(
            "a",
            SqlType::Decimal,
            ColumnOptions::new().precision(4).scale(6),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BulkError::Encoding(TypeError::InvalidScale { scale: 6, max: 4, .. })
        ));
    }

    #[test]
    fn test_negative_length_surfaces_type_error() {
        let err =
            ColumnDefinition::new("id", SqlType::Int, ColumnOptions::new().length(-1)).unwrap_err();
        assert!(matches!(
            err,
            BulkError::Encoding(TypeError::InvalidLength {
                length: -1,
                type_name: "INT"
            })
        ));
    }

    #[test]
    fn test_name_too_long() {
        let name = "c".repeat(256);
        assert!(matches!(
            ColumnDefinition::new(name, SqlType::Int, ColumnOptions::new()),
            Err(BulkError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_metadata_entry() {
        let col = ColumnDefinition::new("id", SqlType::Int, ColumnOptions::new().nullable(false))
            .unwrap();
        let mut buf = BytesMut::new();
        col.write_metadata(&mut buf, TdsVersion::V7_4).unwrap();
        assert_eq!(
            &buf[..],
            &[0, 0, 0, 0, 0x04, 0x00, 0x26, 4, 2, b'i', 0, b'd', 0]
        );
        assert_eq!(buf.len(), col.metadata_len(TdsVersion::V7_4));

        let mut buf = BytesMut::new();
        col.write_metadata(&mut buf, TdsVersion::V7_1).unwrap();
        assert_eq!(&buf[..4], &[0, 0, 0x04, 0x00]);
        assert_eq!(buf.len(), col.metadata_len(TdsVersion::V7_1));
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = ColumnRegistry::new();
        registry
            .push(ColumnDefinition::new("a", SqlType::Int, ColumnOptions::new()).unwrap())
            .unwrap();
        registry
            .push(
                ColumnDefinition::new("b", SqlType::Bit, ColumnOptions::new().obj_name("flag"))
                    .unwrap(),
            )
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.position("flag"), Some(1));
        assert_eq!(registry.get("flag").unwrap().name(), "b");
        assert!(registry.get("b").is_none());
        let names: Vec<_> = registry.iter().map(ColumnDefinition::name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
