//! SQL command text for starting a bulk load.
//!
//! The connection layer runs `INSERT BULK` before sending the payload;
//! `CREATE TABLE` is a convenience for creating a matching target table.

use crate::column::ColumnDefinition;
use crate::options::BulkOptions;

/// Quote a column name in brackets, doubling any `]`.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

fn column_def(column: &ColumnDefinition) -> String {
    format!("{} {}", quote_identifier(column.name()), column.declaration())
}

/// Build the `INSERT BULK` statement, e.g.
/// `INSERT BULK dbo.t([id] int, [name] nvarchar(50)) WITH (FIRE_TRIGGERS,TABLOCK)`.
///
/// The `WITH` clause is omitted when no option is set.
#[must_use]
pub fn insert_bulk_sql(table: &str, columns: &[ColumnDefinition], options: &BulkOptions) -> String {
    let defs: Vec<String> = columns.iter().map(column_def).collect();
    let mut sql = format!("INSERT BULK {table}({})", defs.join(", "));

    let hints = options.hints();
    if !hints.is_empty() {
        sql.push_str(" WITH (");
        sql.push_str(&hints.join(","));
        sql.push(')');
    }

    sql
}

/// Build a `CREATE TABLE` statement with one column per line.
///
/// Each column gets ` NULL` or ` NOT NULL` only when its nullability was
/// stated.
#[must_use]
pub fn create_table_sql(table: &str, columns: &[ColumnDefinition]) -> String {
    let defs: Vec<String> = columns
        .iter()
        .map(|column| {
            let mut def = column_def(column);
            match column.nullable() {
                Some(true) => def.push_str(" NULL"),
                Some(false) => def.push_str(" NOT NULL"),
                None => {}
            }
            def
        })
        .collect();

    let mut sql = format!("CREATE TABLE {table}(\n");
    if !defs.is_empty() {
        sql.push_str(&defs.join(",\n"));
        sql.push('\n');
    }
    sql.push(')');
    sql
}
