//! Build a bulk-load payload and print what a connection would send.
//!
//! Run with:
//! ```bash
//! RUST_LOG=debug cargo run -p mssql-bulk --example bulk_payload
//! ```

use mssql_bulk::{
    BulkLoad, BulkLoadConfig, BulkOptions, ColumnOptions, Result, SqlType, SqlValue,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = BulkLoadConfig::from_connection_string("TDS Version=7.4;Packet Size=4096")?;
    let options = BulkOptions::new().keep_nulls(true).lock_table(true);
    let mut bulk = BulkLoad::new("#people", options, config)?;

    bulk.add_column("id", SqlType::Int, ColumnOptions::new().nullable(false))?;
    bulk.add_column("name", SqlType::NVarChar, ColumnOptions::new().length(50))?;
    bulk.add_column("balance", SqlType::Decimal, ColumnOptions::new().precision(12).scale(2))?;

    bulk.add_row(vec![SqlValue::Int(1), "Ada".into(), SqlValue::Int(100)])?;
    bulk.add_row(vec![SqlValue::Int(2), SqlValue::Null])?;

    println!("{}\n", bulk.create_table_sql());
    println!("{}\n", bulk.insert_bulk_sql());

    let payload = bulk.build_payload()?;
    println!("payload: {} bytes, {} rows", payload.len(), bulk.row_count());
    for (i, packet) in bulk.packets()?.iter().enumerate() {
        println!("packet {}: {:02x?}", i + 1, &packet[..]);
    }

    Ok(())
}
