//! Byte-exact bulk-load payload tests.
//!
//! These tests pin the COLMETADATA / ROW / DONE layout produced for
//! representative tables, including the SQL text that accompanies them.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;

use mssql_bulk::{
    BulkError, BulkLoad, BulkLoadConfig, BulkOptions, ColumnOptions, SqlType, SqlValue,
    TdsVersion, TypeError,
};

fn bulk(version: TdsVersion, options: BulkOptions) -> BulkLoad {
    BulkLoad::new("dbo.t", options, BulkLoadConfig::new().tds_version(version)).unwrap()
}

const DONE_7_2: [u8; 13] = [0xFD, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];

// =============================================================================
// Single INT column
// =============================================================================

#[test]
fn test_single_int_column_one_row() {
    let mut load = bulk(TdsVersion::V7_4, BulkOptions::default());
    load.add_column("id", SqlType::Int, ColumnOptions::new())
        .unwrap();
    load.add_row(vec![42i32]).unwrap();

    let mut expected = vec![
        0x81, 0x01, 0x00, // COLMETADATA, 1 column
        0x00, 0x00, 0x00, 0x00, // user type
        0x04, 0x80, // UPDATEABLE_READ_WRITE | NULLABLE_UNKNOWN
        0x26, 0x04, // INTN(4)
        0x02, b'i', 0x00, b'd', 0x00, // B_VARCHAR "id"
        0xD1, 0x04, 0x2A, 0x00, 0x00, 0x00, // ROW: 42
    ];
    expected.extend_from_slice(&DONE_7_2);

    assert_eq!(load.build_payload().unwrap().to_vec(), expected);
    assert_eq!(load.insert_bulk_sql(), "INSERT BULK dbo.t([id] int)");
}

#[test]
fn test_not_nullable_int_column_per_version() {
    for version in [TdsVersion::V7_1, TdsVersion::V7_4] {
        let mut load = bulk(version, BulkOptions::default());
        load.add_column("id", SqlType::Int, ColumnOptions::new().nullable(false))
            .unwrap();
        load.add_row(vec![42i32]).unwrap();

        let mut expected = vec![0x81, 0x01, 0x00];
        if version >= TdsVersion::V7_2 {
            expected.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
        } else {
            expected.extend_from_slice(&[0x00, 0x00]);
        }
        expected.extend_from_slice(&[
            0x04, 0x00, // UPDATEABLE_READ_WRITE only
            0x26, 0x04, // INTN(4)
            0x02, b'i', 0x00, b'd', 0x00, // B_VARCHAR "id"
            0xD1, 0x04, 0x2A, 0x00, 0x00, 0x00, // ROW: 42
        ]);
        if version >= TdsVersion::V7_2 {
            expected.extend_from_slice(&DONE_7_2);
        } else {
            expected.extend_from_slice(&[0xFD, 0, 0, 0, 0, 0, 0, 0, 0]);
        }

        assert_eq!(load.build_payload().unwrap().to_vec(), expected, "{version}");
    }
}

#[test]
fn test_zero_rows() {
    let mut load = bulk(TdsVersion::V7_4, BulkOptions::default());
    load.add_column("id", SqlType::Int, ColumnOptions::new().nullable(true))
        .unwrap();

    let payload = load.build_payload().unwrap();
    let metadata = load.build_metadata().unwrap();
    assert_eq!(&payload[..metadata.len()], &metadata[..]);
    assert_eq!(&payload[metadata.len()..], &DONE_7_2);
    assert_eq!(&metadata[7..9], &[0x05, 0x00]);
}

#[test]
fn test_options_clause() {
    let options = BulkOptions::from_json(&serde_json::json!({
        "fireTriggers": true,
        "lockTable": true
    }))
    .unwrap();
    let mut load = bulk(TdsVersion::V7_4, options);
    load.add_column("id", SqlType::Int, ColumnOptions::new())
        .unwrap();
    assert_eq!(
        load.insert_bulk_sql(),
        "INSERT BULK dbo.t([id] int) WITH (FIRE_TRIGGERS,TABLOCK)"
    );

    let all = BulkOptions::new()
        .check_constraints(true)
        .fire_triggers(true)
        .keep_nulls(true)
        .lock_table(true);
    let load = bulk(TdsVersion::V7_4, all);
    assert!(
        load.insert_bulk_sql()
            .ends_with(" WITH (CHECK_CONSTRAINTS,FIRE_TRIGGERS,KEEP_NULLS,TABLOCK)")
    );
}

#[test]
fn test_options_do_not_change_payload() {
    let build = |options| {
        let mut load = bulk(TdsVersion::V7_4, options);
        load.add_column("id", SqlType::Int, ColumnOptions::new())
            .unwrap();
        load.add_row(SqlValue::Int(1)).unwrap();
        load.build_payload().unwrap()
    };
    assert_eq!(
        build(BulkOptions::default()),
        build(BulkOptions::new().keep_nulls(true).lock_table(true))
    );
}

// =============================================================================
// Error Surfaces
// =============================================================================

#[test]
fn test_negative_length_surfaces_descriptor_error() {
    let mut load = bulk(TdsVersion::V7_4, BulkOptions::default());
    let err = load
        .add_column("id", SqlType::Int, ColumnOptions::new().length(-1))
        .unwrap_err();
    assert!(matches!(
        err,
        BulkError::Encoding(TypeError::InvalidLength {
            length: -1,
            type_name: "INT"
        })
    ));
    assert_eq!(
        err.to_string(),
        TypeError::InvalidLength {
            length: -1,
            type_name: "INT"
        }
        .to_string()
    );
    assert!(load.columns().is_empty());
}

#[test]
fn test_column_after_row_is_state_error() {
    let mut load = bulk(TdsVersion::V7_4, BulkOptions::default());
    load.add_column("a", SqlType::Int, ColumnOptions::new())
        .unwrap();
    load.add_row(Vec::<SqlValue>::new()).unwrap();
    assert!(matches!(
        load.add_column("b", SqlType::Int, ColumnOptions::new()),
        Err(BulkError::State(_))
    ));
}

#[test]
fn test_failed_first_row_still_freezes_columns() {
    let mut load = bulk(TdsVersion::V7_4, BulkOptions::default());
    load.add_column("a", SqlType::Int, ColumnOptions::new())
        .unwrap();

    assert!(matches!(
        load.add_row(vec![1i32, 2]),
        Err(BulkError::ColumnCount {
            expected: 1,
            actual: 2
        })
    ));
    assert!(load.is_frozen());
    assert!(load.row_data().is_empty());
    assert_eq!(load.row_count(), 0);
    assert!(matches!(
        load.add_column("b", SqlType::Int, ColumnOptions::new()),
        Err(BulkError::State(_))
    ));
}

#[test]
fn test_value_error_keeps_previous_rows() {
    let mut load = bulk(TdsVersion::V7_4, BulkOptions::default());
    load.add_column("s", SqlType::NVarChar, ColumnOptions::new().length(2))
        .unwrap();
    load.add_row(SqlValue::from("ok")).unwrap();
    let before = load.build_payload().unwrap();

    assert!(matches!(
        load.add_row(SqlValue::from("too long")),
        Err(BulkError::Encoding(TypeError::Truncation(_)))
    ));
    assert_eq!(load.build_payload().unwrap(), before);
}

// =============================================================================
// Row Mapping
// =============================================================================

#[test]
fn test_named_rows_use_obj_name() {
    let mut load = bulk(TdsVersion::V7_4, BulkOptions::default());
    load.add_column("user_id", SqlType::Int, ColumnOptions::new().obj_name("id"))
        .unwrap();
    load.add_column("flag", SqlType::Bit, ColumnOptions::new())
        .unwrap();

    let mut row = HashMap::new();
    row.insert("id", SqlValue::Int(7));
    row.insert("flag", SqlValue::Bool(true));
    row.insert("user_id", SqlValue::Int(99));
    load.add_row(row).unwrap();

    assert_eq!(load.row_data(), &[0xD1, 4, 7, 0, 0, 0, 1, 1]);
}

#[test]
fn test_named_row_missing_key_is_null() {
    let mut load = bulk(TdsVersion::V7_4, BulkOptions::default());
    load.add_column("a", SqlType::BigInt, ColumnOptions::new())
        .unwrap();
    load.add_column("b", SqlType::VarBinary, ColumnOptions::new().length(10_000))
        .unwrap();

    let row: mssql_bulk::RowValues = [("a", SqlValue::BigInt(1))].into_iter().collect();
    load.add_row(row).unwrap();

    let mut expected = vec![0xD1, 8, 1, 0, 0, 0, 0, 0, 0, 0];
    expected.extend_from_slice(&[0xFF; 8]);
    assert_eq!(load.row_data(), &expected[..]);
}

#[test]
fn test_json_rows() {
    let mut load = bulk(TdsVersion::V7_4, BulkOptions::default());
    load.add_column("id", SqlType::Int, ColumnOptions::new())
        .unwrap();
    load.add_column("name", SqlType::VarChar, ColumnOptions::new().length(8))
        .unwrap();

    let rows = serde_json::json!([[1, "a"], {"name": "b", "id": 2}]);
    for row in rows.as_array().unwrap() {
        load.add_row(mssql_bulk::RowValues::from_json(row).unwrap())
            .unwrap();
    }
    assert_eq!(
        load.row_data(),
        &[
            0xD1, 4, 1, 0, 0, 0, 1, 0, b'a', //
            0xD1, 4, 2, 0, 0, 0, 1, 0, b'b',
        ]
    );
    assert_eq!(load.row_count(), 2);
}

// =============================================================================
// Mixed Types
// =============================================================================

#[test]
fn test_mixed_metadata() {
    let mut load = bulk(TdsVersion::V7_4, BulkOptions::default());
    load.add_column("n", SqlType::NVarChar, ColumnOptions::new().length(50).nullable(false))
        .unwrap();
    load.add_column("amt", SqlType::Decimal, ColumnOptions::new().precision(10).scale(2))
        .unwrap();
    load.add_column("at", SqlType::DateTime2, ColumnOptions::new().scale(3))
        .unwrap();

    let metadata = load.build_metadata().unwrap();
    let mut expected = vec![0x81, 0x03, 0x00];
    // nvarchar(50) NOT NULL
    expected.extend_from_slice(&[0, 0, 0, 0, 0x04, 0x00, 0xE7, 100, 0]);
    expected.extend_from_slice(&tds_protocol::DEFAULT_COLLATION);
    expected.extend_from_slice(&[1, b'n', 0]);
    // decimal(10, 2)
    expected.extend_from_slice(&[0, 0, 0, 0, 0x04, 0x80, 0x6A, 9, 10, 2]);
    expected.extend_from_slice(&[3, b'a', 0, b'm', 0, b't', 0]);
    // datetime2(3)
    expected.extend_from_slice(&[0, 0, 0, 0, 0x04, 0x80, 0x2A, 3]);
    expected.extend_from_slice(&[2, b'a', 0, b't', 0]);
    assert_eq!(metadata.to_vec(), expected);

    assert_eq!(
        load.create_table_sql(),
        "CREATE TABLE dbo.t(\n[n] nvarchar(50) NOT NULL,\n[amt] decimal(10, 2),\n[at] datetime2(3)\n)"
    );
}

#[test]
fn test_decimal_scale_above_28() {
    let mut load = bulk(TdsVersion::V7_4, BulkOptions::default());
    load.add_column("d", SqlType::Decimal, ColumnOptions::new().precision(38).scale(30))
        .unwrap();
    load.add_row(vec![SqlValue::Int(0)]).unwrap();
    load.add_row(vec![SqlValue::Int(7)]).unwrap();

    let row_data = load.row_data();
    assert_eq!(row_data.len(), 2 * (1 + 1 + 17));
    assert_eq!(&row_data[..3], &[0xD1, 17, 1]);
    assert!(row_data[3..19].iter().all(|&b| b == 0));

    let seven = 7u128 * 10u128.pow(30);
    assert_eq!(&row_data[19..22], &[0xD1, 17, 1]);
    assert_eq!(&row_data[22..], &seven.to_le_bytes()[..]);
}

#[test]
fn test_mixed_row() {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    let mut load = bulk(TdsVersion::V7_4, BulkOptions::default());
    load.add_column("amt", SqlType::Decimal, ColumnOptions::new().precision(5).scale(2))
        .unwrap();
    load.add_column("day", SqlType::Date, ColumnOptions::new())
        .unwrap();
    load.add_column("id", SqlType::UniqueIdentifier, ColumnOptions::new())
        .unwrap();

    let id = uuid::Uuid::parse_str("00010203-0405-0607-0809-0a0b0c0d0e0f").unwrap();
    load.add_row(vec![
        SqlValue::from(Decimal::new(1250, 2)),
        SqlValue::from(NaiveDate::from_ymd_opt(1, 1, 2).unwrap()),
        SqlValue::from(id),
    ])
    .unwrap();

    let mut expected = vec![0xD1];
    expected.extend_from_slice(&[5, 1, 0xE2, 0x04, 0, 0]);
    expected.extend_from_slice(&[3, 1, 0, 0]);
    expected.push(16);
    expected.extend_from_slice(&[3, 2, 1, 0, 5, 4, 7, 6, 8, 9, 10, 11, 12, 13, 14, 15]);
    assert_eq!(load.row_data(), &expected[..]);
}
