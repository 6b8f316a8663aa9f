#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use mssql_bulk::{
    BulkLoad, BulkLoadConfig, BulkOptions, ColumnOptions, SqlType, SqlValue, TdsVersion,
};
use tds_protocol::{Done, PacketHeader};

/// Column types reachable without date/time values.
#[derive(Debug, Arbitrary)]
enum FuzzType {
    Bit,
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Real,
    Float,
    Decimal,
    NVarChar,
    VarChar,
    VarBinary,
    UniqueIdentifier,
}

impl FuzzType {
    fn sql_type(&self) -> SqlType {
        match self {
            Self::Bit => SqlType::Bit,
            Self::TinyInt => SqlType::TinyInt,
            Self::SmallInt => SqlType::SmallInt,
            Self::Int => SqlType::Int,
            Self::BigInt => SqlType::BigInt,
            Self::Real => SqlType::Real,
            Self::Float => SqlType::Float,
            Self::Decimal => SqlType::Decimal,
            Self::NVarChar => SqlType::NVarChar,
            Self::VarChar => SqlType::VarChar,
            Self::VarBinary => SqlType::VarBinary,
            Self::UniqueIdentifier => SqlType::UniqueIdentifier,
        }
    }
}

#[derive(Debug, Arbitrary)]
struct FuzzColumn {
    name: String,
    ty: FuzzType,
    length: Option<i64>,
    precision: Option<u8>,
    scale: Option<u8>,
    nullable: Option<bool>,
}

#[derive(Debug, Arbitrary)]
enum FuzzValue {
    Null,
    Bool(bool),
    TinyInt(u8),
    SmallInt(i16),
    Int(i32),
    BigInt(i64),
    Float(f32),
    Double(f64),
    String(String),
    Binary(Vec<u8>),
}

impl From<FuzzValue> for SqlValue {
    fn from(value: FuzzValue) -> Self {
        match value {
            FuzzValue::Null => SqlValue::Null,
            FuzzValue::Bool(v) => SqlValue::Bool(v),
            FuzzValue::TinyInt(v) => SqlValue::TinyInt(v),
            FuzzValue::SmallInt(v) => SqlValue::SmallInt(v),
            FuzzValue::Int(v) => SqlValue::Int(v),
            FuzzValue::BigInt(v) => SqlValue::BigInt(v),
            FuzzValue::Float(v) => SqlValue::Float(v),
            FuzzValue::Double(v) => SqlValue::Double(v),
            FuzzValue::String(v) => SqlValue::String(v),
            FuzzValue::Binary(v) => SqlValue::Binary(Bytes::from(v)),
        }
    }
}

#[derive(Debug, Arbitrary)]
struct FuzzLoad {
    version: u8,
    columns: Vec<FuzzColumn>,
    rows: Vec<Vec<FuzzValue>>,
}

const VERSIONS: [TdsVersion; 5] = [
    TdsVersion::V7_1,
    TdsVersion::V7_2,
    TdsVersion::V7_3B,
    TdsVersion::V7_4,
    TdsVersion::V8_0,
];

fuzz_target!(|input: FuzzLoad| {
    let version = VERSIONS[usize::from(input.version) % VERSIONS.len()];
    let config = BulkLoadConfig::new().tds_version(version).packet_size(512);
    let Ok(mut bulk) = BulkLoad::new("fuzz", BulkOptions::default(), config) else {
        return;
    };

    for column in input.columns.into_iter().take(64) {
        let options = ColumnOptions {
            length: column.length,
            precision: column.precision,
            scale: column.scale,
            nullable: column.nullable,
            ..ColumnOptions::default()
        };
        let _ = bulk.add_column(column.name, column.ty.sql_type(), options);
    }

    for row in input.rows.into_iter().take(256) {
        let before = bulk.row_data().len();
        let values: Vec<SqlValue> = row.into_iter().map(SqlValue::from).collect();
        if bulk.add_row(values).is_err() {
            // A rejected row must not leave bytes behind
            assert_eq!(bulk.row_data().len(), before);
        }
    }

    let Ok(payload) = bulk.build_payload() else {
        return;
    };
    assert_eq!(payload[0], 0x81);
    assert_eq!(payload.len(), bulk.metadata_len() + bulk.row_data().len() + Done::encoded_len(version));
    assert_eq!(bulk.build_payload().ok().as_ref(), Some(&payload));

    if let Ok(packets) = bulk.packets() {
        let mut total = 0;
        for packet in &packets {
            let mut cursor = &packet[..];
            let header = PacketHeader::decode(&mut cursor).unwrap();
            assert_eq!(usize::from(header.length), packet.len());
            total += header.payload_length();
        }
        assert_eq!(total, payload.len());
    }
});
