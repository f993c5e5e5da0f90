use serde_json::{Map, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// One stored event as column name to value
pub type ChannelRow = Map<String, Value>;

/// Decode every column of `row` by its runtime storage class.
///
/// Integers and reals keep their numeric type, text stays text, NULL becomes
/// JSON null. Anything undecodable is reported as null.
pub fn decode_row(row: &SqliteRow) -> ChannelRow {
    let mut decoded = Map::with_capacity(row.len());

    for column in row.columns() {
        let index = column.ordinal();
        decoded.insert(column.name().to_string(), decode_value(row, index));
    }

    decoded
}

fn decode_value(row: &SqliteRow, index: usize) -> Value {
    let storage_class = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_string(),
        Err(_) => return Value::Null,
    };

    match storage_class.as_str() {
        "INTEGER" => row
            .try_get::<i64, _>(index)
            .map(Value::from)
            .unwrap_or(Value::Null),
        "REAL" => row
            .try_get::<f64, _>(index)
            .map(Value::from)
            .unwrap_or(Value::Null),
        _ => row
            .try_get::<String, _>(index)
            .map(Value::from)
            .unwrap_or(Value::Null),
    }
}
