//! Conversions between MySQL wire values and [`SqlValue`]

use assessment_core::error::AssessmentError;
use assessment_core::SqlValue;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use mysql_async::consts::ColumnType;
use mysql_async::Value;

/// Bind parameter for a [`SqlValue`]
pub fn to_mysql_value(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::NULL,
        SqlValue::Int(v) => Value::Int(*v),
        SqlValue::Float(v) => Value::Double(*v),
        SqlValue::Text(v) => Value::Bytes(v.as_bytes().to_vec()),
        SqlValue::Date(d) => Value::Date(d.year() as u16, d.month() as u8, d.day() as u8, 0, 0, 0, 0),
        SqlValue::DateTime(dt) => Value::Date(
            dt.year() as u16,
            dt.month() as u8,
            dt.day() as u8,
            dt.hour() as u8,
            dt.minute() as u8,
            dt.second() as u8,
            dt.nanosecond() / 1_000,
        ),
    }
}

/// Interpret a column value using the column's declared type.
///
/// The text protocol delivers everything as bytes, so the column type decides
/// how they are parsed. Bytes that do not parse as the declared type are kept
/// as text.
pub fn from_mysql_value(value: &Value, column_type: ColumnType) -> SqlValue {
    match value {
        Value::NULL => SqlValue::Null,
        Value::Int(v) => SqlValue::Int(*v),
        Value::UInt(v) => i64::try_from(*v)
            .map(SqlValue::Int)
            .unwrap_or(SqlValue::Float(*v as f64)),
        Value::Float(v) => SqlValue::Float(f64::from(*v)),
        Value::Double(v) => SqlValue::Float(*v),
        Value::Date(year, month, day, hour, minute, second, micros) => {
            let date = NaiveDate::from_ymd_opt(i32::from(*year), u32::from(*month), u32::from(*day));
            match (date, column_type) {
                (Some(date), ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE) => {
                    SqlValue::Date(date)
                }
                (Some(date), _) => date
                    .and_hms_micro_opt(
                        u32::from(*hour),
                        u32::from(*minute),
                        u32::from(*second),
                        *micros,
                    )
                    .map(SqlValue::DateTime)
                    .unwrap_or(SqlValue::Date(date)),
                (None, _) => SqlValue::Text(format!("{:04}-{:02}-{:02}", year, month, day)),
            }
        }
        Value::Time(negative, days, hours, minutes, seconds, _) => {
            let sign = if *negative { "-" } else { "" };
            SqlValue::Text(format!(
                "{}{:02}:{:02}:{:02}",
                sign,
                u32::from(*hours) + days * 24,
                minutes,
                seconds
            ))
        }
        Value::Bytes(bytes) => from_text(&String::from_utf8_lossy(bytes), column_type),
    }
}

fn from_text(text: &str, column_type: ColumnType) -> SqlValue {
    use ColumnType::*;

    let parsed = match column_type {
        MYSQL_TYPE_TINY | MYSQL_TYPE_SHORT | MYSQL_TYPE_LONG | MYSQL_TYPE_INT24
        | MYSQL_TYPE_LONGLONG | MYSQL_TYPE_YEAR => text.parse().ok().map(SqlValue::Int),
        MYSQL_TYPE_DECIMAL | MYSQL_TYPE_NEWDECIMAL | MYSQL_TYPE_FLOAT | MYSQL_TYPE_DOUBLE => {
            text.parse().ok().map(SqlValue::Float)
        }
        MYSQL_TYPE_DATE | MYSQL_TYPE_NEWDATE => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .map(SqlValue::Date),
        MYSQL_TYPE_DATETIME | MYSQL_TYPE_DATETIME2 | MYSQL_TYPE_TIMESTAMP
        | MYSQL_TYPE_TIMESTAMP2 => NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
            .ok()
            .map(SqlValue::DateTime),
        _ => None,
    };
    parsed.unwrap_or_else(|| SqlValue::Text(text.to_string()))
}

/// Map a driver error outside of procedure invocation.
///
/// Errors reported by the server are query errors; anything else means the
/// connection itself is unusable.
pub fn to_probe_error(err: mysql_async::Error) -> AssessmentError {
    match err {
        mysql_async::Error::Server(err) => AssessmentError::Query(err.to_string()),
        other => AssessmentError::Connectivity(other.to_string()),
    }
}

/// Map a driver error raised while a procedure runs
pub fn to_invocation_error(err: mysql_async::Error) -> AssessmentError {
    match err {
        mysql_async::Error::Server(err) => AssessmentError::ProcedureExecution(err.to_string()),
        other => AssessmentError::Connectivity(other.to_string()),
    }
}
