//! Typed SQL values
//!
//! [`SqlValue`] is used on both sides of every comparison: expected literals
//! in an assignment, and values read back from the database. Drivers return
//! the same logical value in different physical forms (a DATE column read over
//! the text protocol arrives as a string), so comparisons go through
//! [`SqlValue::matches`] rather than `==`.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// A single SQL value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SqlValue {
    /// SQL NULL
    Null,

    /// Any integral value (TINYINT through BIGINT, YEAR)
    Int(i64),

    /// Floating point or decimal value
    Float(f64),

    /// Character data
    Text(String),

    /// Calendar date without time of day
    Date(NaiveDate),

    /// Date with time of day
    DateTime(NaiveDateTime),
}

impl SqlValue {
    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        SqlValue::Text(value.into())
    }

    /// Create a date value from a calendar date.
    ///
    /// Only used for literals in assignment definitions, so an impossible
    /// date is a programming error.
    pub fn date(year: i32, month: u32, day: u32) -> Self {
        SqlValue::Date(NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date"))
    }

    /// Whether this value is SQL NULL
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Type-compatible equality between an expected value (`self`) and a
    /// value read from the database.
    ///
    /// NULL only matches NULL. Dates compare as calendar dates: a timestamp
    /// matches a date only when its time of day is midnight.
    pub fn matches(&self, actual: &SqlValue) -> bool {
        match (self, actual) {
            (SqlValue::Null, actual) => actual.is_null(),
            (_, SqlValue::Null) => false,

            (SqlValue::Int(expected), SqlValue::Int(actual)) => expected == actual,
            (SqlValue::Int(expected), SqlValue::Float(actual)) => (*expected as f64) == *actual,
            (SqlValue::Int(expected), SqlValue::Text(actual)) => parse_number(actual)
                .map(|n| n == *expected as f64)
                .unwrap_or(false),

            (SqlValue::Float(expected), SqlValue::Float(actual)) => expected == actual,
            (SqlValue::Float(expected), SqlValue::Int(actual)) => *expected == *actual as f64,
            (SqlValue::Float(expected), SqlValue::Text(actual)) => {
                parse_number(actual).map(|n| n == *expected).unwrap_or(false)
            }

            (SqlValue::Text(expected), SqlValue::Text(actual)) => expected == actual,

            (SqlValue::Date(expected), SqlValue::Date(actual)) => expected == actual,
            (SqlValue::Date(expected), SqlValue::DateTime(actual)) => {
                actual.time() == NaiveTime::MIN && actual.date() == *expected
            }
            (SqlValue::Date(expected), SqlValue::Text(actual)) => {
                parse_calendar_date(actual).map(|d| d == *expected).unwrap_or(false)
            }

            (SqlValue::DateTime(expected), SqlValue::DateTime(actual)) => expected == actual,
            (SqlValue::DateTime(expected), SqlValue::Date(actual)) => {
                expected.time() == NaiveTime::MIN && expected.date() == *actual
            }
            (SqlValue::DateTime(expected), SqlValue::Text(actual)) => {
                parse_datetime(actual).map(|d| d == *expected).unwrap_or(false)
            }

            _ => false,
        }
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

/// Parse text as a calendar date. A timestamp string is accepted only when its
/// time of day is midnight.
fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        return Some(date);
    }
    parse_datetime(text)
        .filter(|dt| dt.time() == NaiveTime::MIN)
        .map(|dt| dt.date())
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::Int(value) => write!(f, "{}", value),
            SqlValue::Float(value) => write!(f, "{}", value),
            SqlValue::Text(value) => write!(f, "'{}'", value),
            SqlValue::Date(value) => write!(f, "{}", value.format(DATE_FORMAT)),
            SqlValue::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(value as i64)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Date(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlValue::Null)
    }
}
