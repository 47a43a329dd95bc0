// src/process/value.rs

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::schema::ValueType;

/// `dd.mm.yyyy`, as rendered by the source tables and the date picker.
pub const SOURCE_DATE_FORMAT: &str = "%d.%m.%Y";
pub const OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// A typed cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Integer(i64),
    Text(String),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Collapse inner whitespace runs and trim the ends.
pub fn clean_cell(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a locale-formatted decimal (`1,234.50`, `-0.25`, `1 500`).
/// Empty and placeholder text yields `None`.
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .map(|c| if c == '\u{2212}' { '-' } else { c })
        .collect();
    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("n/a") || cleaned == "-" {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_date(text: &str, source_format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), source_format).ok()
}

/// Reinterpret a date in `source_format` as ISO `yyyy-mm-dd`.
pub fn parse_date_text(text: &str, source_format: &str) -> Option<String> {
    parse_date(text, source_format).map(|d| d.format(OUTPUT_DATE_FORMAT).to_string())
}

/// Reinterpret a date in `source_format` as the integer `yyyymmdd`.
pub fn parse_date_int(text: &str, source_format: &str) -> Option<i64> {
    parse_date(text, source_format)
        .map(|d| d.year() as i64 * 10_000 + d.month() as i64 * 100 + d.day() as i64)
}

/// Type one cell according to its column's value type.
pub fn parse_cell(text: &str, ty: ValueType) -> Option<Value> {
    match ty {
        ValueType::Number => parse_number(text).map(Value::Number),
        ValueType::DateInt => parse_date_int(text, SOURCE_DATE_FORMAT).map(Value::Integer),
        ValueType::DateText => parse_date_text(text, SOURCE_DATE_FORMAT).map(Value::Text),
        ValueType::Text => {
            let cleaned = clean_cell(text);
            (!cleaned.is_empty()).then_some(Value::Text(cleaned))
        }
    }
}
