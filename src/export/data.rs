// src/export/data.rs

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use std::path::Path;

use crate::process::{ConsolidatedRow, Value};
use crate::schema::TRADE_DATE_COLUMN;

const CODE_ROW: u32 = 0;
const DESCRIPTION_ROW: u32 = 1;
const VALUE_ROW: u32 = 2;

/// Zero-based worksheet column of a letter id (`A` → 0, `S` → 18, `AA` → 26).
pub fn column_index(column_id: &str) -> Option<u16> {
    if column_id.is_empty() {
        return None;
    }
    let mut n: u32 = 0;
    for c in column_id.chars() {
        if !c.is_ascii_uppercase() {
            return None;
        }
        n = n * 26 + (c as u32 - 'A' as u32 + 1);
    }
    u16::try_from(n - 1).ok()
}

fn write_value(sheet: &mut Worksheet, col: u16, value: &Value) -> Result<(), XlsxError> {
    match value {
        Value::Number(n) => sheet.write_number(VALUE_ROW, col, *n)?,
        Value::Integer(i) => sheet.write_number(VALUE_ROW, col, *i as f64)?,
        Value::Text(s) => sheet.write_string(VALUE_ROW, col, s)?,
    };
    Ok(())
}

/// Write the one-sheet data workbook.
///
/// Row 1 holds the column codes, row 2 the descriptions, row 3 the values.
/// Column A carries the trade date in row 3 and is blank above it. Absent
/// values leave their cell empty.
pub fn write_data(row: &ConsolidatedRow, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("DATA")?;

    let date_col = column_index(TRADE_DATE_COLUMN).context("trade date column id")?;
    if let Some(date) = row.trade_date() {
        sheet.write_string(VALUE_ROW, date_col, date)?;
    }
    sheet.set_column_width(date_col, 12)?;

    for (spec, value) in row.iter() {
        let col = column_index(spec.column_id)
            .with_context(|| format!("bad column id {:?}", spec.column_id))?;
        sheet.write_string(CODE_ROW, col, spec.semantic_code)?;
        sheet.write_string(DESCRIPTION_ROW, col, spec.description)?;
        if let Some(value) = value {
            write_value(sheet, col, value)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("saving {}", path.display()))?;
    Ok(())
}
