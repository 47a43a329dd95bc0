// src/export/metadata.rs
//! Metadata workbook: one row per output column, derived from the registry
//! and the run's trade date only.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

use crate::schema::{columns, DATA_FREQUENCY, DATA_SOURCE_NAME};

pub const HEADERS: [&str; 7] = [
    "CODE",
    "DESCRIPTION",
    "FREQUENCY",
    "UNIT",
    "SOURCE",
    "LAST_UPDATE",
    "NEXT_RELEASE_DATE",
];

const RELEASE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRow {
    pub code: &'static str,
    pub description: &'static str,
    pub frequency: &'static str,
    pub unit: &'static str,
    pub source: &'static str,
    pub last_update: String,
    pub next_release: String,
}

impl MetadataRow {
    fn cells(&self) -> [&str; 7] {
        [
            self.code,
            self.description,
            self.frequency,
            self.unit,
            self.source,
            &self.last_update,
            &self.next_release,
        ]
    }
}

/// Unit of measure derived from keywords of a column description. First
/// matching rule wins.
pub fn unit_for(description: &str) -> &'static str {
    let d = description.to_lowercase();
    if d.contains("date") {
        "Date (YYYYMMDD)"
    } else if d.contains("rate") || d.contains('%') {
        "% per annum"
    } else if d.contains("volume") {
        if d.contains("rubles") {
            "Millions of RUB"
        } else {
            "Millions of USD"
        }
    } else if d.contains("amount") {
        "Billions of FC"
    } else if d.contains("points") {
        "Rubles"
    } else {
        "Number"
    }
}

/// 10:00 on the first weekday after `run_date`.
pub fn next_release(run_date: NaiveDate) -> NaiveDateTime {
    let day = run_date
        .iter_days()
        .skip(1)
        .find(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .unwrap_or(run_date);
    day.and_time(NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default())
}

pub fn metadata_rows(trade_date: &str, run_date: NaiveDate) -> Vec<MetadataRow> {
    let next = next_release(run_date).format(RELEASE_FORMAT).to_string();
    columns()
        .iter()
        .map(|spec| MetadataRow {
            code: spec.semantic_code,
            description: spec.description,
            frequency: DATA_FREQUENCY,
            unit: unit_for(spec.description),
            source: DATA_SOURCE_NAME,
            last_update: trade_date.to_string(),
            next_release: next.clone(),
        })
        .collect()
}

pub fn write_metadata(rows: &[MetadataRow], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Metadata")?;

    let bold = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let r = u32::try_from(i + 1).context("too many metadata rows")?;
        for (col, cell) in row.cells().iter().enumerate() {
            sheet.write_string(r, col as u16, *cell)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("saving {}", path.display()))?;
    Ok(())
}
