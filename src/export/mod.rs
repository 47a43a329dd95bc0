// src/export/mod.rs
//! Delivery files of a run: the data workbook, the metadata workbook and the
//! archive bundling both. All three names carry the trade date as `YYYYMMDD`.

pub mod data;
pub mod metadata;
pub mod package;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::process::ConsolidatedRow;

/// Paths of the files written by [`export_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub data: PathBuf,
    pub metadata: PathBuf,
    pub archive: PathBuf,
}

/// `2025-02-11` → `20250211`.
pub fn date_stamp(iso_date: &str) -> Result<String> {
    let date = NaiveDate::parse_from_str(iso_date, "%Y-%m-%d")
        .with_context(|| format!("trade date {:?} is not ISO formatted", iso_date))?;
    Ok(date.format("%Y%m%d").to_string())
}

pub fn data_file_name(stamp: &str) -> String {
    format!("RUSSD_DATA_{}.xlsx", stamp)
}

pub fn metadata_file_name(stamp: &str) -> String {
    format!("RUSSD_META_{}.xlsx", stamp)
}

pub fn archive_file_name(stamp: &str) -> String {
    format!("RUSSD_{}.ZIP", stamp)
}

/// Write all delivery files into `out_dir`.
///
/// Returns `Ok(None)` without touching the disk when the row has no trade
/// date. `run_date` only feeds the next-release timestamp of the metadata.
pub fn export_all(
    row: ConsolidatedRow,
    out_dir: &Path,
    run_date: NaiveDate,
) -> Result<Option<Artifacts>> {
    let Some(trade_date) = row.trade_date().map(str::to_string) else {
        warn!("no trade date; nothing exported");
        return Ok(None);
    };
    let stamp = date_stamp(&trade_date)?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let data_path = out_dir.join(data_file_name(&stamp));
    data::write_data(&row, &data_path)?;
    info!(path = %data_path.display(), "data workbook written");

    let meta_path = out_dir.join(metadata_file_name(&stamp));
    let rows = metadata::metadata_rows(&trade_date, run_date);
    metadata::write_metadata(&rows, &meta_path)?;
    info!(path = %meta_path.display(), rows = rows.len(), "metadata workbook written");

    let archive_path = out_dir.join(archive_file_name(&stamp));
    package::package(&[data_path.as_path(), meta_path.as_path()], &archive_path)?;
    info!(path = %archive_path.display(), "archive written");

    Ok(Some(Artifacts {
        data: data_path,
        metadata: meta_path,
        archive: archive_path,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{PartialRow, Value};
    use crate::schema::Settlement;
    use std::fs::File;
    use tempfile::tempdir;
    use zip::ZipArchive;

    fn sample_row() -> ConsolidatedRow {
        let mut row = ConsolidatedRow::new();
        row.merge(PartialRow {
            source_page: "swapinfosellvol",
            settlement: Settlement::TodTom,
            trade_date: Some("2025-02-11".into()),
            values: vec![
                ("B", Some(Value::Number(1500.0))),
                ("C", Some(Value::Number(1505.2))),
            ],
        });
        row
    }

    #[test]
    fn test_date_stamp() {
        assert_eq!(date_stamp("2025-02-11").unwrap(), "20250211");
        assert!(date_stamp("11.02.2025").is_err());
    }

    #[test]
    fn test_export_all_writes_three_files() -> Result<()> {
        let dir = tempdir()?;
        let out = dir.path().join("out");
        let run_date = NaiveDate::from_ymd_opt(2025, 2, 11).unwrap();

        let artifacts = export_all(sample_row(), &out, run_date)?.expect("artifacts");
        assert_eq!(artifacts.data, out.join("RUSSD_DATA_20250211.xlsx"));
        assert_eq!(artifacts.metadata, out.join("RUSSD_META_20250211.xlsx"));
        assert_eq!(artifacts.archive, out.join("RUSSD_20250211.ZIP"));
        assert!(artifacts.data.is_file());
        assert!(artifacts.metadata.is_file());

        let mut archive = ZipArchive::new(File::open(&artifacts.archive)?)?;
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(names, vec!["RUSSD_DATA_20250211.xlsx", "RUSSD_META_20250211.xlsx"]);
        let entry = archive.by_name("RUSSD_DATA_20250211.xlsx")?;
        assert_eq!(entry.size(), fs::metadata(&artifacts.data)?.len());
        Ok(())
    }

    #[test]
    fn test_export_without_trade_date_writes_nothing() -> Result<()> {
        let dir = tempdir()?;
        let out = dir.path().join("out");
        let run_date = NaiveDate::from_ymd_opt(2025, 2, 11).unwrap();

        assert!(export_all(ConsolidatedRow::new(), &out, run_date)?.is_none());
        assert!(!out.exists());
        Ok(())
    }
}
