// src/scrape/extractor.rs

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use super::{selectors as sel, wait};
use crate::browser::ControllablePage;
use crate::config::Timing;
use crate::error::ScrapeError;
use crate::process::{clean_cell, parse_cell, parse_date_text, PartialRow, SOURCE_DATE_FORMAT};
use crate::schema::{columns_for, Settlement};

static BODY_ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("tbody tr").expect("selector should parse"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("selector should parse"));

/// Cell texts of one rendered table row, left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub cells: Vec<String>,
}

/// Read the first body row of the data table.
///
/// `None` means the page shows no data for the active filters; that is not
/// an error for the run.
pub async fn extract<P: ControllablePage>(page: &mut P, timing: Timing) -> Option<RawRow> {
    let table = match wait::present(page, sel::DATA_TABLE, timing.wait, timing.poll).await {
        Ok(table) => table,
        Err(e) => {
            debug!(error = %e, "data table not rendered");
            return None;
        }
    };
    let html = match page.outer_html(&table).await {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "reading data table failed");
            return None;
        }
    };
    let row = parse_first_row(&html);
    if row.is_none() {
        debug!("data table has no body rows");
    }
    row
}

/// Cells of the first `tbody` row in `html`.
pub fn parse_first_row(html: &str) -> Option<RawRow> {
    let doc = Html::parse_document(html);
    let row = doc.select(&BODY_ROW).next()?;
    let cells: Vec<String> = row
        .select(&CELL)
        .map(|td| clean_cell(&td.text().collect::<String>()))
        .collect();
    (!cells.is_empty()).then_some(RawRow { cells })
}

/// Type the cells of `raw` against the columns registered for
/// (`source_page`, `settlement`).
///
/// The first cell is the trade date; the following cells map positionally
/// onto the registered columns. A row shorter than that is rejected. Extra
/// trailing cells are ignored with a warning since they hint that the live
/// table layout changed.
pub fn map_row(
    source_page: &'static str,
    settlement: Settlement,
    raw: &RawRow,
) -> Result<PartialRow, ScrapeError> {
    let columns = columns_for(source_page, settlement);
    if columns.is_empty() {
        return Err(ScrapeError::Extraction {
            page: source_page,
            settlement,
            reason: "no columns registered".into(),
        });
    }

    let expected = columns.len() + 1;
    if raw.cells.len() < expected {
        return Err(ScrapeError::Extraction {
            page: source_page,
            settlement,
            reason: format!("expected {} cells, got {}", expected, raw.cells.len()),
        });
    }
    if raw.cells.len() > expected {
        warn!(
            page = source_page,
            settlement = %settlement,
            expected,
            got = raw.cells.len(),
            "table has more cells than registered columns; extra cells ignored"
        );
    }

    let trade_date = parse_date_text(&raw.cells[0], SOURCE_DATE_FORMAT);
    if trade_date.is_none() {
        warn!(
            page = source_page,
            settlement = %settlement,
            cell = %raw.cells[0],
            "row carries no readable trade date"
        );
    }

    let values = columns
        .iter()
        .zip(&raw.cells[1..])
        .map(|(col, text)| {
            let value = parse_cell(text, col.value_type);
            if value.is_none() {
                let err = ScrapeError::Parse {
                    column: col.column_id,
                    text: text.clone(),
                    expected: col.value_type,
                };
                warn!(error = %err, "value left blank");
            }
            (col.column_id, value)
        })
        .collect();

    Ok(PartialRow {
        source_page,
        settlement,
        trade_date,
        values,
    })
}
