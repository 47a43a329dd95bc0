// src/schema/registry.rs
//! Static site configuration: statistics pages, filter options and the
//! output columns they feed.
//!
//! Every `(source_page, settlement)` pair owns a disjoint, ordered run of
//! columns. The order is the left-to-right order of the data cells that follow
//! the trade-date cell in the rendered table row.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::types::{ColumnSpec, Facet, FilterChoice, Settlement, Source, ValueType};

/// Workbook column holding the trade date; not part of the registry.
pub const TRADE_DATE_COLUMN: &str = "A";

pub const DATA_FREQUENCY: &str = "Daily";
pub const DATA_SOURCE_NAME: &str = "Central Bank of Russia";

const BOTH: &[Settlement] = &[Settlement::TodTom, Settlement::TomSpt];

pub static SOURCES: &[Source] = &[
    Source {
        key: "swapinfosellvol",
        url: "https://www.cbr.ru/eng/hd_base/swap_info/swapinfosellvol/",
        description: "Volume of Foreign Currency/RUB sell/buy FX Swaps",
        settlements: BOTH,
    },
    Source {
        key: "swap_info_sell",
        url: "https://www.cbr.ru/eng/hd_base/swap_info/sell/",
        description: "Terms of Foreign Currency/RUB sell/buy FX Swaps",
        settlements: BOTH,
    },
];

pub static CURRENCIES: &[FilterChoice] = &[
    FilterChoice {
        facet: Facet::Currency,
        display_label: "USD",
        name: "US Dollar",
        underlying_value: "0",
        dom_anchor_id: "UniDbQuery_Cur_1",
    },
    FilterChoice {
        facet: Facet::Currency,
        display_label: "EUR",
        name: "Euro",
        underlying_value: "1",
        dom_anchor_id: "UniDbQuery_Cur_2",
    },
    FilterChoice {
        facet: Facet::Currency,
        display_label: "CNY",
        name: "Chinese Yuan",
        underlying_value: "2",
        dom_anchor_id: "UniDbQuery_Cur_3",
    },
];

/// Indexed by `Settlement::choice`; keep the order in sync with the enum.
pub static SETTLEMENTS: &[FilterChoice] = &[
    FilterChoice {
        facet: Facet::Settlement,
        display_label: "TODTOM",
        name: "Today-Tomorrow",
        underlying_value: "0",
        dom_anchor_id: "UniDbQuery_P1_1",
    },
    FilterChoice {
        facet: Facet::Settlement,
        display_label: "TOMSPT",
        name: "Tomorrow-Spot",
        underlying_value: "1",
        dom_anchor_id: "UniDbQuery_P1_2",
    },
];

const VOL: &str = "swapinfosellvol";
const TERMS: &str = "swap_info_sell";

macro_rules! col {
    ($id:literal, $code:literal, $desc:literal, $src:expr, $stl:ident, $ty:ident $(,)?) => {
        ColumnSpec {
            column_id: $id,
            semantic_code: $code,
            description: $desc,
            source_page: $src,
            settlement: Settlement::$stl,
            value_type: ValueType::$ty,
        }
    };
}

/// All output columns in workbook order (B..S).
pub static COLUMNS: &[ColumnSpec] = &[
    col!(
        "B",
        "RUSSD.VOLUMEFXSWAPS.TODTOM.USD.B",
        "Volume of Foreign Currency/RUB sell/buy FX Swaps. TODTOM. USD",
        VOL,
        TodTom,
        Number,
    ),
    col!(
        "C",
        "RUSSD.VOLUMEFXSWAPS.TODTOM.RUB.B",
        "Volume of Foreign Currency/RUB sell/buy FX Swaps. TODTOM. USD. Rubles",
        VOL,
        TodTom,
        Number,
    ),
    col!(
        "D",
        "RUSSD.VOLUMEFXSWAPS.TOMSPT.USD.B",
        "Volume of Foreign Currency/RUB sell/buy FX Swaps. TOMSPT. USD",
        VOL,
        TomSpt,
        Number,
    ),
    col!(
        "E",
        "RUSSD.VOLUMEFXSWAPS.TOMSPT.RUB.B",
        "Volume of Foreign Currency/RUB sell/buy FX Swaps. TOMSPT. USD. Rubles",
        VOL,
        TomSpt,
        Number,
    ),
    col!(
        "F",
        "RUSSD.TERMSFXSWAPS.TODTOM.FCSELLDATE.B",
        "Terms of Foreign Currency/RUB sell/buy FX Swaps. TODTOM. USD. FC sell date",
        TERMS,
        TodTom,
        DateInt,
    ),
    col!(
        "G",
        "RUSSD.TERMSFXSWAPS.TODTOM.RUBSELLDATE.B",
        "Terms of Foreign Currency/RUB sell/buy FX Swaps. TODTOM. USD. RUB sell date",
        TERMS,
        TodTom,
        DateInt,
    ),
    col!(
        "H",
        "RUSSD.TERMSFXSWAPS.TODTOM.RUBINTERESTRATE.B",
        "Terms of Foreign Currency/RUB sell/buy FX Swaps. TODTOM. USD. RUB interest rate (% p.a.)",
        TERMS,
        TodTom,
        Number,
    ),
    col!(
        "I",
        "RUSSD.TERMSFXSWAPS.TODTOM.FCINTERESTRATE.B",
        "Terms of Foreign Currency/RUB sell/buy FX Swaps. TODTOM. USD. FC interest rate (% p.a.)",
        TERMS,
        TodTom,
        Number,
    ),
    col!(
        "J",
        "RUSSD.TERMSFXSWAPS.TODTOM.BASESWAPRATE.B",
        "Terms of Foreign Currency/RUB sell/buy FX Swaps. TODTOM. USD. Base swap rate RUB/FC",
        TERMS,
        TodTom,
        Number,
    ),
    col!(
        "K",
        "RUSSD.TERMSFXSWAPS.TODTOM.SWAPPOINTSRUB.B",
        "Terms of Foreign Currency/RUB sell/buy FX Swaps. TODTOM. USD. Swap points (rubles)",
        TERMS,
        TodTom,
        Number,
    ),
    col!(
        "L",
        "RUSSD.TERMSFXSWAPS.TODTOM.MAXALLOTMENTAMOUNT.B",
        "Terms of Foreign Currency/RUB sell/buy FX Swaps. TODTOM. USD. Maximum allotment amount (billions of FC)",
        TERMS,
        TodTom,
        Number,
    ),
    col!(
        "M",
        "RUSSD.TERMSFXSWAPS.TOMSPT.FCSELLDATE.B",
        "Terms of Foreign Currency/RUB sell/buy FX Swaps. TOMSPT. USD. FC sell date",
        TERMS,
        TomSpt,
        DateInt,
    ),
    col!(
        "N",
        "RUSSD.TERMSFXSWAPS.TOMSPT.RUBSELLDATE.B",
        "Terms of Foreign Currency/RUB sell/buy FX Swaps. TOMSPT. USD. RUB sell date",
        TERMS,
        TomSpt,
        DateInt,
    ),
    col!(
        "O",
        "RUSSD.TERMSFXSWAPS.TOMSPT.RUBINTERESTRATE.B",
        "Terms of Foreign Currency/RUB sell/buy FX Swaps. TOMSPT. USD. RUB interest rate (% p.a.)",
        TERMS,
        TomSpt,
        Number,
    ),
    col!(
        "P",
        "RUSSD.TERMSFXSWAPS.TOMSPT.FCINTERESTRATE.B",
        "Terms of Foreign Currency/RUB sell/buy FX Swaps. TOMSPT. USD. FC interest rate (% p.a.)",
        TERMS,
        TomSpt,
        Number,
    ),
    col!(
        "Q",
        "RUSSD.TERMSFXSWAPS.TOMSPT.BASESWAPRATE.B",
        "Terms of Foreign Currency/RUB sell/buy FX Swaps. TOMSPT. USD. Base swap rate RUB/FC",
        TERMS,
        TomSpt,
        Number,
    ),
    col!(
        "R",
        "RUSSD.TERMSFXSWAPS.TOMSPT.SWAPPOINTSRUB.B",
        "Terms of Foreign Currency/RUB sell/buy FX Swaps. TOMSPT. USD. Swap points (rubles)",
        TERMS,
        TomSpt,
        Number,
    ),
    col!(
        "S",
        "RUSSD.TERMSFXSWAPS.TOMSPT.MAXALLOTMENTAMOUNT.B",
        "Terms of Foreign Currency/RUB sell/buy FX Swaps. TOMSPT. USD. Maximum allotment amount (billions of FC)",
        TERMS,
        TomSpt,
        Number,
    ),
];

/// (source_page, settlement) → columns in cell order.
static BY_PARTITION: Lazy<HashMap<(String, Settlement), Vec<&'static ColumnSpec>>> =
    Lazy::new(|| {
        let mut index: HashMap<(String, Settlement), Vec<&'static ColumnSpec>> = HashMap::new();
        for spec in COLUMNS {
            index
                .entry((spec.source_page.to_string(), spec.settlement))
                .or_default()
                .push(spec);
        }
        index
    });

pub fn columns() -> &'static [ColumnSpec] {
    COLUMNS
}

/// Ordered columns fed by one table render; empty for unknown pairs.
pub fn columns_for(source_page: &str, settlement: Settlement) -> &'static [&'static ColumnSpec] {
    BY_PARTITION
        .get(&(source_page.to_string(), settlement))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn column(column_id: &str) -> Option<&'static ColumnSpec> {
    COLUMNS.iter().find(|c| c.column_id == column_id)
}

pub fn source(key: &str) -> Option<&'static Source> {
    SOURCES.iter().find(|s| s.key == key)
}

/// Case-insensitive lookup by display label (`usd` → USD).
pub fn currency(label: &str) -> Option<&'static FilterChoice> {
    let label = label.trim();
    CURRENCIES
        .iter()
        .find(|c| c.display_label.eq_ignore_ascii_case(label))
}
