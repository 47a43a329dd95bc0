// src/schema/types.rs

use std::fmt;

/// How the text of a table cell is turned into a typed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Locale-formatted decimal, e.g. `1,234.50`.
    Number,
    /// `dd.mm.yyyy` rendered as ISO `yyyy-mm-dd`.
    DateText,
    /// `dd.mm.yyyy` rendered as the integer `yyyymmdd`.
    DateInt,
    /// Verbatim passthrough.
    Text,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Number => "number",
            ValueType::DateText => "date_text",
            ValueType::DateInt => "date_int",
            ValueType::Text => "text",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trade-timing convention that partitions the table content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Settlement {
    TodTom,
    TomSpt,
}

impl Settlement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Settlement::TodTom => "TODTOM",
            Settlement::TomSpt => "TOMSPT",
        }
    }

    /// The settlement filter option selecting this convention.
    pub fn choice(&self) -> &'static FilterChoice {
        match self {
            Settlement::TodTom => &super::registry::SETTLEMENTS[0],
            Settlement::TomSpt => &super::registry::SETTLEMENTS[1],
        }
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named filter dimension of the source page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Currency,
    Settlement,
}

impl Facet {
    /// Grouping texts identifying the filter control. The site is bilingual,
    /// so both the English and the Russian caption are accepted.
    pub fn captions(&self) -> &'static [&'static str] {
        match self {
            Facet::Currency => &["Currency", "Валюта"],
            Facet::Settlement => &["Settlement", "Сроки расчетов"],
        }
    }

    pub fn name(&self) -> &'static str {
        self.captions()[0]
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One selectable option of a filter control.
///
/// `display_label` is exactly what the control's button shows once the option
/// is active, so it both picks the option and verifies the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterChoice {
    pub facet: Facet,
    pub display_label: &'static str,
    pub name: &'static str,
    /// Value of the underlying radio input.
    pub underlying_value: &'static str,
    /// Id of the radio input; option labels point at it with `for=`.
    pub dom_anchor_id: &'static str,
}

/// A statistics page of the source site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Source {
    pub key: &'static str,
    pub url: &'static str,
    pub description: &'static str,
    /// Processed in this order, one table read each.
    pub settlements: &'static [Settlement],
}

/// Definition of one output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Workbook column letter, unique across the registry.
    pub column_id: &'static str,
    pub semantic_code: &'static str,
    pub description: &'static str,
    pub source_page: &'static str,
    pub settlement: Settlement,
    pub value_type: ValueType,
}
