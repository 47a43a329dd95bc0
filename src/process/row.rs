// src/process/row.rs

use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::value::Value;
use crate::schema::{self, Settlement};

/// Typed values read from one table render, keyed by column id.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialRow {
    pub source_page: &'static str,
    pub settlement: Settlement,
    /// ISO trade date carried by the row, if it parsed.
    pub trade_date: Option<String>,
    /// `None` marks a cell that could not be typed.
    pub values: Vec<(&'static str, Option<Value>)>,
}

/// The single merged record of a run.
///
/// Every registry column is present from the start; a column stays `None`
/// until some extraction supplies a value for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidatedRow {
    trade_date: Option<String>,
    values: BTreeMap<&'static str, Option<Value>>,
}

impl Default for ConsolidatedRow {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsolidatedRow {
    pub fn new() -> Self {
        Self {
            trade_date: None,
            values: schema::columns()
                .iter()
                .map(|c| (c.column_id, None))
                .collect(),
        }
    }

    pub fn trade_date(&self) -> Option<&str> {
        self.trade_date.as_deref()
    }

    /// Record `date` unless a trade date is already known. Returns whether it
    /// was taken.
    pub fn offer_trade_date(&mut self, date: &str) -> bool {
        match &self.trade_date {
            Some(current) => {
                if current != date {
                    warn!(current = %current, offered = %date, "conflicting trade date ignored");
                }
                false
            }
            None => {
                self.trade_date = Some(date.to_string());
                true
            }
        }
    }

    pub fn get(&self, column_id: &str) -> Option<&Value> {
        self.values.get(column_id).and_then(Option::as_ref)
    }

    /// Columns in registry order with their value, if any.
    pub fn iter(&self) -> impl Iterator<Item = (&'static schema::ColumnSpec, Option<&Value>)> + '_ {
        schema::columns().iter().map(move |c| (c, self.get(c.column_id)))
    }

    pub fn populated(&self) -> usize {
        self.values.values().filter(|v| v.is_some()).count()
    }

    pub fn missing(&self) -> Vec<&'static str> {
        self.iter()
            .filter(|(_, v)| v.is_none())
            .map(|(c, _)| c.column_id)
            .collect()
    }

    /// Fill absent columns from `partial`.
    ///
    /// A value for a column that is already populated is a schema-mapping
    /// defect: it is reported and the earlier value is kept. Returns the ids of
    /// the rejected columns.
    pub fn merge(&mut self, partial: PartialRow) -> Vec<&'static str> {
        if let Some(date) = partial.trade_date.as_deref() {
            self.offer_trade_date(date);
        }

        let mut rejected = Vec::new();
        for (column_id, value) in partial.values {
            let Some(value) = value else {
                continue;
            };
            match self.values.get_mut(column_id) {
                None => {
                    warn!(
                        column = column_id,
                        page = partial.source_page,
                        "value for unknown column dropped"
                    );
                    rejected.push(column_id);
                }
                Some(slot) => {
                    if let Some(existing) = slot.as_ref() {
                        warn!(
                            column = column_id,
                            page = partial.source_page,
                            settlement = %partial.settlement,
                            kept = %existing,
                            rejected = %value,
                            "column already populated; schema mapping overlaps"
                        );
                        rejected.push(column_id);
                    } else {
                        debug!(column = column_id, value = %value, "column populated");
                        *slot = Some(value);
                    }
                }
            }
        }
        rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partial(
        settlement: Settlement,
        date: Option<&str>,
        values: Vec<(&'static str, Option<Value>)>,
    ) -> PartialRow {
        PartialRow {
            source_page: "swapinfosellvol",
            settlement,
            trade_date: date.map(str::to_string),
            values,
        }
    }

    #[test]
    fn test_new_row_has_every_column_unset() {
        let row = ConsolidatedRow::new();
        assert_eq!(row.trade_date(), None);
        assert_eq!(row.populated(), 0);
        assert_eq!(row.missing().len(), schema::columns().len());
    }

    #[test]
    fn test_merge_disjoint_partials_is_union() {
        let mut row = ConsolidatedRow::new();
        let a = partial(
            Settlement::TodTom,
            Some("2025-02-11"),
            vec![("B", Some(Value::Number(1500.0))), ("C", Some(Value::Number(1505.2)))],
        );
        let b = partial(
            Settlement::TomSpt,
            Some("2025-02-11"),
            vec![("D", Some(Value::Number(7.0))), ("E", Some(Value::Integer(20250212)))],
        );
        assert!(row.merge(a).is_empty());
        assert!(row.merge(b).is_empty());

        assert_eq!(row.trade_date(), Some("2025-02-11"));
        assert_eq!(row.populated(), 4);
        assert_eq!(row.get("B"), Some(&Value::Number(1500.0)));
        assert_eq!(row.get("C"), Some(&Value::Number(1505.2)));
        assert_eq!(row.get("D"), Some(&Value::Number(7.0)));
        assert_eq!(row.get("E"), Some(&Value::Integer(20250212)));
        assert_eq!(row.get("F"), None);
    }

    #[test]
    fn test_merge_never_overwrites() {
        let mut row = ConsolidatedRow::new();
        row.merge(partial(Settlement::TodTom, None, vec![("B", Some(Value::Number(1.0)))]));
        let rejected = row.merge(partial(
            Settlement::TodTom,
            None,
            vec![("B", Some(Value::Number(2.0))), ("ZZ", Some(Value::Number(3.0)))],
        ));
        assert_eq!(rejected, vec!["B", "ZZ"]);
        assert_eq!(row.get("B"), Some(&Value::Number(1.0)));
        assert_eq!(row.populated(), 1);
    }

    #[test]
    fn test_unparsed_cells_stay_absent() {
        let mut row = ConsolidatedRow::new();
        row.merge(partial(
            Settlement::TodTom,
            None,
            vec![("B", None), ("C", Some(Value::Number(2.0)))],
        ));
        assert_eq!(row.get("B"), None);
        assert!(row.missing().contains(&"B"));
        // a later extraction may still fill it
        row.merge(partial(Settlement::TodTom, None, vec![("B", Some(Value::Number(9.0)))]));
        assert_eq!(row.get("B"), Some(&Value::Number(9.0)));
    }

    #[test]
    fn test_first_trade_date_wins() {
        let mut row = ConsolidatedRow::new();
        assert!(row.offer_trade_date("2025-02-11"));
        assert!(!row.offer_trade_date("2025-02-12"));
        assert_eq!(row.trade_date(), Some("2025-02-11"));
    }
}
