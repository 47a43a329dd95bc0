// src/collect/mod.rs
//! Sequences navigation and extraction over every (source, settlement) pair
//! for one currency and folds the results into a single consolidated row.
//!
//! Per source the page walks
//! `PageLoaded → CurrencySet → DateSet → SettlementSet → RowExtracted`,
//! once per settlement. A source whose page, currency or date cannot be set
//! is abandoned (`Failed`) and the run moves on; a settlement that cannot be
//! selected or read only leaves its own columns blank.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};

use crate::browser::ControllablePage;
use crate::config::Timing;
use crate::error::ScrapeError;
use crate::process::{parse_date_text, ConsolidatedRow, Value, SOURCE_DATE_FORMAT};
use crate::schema::{Facet, FilterChoice, Settlement, Source, SOURCES};
use crate::scrape::{extract, map_row, Navigator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    PageLoaded(&'static str),
    CurrencySet(&'static str),
    DateSet(&'static str),
    SettlementSet(&'static str, Settlement),
    RowExtracted(&'static str, Settlement),
    Failed(&'static str),
    Done,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Init => f.write_str("INIT"),
            RunState::PageLoaded(s) => write!(f, "PAGE_LOADED({})", s),
            RunState::CurrencySet(s) => write!(f, "CURRENCY_SET({})", s),
            RunState::DateSet(s) => write!(f, "DATE_SET({})", s),
            RunState::SettlementSet(s, stl) => write!(f, "SETTLEMENT_SET({}, {})", s, stl),
            RunState::RowExtracted(s, stl) => write!(f, "ROW_EXTRACTED({}, {})", s, stl),
            RunState::Failed(s) => write!(f, "FAILED({})", s),
            RunState::Done => f.write_str("DONE"),
        }
    }
}

/// What became of one settlement of a source.
#[derive(Debug)]
pub enum SettlementOutcome {
    Extracted {
        trade_date: Option<String>,
        /// Columns whose value was dropped by the merge.
        rejected: Vec<&'static str>,
    },
    /// The table rendered no row for the active filters.
    NoData,
    Failed(ScrapeError),
}

#[derive(Debug)]
pub struct SourceReport {
    pub source: &'static str,
    /// Latest date applied on the page, as displayed (`dd.mm.yyyy`).
    pub applied_date: Option<String>,
    /// Set when the whole source was abandoned.
    pub failure: Option<ScrapeError>,
    pub settlements: Vec<(Settlement, SettlementOutcome)>,
}

impl SourceReport {
    fn new(source: &'static str) -> Self {
        Self {
            source,
            applied_date: None,
            failure: None,
            settlements: Vec::new(),
        }
    }
}

/// Machine-readable digest of a run, keyed by column code.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub currency: &'static str,
    pub trade_date: Option<&'a str>,
    pub populated: usize,
    pub missing: Vec<&'static str>,
    pub values: BTreeMap<&'static str, Option<&'a Value>>,
    /// `source` or `source/settlement`, with the reason.
    pub failures: Vec<String>,
}

/// Result of a collection run.
#[derive(Debug)]
pub struct Collection {
    pub currency: &'static str,
    pub row: ConsolidatedRow,
    pub reports: Vec<SourceReport>,
    /// Every state the run passed through, in order.
    pub transitions: Vec<RunState>,
}

impl Collection {
    pub fn trade_date(&self) -> Option<&str> {
        self.row.trade_date()
    }

    pub fn summary(&self) -> RunSummary<'_> {
        let mut failures = Vec::new();
        for report in &self.reports {
            if let Some(err) = &report.failure {
                failures.push(format!("{}: {}", report.source, err));
            }
            for (settlement, outcome) in &report.settlements {
                if let SettlementOutcome::Failed(err) = outcome {
                    failures.push(format!("{}/{}: {}", report.source, settlement, err));
                }
            }
        }
        RunSummary {
            currency: self.currency,
            trade_date: self.trade_date(),
            populated: self.row.populated(),
            missing: self.row.missing(),
            values: self
                .row
                .iter()
                .map(|(spec, value)| (spec.semantic_code, value))
                .collect(),
            failures,
        }
    }

    /// End-of-run overview: trade date, one line per column, then counts.
    pub fn log_summary(&self) {
        info!(
            currency = self.currency,
            trade_date = self.trade_date().unwrap_or("-"),
            "collection summary"
        );
        for (spec, value) in self.row.iter() {
            let value = value.map(|v| v.to_string()).unwrap_or_default();
            info!(column = spec.column_id, code = spec.semantic_code, value = %value);
        }
        for report in &self.reports {
            if let Some(err) = &report.failure {
                warn!(source = report.source, error = %err, "source abandoned");
            }
            for (settlement, outcome) in &report.settlements {
                match outcome {
                    SettlementOutcome::Failed(err) => warn!(
                        source = report.source,
                        settlement = %settlement,
                        error = %err,
                        "settlement skipped"
                    ),
                    SettlementOutcome::NoData => info!(
                        source = report.source,
                        settlement = %settlement,
                        "no data rendered"
                    ),
                    SettlementOutcome::Extracted { .. } => {}
                }
            }
        }
        let missing = self.row.missing();
        info!(
            populated = self.row.populated(),
            total = self.row.populated() + missing.len(),
            missing = ?missing,
            "columns populated"
        );
        match serde_json::to_string(&self.summary()) {
            Ok(json) => debug!(summary = %json, "run summary"),
            Err(e) => warn!(error = %e, "run summary not serializable"),
        }
    }
}

/// Current state plus every state visited so far.
#[derive(Debug)]
struct Trail {
    state: RunState,
    visited: Vec<RunState>,
}

impl Trail {
    fn new() -> Self {
        Self {
            state: RunState::Init,
            visited: vec![RunState::Init],
        }
    }

    fn advance(&mut self, next: RunState) {
        debug!(from = %self.state, to = %next, "state");
        self.state = next;
        self.visited.push(next);
    }
}

pub struct Collector<'p, P: ControllablePage> {
    page: &'p mut P,
    currency: &'static FilterChoice,
    timing: Timing,
    attempts: u32,
    trail: Trail,
}

impl<'p, P: ControllablePage> Collector<'p, P> {
    /// `attempts` bounds how often a navigation step is tried before the
    /// source or settlement is given up; zero is treated as one.
    pub fn new(
        page: &'p mut P,
        currency: &'static FilterChoice,
        timing: Timing,
        attempts: u32,
    ) -> Self {
        Self {
            page,
            currency,
            timing,
            attempts: attempts.max(1),
            trail: Trail::new(),
        }
    }

    /// Visit every source in registry order.
    pub async fn run(mut self) -> Collection {
        let mut row = ConsolidatedRow::new();
        let mut reports = Vec::with_capacity(SOURCES.len());
        for source in SOURCES {
            let report = self.collect_source(source, &mut row).await;
            if report.failure.is_some() {
                self.trail.advance(RunState::Failed(source.key));
            }
            reports.push(report);
        }
        self.trail.advance(RunState::Done);

        Collection {
            currency: self.currency.display_label,
            row,
            reports,
            transitions: self.trail.visited,
        }
    }

    async fn collect_source(
        &mut self,
        source: &'static Source,
        row: &mut ConsolidatedRow,
    ) -> SourceReport {
        let mut report = SourceReport::new(source.key);
        info!(source = source.key, url = source.url, "loading page");

        if let Err(err) = self.load(source).await {
            report.failure = Some(err);
            return report;
        }
        self.trail.advance(RunState::PageLoaded(source.key));

        let mut nav = Navigator::new(&mut *self.page, self.timing);
        nav.dismiss_cookie_banner().await;

        let currency = self.currency.display_label;
        if !set_filter(&mut nav, Facet::Currency, currency, self.attempts).await {
            report.failure = Some(ScrapeError::Navigation {
                page: source.key,
                what: format!("currency {}", self.currency.display_label),
            });
            return report;
        }
        self.trail.advance(RunState::CurrencySet(source.key));

        let Some(applied) = set_latest_date(&mut nav, self.attempts).await else {
            report.failure = Some(ScrapeError::Navigation {
                page: source.key,
                what: "date range".into(),
            });
            return report;
        };
        self.trail.advance(RunState::DateSet(source.key));
        let applied_iso = parse_date_text(&applied, SOURCE_DATE_FORMAT);
        report.applied_date = Some(applied);

        for &settlement in source.settlements {
            let label = settlement.choice().display_label;
            let outcome = if !set_filter(&mut nav, Facet::Settlement, label, self.attempts).await {
                SettlementOutcome::Failed(ScrapeError::Navigation {
                    page: source.key,
                    what: format!("settlement {}", settlement),
                })
            } else {
                self.trail.advance(RunState::SettlementSet(source.key, settlement));

                match extract(nav.page(), self.timing).await {
                    None => SettlementOutcome::NoData,
                    Some(raw) => match map_row(source.key, settlement, &raw) {
                        Err(err) => SettlementOutcome::Failed(err),
                        Ok(partial) => {
                            let trade_date = partial.trade_date.clone();
                            let dates = (&trade_date, &applied_iso);
                            if let (Some(row_date), Some(applied)) = dates {
                                if row_date != applied {
                                    warn!(
                                        source = source.key,
                                        settlement = %settlement,
                                        row_date = %row_date,
                                        applied = %applied,
                                        "row date differs from the applied date"
                                    );
                                }
                            }
                            let rejected = row.merge(partial);
                            self.trail
                                .advance(RunState::RowExtracted(source.key, settlement));
                            SettlementOutcome::Extracted { trade_date, rejected }
                        }
                    },
                }
            };
            if let SettlementOutcome::Failed(err) = &outcome {
                warn!(
                    source = source.key,
                    settlement = %settlement,
                    error = %err,
                    "settlement skipped"
                );
            }
            report.settlements.push((settlement, outcome));
        }
        report
    }

    async fn load(&mut self, source: &'static Source) -> Result<(), ScrapeError> {
        let mut last = None;
        for attempt in 1..=self.attempts {
            match self.page.goto(source.url).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(source = source.key, attempt, error = %e, "page load failed");
                    last = Some(e);
                }
            }
        }
        Err(ScrapeError::Navigation {
            page: source.key,
            what: format!("page ({})", last.map(|e| e.to_string()).unwrap_or_default()),
        })
    }
}

async fn set_filter<P: ControllablePage>(
    nav: &mut Navigator<'_, P>,
    facet: Facet,
    label: &str,
    attempts: u32,
) -> bool {
    for attempt in 1..=attempts {
        if nav.select_filter_value(facet, label).await {
            return true;
        }
        warn!(facet = %facet, value = label, attempt, attempts, "filter not set");
    }
    false
}

async fn set_latest_date<P: ControllablePage>(
    nav: &mut Navigator<'_, P>,
    attempts: u32,
) -> Option<String> {
    for attempt in 1..=attempts {
        if let Some(date) = nav.select_latest_date().await {
            return Some(date);
        }
        warn!(attempt, attempts, "latest date not applied");
    }
    None
}

/// Run a full collection on `page` and release it afterwards, whatever the
/// outcome of the collection.
pub async fn collect_and_close<P: ControllablePage>(
    mut page: P,
    currency: &'static FilterChoice,
    timing: Timing,
    attempts: u32,
) -> Collection {
    let collection = Collector::new(&mut page, currency, timing, attempts)
        .run()
        .await;
    if let Err(e) = page.close().await {
        warn!(error = %e, "closing browser failed");
    }
    collection
}
