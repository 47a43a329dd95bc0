// src/browser/mock.rs
//! In-memory stand-in for the swap statistics pages.
//!
//! Mimics the widgets the navigator drives: two filter dropdowns whose option
//! panel must be opened before a label can be clicked, a date picker carrying
//! `data-max-date`, and a data table that only renders once the date range is
//! applied and a row exists for the active (page, currency, settlement).

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use super::ControllablePage;
use crate::error::DriverError;
use crate::schema::{Facet, FilterChoice, CURRENCIES, SETTLEMENTS};
use crate::scrape::selectors as sel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEl {
    Filter(Facet),
    FilterButton(Facet),
    Panel(Facet),
    OptionLabel { facet: Facet, label: String },
    CookieButton,
    DatePicker,
    DateButton,
    DateFrom,
    DateTo,
    DateApply,
    Table,
}

type RowKey = (String, String, String);

pub struct MockPage {
    url: Option<String>,
    cookie_banner: bool,
    russian_captions: bool,
    max_date: Option<String>,
    apply_button: bool,
    initial: (String, String),
    rows: HashMap<RowKey, Vec<String>>,
    empty_tables: HashSet<RowKey>,
    hidden_options: HashSet<(String, String)>,
    failing_urls: HashSet<String>,

    currency: String,
    settlement: String,
    open_panel: Option<Facet>,
    picker_open: bool,
    date_from: String,
    date_to: String,
    applied: Option<(String, String)>,

    interactions: Arc<AtomicUsize>,
    closed: Arc<AtomicBool>,
}

impl Default for MockPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPage {
    /// A page reporting `11.02.2025` as its latest date, with USD/TODTOM
    /// preselected and no data rows.
    pub fn new() -> Self {
        Self {
            url: None,
            cookie_banner: false,
            russian_captions: false,
            max_date: Some("11.02.2025".into()),
            apply_button: true,
            initial: ("USD".into(), "TODTOM".into()),
            rows: HashMap::new(),
            empty_tables: HashSet::new(),
            hidden_options: HashSet::new(),
            failing_urls: HashSet::new(),
            currency: String::new(),
            settlement: String::new(),
            open_panel: None,
            picker_open: false,
            date_from: String::new(),
            date_to: String::new(),
            applied: None,
            interactions: Arc::new(AtomicUsize::new(0)),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_row(mut self, url: &str, currency: &str, settlement: &str, cells: &[&str]) -> Self {
        self.rows.insert(
            (url.into(), currency.into(), settlement.into()),
            cells.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    /// Table renders but its body has no rows.
    pub fn with_empty_table(mut self, url: &str, currency: &str, settlement: &str) -> Self {
        self.empty_tables
            .insert((url.into(), currency.into(), settlement.into()));
        self
    }

    /// The option labelled `label` is absent from the dropdowns on `url`.
    pub fn without_option(mut self, url: &str, label: &str) -> Self {
        self.hidden_options.insert((url.into(), label.into()));
        self
    }

    pub fn with_max_date(mut self, date: Option<&str>) -> Self {
        self.max_date = date.map(str::to_string);
        self
    }

    pub fn with_initial(mut self, currency: &str, settlement: &str) -> Self {
        self.initial = (currency.into(), settlement.into());
        self
    }

    pub fn with_cookie_banner(mut self) -> Self {
        self.cookie_banner = true;
        self
    }

    /// Filter captions rendered in Russian only.
    pub fn with_russian_captions(mut self) -> Self {
        self.russian_captions = true;
        self
    }

    pub fn without_apply_button(mut self) -> Self {
        self.apply_button = false;
        self
    }

    pub fn failing_goto(mut self, url: &str) -> Self {
        self.failing_urls.insert(url.into());
        self
    }

    /// Clicks plus value injections performed so far.
    pub fn interactions(&self) -> usize {
        self.interactions.load(Ordering::SeqCst)
    }

    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }

    pub fn current(&self, facet: Facet) -> &str {
        match facet {
            Facet::Currency => &self.currency,
            Facet::Settlement => &self.settlement,
        }
    }

    pub fn applied_range(&self) -> Option<(&str, &str)> {
        self.applied.as_ref().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    pub fn has_cookie_banner(&self) -> bool {
        self.cookie_banner
    }

    pub fn open_panel(&self) -> Option<Facet> {
        self.open_panel
    }

    fn caption(&self, facet: Facet) -> &'static str {
        let captions = facet.captions();
        if self.russian_captions {
            captions[1]
        } else {
            captions[0]
        }
    }

    fn options(&self, facet: Facet) -> Vec<&'static FilterChoice> {
        let all = match facet {
            Facet::Currency => CURRENCIES,
            Facet::Settlement => SETTLEMENTS,
        };
        let url = self.url.clone().unwrap_or_default();
        all.iter()
            .filter(|c| {
                !self
                    .hidden_options
                    .contains(&(url.clone(), c.display_label.to_string()))
            })
            .collect()
    }

    fn key(&self) -> Option<RowKey> {
        let url = self.url.clone()?;
        Some((url, self.currency.clone(), self.settlement.clone()))
    }

    fn table_rendered(&self) -> bool {
        let Some(max) = &self.max_date else {
            return false;
        };
        let date_applied = self.applied == Some((max.clone(), max.clone()));
        date_applied
            && self
                .key()
                .map(|k| self.rows.contains_key(&k) || self.empty_tables.contains(&k))
                .unwrap_or(false)
    }

    fn table_html(&self) -> String {
        let cells = self
            .key()
            .and_then(|k| self.rows.get(&k).cloned())
            .unwrap_or_default();
        let body = if cells.is_empty() {
            String::new()
        } else {
            let tds: String = cells.iter().map(|c| format!("<td>{}</td>", c)).collect();
            format!("<tr>{}</tr>", tds)
        };
        format!(
            r#"<table class="data"><thead><tr><th>Date</th></tr></thead><tbody>{}</tbody></table>"#,
            body
        )
    }

    fn touch(&self) {
        self.interactions.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ControllablePage for MockPage {
    type Element = MockEl;

    async fn goto(&mut self, url: &str) -> Result<(), DriverError> {
        if self.failing_urls.contains(url) {
            return Err(DriverError::Protocol(format!("net::ERR_FAILED at {}", url)));
        }
        self.url = Some(url.to_string());
        self.currency = self.initial.0.clone();
        self.settlement = self.initial.1.clone();
        self.open_panel = None;
        self.picker_open = false;
        self.date_from.clear();
        self.date_to.clear();
        self.applied = None;
        Ok(())
    }

    async fn find_all(&mut self, selector: &str) -> Result<Vec<MockEl>, DriverError> {
        if self.url.is_none() {
            return Ok(Vec::new());
        }
        let found = match selector {
            s if s == sel::FILTER_CONTAINER => {
                vec![MockEl::Filter(Facet::Currency), MockEl::Filter(Facet::Settlement)]
            }
            s if s == sel::COOKIE_ACCEPT && self.cookie_banner => vec![MockEl::CookieButton],
            s if s == sel::DATEPICKER => vec![MockEl::DatePicker],
            s if s == sel::DATEPICKER_BUTTON => vec![MockEl::DateButton],
            s if s == sel::DATE_FROM_INPUT => vec![MockEl::DateFrom],
            s if s == sel::DATE_TO_INPUT => vec![MockEl::DateTo],
            s if s == sel::DATEPICKER_APPLY && self.apply_button => vec![MockEl::DateApply],
            s if s == sel::DATA_TABLE && self.table_rendered() => vec![MockEl::Table],
            _ => Vec::new(),
        };
        Ok(found)
    }

    async fn find_within(
        &mut self,
        scope: &MockEl,
        selector: &str,
    ) -> Result<Vec<MockEl>, DriverError> {
        let found = match scope {
            MockEl::Filter(f) if selector == sel::FILTER_BUTTON => vec![MockEl::FilterButton(*f)],
            MockEl::Filter(f) if selector == sel::FILTER_PANEL => vec![MockEl::Panel(*f)],
            MockEl::Panel(f) if selector.starts_with("label[for='") => {
                let anchor = selector
                    .trim_start_matches("label[for='")
                    .trim_end_matches("']");
                self.options(*f)
                    .into_iter()
                    .filter(|c| c.dom_anchor_id == anchor)
                    .map(|c| MockEl::OptionLabel {
                        facet: *f,
                        label: c.display_label.to_string(),
                    })
                    .collect()
            }
            MockEl::Panel(f) if selector == sel::FILTER_OPTION_LABEL => self
                .options(*f)
                .into_iter()
                .map(|c| MockEl::OptionLabel {
                    facet: *f,
                    label: c.display_label.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };
        Ok(found)
    }

    async fn text(&mut self, element: &MockEl) -> Result<String, DriverError> {
        Ok(match element {
            MockEl::Filter(f) => format!("{}\n{}", self.caption(*f), self.current(*f)),
            MockEl::FilterButton(f) => format!(" {} ", self.current(*f)),
            MockEl::OptionLabel { label, .. } => label.clone(),
            _ => String::new(),
        })
    }

    async fn attribute(
        &mut self,
        element: &MockEl,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        Ok(match element {
            MockEl::DatePicker if name == sel::MAX_DATE_ATTR => self.max_date.clone(),
            _ => None,
        })
    }

    async fn outer_html(&mut self, element: &MockEl) -> Result<String, DriverError> {
        match element {
            MockEl::Table => Ok(self.table_html()),
            other => Err(DriverError::Protocol(format!("no markup for {:?}", other))),
        }
    }

    async fn is_visible(&mut self, element: &MockEl) -> Result<bool, DriverError> {
        Ok(match element {
            MockEl::Panel(f) | MockEl::OptionLabel { facet: f, .. } => self.open_panel == Some(*f),
            MockEl::DateFrom | MockEl::DateTo | MockEl::DateApply => self.picker_open,
            MockEl::CookieButton => self.cookie_banner,
            _ => true,
        })
    }

    async fn click(&mut self, element: &MockEl) -> Result<(), DriverError> {
        self.touch();
        match element {
            MockEl::FilterButton(f) => {
                self.open_panel = if self.open_panel == Some(*f) { None } else { Some(*f) };
            }
            MockEl::OptionLabel { facet, label } => {
                if self.open_panel != Some(*facet) {
                    return Err(DriverError::Protocol("element not interactable".into()));
                }
                match facet {
                    Facet::Currency => self.currency = label.clone(),
                    Facet::Settlement => self.settlement = label.clone(),
                }
                self.open_panel = None;
            }
            MockEl::CookieButton => self.cookie_banner = false,
            MockEl::DateButton => self.picker_open = true,
            MockEl::DateApply => {
                if !self.picker_open {
                    return Err(DriverError::Protocol("element not interactable".into()));
                }
                self.applied = Some((self.date_from.clone(), self.date_to.clone()));
                self.picker_open = false;
            }
            _ => {}
        }
        Ok(())
    }

    async fn set_value(&mut self, element: &MockEl, value: &str) -> Result<(), DriverError> {
        self.touch();
        match element {
            MockEl::DateFrom => self.date_from = value.to_string(),
            MockEl::DateTo => self.date_to = value.to_string(),
            other => {
                return Err(DriverError::Protocol(format!("{:?} is not an input", other)));
            }
        }
        Ok(())
    }

    async fn close(self) -> Result<(), DriverError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
