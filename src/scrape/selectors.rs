// src/scrape/selectors.rs
//! CSS selectors of the swap statistics pages on cbr.ru.

/// One per filter dropdown; its text includes the facet caption.
pub const FILTER_CONTAINER: &str = "div.filter";
/// Button of a filter; its text is the active option's label.
pub const FILTER_BUTTON: &str = "button.filter_title";
/// Option panel inside a filter container; displayed only while open.
pub const FILTER_PANEL: &str = "div.filter_content";
pub const FILTER_OPTION_LABEL: &str = "label";

pub const DATEPICKER: &str = "div.datepicker-filter";
pub const MAX_DATE_ATTR: &str = "data-max-date";
pub const DATEPICKER_BUTTON: &str = "button.datepicker-filter_button";
pub const DATE_FROM_INPUT: &str = "input.datepicker-filter_input-from";
pub const DATE_TO_INPUT: &str = "input.datepicker-filter_input-to";
pub const DATEPICKER_APPLY: &str = "button.datepicker-filter_apply-btn";

pub const DATA_TABLE: &str = "table.data";
pub const COOKIE_ACCEPT: &str = "button.js-cookie-accept";

/// Label bound to the radio input with id `anchor`.
pub fn label_for(anchor: &str) -> String {
    format!("label[for='{}']", anchor)
}
