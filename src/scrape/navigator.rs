// src/scrape/navigator.rs
//! Drives the page's custom filter widgets into a requested state.
//!
//! The filters are not native form controls. Selecting a value means opening
//! the dropdown, waiting for its option panel to show, and clicking the label
//! whose text matches. The date picker only takes programmatic input, so the
//! latest date is injected into both bounds by script and then applied.
//!
//! Every operation is idempotent, bounded in time, and reports failure instead
//! of retrying. Retry policy lives with the caller.

use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::{selectors as sel, wait};
use crate::browser::ControllablePage;
use crate::config::Timing;
use crate::schema::{Facet, FilterChoice, CURRENCIES, SETTLEMENTS};

pub struct Navigator<'p, P: ControllablePage> {
    page: &'p mut P,
    timing: Timing,
}

impl<'p, P: ControllablePage> Navigator<'p, P> {
    pub fn new(page: &'p mut P, timing: Timing) -> Self {
        Self { page, timing }
    }

    pub fn page(&mut self) -> &mut P {
        self.page
    }

    /// Accept the cookie banner if it shows up. Absence is not a failure.
    pub async fn dismiss_cookie_banner(&mut self) {
        let button = match wait::visible(
            &mut *self.page,
            sel::COOKIE_ACCEPT,
            self.timing.cookie_wait,
            self.timing.poll,
        )
        .await
        {
            Ok(button) => button,
            Err(_) => {
                debug!("no cookie banner");
                return;
            }
        };
        match self.page.click(&button).await {
            Ok(()) => debug!("cookie banner accepted"),
            Err(e) => debug!(error = %e, "cookie banner click failed; continuing"),
        }
    }

    /// Make the `facet` dropdown show `desired`.
    ///
    /// Returns `true` without touching the page when the dropdown already shows
    /// `desired`, so repeated calls with the same target are free. On failure
    /// the option panel is left closed, so a later call starts from the same
    /// state.
    pub async fn select_filter_value(&mut self, facet: Facet, desired: &str) -> bool {
        let Some(container) = self.find_filter(facet).await else {
            warn!(facet = %facet, "filter control not found");
            return false;
        };
        let button = match self.page.find_within(&container, sel::FILTER_BUTTON).await {
            Ok(mut found) if !found.is_empty() => found.remove(0),
            _ => {
                warn!(facet = %facet, "filter button not found");
                return false;
            }
        };

        match self.page.text(&button).await {
            Ok(current) if current.trim() == desired => {
                debug!(facet = %facet, value = desired, "filter already set");
                return true;
            }
            Ok(current) => {
                debug!(facet = %facet, from = current.trim(), to = desired, "changing filter")
            }
            Err(e) => {
                debug!(facet = %facet, error = %e, "cannot read filter state; selecting anyway")
            }
        }

        // the button toggles; only click when this control's panel is shut
        if !self.panel_open(&container).await {
            if let Err(e) = self.page.click(&button).await {
                warn!(facet = %facet, error = %e, "opening filter failed");
                return false;
            }
        }
        let panel = match wait::visible_within(
            &mut *self.page,
            &container,
            sel::FILTER_PANEL,
            self.timing.wait,
            self.timing.poll,
        )
        .await
        {
            Ok(panel) => panel,
            Err(e) => {
                warn!(facet = %facet, error = %e, "option panel did not appear");
                self.close_panel(facet, &container, &button).await;
                return false;
            }
        };

        let Some(option) = self.find_option(&panel, facet, desired).await else {
            warn!(facet = %facet, value = desired, "option not offered");
            self.close_panel(facet, &container, &button).await;
            return false;
        };
        if let Err(e) = self.page.click(&option).await {
            warn!(facet = %facet, value = desired, error = %e, "selecting option failed");
            self.close_panel(facet, &container, &button).await;
            return false;
        }

        sleep(self.timing.settle).await;
        info!(facet = %facet, value = desired, "filter set");
        true
    }

    /// Set both bounds of the date range to the page's latest available date
    /// and apply it. Returns the date as shown by the page (`dd.mm.yyyy`).
    pub async fn select_latest_date(&mut self) -> Option<String> {
        let picker = match wait::present(
            &mut *self.page,
            sel::DATEPICKER,
            self.timing.wait,
            self.timing.poll,
        )
        .await
        {
            Ok(picker) => picker,
            Err(e) => {
                warn!(error = %e, "date picker not found");
                return None;
            }
        };
        let max_date = match self.page.attribute(&picker, sel::MAX_DATE_ATTR).await {
            Ok(Some(date)) if !date.trim().is_empty() => date.trim().to_string(),
            _ => {
                warn!("page declares no maximum date");
                return None;
            }
        };

        let opener = self.visible(sel::DATEPICKER_BUTTON).await?;
        if let Err(e) = self.page.click(&opener).await {
            warn!(error = %e, "opening date picker failed");
            return None;
        }

        for input in [sel::DATE_TO_INPUT, sel::DATE_FROM_INPUT] {
            let found =
                wait::present(&mut *self.page, input, self.timing.wait, self.timing.poll).await;
            let el = match found {
                Ok(el) => el,
                Err(e) => {
                    warn!(error = %e, "date input missing");
                    return None;
                }
            };
            if let Err(e) = self.page.set_value(&el, &max_date).await {
                warn!(input, error = %e, "setting date failed");
                return None;
            }
        }

        let apply = self.visible(sel::DATEPICKER_APPLY).await?;
        if let Err(e) = self.page.click(&apply).await {
            warn!(error = %e, "applying date range failed");
            return None;
        }

        sleep(self.timing.settle).await;
        info!(date = %max_date, "date range set to latest");
        Some(max_date)
    }

    async fn visible(&mut self, selector: &str) -> Option<P::Element> {
        match wait::visible(&mut *self.page, selector, self.timing.wait, self.timing.poll).await {
            Ok(el) => Some(el),
            Err(e) => {
                warn!(error = %e, "control not available");
                None
            }
        }
    }

    /// Whether the option panel of `container` is currently displayed.
    async fn panel_open(&mut self, container: &P::Element) -> bool {
        let Ok(panels) = self.page.find_within(container, sel::FILTER_PANEL).await else {
            return false;
        };
        for panel in panels {
            if self.page.is_visible(&panel).await.unwrap_or(false) {
                return true;
            }
        }
        false
    }

    async fn close_panel(&mut self, facet: Facet, container: &P::Element, button: &P::Element) {
        if !self.panel_open(container).await {
            return;
        }
        match self.page.click(button).await {
            Ok(()) => debug!(facet = %facet, "option panel closed"),
            Err(e) => debug!(facet = %facet, error = %e, "closing option panel failed"),
        }
    }

    /// The filter container whose caption names `facet`.
    async fn find_filter(&mut self, facet: Facet) -> Option<P::Element> {
        // wait for the filters to be rendered at all
        wait::present(&mut *self.page, sel::FILTER_CONTAINER, self.timing.wait, self.timing.poll)
            .await
            .ok()?;
        let containers = self.page.find_all(sel::FILTER_CONTAINER).await.ok()?;
        for container in containers {
            let Ok(text) = self.page.text(&container).await else {
                continue;
            };
            if facet.captions().iter().any(|c| text.contains(c)) {
                return Some(container);
            }
        }
        None
    }

    /// Option label with text `desired`, falling back to the label bound to
    /// the option's radio input.
    async fn find_option(
        &mut self,
        panel: &P::Element,
        facet: Facet,
        desired: &str,
    ) -> Option<P::Element> {
        if let Ok(labels) = self.page.find_within(panel, sel::FILTER_OPTION_LABEL).await {
            for label in labels {
                if let Ok(text) = self.page.text(&label).await {
                    if text.trim() == desired {
                        return Some(label);
                    }
                }
            }
        }

        let anchor = known_choice(facet, desired)?.dom_anchor_id;
        debug!(facet = %facet, anchor, "no label text matched; trying anchor");
        wait::visible_within(
            &mut *self.page,
            panel,
            &sel::label_for(anchor),
            self.timing.wait,
            self.timing.poll,
        )
        .await
        .ok()
    }
}

fn known_choice(facet: Facet, label: &str) -> Option<&'static FilterChoice> {
    let choices = match facet {
        Facet::Currency => CURRENCIES,
        Facet::Settlement => SETTLEMENTS,
    };
    choices.iter().find(|c| c.display_label == label)
}
