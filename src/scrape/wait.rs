// src/scrape/wait.rs
//! Bounded polling on the page. A wait either yields an element or fails with
//! `DriverError::Timeout` once its budget is spent; it never blocks longer.

use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::trace;

use crate::browser::{ControllablePage, DriverError};

/// Poll until `selector` matches something; returns the first match.
pub async fn present<P: ControllablePage>(
    page: &mut P,
    selector: &str,
    budget: Duration,
    poll: Duration,
) -> Result<P::Element, DriverError> {
    poll_until(page, None, selector, budget, poll, false).await
}

/// Poll until an element matching `selector` is displayed and interactive.
pub async fn visible<P: ControllablePage>(
    page: &mut P,
    selector: &str,
    budget: Duration,
    poll: Duration,
) -> Result<P::Element, DriverError> {
    poll_until(page, None, selector, budget, poll, true).await
}

/// Like [`visible`], restricted to descendants of `scope`.
pub async fn visible_within<P: ControllablePage>(
    page: &mut P,
    scope: &P::Element,
    selector: &str,
    budget: Duration,
    poll: Duration,
) -> Result<P::Element, DriverError> {
    poll_until(page, Some(scope), selector, budget, poll, true).await
}

async fn poll_until<P: ControllablePage>(
    page: &mut P,
    scope: Option<&P::Element>,
    selector: &str,
    budget: Duration,
    poll: Duration,
    need_visible: bool,
) -> Result<P::Element, DriverError> {
    let started = Instant::now();
    loop {
        let found = match scope {
            Some(scope) => page.find_within(scope, selector).await,
            None => page.find_all(selector).await,
        };
        match found {
            Ok(found) => {
                for el in found {
                    // stale handles read as not visible; the next poll retries
                    if !need_visible || page.is_visible(&el).await.unwrap_or(false) {
                        return Ok(el);
                    }
                }
            }
            Err(e) => trace!(selector, error = %e, "lookup failed; polling again"),
        }

        if started.elapsed() >= budget {
            return Err(DriverError::Timeout {
                selector: selector.to_string(),
                waited: started.elapsed(),
            });
        }
        sleep(poll).await;
    }
}
