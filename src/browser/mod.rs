//! The "controllable page" capability the scraper drives.
//!
//! Navigation and extraction only ever talk to [`ControllablePage`]; the real
//! browser lives in [`chrome`], and tests substitute an in-memory page.

pub mod chrome;
#[cfg(test)]
pub mod mock;

use async_trait::async_trait;

pub use crate::error::DriverError;

/// Browser primitives needed to drive one page.
///
/// Elements are handles returned by the lookups; they may go stale after the
/// page re-renders, in which case the primitives fail with a `DriverError`.
#[async_trait]
pub trait ControllablePage: Send {
    type Element: Send + Sync;

    async fn goto(&mut self, url: &str) -> Result<(), DriverError>;

    /// Every element of the document matching a CSS selector, in DOM order.
    async fn find_all(&mut self, selector: &str) -> Result<Vec<Self::Element>, DriverError>;

    /// Descendants of `scope` matching a CSS selector.
    async fn find_within(
        &mut self,
        scope: &Self::Element,
        selector: &str,
    ) -> Result<Vec<Self::Element>, DriverError>;

    /// Rendered text of the element.
    async fn text(&mut self, element: &Self::Element) -> Result<String, DriverError>;

    async fn attribute(
        &mut self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, DriverError>;

    async fn outer_html(&mut self, element: &Self::Element) -> Result<String, DriverError>;

    /// Displayed and interactive.
    async fn is_visible(&mut self, element: &Self::Element) -> Result<bool, DriverError>;

    async fn click(&mut self, element: &Self::Element) -> Result<(), DriverError>;

    /// Overwrite an input's value by script, bypassing any widget UI.
    async fn set_value(&mut self, element: &Self::Element, value: &str)
        -> Result<(), DriverError>;

    /// Release the underlying browser.
    async fn close(self) -> Result<(), DriverError>;
}
