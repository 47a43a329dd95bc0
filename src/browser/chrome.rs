// src/browser/chrome.rs

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::{path::PathBuf, time::Duration};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use super::ControllablePage;
use crate::error::{DriverError, ScrapeError};

const VISIBLE_FN: &str = r#"function() {
    const style = window.getComputedStyle(this);
    const rect = this.getBoundingClientRect();
    return style.display !== 'none'
        && style.visibility !== 'hidden'
        && !this.disabled
        && rect.width > 0
        && rect.height > 0;
}"#;

impl From<CdpError> for DriverError {
    fn from(err: CdpError) -> Self {
        DriverError::Protocol(err.to_string())
    }
}

/// Launch settings for the Chrome session.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub headless: bool,
    /// Executable to launch; auto-detected when `None`.
    pub chrome_path: Option<PathBuf>,
    pub window: (u32, u32),
    pub request_timeout: Duration,
    /// Pause between scrolling an element into view and clicking it.
    pub click_pause: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_path: None,
            window: (1920, 1080),
            request_timeout: Duration::from_secs(30),
            click_pause: Duration::from_millis(500),
        }
    }
}

/// One Chrome process with a single tab, driven over CDP.
///
/// Call [`ControllablePage::close`] to shut the browser down cleanly. If the
/// session is dropped instead (early return, panic), the CDP handler task is
/// aborted and chromiumoxide kills the child process.
pub struct ChromeSession {
    browser: Option<Browser>,
    handler: Option<JoinHandle<()>>,
    page: Page,
    click_pause: Duration,
}

impl ChromeSession {
    pub async fn launch(opts: &BrowserOptions) -> Result<Self, ScrapeError> {
        let mut builder = BrowserConfig::builder()
            .window_size(opts.window.0, opts.window.1)
            .arg("--lang=en-US")
            .request_timeout(opts.request_timeout);
        if !opts.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &opts.chrome_path {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(ScrapeError::Setup)?;

        let (mut browser, mut events) = Browser::launch(config)
            .await
            .map_err(|e| ScrapeError::Setup(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "cdp handler event");
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                handler.abort();
                return Err(ScrapeError::Setup(format!("opening tab: {}", e)));
            }
        };

        info!(headless = opts.headless, "browser started");
        Ok(Self {
            browser: Some(browser),
            handler: Some(handler),
            page,
            click_pause: opts.click_pause,
        })
    }
}

#[async_trait]
impl ControllablePage for ChromeSession {
    type Element = Element;

    async fn goto(&mut self, url: &str) -> Result<(), DriverError> {
        let url = Url::parse(url).map_err(|e| DriverError::Protocol(format!("{}: {}", url, e)))?;
        self.page.goto(url.as_str()).await?;
        Ok(())
    }

    async fn find_all(&mut self, selector: &str) -> Result<Vec<Element>, DriverError> {
        Ok(self.page.find_elements(selector).await?)
    }

    async fn find_within(
        &mut self,
        scope: &Element,
        selector: &str,
    ) -> Result<Vec<Element>, DriverError> {
        Ok(scope.find_elements(selector).await?)
    }

    async fn text(&mut self, element: &Element) -> Result<String, DriverError> {
        Ok(element.inner_text().await?.unwrap_or_default())
    }

    async fn attribute(
        &mut self,
        element: &Element,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        Ok(element.attribute(name).await?)
    }

    async fn outer_html(&mut self, element: &Element) -> Result<String, DriverError> {
        Ok(element.outer_html().await?.unwrap_or_default())
    }

    async fn is_visible(&mut self, element: &Element) -> Result<bool, DriverError> {
        let ret = element.call_js_fn(VISIBLE_FN, false).await?;
        Ok(ret
            .result
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    async fn click(&mut self, element: &Element) -> Result<(), DriverError> {
        element.scroll_into_view().await?;
        tokio::time::sleep(self.click_pause).await;
        element.click().await?;
        Ok(())
    }

    async fn set_value(&mut self, element: &Element, value: &str) -> Result<(), DriverError> {
        let literal =
            serde_json::to_string(value).map_err(|e| DriverError::Protocol(e.to_string()))?;
        let js = format!(
            "function() {{ this.value = {}; \
             this.dispatchEvent(new Event('input', {{ bubbles: true }})); \
             this.dispatchEvent(new Event('change', {{ bubbles: true }})); }}",
            literal
        );
        element.call_js_fn(js, false).await?;
        Ok(())
    }

    async fn close(mut self) -> Result<(), DriverError> {
        let mut browser = self.browser.take().ok_or(DriverError::Closed)?;
        let closed = browser.close().await;
        if let Err(e) = browser.wait().await {
            warn!(error = %e, "waiting for browser exit");
        }
        if let Some(handler) = self.handler.take() {
            let _ = handler.await;
        }
        closed?;
        info!("browser closed");
        Ok(())
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
        if self.browser.is_some() {
            warn!("browser session dropped without close");
        }
    }
}
