// src/config.rs

use clap::Parser;
use std::{path::PathBuf, time::Duration};

use crate::browser::chrome::BrowserOptions;

/// Bounded-wait and settle intervals used while driving the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Upper bound for any single wait on the page.
    pub wait: Duration,
    /// Delay between two polls of a bounded wait.
    pub poll: Duration,
    /// Pause after a filter change so the table can re-render.
    pub settle: Duration,
    /// The cookie banner gets a shorter budget; it is usually absent.
    pub cookie_wait: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            wait: Duration::from_secs(15),
            poll: Duration::from_millis(250),
            settle: Duration::from_secs(2),
            cookie_wait: Duration::from_secs(5),
        }
    }
}

impl Timing {
    /// No waiting at all: every bounded wait checks once.
    pub fn immediate() -> Self {
        Self {
            wait: Duration::ZERO,
            poll: Duration::ZERO,
            settle: Duration::ZERO,
            cookie_wait: Duration::ZERO,
        }
    }
}

/// Collect the Bank of Russia FX swap statistics for the latest trade date.
#[derive(Debug, Parser)]
#[command(name = "russd", version, about)]
pub struct Cli {
    /// Currency to collect (USD, EUR or CNY).
    #[arg(long, env = "RUSSD_CURRENCY", default_value = "USD")]
    pub currency: String,

    /// Directory receiving the workbooks and the archive.
    #[arg(long, env = "RUSSD_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Show the browser window instead of running headless.
    #[arg(long, env = "RUSSD_HEADED")]
    pub headed: bool,

    /// Chrome/Chromium executable; auto-detected when omitted.
    #[arg(long, env = "RUSSD_CHROME")]
    pub chrome: Option<PathBuf>,

    /// Wait budget per page interaction, in seconds.
    #[arg(long, env = "RUSSD_WAIT_SECS", default_value_t = 15)]
    pub wait_secs: u64,

    /// Pause after each filter change, in milliseconds.
    #[arg(long, env = "RUSSD_SETTLE_MS", default_value_t = 2000)]
    pub settle_ms: u64,

    /// Attempts per navigation step before a source or settlement is given up.
    #[arg(long, env = "RUSSD_ATTEMPTS", default_value_t = 2)]
    pub attempts: u32,
}

impl Cli {
    pub fn timing(&self) -> Timing {
        Timing {
            wait: Duration::from_secs(self.wait_secs),
            settle: Duration::from_millis(self.settle_ms),
            ..Timing::default()
        }
    }

    pub fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            headless: !self.headed,
            chrome_path: self.chrome.clone(),
            request_timeout: Duration::from_secs(self.wait_secs.max(30)),
            ..BrowserOptions::default()
        }
    }
}
