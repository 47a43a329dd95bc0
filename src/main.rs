use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::Parser;
use russd::{
    browser::chrome::ChromeSession,
    collect::collect_and_close,
    config::Cli,
    export::export_all,
    schema,
};
use tokio::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,russd=info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cli = Cli::parse();
    let started = Instant::now();
    info!(currency = %cli.currency, out_dir = %cli.out_dir.display(), "startup");

    let currency = schema::currency(&cli.currency)
        .with_context(|| format!("unknown currency {:?}", cli.currency))?;
    if currency.display_label != "USD" {
        warn!(
            currency = currency.display_label,
            "column codes and descriptions are defined for USD"
        );
    }

    // ─── 2) launch browser ───────────────────────────────────────────
    let session = match ChromeSession::launch(&cli.browser_options()).await {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "cannot start browser");
            return Err(e.into());
        }
    };

    // ─── 3) collect; the session is released inside ──────────────────
    let collection = collect_and_close(session, currency, cli.timing(), cli.attempts).await;
    collection.log_summary();

    // ─── 4) export ───────────────────────────────────────────────────
    if collection.trade_date().is_none() {
        error!(elapsed = ?started.elapsed(), "no trade date found; no files written");
        bail!("no trade date could be determined");
    }

    let run_date = Local::now().date_naive();
    match export_all(collection.row, &cli.out_dir, run_date)? {
        Some(artifacts) => info!(
            data = %artifacts.data.display(),
            metadata = %artifacts.metadata.display(),
            archive = %artifacts.archive.display(),
            elapsed = ?started.elapsed(),
            "all done"
        ),
        None => warn!("nothing exported"),
    }
    Ok(())
}
