pub mod browser;
pub mod collect;
pub mod config;
pub mod error;
pub mod export;
pub mod process;
pub mod schema;
pub mod scrape;
