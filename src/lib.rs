//! Watchman Dedup - duplicate device reporting for Watchman Monitoring
//!
//! This library finds computers that share a System MAC Address and decides
//! which record to keep and which to remove manually.
//!
//! # Features
//!
//! - MAC normalization (case and separators ignored)
//! - Keeper selection by most recent report, with a deterministic tie-break
//! - Paginated, rate-limited Watchman API client
//! - Console, CSV and email (HTML + text) reports
//!
//! Nothing is ever deleted remotely.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use watchman_dedup::{analyze, Config, DeviceSource, WatchmanApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("watchman.toml"))?;
//!     let api = WatchmanApi::new(&config.watchman)?;
//!
//!     let records = api.fetch_all().await?;
//!     for decision in analyze(&records).decisions {
//!         println!("keep {} ({} to remove)", decision.keeper.display_name, decision.removable.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod error;
pub mod output;
pub mod report;

// Re-exports for convenience
pub use api::{DeviceSource, WatchmanApi};
pub use config::Config;
pub use dedup::{analyze, run, Analysis, Decision, DeviceRecord, HardwareKey, Removal};
pub use error::{Error, Result};
pub use report::{Report, ReportSink};
