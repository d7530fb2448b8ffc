//! Report rendering and delivery.
//!
//! Every sink receives the same read-only [`Report`]:
//! - `ConsoleSink` prints the detailed group listing
//! - `CsvSink` writes the CSV file
//! - `EmailSink` sends HTML + text with the CSV attached

pub mod console;
pub mod csv_file;
pub mod email;
pub mod html;
pub mod text;

use async_trait::async_trait;
use chrono::{DateTime, Local};

use crate::dedup::Analysis;
use crate::error::Result;

pub use self::console::ConsoleSink;
pub use self::csv_file::{render_csv, CsvSink};
pub use self::email::{build_message, EmailSink};
pub use self::html::render_html;
pub use self::text::render_text;

/// Title used in every rendered report.
pub const REPORT_TITLE: &str = "Watchman Duplicate Devices Report";

/// Analysis plus the context needed to render it.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    pub analysis: &'a Analysis,
    pub subdomain: &'a str,
    pub generated_at: DateTime<Local>,
}

impl<'a> Report<'a> {
    pub fn new(analysis: &'a Analysis, subdomain: &'a str) -> Self {
        Self {
            analysis,
            subdomain,
            generated_at: Local::now(),
        }
    }
}

/// A consumer of finished reports. Sinks never modify the decisions.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Short name for log messages.
    fn name(&self) -> &'static str;

    async fn deliver(&self, report: &Report<'_>) -> Result<()>;
}

/// Sinks in delivery order: console, then CSV, then email.
///
/// The CSV file is written before the email goes out.
pub fn ordered_sinks(
    console: Option<ConsoleSink>,
    csv: Option<CsvSink>,
    email: Option<EmailSink>,
) -> Vec<Box<dyn ReportSink>> {
    let mut sinks: Vec<Box<dyn ReportSink>> = Vec::new();
    if let Some(console) = console {
        sinks.push(Box::new(console));
    }
    if let Some(csv) = csv {
        sinks.push(Box::new(csv));
    }
    if let Some(email) = email {
        sinks.push(Box::new(email));
    }
    sinks
}

/// Deliver `report` to every sink in order.
///
/// A failing sink does not stop the ones after it. The first failure is
/// returned once all sinks have run.
pub async fn deliver_all(sinks: &[Box<dyn ReportSink>], report: &Report<'_>) -> Result<()> {
    let mut first_error = None;

    for sink in sinks {
        match sink.deliver(report).await {
            Ok(()) => tracing::debug!("Delivered report via {}", sink.name()),
            Err(e) => {
                tracing::warn!("{} delivery failed: {}", sink.name(), e);
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
