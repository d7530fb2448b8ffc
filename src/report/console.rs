//! Console rendering of the detailed report.

use std::fmt::Write;

use async_trait::async_trait;
use console::style;

use crate::dedup::DeviceRecord;
use crate::error::Result;
use crate::report::text::or_na;
use crate::report::{Report, ReportSink};

/// Prints the per-group listing to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }

    /// Render the listing as it will be printed.
    pub fn render(&self, report: &Report<'_>) -> String {
        let analysis = report.analysis;
        let mut out = String::new();

        if !analysis.has_duplicates() {
            let _ = writeln!(
                out,
                "{} No duplicate devices found based on System MAC Address.",
                style("OK").green().bold()
            );
            return out;
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", style("DUPLICATE DEVICES REPORT").bold());
        let _ = writeln!(out, "{}", style("=".repeat(60)).dim());
        let _ = writeln!(
            out,
            "Found {} groups with duplicate MAC addresses",
            analysis.duplicate_groups()
        );
        let _ = writeln!(out, "Total duplicate devices: {}", analysis.duplicate_devices());
        let _ = writeln!(
            out,
            "Devices that should be removed: {}",
            analysis.devices_to_remove()
        );
        let _ = writeln!(out);

        for decision in &analysis.decisions {
            let _ = writeln!(
                out,
                "{} {}",
                style("MAC Address:").bold(),
                decision.key.to_colon_form()
            );
            let _ = writeln!(out, "{}", style("-".repeat(40)).dim());

            write_device(
                &mut out,
                &style("KEEP:").green().bold().to_string(),
                &decision.keeper,
                None,
            );
            for removal in &decision.removable {
                write_device(
                    &mut out,
                    &style("REMOVE:").red().bold().to_string(),
                    &removal.record,
                    Some(&removal.reason),
                );
            }
            let _ = writeln!(out);
        }

        out
    }
}

fn write_device(out: &mut String, label: &str, record: &DeviceRecord, reason: Option<&str>) {
    let _ = writeln!(out, "   {} {} ({})", label, record.display_name, record.display_id());
    let _ = writeln!(out, "      Last Report: {}", record.last_report_display());
    let _ = writeln!(
        out,
        "      Serial: {}",
        record.serial_number.as_deref().unwrap_or("Unknown")
    );
    let _ = writeln!(
        out,
        "      OS: {}",
        record.os_version.as_deref().unwrap_or("Unknown")
    );
    let _ = writeln!(out, "      URL: {}", or_na(&record.detail_url));
    if let Some(reason) = reason {
        let _ = writeln!(out, "      Reason: {}", reason);
    }
    let _ = writeln!(out);
}

#[async_trait]
impl ReportSink for ConsoleSink {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn deliver(&self, report: &Report<'_>) -> Result<()> {
        print!("{}", self.render(report));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::Analysis;
    use crate::report::fixtures;

    #[test]
    fn test_render_groups() {
        console::set_colors_enabled(false);
        let analysis = fixtures::analysis();
        let text = ConsoleSink::new().render(&fixtures::report(&analysis));

        assert!(text.contains("Found 2 groups with duplicate MAC addresses"));
        assert!(text.contains("Devices that should be removed: 2"));
        assert!(text.contains("MAC Address: 00:00:00:00:00:01"));
        assert!(text.contains("KEEP: Lab, Mac (uid-a)"));
        assert!(text.contains("REMOVE: Lab Mac (uid-b)"));
        assert!(text.contains("Reason: older report date than keeper (keeper last reported unknown)"));
        assert!(text.contains("Serial: C02NEW"));
    }

    #[test]
    fn test_render_no_duplicates() {
        console::set_colors_enabled(false);
        let analysis = Analysis::default();
        let text = ConsoleSink::new().render(&fixtures::report(&analysis));
        assert!(text.contains("No duplicate devices found"));
    }
}
