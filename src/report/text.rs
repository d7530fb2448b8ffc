//! Plain text report body.

use std::fmt::Write;

use crate::dedup::DeviceRecord;
use crate::report::{Report, REPORT_TITLE};

const NEXT_STEPS: &str = "\
NEXT STEPS
----------
1. Review the devices marked as 'REMOVE' above
2. Open the URLs to navigate to each device in Watchman
3. Use Watchman's web interface to manually remove the older duplicates
4. Keep devices marked as 'KEEP' (most recent activity)

Note: The Watchman API does not support automatic device removal,
so manual removal through the web interface is required.
";

fn write_device(out: &mut String, label: &str, record: &DeviceRecord, reason: Option<&str>) {
    let _ = writeln!(out, "{}: {} ({})", label, record.display_name, record.display_id());
    let _ = writeln!(out, "   Last Report: {}", record.last_report_display());
    let _ = writeln!(
        out,
        "   Serial: {}",
        record.serial_number.as_deref().unwrap_or("Unknown")
    );
    let _ = writeln!(
        out,
        "   OS: {}",
        record.os_version.as_deref().unwrap_or("Unknown")
    );
    let _ = writeln!(out, "   URL: {}", or_na(&record.detail_url));
    if let Some(reason) = reason {
        let _ = writeln!(out, "   Reason: {}", reason);
    }
    out.push('\n');
}

pub(crate) fn or_na(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}

/// Render the plain text email body.
pub fn render_text(report: &Report<'_>) -> String {
    let analysis = report.analysis;
    let mut out = String::new();
    let title = REPORT_TITLE.to_uppercase();

    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(title.len()));
    out.push('\n');
    let _ = writeln!(
        out,
        "Generated: {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out, "Subdomain: {}", or_na(report.subdomain));
    out.push('\n');

    out.push_str("SUMMARY\n-------\n");
    let _ = writeln!(out, "Devices Analyzed: {}", analysis.records_analyzed);
    let _ = writeln!(out, "Duplicate Groups Found: {}", analysis.duplicate_groups());
    let _ = writeln!(out, "Total Duplicate Devices: {}", analysis.duplicate_devices());
    let _ = writeln!(out, "Devices to Keep: {}", analysis.devices_to_keep());
    let _ = writeln!(out, "Devices to Remove: {}", analysis.devices_to_remove());
    if !analysis.rejected.is_empty() {
        let _ = writeln!(
            out,
            "Skipped (no usable MAC address): {}",
            analysis.rejected.len()
        );
    }
    out.push('\n');

    if analysis.has_duplicates() {
        out.push_str("DETAILED GROUPS\n---------------\n\n");

        for decision in &analysis.decisions {
            let _ = writeln!(
                out,
                "MAC Address: {} ({} devices)",
                decision.key.to_colon_form(),
                decision.group_size()
            );
            let _ = writeln!(out, "{}", "-".repeat(50));

            write_device(&mut out, "KEEP", &decision.keeper, None);
            for removal in &decision.removable {
                write_device(&mut out, "REMOVE", &removal.record, Some(&removal.reason));
            }
            out.push('\n');
        }
    }

    out.push_str(NEXT_STEPS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures;

    #[test]
    fn test_render_text() {
        let analysis = fixtures::analysis();
        let text = render_text(&fixtures::report(&analysis));

        assert!(text.starts_with("WATCHMAN DUPLICATE DEVICES REPORT\n"));
        assert!(text.contains("Generated: 2024-04-01 09:05:00"));
        assert!(text.contains("Subdomain: acme"));
        assert!(text.contains("Duplicate Groups Found: 2"));
        assert!(text.contains("Devices to Remove: 2"));
        assert!(text.contains("Skipped (no usable MAC address): 1"));
        assert!(text.contains("MAC Address: aa:bb:cc:dd:ee:ff (2 devices)"));
        assert!(text.contains("KEEP: Front Desk <iMac> (C-100)"));
        assert!(text.contains("REMOVE: Front Desk iMac (C-042)"));
        assert!(text.contains(
            "Reason: older report date than keeper (keeper last reported 2024-03-15T10:30:00Z)"
        ));
        assert!(text.contains("URL: N/A"));
        assert!(text.ends_with(NEXT_STEPS));
    }
}
