//! HTML report body.

use std::fmt::Write;

use crate::dedup::DeviceRecord;
use crate::report::text::or_na;
use crate::report::{Report, REPORT_TITLE};

const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; margin: 20px; }
    .header { background-color: #f8f9fa; padding: 20px; border-radius: 5px; margin-bottom: 20px; }
    .summary { background-color: #e9ecef; padding: 15px; border-radius: 5px; margin-bottom: 20px; }
    .group { margin-bottom: 30px; border: 1px solid #dee2e6; border-radius: 5px; padding: 15px; }
    .group-header { background-color: #007bff; color: white; padding: 10px; margin: -15px -15px 15px -15px; border-radius: 4px 4px 0 0; }
    .device { margin: 10px 0; padding: 10px; border-radius: 3px; }
    .keep { background-color: #d4edda; border-left: 4px solid #28a745; }
    .remove { background-color: #f8d7da; border-left: 4px solid #dc3545; }
    .device-info { margin: 5px 0; }
    .url { color: #007bff; text-decoration: none; }
"#;

const NEXT_STEPS: &str = r#"<div class="summary">
<h3>Next Steps</h3>
<ol>
<li>Review the devices marked as <strong style="color: #dc3545;">REMOVE</strong> above</li>
<li>Follow the "Remove in Watchman" links to navigate to each device</li>
<li>Use Watchman's web interface to manually remove the older duplicates</li>
<li>Keep devices marked as <strong style="color: #28a745;">KEEP</strong> (most recent activity)</li>
</ol>
<p><em>Note: The Watchman API does not support automatic device removal, so manual removal through the web interface is required.</em></p>
</div>
"#;

/// Escape text for HTML element content and attribute values.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Clone, Copy)]
enum Verdict<'a> {
    Keep,
    Remove(&'a str),
}

fn write_device(out: &mut String, record: &DeviceRecord, verdict: Verdict<'_>) {
    let (class, label, link_text) = match verdict {
        Verdict::Keep => ("keep", "KEEP", "View in Watchman"),
        Verdict::Remove(_) => ("remove", "REMOVE", "Remove in Watchman"),
    };

    let _ = writeln!(out, r#"<div class="device {}">"#, class);
    let _ = writeln!(
        out,
        "<strong>{}:</strong> {} ({})",
        label,
        escape_html(&record.display_name),
        escape_html(record.display_id())
    );
    for (name, value) in [
        ("Last Report", record.last_report_display()),
        (
            "Serial",
            record.serial_number.clone().unwrap_or_else(|| "Unknown".into()),
        ),
        (
            "OS",
            record.os_version.clone().unwrap_or_else(|| "Unknown".into()),
        ),
    ] {
        let _ = writeln!(
            out,
            r#"<div class="device-info"><strong>{}:</strong> {}</div>"#,
            name,
            escape_html(&value)
        );
    }
    if let Verdict::Remove(reason) = verdict {
        let _ = writeln!(
            out,
            r#"<div class="device-info"><strong>Reason:</strong> {}</div>"#,
            escape_html(reason)
        );
    }
    if record.detail_url.is_empty() {
        out.push_str("<div class=\"device-info\">URL: N/A</div>\n");
    } else {
        let _ = writeln!(
            out,
            r#"<div class="device-info"><a href="{}" class="url">{} &rarr;</a></div>"#,
            escape_html(&record.detail_url),
            link_text
        );
    }
    out.push_str("</div>\n");
}

/// Render the HTML email body.
pub fn render_html(report: &Report<'_>) -> String {
    let analysis = report.analysis;
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n");

    let _ = writeln!(out, r#"<div class="header">"#);
    let _ = writeln!(out, "<h1>{}</h1>", REPORT_TITLE);
    let _ = writeln!(
        out,
        "<p><strong>Generated:</strong> {}</p>",
        report.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(
        out,
        "<p><strong>Subdomain:</strong> {}</p>",
        escape_html(or_na(report.subdomain))
    );
    out.push_str("</div>\n");

    let _ = writeln!(out, r#"<div class="summary">"#);
    out.push_str("<h2>Summary</h2>\n<ul>\n");
    for (label, count) in [
        ("Devices Analyzed", analysis.records_analyzed),
        ("Duplicate Groups Found", analysis.duplicate_groups()),
        ("Total Duplicate Devices", analysis.duplicate_devices()),
        ("Devices to Keep", analysis.devices_to_keep()),
        ("Devices to Remove", analysis.devices_to_remove()),
    ] {
        let _ = writeln!(out, "<li><strong>{}:</strong> {}</li>", label, count);
    }
    if !analysis.rejected.is_empty() {
        let _ = writeln!(
            out,
            "<li><strong>Skipped (no usable MAC address):</strong> {}</li>",
            analysis.rejected.len()
        );
    }
    out.push_str("</ul>\n</div>\n");

    if analysis.has_duplicates() {
        out.push_str("<h2>Detailed Groups</h2>\n");
        for decision in &analysis.decisions {
            let _ = writeln!(out, r#"<div class="group">"#);
            let _ = writeln!(
                out,
                r#"<div class="group-header"><strong>MAC Address:</strong> {} ({} devices)</div>"#,
                decision.key.to_colon_form(),
                decision.group_size()
            );
            write_device(&mut out, &decision.keeper, Verdict::Keep);
            for removal in &decision.removable {
                write_device(&mut out, &removal.record, Verdict::Remove(&removal.reason));
            }
            out.push_str("</div>\n");
        }
    }

    out.push_str(NEXT_STEPS);
    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_render_html() {
        let analysis = fixtures::analysis();
        let html = render_html(&fixtures::report(&analysis));

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<li><strong>Duplicate Groups Found:</strong> 2</li>"));
        assert!(html.contains("<li><strong>Skipped (no usable MAC address):</strong> 1</li>"));
        assert!(html.contains("aa:bb:cc:dd:ee:ff (2 devices)"));
        assert!(html.contains("Front Desk &lt;iMac&gt; (C-100)"));
        assert!(!html.contains("Front Desk <iMac>"));
        assert!(html.contains(
            r#"<a href="https://acme.monitoringclient.com/computers/uid-old" class="url">Remove in Watchman &rarr;</a>"#
        ));
        assert_eq!(html.matches(r#"class="device keep""#).count(), 2);
        assert_eq!(html.matches(r#"class="device remove""#).count(), 2);
        assert!(html.trim_end().ends_with("</html>"));
    }
}
