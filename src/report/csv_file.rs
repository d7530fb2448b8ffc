//! CSV report export.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;

use crate::dedup::{DeviceRecord, KEEP_REASON};
use crate::error::{Error, Result};
use crate::report::{Report, ReportSink};

/// One CSV line. Field order is the column order.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Status")]
    status: &'static str,
    #[serde(rename = "MAC_Address")]
    mac_address: String,
    #[serde(rename = "Computer_Name")]
    computer_name: &'a str,
    #[serde(rename = "Client_ID")]
    client_id: &'a str,
    #[serde(rename = "UID")]
    uid: &'a str,
    #[serde(rename = "Last_Report")]
    last_report: String,
    #[serde(rename = "Serial_Number")]
    serial_number: &'a str,
    #[serde(rename = "OS_Version")]
    os_version: &'a str,
    #[serde(rename = "Group")]
    group: &'a str,
    #[serde(rename = "Computer_URL")]
    computer_url: &'a str,
    #[serde(rename = "Reason")]
    reason: &'a str,
}

impl<'a> CsvRow<'a> {
    fn new(
        status: &'static str,
        mac_address: String,
        record: &'a DeviceRecord,
        reason: &'a str,
    ) -> Self {
        Self {
            status,
            mac_address,
            computer_name: &record.display_name,
            client_id: record.client_id.as_deref().unwrap_or(""),
            uid: &record.identifier,
            last_report: record.last_report_display(),
            serial_number: record.serial_number.as_deref().unwrap_or(""),
            os_version: record.os_version.as_deref().unwrap_or(""),
            group: record.group.as_deref().unwrap_or(""),
            computer_url: &record.detail_url,
            reason,
        }
    }
}

/// Render the report as CSV bytes: per group the keeper, then the removals.
pub fn render_csv(report: &Report<'_>) -> Result<Vec<u8>> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());

    for decision in &report.analysis.decisions {
        let mac = decision.key.to_colon_form();
        writer.serialize(CsvRow::new("KEEP", mac.clone(), &decision.keeper, KEEP_REASON))?;
        for removal in &decision.removable {
            writer.serialize(CsvRow::new(
                "REMOVE",
                mac.clone(),
                &removal.record,
                &removal.reason,
            ))?;
        }
    }

    // Header comes from the first serialized row; write it by hand when empty.
    if report.analysis.decisions.is_empty() {
        writer.write_record(COLUMNS)?;
    }

    writer
        .into_inner()
        .map_err(|e| Error::Export(format!("Failed to flush CSV: {}", e)))
}

const COLUMNS: [&str; 11] = [
    "Status",
    "MAC_Address",
    "Computer_Name",
    "Client_ID",
    "UID",
    "Last_Report",
    "Serial_Number",
    "OS_Version",
    "Group",
    "Computer_URL",
    "Reason",
];

/// Writes the CSV report to a file.
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl ReportSink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn deliver(&self, report: &Report<'_>) -> Result<()> {
        let bytes = render_csv(report)?;
        tokio::fs::write(&self.path, bytes).await.map_err(|e| {
            Error::Export(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        tracing::info!("Report exported to {}", self.path.display());
        Ok(())
    }
}
