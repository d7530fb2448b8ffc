//! Device record model.

use chrono::{DateTime, Utc};

/// Display name used when the source has none.
pub const UNKNOWN_NAME: &str = "Unknown";

/// A single device as reported by the monitoring service.
///
/// Records are immutable once built; the engine only reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    /// Opaque primary key from the source.
    pub identifier: String,
    /// Human-facing ID shown in the dashboard, if any.
    pub client_id: Option<String>,
    pub display_name: String,
    /// MAC address exactly as received. May be empty.
    pub hardware_id: String,
    pub last_report: Option<DateTime<Utc>>,
    pub serial_number: Option<String>,
    pub os_version: Option<String>,
    pub group: Option<String>,
    pub detail_url: String,
}

impl DeviceRecord {
    /// Create a record with only the fields the engine needs.
    pub fn new(
        identifier: impl Into<String>,
        display_name: impl Into<String>,
        hardware_id: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            client_id: None,
            display_name: display_name.into(),
            hardware_id: hardware_id.into(),
            last_report: None,
            serial_number: None,
            os_version: None,
            group: None,
            detail_url: String::new(),
        }
    }

    pub fn with_last_report(mut self, last_report: DateTime<Utc>) -> Self {
        self.last_report = Some(last_report);
        self
    }

    pub fn with_detail_url(mut self, url: impl Into<String>) -> Self {
        self.detail_url = url.into();
        self
    }

    /// Client ID if present, otherwise the primary key.
    pub fn display_id(&self) -> &str {
        self.client_id.as_deref().unwrap_or(&self.identifier)
    }

    /// Last report formatted for humans, or "Unknown".
    pub fn last_report_display(&self) -> String {
        format_timestamp(self.last_report)
    }
}

/// Format an optional timestamp as ISO 8601 (second precision), or "Unknown".
pub fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(ts) => ts.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        None => UNKNOWN_NAME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_display_id_prefers_client_id() {
        let mut record = DeviceRecord::new("uid-1", "Mac mini", "aa:bb:cc:dd:ee:ff");
        assert_eq!(record.display_id(), "uid-1");

        record.client_id = Some("C-42".into());
        assert_eq!(record.display_id(), "C-42");
    }

    #[test]
    fn test_last_report_display() {
        let record = DeviceRecord::new("uid-1", "Mac mini", "aabbccddeeff");
        assert_eq!(record.last_report_display(), "Unknown");

        let ts = Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap();
        let record = record.with_last_report(ts);
        assert_eq!(record.last_report_display(), "2024-03-15T10:30:00Z");
    }
}
