//! API response type definitions.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::dedup::{DeviceRecord, UNKNOWN_NAME};

/// Computer entry from the `/computers` endpoint.
///
/// Only the fields the report needs are declared; the rest are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Computer {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub client_id: Option<Value>,
    #[serde(default)]
    pub computer_name: Option<String>,
    #[serde(default)]
    pub system_mac_address: Option<String>,
    /// ISO string, epoch number, or null depending on account age.
    #[serde(default)]
    pub last_report: Option<Value>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub os_version: Option<String>,
    #[serde(default)]
    pub group: Option<Value>,
    #[serde(default)]
    pub computer_url: Option<String>,
}

impl Computer {
    /// Parsed `last_report`, if any.
    pub fn last_report(&self) -> Option<DateTime<Utc>> {
        self.last_report.as_ref().and_then(parse_last_report)
    }
}

impl From<Computer> for DeviceRecord {
    fn from(computer: Computer) -> Self {
        let last_report = computer.last_report();
        let client_id = computer.client_id.as_ref().and_then(value_to_string);

        DeviceRecord {
            identifier: computer
                .uid
                .or_else(|| client_id.clone())
                .unwrap_or_default(),
            client_id,
            display_name: computer
                .computer_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            hardware_id: computer.system_mac_address.unwrap_or_default(),
            last_report,
            serial_number: computer.serial_number,
            os_version: computer.os_version,
            group: computer.group.as_ref().and_then(value_to_string),
            detail_url: computer.computer_url.unwrap_or_default(),
        }
    }
}

/// Render scalar JSON values (ids and group names come as either) as text.
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a `last_report` value into a UTC timestamp.
///
/// Unparseable values are logged and treated as absent.
pub fn parse_last_report(value: &Value) -> Option<DateTime<Utc>> {
    let parsed = match value {
        Value::Null => return None,
        Value::Number(n) => n.as_f64().and_then(from_epoch_seconds),
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    };

    if parsed.is_none() {
        tracing::warn!("Could not parse last_report '{}'", value);
    }
    parsed
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S %z"] {
        if let Ok(ts) = DateTime::parse_from_str(s, format) {
            return Some(ts.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    s.parse::<f64>().ok().and_then(from_epoch_seconds)
}

fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.trunc() as i64;
    let nanos = ((secs - secs.trunc()) * 1e9).round() as u32;
    DateTime::from_timestamp(whole, nanos.min(999_999_999))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_parse_iso_variants() {
        let expected = ts(2024, 3, 15, 10, 30, 0);
        assert_eq!(parse_last_report(&json!("2024-03-15T10:30:00Z")), Some(expected));
        assert_eq!(parse_last_report(&json!("2024-03-15T10:30:00")), Some(expected));
        assert_eq!(parse_last_report(&json!("2024-03-15 10:30:00")), Some(expected));
        assert_eq!(
            parse_last_report(&json!("2024-03-15T05:30:00-05:00")),
            Some(expected)
        );
        assert_eq!(
            parse_last_report(&json!("2024-03-15T10:30:00.000Z")),
            Some(expected)
        );
    }

    #[test]
    fn test_parse_epoch() {
        let expected = ts(2023, 2, 17, 8, 15, 0);
        let epoch = expected.timestamp();
        assert_eq!(parse_last_report(&json!(epoch)), Some(expected));
        assert_eq!(parse_last_report(&json!(epoch as f64)), Some(expected));
        assert_eq!(parse_last_report(&json!(epoch.to_string())), Some(expected));
    }

    #[test]
    fn test_parse_absent_or_garbage() {
        assert_eq!(parse_last_report(&Value::Null), None);
        assert_eq!(parse_last_report(&json!("")), None);
        assert_eq!(parse_last_report(&json!("yesterday")), None);
        assert_eq!(parse_last_report(&json!(true)), None);
    }

    #[test]
    fn test_computer_into_record() {
        let computer: Computer = serde_json::from_value(json!({
            "uid": "abc123",
            "client_id": 4242,
            "computer_name": "Front Desk iMac",
            "system_mac_address": "AA:BB:CC:DD:EE:FF",
            "last_report": "2024-03-15T10:30:00Z",
            "serial_number": "C02XYZ",
            "os_version": "14.4",
            "group": "Office",
            "computer_url": "https://acme.monitoringclient.com/computers/abc123",
            "unrelated_field": [1, 2, 3]
        }))
        .unwrap();

        let record = DeviceRecord::from(computer);
        assert_eq!(record.identifier, "abc123");
        assert_eq!(record.client_id.as_deref(), Some("4242"));
        assert_eq!(record.display_name, "Front Desk iMac");
        assert_eq!(record.hardware_id, "AA:BB:CC:DD:EE:FF");
        assert_eq!(record.last_report, Some(ts(2024, 3, 15, 10, 30, 0)));
        assert_eq!(record.group.as_deref(), Some("Office"));
    }

    #[test]
    fn test_computer_with_missing_fields() {
        let computer: Computer = serde_json::from_value(json!({
            "client_id": "C-7",
            "last_report": null
        }))
        .unwrap();

        let record = DeviceRecord::from(computer);
        assert_eq!(record.identifier, "C-7");
        assert_eq!(record.display_name, UNKNOWN_NAME);
        assert_eq!(record.hardware_id, "");
        assert_eq!(record.last_report, None);
        assert_eq!(record.detail_url, "");
    }
}
