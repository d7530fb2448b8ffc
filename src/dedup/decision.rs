//! Keeper selection within a duplicate group.

use std::cmp::{Ordering, Reverse};

use crate::dedup::key::HardwareKey;
use crate::dedup::record::{format_timestamp, DeviceRecord};

/// Reason attached to every removable record.
pub const REMOVAL_REASON: &str = "older report date than keeper";

/// Reason shown next to the keeper in reports.
pub const KEEP_REASON: &str = "Most recent report date";

/// A record flagged for manual removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub record: DeviceRecord,
    pub reason: String,
}

/// Outcome for one duplicate group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub key: HardwareKey,
    pub keeper: DeviceRecord,
    pub removable: Vec<Removal>,
}

impl Decision {
    /// Number of records in the group.
    pub fn group_size(&self) -> usize {
        self.removable.len() + 1
    }
}

/// Newest report first, absent timestamps last, then smallest identifier.
///
/// `Option` orders `None` below any `Some`, so reversing it puts records
/// without a report after every record that has one. Identifiers can be
/// empty or shared, so the remaining fields settle any leftover tie.
fn recency_order(a: &DeviceRecord, b: &DeviceRecord) -> Ordering {
    Reverse(a.last_report)
        .cmp(&Reverse(b.last_report))
        .then_with(|| a.identifier.cmp(&b.identifier))
        .then_with(|| fallback_key(a).cmp(&fallback_key(b)))
}

fn fallback_key(record: &DeviceRecord) -> impl Ord + '_ {
    (
        record.display_name.as_str(),
        record.client_id.as_deref(),
        record.detail_url.as_str(),
        record.serial_number.as_deref(),
        record.hardware_id.as_str(),
        record.os_version.as_deref(),
        record.group.as_deref(),
    )
}

fn removal_reason(keeper: &DeviceRecord) -> String {
    let keeper_date = match keeper.last_report {
        Some(_) => format_timestamp(keeper.last_report),
        None => "unknown".to_string(),
    };
    format!("{} (keeper last reported {})", REMOVAL_REASON, keeper_date)
}

/// Pick the keeper of a group and mark the rest removable.
///
/// Returns `None` for groups with fewer than two members.
pub fn classify(key: &HardwareKey, group: &[&DeviceRecord]) -> Option<Decision> {
    if group.len() < 2 {
        return None;
    }

    let mut members = group.to_vec();
    members.sort_by(|a, b| recency_order(a, b));

    let mut members = members.into_iter();
    let keeper = members.next()?.clone();
    let reason = removal_reason(&keeper);

    let removable = members
        .map(|record| Removal {
            record: record.clone(),
            reason: reason.clone(),
        })
        .collect();

    Some(Decision {
        key: key.clone(),
        keeper,
        removable,
    })
}
