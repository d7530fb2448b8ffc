//! Bucketing records by hardware key.

use std::collections::BTreeMap;

use crate::dedup::key::{normalize, HardwareKey, KeyRejection};
use crate::dedup::record::DeviceRecord;

/// A record left out of grouping, with the cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    pub record: DeviceRecord,
    pub cause: KeyRejection,
}

/// Result of bucketing a record sequence.
#[derive(Debug, Default)]
pub struct Grouping<'a> {
    /// Records per key, keys ascending.
    pub groups: BTreeMap<HardwareKey, Vec<&'a DeviceRecord>>,
    pub rejected: Vec<RejectedRecord>,
}

impl<'a> Grouping<'a> {
    /// Groups with two or more members.
    pub fn duplicate_groups(&self) -> impl Iterator<Item = (&HardwareKey, &[&'a DeviceRecord])> {
        self.groups
            .iter()
            .filter(|(_, members)| members.len() > 1)
            .map(|(key, members)| (key, members.as_slice()))
    }
}

/// Bucket records by their normalized hardware identifier.
pub fn group_by_key(records: &[DeviceRecord]) -> Grouping<'_> {
    let mut grouping = Grouping::default();

    for record in records {
        match normalize(&record.hardware_id) {
            Ok(key) => grouping.groups.entry(key).or_default().push(record),
            Err(cause) => {
                tracing::debug!(
                    "Skipping {} ({}): {}",
                    record.display_name,
                    record.identifier,
                    cause
                );
                grouping.rejected.push(RejectedRecord {
                    record: record.clone(),
                    cause,
                });
            }
        }
    }

    grouping
}
