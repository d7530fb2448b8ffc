//! Deduplication entry points.
//!
//! Everything here is pure: no I/O, no configuration, no failure modes.
//! Bad identifiers are set aside, missing timestamps rank as oldest.

use crate::dedup::decision::{classify, Decision};
use crate::dedup::group::{group_by_key, RejectedRecord};
use crate::dedup::record::DeviceRecord;

/// Decisions plus bookkeeping for reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// One decision per duplicate group, keys ascending.
    pub decisions: Vec<Decision>,
    /// Number of input records.
    pub records_analyzed: usize,
    /// Records without a usable hardware identifier.
    pub rejected: Vec<RejectedRecord>,
}

impl Analysis {
    pub fn has_duplicates(&self) -> bool {
        !self.decisions.is_empty()
    }

    pub fn duplicate_groups(&self) -> usize {
        self.decisions.len()
    }

    /// Records that belong to any duplicate group.
    pub fn duplicate_devices(&self) -> usize {
        self.decisions.iter().map(Decision::group_size).sum()
    }

    pub fn devices_to_keep(&self) -> usize {
        self.decisions.len()
    }

    pub fn devices_to_remove(&self) -> usize {
        self.decisions.iter().map(|d| d.removable.len()).sum()
    }
}

/// Group records by hardware key and decide every duplicate group.
pub fn run(records: &[DeviceRecord]) -> Vec<Decision> {
    analyze(records).decisions
}

/// Like [`run`], also reporting totals and rejected records.
pub fn analyze(records: &[DeviceRecord]) -> Analysis {
    let grouping = group_by_key(records);

    let decisions: Vec<Decision> = grouping
        .duplicate_groups()
        .filter_map(|(key, members)| classify(key, members))
        .collect();

    tracing::debug!(
        "Analyzed {} records: {} keys, {} duplicate groups, {} rejected",
        records.len(),
        grouping.groups.len(),
        decisions.len(),
        grouping.rejected.len()
    );

    Analysis {
        decisions,
        records_analyzed: records.len(),
        rejected: grouping.rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, 0, 0, 0).unwrap()
    }

    fn fleet() -> Vec<DeviceRecord> {
        vec![
            DeviceRecord::new("m1", "MacBook", "AA:BB:CC:DD:EE:FF").with_last_report(at(2024, 3, 15)),
            DeviceRecord::new("m2", "MacBook", "aabbccddeeff").with_last_report(at(2023, 2, 17)),
            DeviceRecord::new("m3", "MacBook", "aa-bb-cc-dd-ee-ff"),
            DeviceRecord::new("s1", "Server", "11:22:33:44:55:66").with_last_report(at(2024, 1, 1)),
            DeviceRecord::new("i1", "iMac", "00:00:00:00:00:0a").with_last_report(at(2020, 1, 1)),
            DeviceRecord::new("i2", "iMac", "00:00:00:00:00:0A").with_last_report(at(2021, 1, 1)),
            DeviceRecord::new("x1", "NoMac", ""),
        ]
    }

    #[test]
    fn test_empty_input() {
        assert!(run(&[]).is_empty());
        let analysis = analyze(&[]);
        assert!(!analysis.has_duplicates());
        assert_eq!(analysis.records_analyzed, 0);
    }

    #[test]
    fn test_all_unique_input() {
        let records = vec![
            DeviceRecord::new("1", "a", "00:00:00:00:00:01"),
            DeviceRecord::new("2", "b", "00:00:00:00:00:02"),
            DeviceRecord::new("3", "c", "00:00:00:00:00:03"),
        ];
        assert!(run(&records).is_empty());
    }

    #[test]
    fn test_decisions_sorted_by_key() {
        let decisions = run(&fleet());
        let keys: Vec<_> = decisions.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["00000000000a", "aabbccddeeff"]);
    }

    #[test]
    fn test_every_decision_has_one_keeper() {
        let records = fleet();
        for decision in run(&records) {
            assert!(decision.group_size() >= 2);
            let members = records
                .iter()
                .filter(|r| {
                    crate::dedup::key::normalize(&r.hardware_id).ok().as_ref() == Some(&decision.key)
                })
                .count();
            assert_eq!(members, decision.group_size());
            assert!(decision
                .removable
                .iter()
                .all(|r| r.record.identifier != decision.keeper.identifier));
        }
    }

    #[test]
    fn test_recency_across_formats() {
        let decisions = run(&fleet());
        let macbooks = &decisions[1];
        assert_eq!(macbooks.keeper.identifier, "m1");
        let removed: Vec<_> = macbooks
            .removable
            .iter()
            .map(|r| r.record.identifier.as_str())
            .collect();
        assert_eq!(removed, vec!["m2", "m3"]);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let records = fleet();
        let mut reversed = records.clone();
        reversed.reverse();
        assert_eq!(run(&records), run(&reversed));
    }

    #[test]
    fn test_analysis_counters() {
        let analysis = analyze(&fleet());
        assert_eq!(analysis.records_analyzed, 7);
        assert_eq!(analysis.duplicate_groups(), 2);
        assert_eq!(analysis.duplicate_devices(), 5);
        assert_eq!(analysis.devices_to_keep(), 2);
        assert_eq!(analysis.devices_to_remove(), 3);
        assert_eq!(analysis.rejected.len(), 1);
        assert_eq!(analysis.rejected[0].record.identifier, "x1");
    }
}
