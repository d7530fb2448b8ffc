//! Deduplication module.
//!
//! Provides:
//! - Device record model
//! - MAC address normalization
//! - Grouping by normalized MAC
//! - Keeper selection by report recency

pub mod decision;
pub mod engine;
pub mod group;
pub mod key;
pub mod record;

pub use decision::{classify, Decision, Removal, KEEP_REASON, REMOVAL_REASON};
pub use engine::{analyze, run, Analysis};
pub use group::{group_by_key, Grouping, RejectedRecord};
pub use key::{normalize, HardwareKey, KeyRejection};
pub use record::{format_timestamp, DeviceRecord, UNKNOWN_NAME};
