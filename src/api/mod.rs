//! Watchman Monitoring API module.
//!
//! This module provides:
//! - HTTP client with pagination and rate limiting
//! - The `DeviceSource` capability trait
//! - API response types

pub mod client;
pub mod source;
pub mod types;

pub use client::{RateLimit, WatchmanApi, MAX_PER_PAGE};
pub use source::DeviceSource;
pub use types::{parse_last_report, Computer};
