//! Configuration module for watchman-dedup.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Importing legacy `.env` files
//! - Interactive first-run setup
//! - Configuration validation

pub mod env_file;
pub mod loader;
pub mod setup;
pub mod validation;

pub use loader::{
    parse_bool, Config, EmailConfig, OutputConfig, WatchmanConfig, DEFAULT_CONFIG_FILE,
    DEFAULT_CSV_FILENAME, LEGACY_ENV_FILE,
};
pub use setup::{collect_config, run_setup, Prompt};
pub use validation::validate_config;
