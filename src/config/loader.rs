//! Configuration structures and loading logic.

use crate::config::env_file::{parse_env_file, EnvMap};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "watchman.toml";

/// Legacy dotenv-style configuration file name.
pub const LEGACY_ENV_FILE: &str = ".env";

/// Default CSV report file name.
pub const DEFAULT_CSV_FILENAME: &str = "watchman_duplicates_report.csv";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub watchman: WatchmanConfig,

    /// SMTP settings. Email is disabled when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailConfig>,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Watchman API access configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchmanConfig {
    /// Part before `.monitoringclient.com` in the dashboard URL.
    #[serde(default)]
    pub subdomain: String,

    /// API key from Settings > API in the dashboard.
    #[serde(default)]
    pub api_key: String,

    /// Computers per page (API maximum is 100).
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Request ceiling enforced client side.
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

impl Default for WatchmanConfig {
    fn default() -> Self {
        Self {
            subdomain: String::new(),
            api_key: String::new(),
            per_page: default_per_page(),
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

/// SMTP delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_server: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    pub smtp_username: String,

    pub smtp_password: String,

    /// Sender address, defaults to the SMTP username.
    #[serde(default)]
    pub email_from: Option<String>,

    /// Recipient address, defaults to the SMTP username.
    #[serde(default)]
    pub email_to: Option<String>,

    #[serde(default = "default_true")]
    pub smtp_use_tls: bool,
}

impl EmailConfig {
    pub fn sender(&self) -> &str {
        self.email_from
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.smtp_username)
    }

    pub fn recipient(&self) -> &str {
        self.email_to
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.smtp_username)
    }
}

/// Report output options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Whether to write the CSV report to disk.
    #[serde(default)]
    pub export_csv: bool,

    #[serde(default = "default_csv_filename")]
    pub csv_filename: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            export_csv: false,
            csv_filename: default_csv_filename(),
        }
    }
}

fn default_per_page() -> u32 {
    100
}

fn default_requests_per_minute() -> u32 {
    400
}

fn default_smtp_port() -> u16 {
    587
}

fn default_true() -> bool {
    true
}

fn default_csv_filename() -> PathBuf {
    PathBuf::from(DEFAULT_CSV_FILENAME)
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Run with --reset-config to create one",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a legacy `.env` file.
    pub fn load_env_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_env_map(&parse_env_file(&content))
    }

    /// Build a configuration from `.env` style keys.
    pub fn from_env_map(env: &EnvMap) -> Result<Self> {
        let get = |key: &str| env.get(key).cloned().filter(|v| !v.is_empty());

        let watchman = WatchmanConfig {
            subdomain: get("WATCHMAN_SUBDOMAIN").unwrap_or_default(),
            api_key: get("WATCHMAN_API_KEY").unwrap_or_default(),
            ..Default::default()
        };

        let email = match get("SMTP_SERVER") {
            Some(smtp_server) => {
                let smtp_port = match get("SMTP_PORT") {
                    Some(port) => port.parse().map_err(|_| Error::ConfigValidation {
                        field: "SMTP_PORT".to_string(),
                        message: format!("'{}' is not a valid port", port),
                    })?,
                    None => default_smtp_port(),
                };
                Some(EmailConfig {
                    smtp_server,
                    smtp_port,
                    smtp_username: get("SMTP_USERNAME").unwrap_or_default(),
                    smtp_password: get("SMTP_PASSWORD").unwrap_or_default(),
                    email_from: get("EMAIL_FROM"),
                    email_to: get("EMAIL_TO"),
                    smtp_use_tls: get("SMTP_USE_TLS")
                        .map(|v| parse_bool(&v))
                        .unwrap_or(true),
                })
            }
            None => None,
        };

        Ok(Config {
            watchman,
            email,
            output: OutputConfig::default(),
        })
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        let header = "# Watchman Monitoring configuration\n\
                      # Keep this file private: it contains API and SMTP credentials.\n\n";
        fs::write(path, format!("{}{}", header, content))?;
        Ok(())
    }

    /// Whether an email can be sent with this configuration.
    pub fn email_configured(&self) -> bool {
        self.email
            .as_ref()
            .is_some_and(|email| !email.smtp_server.is_empty())
    }
}

/// Interpret `true`/`1`/`yes` (any case) as true.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "y"
    )
}
