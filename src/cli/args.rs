//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{Config, DEFAULT_CONFIG_FILE};

/// Watchman duplicate device report CLI.
#[derive(Parser, Debug)]
#[command(
    name = "watchman-dedup",
    version,
    about = "Report duplicate devices in Watchman Monitoring",
    long_about = "Finds computers in Watchman Monitoring that share a System MAC Address and\n\
                  reports which record to keep (most recent report) and which to remove.\n\n\
                  Nothing is deleted: the Watchman API does not support computer removal,\n\
                  so the report lists devices to remove manually through the web interface."
)]
pub struct Args {
    /// Path to configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Override the subdomain from the configuration file.
    #[arg(short, long, env = "WATCHMAN_SUBDOMAIN")]
    pub subdomain: Option<String>,

    /// Override the API key from the configuration file.
    #[arg(short = 'k', long = "api-key", env = "WATCHMAN_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Re-run the interactive setup and overwrite the configuration file.
    #[arg(long)]
    pub reset_config: bool,

    /// Export the report to a CSV file.
    #[arg(long)]
    pub export_csv: bool,

    /// CSV filename (implies --export-csv).
    #[arg(long)]
    pub csv_filename: Option<PathBuf>,

    /// Do not send the report by email even if SMTP is configured.
    #[arg(long, conflicts_with = "email_only")]
    pub no_email: bool,

    /// Send the email only; suppress console output.
    #[arg(long)]
    pub email_only: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(subdomain) = &self.subdomain {
            config.watchman.subdomain = subdomain.trim().to_string();
        }

        if let Some(api_key) = &self.api_key {
            config.watchman.api_key = api_key.trim().to_string();
        }

        if self.export_csv {
            config.output.export_csv = true;
        }

        if let Some(filename) = &self.csv_filename {
            config.output.export_csv = true;
            config.output.csv_filename = filename.clone();
        }

        if self.no_email {
            config.email = None;
        }
    }

    /// Whether credentials were supplied without any config file.
    pub fn has_credentials(&self) -> bool {
        self.subdomain.as_deref().is_some_and(|s| !s.trim().is_empty())
            && self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Whether console output should be shown.
    pub fn show_console(&self) -> bool {
        !self.email_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmailConfig;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("watchman-dedup").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert!(!args.export_csv);
        assert!(args.show_console());
    }

    #[test]
    fn test_merge_overrides() {
        let args = parse(&[
            "--subdomain",
            "acme",
            "--api-key",
            "key",
            "--csv-filename",
            "out.csv",
            "--no-email",
        ]);
        assert!(args.has_credentials());

        let mut config = Config::default();
        config.email = Some(EmailConfig {
            smtp_server: "smtp.example.com".into(),
            smtp_port: 587,
            smtp_username: "u".into(),
            smtp_password: "p".into(),
            email_from: None,
            email_to: None,
            smtp_use_tls: true,
        });
        args.merge_into_config(&mut config);

        assert_eq!(config.watchman.subdomain, "acme");
        assert_eq!(config.watchman.api_key, "key");
        assert!(config.output.export_csv);
        assert_eq!(config.output.csv_filename, PathBuf::from("out.csv"));
        assert!(config.email.is_none());
    }

    #[test]
    fn test_no_email_conflicts_with_email_only() {
        let result = Args::try_parse_from(["watchman-dedup", "--no-email", "--email-only"]);
        assert!(result.is_err());
    }
}
