//! Configuration validation logic.

use crate::api::MAX_PER_PAGE;
use crate::config::loader::{Config, EmailConfig, WatchmanConfig};
use crate::error::{Error, Result};
use lettre::message::Mailbox;
use regex::Regex;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_watchman(&config.watchman)?;

    if let Some(email) = &config.email {
        validate_email(email)?;
    }

    Ok(())
}

/// Validate Watchman API settings.
pub fn validate_watchman(watchman: &WatchmanConfig) -> Result<()> {
    validate_subdomain(&watchman.subdomain)?;
    validate_api_key(&watchman.api_key)?;

    if watchman.per_page == 0 || watchman.per_page > MAX_PER_PAGE {
        return Err(Error::ConfigValidation {
            field: "per_page".to_string(),
            message: format!(
                "Must be between 1 and {} (got {})",
                MAX_PER_PAGE, watchman.per_page
            ),
        });
    }

    if watchman.requests_per_minute == 0 {
        return Err(Error::ConfigValidation {
            field: "requests_per_minute".to_string(),
            message: "Must be greater than zero".to_string(),
        });
    }

    Ok(())
}

/// Validate the account subdomain.
pub fn validate_subdomain(subdomain: &str) -> Result<()> {
    if subdomain.is_empty() {
        return Err(Error::MissingConfig("subdomain".to_string()));
    }

    // A single DNS label; people often paste the whole host.
    let label = Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?$").unwrap();
    if !label.is_match(subdomain) {
        let hint = if subdomain.contains('.') {
            " Use only the part before '.monitoringclient.com'."
        } else {
            ""
        };
        return Err(Error::ConfigValidation {
            field: "subdomain".to_string(),
            message: format!("'{}' is not a valid subdomain.{}", subdomain, hint),
        });
    }

    Ok(())
}

/// Validate the API key.
pub fn validate_api_key(api_key: &str) -> Result<()> {
    if api_key.trim().is_empty() {
        return Err(Error::MissingConfig("api_key".to_string()));
    }

    let lower = api_key.to_lowercase();
    if lower.contains("replaceme") || lower.contains("your_api_key") {
        return Err(Error::ConfigValidation {
            field: "api_key".to_string(),
            message: "API key appears to be a placeholder. Copy it from Settings > API."
                .to_string(),
        });
    }

    Ok(())
}

/// Validate SMTP settings.
pub fn validate_email(email: &EmailConfig) -> Result<()> {
    for (field, value) in [
        ("smtp_server", &email.smtp_server),
        ("smtp_username", &email.smtp_username),
        ("smtp_password", &email.smtp_password),
    ] {
        if value.trim().is_empty() {
            return Err(Error::MissingConfig(format!("email.{}", field)));
        }
    }

    if email.smtp_port == 0 {
        return Err(Error::ConfigValidation {
            field: "smtp_port".to_string(),
            message: "Port must be non-zero".to_string(),
        });
    }

    for (field, address) in [
        ("email_from", email.sender()),
        ("email_to", email.recipient()),
    ] {
        if address.parse::<Mailbox>().is_err() {
            return Err(Error::ConfigValidation {
                field: field.to_string(),
                message: format!("'{}' is not a valid email address", address),
            });
        }
    }

    Ok(())
}
