//! Error types for the watchman-dedup application.

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    #[error("Operation cancelled by user")]
    Cancelled,

    // API errors
    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    // Report delivery errors
    #[error("Export failed: {0}")]
    Export(String),

    #[error("Email delivery failed: {0}")]
    Email(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl From<lettre::error::Error> for Error {
    fn from(err: lettre::error::Error) -> Self {
        Error::Email(format!("Failed to build message: {}", err))
    }
}

impl From<lettre::address::AddressError> for Error {
    fn from(err: lettre::address::AddressError) -> Self {
        Error::Email(format!("Invalid email address: {}", err))
    }
}

impl From<lettre::transport::smtp::Error> for Error {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        Error::Email(format!("SMTP error: {}", err))
    }
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const ABORT: i32 = 1;
    pub const API_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DELIVERY_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}

impl Error {
    /// Exit code reported to the shell for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_)
            | Error::ConfigValidation { .. }
            | Error::MissingConfig(_)
            | Error::TomlParse(_) => exit_codes::CONFIG_ERROR,
            Error::Cancelled => exit_codes::ABORT,
            Error::Api(_)
            | Error::Authentication(_)
            | Error::RateLimited(_)
            | Error::Http(_)
            | Error::Json(_)
            | Error::UrlParse(_) => exit_codes::API_ERROR,
            Error::Export(_) | Error::Email(_) | Error::Csv(_) => exit_codes::DELIVERY_ERROR,
            Error::Io(_) => exit_codes::UNEXPECTED_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_category() {
        assert_eq!(
            Error::MissingConfig("api_key".into()).exit_code(),
            exit_codes::CONFIG_ERROR
        );
        assert_eq!(Error::RateLimited(60).exit_code(), exit_codes::API_ERROR);
        assert_eq!(
            Error::Email("boom".into()).exit_code(),
            exit_codes::DELIVERY_ERROR
        );
        assert_eq!(Error::Cancelled.exit_code(), exit_codes::ABORT);
    }
}
