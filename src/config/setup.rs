//! Interactive first-run configuration.

use std::io::IsTerminal;
use std::path::Path;

use console::{style, Term};

use crate::config::loader::{parse_bool, Config, EmailConfig, WatchmanConfig};
use crate::config::validation::{validate_api_key, validate_subdomain};
use crate::error::{Error, Result};

/// Source of answers for the setup questions.
pub trait Prompt {
    /// Show `message` and return the trimmed answer.
    fn ask(&mut self, message: &str) -> Result<String>;

    /// Like [`Prompt::ask`] without echoing the answer.
    fn ask_secret(&mut self, message: &str) -> Result<String> {
        self.ask(message)
    }

    /// Print an informational line.
    fn say(&mut self, message: &str) -> Result<()>;
}

impl Prompt for Term {
    fn ask(&mut self, message: &str) -> Result<String> {
        self.write_str(message)?;
        Ok(self.read_line()?.trim().to_string())
    }

    fn ask_secret(&mut self, message: &str) -> Result<String> {
        self.write_str(message)?;
        Ok(self.read_secure_line()?.trim().to_string())
    }

    fn say(&mut self, message: &str) -> Result<()> {
        self.write_line(message)?;
        Ok(())
    }
}

/// Ask for credentials on the terminal and save them to `path`.
///
/// Prompts go to stderr so stdout can be piped.
pub fn run_setup(path: &Path) -> Result<Config> {
    if !std::io::stdin().is_terminal() {
        return Err(Error::MissingConfig(format!(
            "no configuration found and stdin is not a terminal; create {}",
            path.display()
        )));
    }

    let mut term = Term::stderr();
    let config = collect_config(&mut term)?;
    config.save(path)?;

    term.write_line(&format!(
        "{} Configuration saved to {}",
        style("OK").green().bold(),
        path.display()
    ))?;
    term.write_line("Keep this file secure: it contains your API credentials.")?;

    Ok(config)
}

/// Walk through the setup questions.
pub fn collect_config(prompt: &mut impl Prompt) -> Result<Config> {
    prompt.say("=== WATCHMAN CONFIGURATION (Required) ===")?;
    prompt.say("Subdomain is the part before '.monitoringclient.com' in your dashboard URL.")?;
    prompt.say("  Example: https://mycompany.monitoringclient.com -> mycompany")?;
    let subdomain = prompt.ask("Enter your subdomain: ")?;
    validate_subdomain(&subdomain)?;

    prompt.say("API key: Settings > API in your Watchman dashboard.")?;
    let api_key = prompt.ask_secret("Enter your API key: ")?;
    validate_api_key(&api_key)?;

    let mut config = Config {
        watchman: WatchmanConfig {
            subdomain,
            api_key,
            ..Default::default()
        },
        ..Default::default()
    };

    prompt.say("")?;
    prompt.say("=== EMAIL CONFIGURATION (Optional) ===")?;
    let setup_email = prompt.ask("Do you want to configure email sending? (y/n): ")?;
    if !parse_bool(&setup_email) {
        return Ok(config);
    }

    prompt.say("Common SMTP settings:")?;
    prompt.say("  Gmail: smtp.gmail.com, port 587, TLS enabled")?;
    prompt.say("  Outlook: smtp-mail.outlook.com, port 587, TLS enabled")?;
    prompt.say("  Office 365: smtp.office365.com, port 587, TLS enabled")?;

    let smtp_server = prompt.ask("SMTP Server (e.g., smtp.gmail.com): ")?;
    let smtp_port = prompt.ask("SMTP Port (usually 587 or 465): ")?;
    let smtp_username = prompt.ask("SMTP Username (usually your email): ")?;
    let smtp_password = prompt.ask_secret("SMTP Password (or App Password): ")?;
    let email_from = prompt.ask("From Email Address: ")?;
    let email_to = prompt.ask("To Email Address (can be same as from): ")?;
    let use_tls = prompt.ask("Use TLS encryption? (y/n): ")?;

    if smtp_server.is_empty()
        || smtp_port.is_empty()
        || smtp_username.is_empty()
        || smtp_password.is_empty()
    {
        prompt.say("Skipping email configuration (incomplete)")?;
        return Ok(config);
    }

    let smtp_port = smtp_port.parse().map_err(|_| Error::ConfigValidation {
        field: "smtp_port".to_string(),
        message: format!("'{}' is not a valid port", smtp_port),
    })?;

    config.email = Some(EmailConfig {
        smtp_server,
        smtp_port,
        smtp_username,
        smtp_password,
        email_from: Some(email_from).filter(|s| !s.is_empty()),
        email_to: Some(email_to).filter(|s| !s.is_empty()),
        smtp_use_tls: parse_bool(&use_tls),
    });

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct Scripted(VecDeque<&'static str>);

    impl Prompt for Scripted {
        fn ask(&mut self, _message: &str) -> Result<String> {
            self.0
                .pop_front()
                .map(str::to_string)
                .ok_or(Error::Cancelled)
        }

        fn say(&mut self, _message: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_watchman_only() {
        let mut prompt = Scripted(VecDeque::from(["acme", "key123", "n"]));
        let config = collect_config(&mut prompt).unwrap();
        assert_eq!(config.watchman.subdomain, "acme");
        assert_eq!(config.watchman.api_key, "key123");
        assert!(config.email.is_none());
    }

    #[test]
    fn test_with_email() {
        let mut prompt = Scripted(VecDeque::from([
            "acme",
            "key123",
            "y",
            "smtp.gmail.com",
            "587",
            "me@gmail.com",
            "app-pw",
            "",
            "it@example.com",
            "y",
        ]));
        let config = collect_config(&mut prompt).unwrap();
        let email = config.email.unwrap();
        assert_eq!(email.smtp_port, 587);
        assert_eq!(email.sender(), "me@gmail.com");
        assert_eq!(email.recipient(), "it@example.com");
        assert!(email.smtp_use_tls);
    }

    #[test]
    fn test_incomplete_email_is_skipped() {
        let mut prompt = Scripted(VecDeque::from([
            "acme", "key123", "yes", "", "", "", "", "", "", "n",
        ]));
        let config = collect_config(&mut prompt).unwrap();
        assert!(config.email.is_none());
    }

    #[test]
    fn test_rejects_missing_subdomain() {
        let mut prompt = Scripted(VecDeque::from(["", "key123"]));
        assert!(matches!(
            collect_config(&mut prompt),
            Err(Error::MissingConfig(_))
        ));
    }

    #[test]
    fn test_setup_refused_without_terminal_stdin() {
        // Only meaningful when the test runner has no terminal on stdin.
        if std::io::stdin().is_terminal() {
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchman.toml");

        let err = run_setup(&path).unwrap_err();
        assert!(matches!(err, Error::MissingConfig(ref msg) if msg.contains("stdin is not a terminal")));
        assert!(!path.exists());
    }
}
