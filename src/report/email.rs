//! Email delivery of the report.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::{EmailConfig, DEFAULT_CSV_FILENAME};
use crate::error::{Error, Result};
use crate::report::{render_csv, render_html, render_text, Report, ReportSink, REPORT_TITLE};

/// Port on which SMTP servers expect implicit TLS.
const SMTPS_PORT: u16 = 465;

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the report email: text and HTML alternatives plus the CSV.
pub fn build_message(
    config: &EmailConfig,
    report: &Report<'_>,
    attachment_name: &str,
) -> Result<Message> {
    let from: Mailbox = config.sender().parse()?;
    let to: Mailbox = config.recipient().parse()?;

    let subject = format!(
        "{} - {}",
        REPORT_TITLE,
        report.generated_at.format("%Y-%m-%d %H:%M")
    );

    let csv_type = ContentType::parse("text/csv")
        .map_err(|e| Error::Email(format!("Invalid attachment type: {}", e)))?;
    let attachment = Attachment::new(attachment_name.to_string()).body(render_csv(report)?, csv_type);

    let body = MultiPart::mixed()
        .multipart(MultiPart::alternative_plain_html(
            render_text(report),
            render_html(report),
        ))
        .singlepart(attachment);

    Ok(Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .multipart(body)?)
}

/// Sends the report over SMTP.
pub struct EmailSink {
    config: EmailConfig,
    attachment_name: String,
}

impl EmailSink {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config,
            attachment_name: DEFAULT_CSV_FILENAME.to_string(),
        }
    }

    /// Name the CSV attachment after the exported file.
    pub fn with_attachment_name(mut self, name: impl Into<String>) -> Self {
        self.attachment_name = name.into();
        self
    }

    pub fn recipient(&self) -> &str {
        self.config.recipient()
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let server = self.config.smtp_server.as_str();
        let builder = if !self.config.smtp_use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(server)
        } else if self.config.smtp_port == SMTPS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(server)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(server)?
        };

        let credentials = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        Ok(builder
            .port(self.config.smtp_port)
            .credentials(credentials)
            .timeout(Some(SMTP_TIMEOUT))
            .build())
    }
}

#[async_trait]
impl ReportSink for EmailSink {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn deliver(&self, report: &Report<'_>) -> Result<()> {
        if !report.analysis.has_duplicates() {
            tracing::info!("No duplicates to report, skipping email");
            return Ok(());
        }

        let message = build_message(&self.config, report, &self.attachment_name)?;
        let transport = self.transport()?;

        tracing::debug!(
            "Sending report via {}:{} to {}",
            self.config.smtp_server,
            self.config.smtp_port,
            self.config.recipient()
        );
        transport.send(message).await?;
        tracing::info!("Email sent to {}", self.config.recipient());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::Analysis;
    use crate::report::fixtures;

    fn config() -> EmailConfig {
        EmailConfig {
            // Reserved TLD; never resolves.
            smtp_server: "smtp.invalid".into(),
            smtp_port: 587,
            smtp_username: "ops@example.com".into(),
            smtp_password: "pw".into(),
            email_from: None,
            email_to: Some("it@example.com".into()),
            smtp_use_tls: true,
        }
    }

    #[test]
    fn test_build_message() {
        let analysis = fixtures::analysis();
        let message = build_message(&config(), &fixtures::report(&analysis), "dupes.csv").unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: Watchman Duplicate Devices Report - 2024-04-01 09:05"));
        assert!(raw.contains("From: ops@example.com"));
        assert!(raw.contains("To: it@example.com"));
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/html"));
        assert!(raw.contains("text/csv"));
        assert!(raw.contains("dupes.csv"));
    }

    #[test]
    fn test_build_message_rejects_bad_address() {
        let mut bad = config();
        bad.email_to = Some("nope".into());
        let analysis = fixtures::analysis();
        let err = build_message(&bad, &fixtures::report(&analysis), "dupes.csv").unwrap_err();
        assert!(matches!(err, Error::Email(_)));
    }

    #[tokio::test]
    async fn test_no_duplicates_sends_nothing() {
        let analysis = Analysis::default();
        let sink = EmailSink::new(config());
        assert!(sink.deliver(&fixtures::report(&analysis)).await.is_ok());
    }
}
