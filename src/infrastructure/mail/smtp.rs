//! SMTP delivery over implicit TLS.

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;

use crate::domain::error::DomainError;
use crate::domain::ports::transport::{OutgoingReport, ReportTransport};

pub const DEFAULT_SMTP_PORT: u16 = 465;

/// Connection settings read from `SMTP_HOST`, `SMTP_PORT`, `SMTP_USER`,
/// `SMTP_PASS` and `MAIL_TO`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub to: String,
}

/// App passwords are often pasted with spaces or non-breaking spaces.
pub fn clean_password(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect()
}

impl SmtpSettings {
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`. Every missing variable is reported
    /// in a single error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DomainError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).unwrap_or_default();

        let host = get("SMTP_HOST");
        let user = get("SMTP_USER");
        let password = clean_password(&lookup("SMTP_PASS").unwrap_or_default());
        let to = get("MAIL_TO");

        let missing: Vec<&str> = [
            ("SMTP_HOST", &host),
            ("SMTP_USER", &user),
            ("SMTP_PASS", &password),
            ("MAIL_TO", &to),
        ]
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(key, _)| *key)
        .collect();

        if !missing.is_empty() {
            return Err(DomainError::Config(format!(
                "Missing env vars: {}",
                missing.join(", ")
            )));
        }

        let port = match get("SMTP_PORT") {
            p if p.is_empty() => DEFAULT_SMTP_PORT,
            p => p
                .parse()
                .map_err(|_| DomainError::Config(format!("SMTP_PORT is not a valid port: {p}")))?,
        };

        Ok(Self {
            host,
            port,
            user,
            password,
            to,
        })
    }
}

/// Sends reports as multipart plain-text + HTML mail.
pub struct SmtpMailer {
    settings: SmtpSettings,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    pub fn from_env() -> Result<Self, DomainError> {
        Ok(Self::new(SmtpSettings::from_env()?))
    }

    fn build_message(&self, report: &OutgoingReport) -> Result<Message, DomainError> {
        let from: Mailbox = self.settings.user.parse().map_err(|e| {
            DomainError::Transport(format!("SMTP_USER is not a valid address: {e}"))
        })?;
        let to: Mailbox = self
            .settings
            .to
            .parse()
            .map_err(|e| DomainError::Transport(format!("MAIL_TO is not a valid address: {e}")))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(report.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                report.plain.clone(),
                report.html.clone(),
            ))
            .map_err(|e| DomainError::Transport(format!("message build failed: {e}")))
    }
}

impl ReportTransport for SmtpMailer {
    fn name(&self) -> &str {
        "smtp"
    }

    fn deliver(&self, report: &OutgoingReport) -> Result<(), DomainError> {
        let message = self.build_message(report)?;

        let transport = SmtpTransport::relay(&self.settings.host)
            .map_err(|e| DomainError::Transport(format!("smtp relay init failed: {e}")))?
            .port(self.settings.port)
            .credentials(Credentials::new(
                self.settings.user.clone(),
                self.settings.password.clone(),
            ))
            .build();

        transport
            .send(&message)
            .map_err(|e| DomainError::Transport(format!("smtp send failed: {e}")))?;

        info!(subject = %report.subject, to = %self.settings.to, "report delivered");
        Ok(())
    }
}
