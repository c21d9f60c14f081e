//! Delivery of lead notifications.

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use super::LeadEmail;
use crate::storage::{MailSettings, SmtpSettings};

/// Mail delivery errors.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Relay rejected message with status {0}")]
    Rejected(u16),

    #[error("Invalid address '{0}'")]
    InvalidAddress(String),

    #[error("Mail client setup failed: {0}")]
    Setup(String),

    #[error("No mail transport configured (set SMTP_HOST, MAIL_RELAY_URL or MAIL_LOG_ONLY)")]
    NotConfigured,
}

/// Trait for mail delivery backends
pub trait Mailer: Send + Sync {
    /// Deliver `email`, returning the message id.
    fn send(
        &self,
        email: &LeadEmail,
    ) -> impl Future<Output = Result<String, MailError>> + Send;
}

/// Development backend that only logs the notification.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, email: &LeadEmail) -> Result<String, MailError> {
        let message_id = format!("<{}@localhost>", Uuid::new_v4());
        tracing::info!(
            "Lead notification for {} (reply-to {}): {}",
            email.to,
            email.reply_to,
            message_id
        );
        tracing::debug!("{}", email.text);
        Ok(message_id)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelayResponse {
    #[serde(default, alias = "id")]
    message_id: Option<String>,
}

/// Backend posting the composed message as JSON to an HTTP mail relay.
#[derive(Debug, Clone)]
pub struct RelayMailer {
    http: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl RelayMailer {
    /// Create a relay mailer for `url`, authenticating with `token` if given.
    pub fn new(url: &str, token: Option<String>) -> Result<Self, MailError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MailError::Setup(e.to_string()))?;

        Ok(Self {
            http,
            url: url.to_string(),
            token,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Mailer for RelayMailer {
    async fn send(&self, email: &LeadEmail) -> Result<String, MailError> {
        let mut request = self.http.post(&self.url).json(email);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| MailError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailError::Rejected(status.as_u16()));
        }

        // Relays are not required to report an id.
        let message_id = response
            .json::<RelayResponse>()
            .await
            .ok()
            .and_then(|r| r.message_id)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        tracing::info!("Email sent: {}", message_id);
        Ok(message_id)
    }
}

/// Backend sending through an SMTP server.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
    port: u16,
}

impl SmtpMailer {
    /// Build a transport for `settings`. No connection is made until the
    /// first message is sent.
    pub fn new(settings: &SmtpSettings) -> Result<Self, MailError> {
        let builder = if settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
                .map_err(|e| MailError::Setup(e.to_string()))?
        } else {
            let tls = TlsParameters::new(settings.host.clone())
                .map_err(|e| MailError::Setup(e.to_string()))?;
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
                .tls(Tls::Opportunistic(tls))
        };

        let mut builder = builder
            .port(settings.port)
            .timeout(Some(Duration::from_secs(30)));
        if let Some(user) = &settings.user {
            builder = builder.credentials(Credentials::new(
                user.clone(),
                settings.pass.clone().unwrap_or_default(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            host: settings.host.clone(),
            port: settings.port,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

fn mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse()
        .map_err(|_| MailError::InvalidAddress(address.to_string()))
}

/// Build the MIME message for `email` with the given `Message-ID`.
pub fn build_message(email: &LeadEmail, message_id: &str) -> Result<Message, MailError> {
    let mut builder = Message::builder()
        .message_id(Some(message_id.to_string()))
        .from(mailbox(&email.from)?)
        .to(mailbox(&email.to)?)
        .subject(email.subject.clone());

    // The lead's own address is free text; a bad one only loses the reply-to.
    match mailbox(&email.reply_to) {
        Ok(reply_to) => builder = builder.reply_to(reply_to),
        Err(e) => tracing::warn!("Omitting reply-to: {}", e),
    }

    builder
        .multipart(MultiPart::alternative_plain_html(
            email.text.clone(),
            email.html.clone(),
        ))
        .map_err(|e| MailError::Setup(e.to_string()))
}

impl Mailer for SmtpMailer {
    async fn send(&self, email: &LeadEmail) -> Result<String, MailError> {
        let domain = email
            .from
            .rsplit_once('@')
            .map(|(_, domain)| domain.trim_end_matches('>'))
            .unwrap_or("localhost");
        let message_id = format!("<{}@{}>", Uuid::new_v4(), domain);
        let message = build_message(email, &message_id)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::NetworkError(e.to_string()))?;

        tracing::info!("Email sent: {}", message_id);
        Ok(message_id)
    }
}

/// The backend selected by configuration.
#[derive(Debug)]
pub enum ConfiguredMailer {
    Smtp(SmtpMailer),
    Relay(RelayMailer),
    Log(LogMailer),
}

impl ConfiguredMailer {
    /// SMTP when a host is configured, then the relay. Logging only happens
    /// when explicitly enabled.
    pub fn from_settings(settings: &MailSettings) -> Result<Self, MailError> {
        if let Some(smtp) = settings.smtp.as_ref().filter(|smtp| !smtp.host.is_empty()) {
            tracing::info!("Sending lead notifications via SMTP {}:{}", smtp.host, smtp.port);
            return Ok(ConfiguredMailer::Smtp(SmtpMailer::new(smtp)?));
        }

        if let Some(url) = &settings.relay_url {
            tracing::info!("Sending lead notifications via relay {}", url);
            return Ok(ConfiguredMailer::Relay(RelayMailer::new(
                url,
                settings.relay_token.clone(),
            )?));
        }

        if settings.log_only {
            tracing::warn!("Mail log-only mode: leads will not be emailed");
            return Ok(ConfiguredMailer::Log(LogMailer));
        }

        Err(MailError::NotConfigured)
    }
}

impl Mailer for ConfiguredMailer {
    async fn send(&self, email: &LeadEmail) -> Result<String, MailError> {
        match self {
            ConfiguredMailer::Smtp(mailer) => mailer.send(email).await,
            ConfiguredMailer::Relay(mailer) => mailer.send(email).await,
            ConfiguredMailer::Log(mailer) => mailer.send(email).await,
        }
    }
}
