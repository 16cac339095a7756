//! SMTP adapter for the `Mailer` port, built on `lettre`.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::domain::ports::{Mailer, MailerError, OutboundMail};

/// Connection and addressing settings for the SMTP relay.
#[derive(Debug, Clone)]
pub struct SmtpMailerConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Envelope sender, e.g. `Blog <blog@example.com>`.
    pub sender: String,
    /// Site owner's mailbox receiving contact messages.
    pub recipient: String,
}

/// `Mailer` implementation relaying through an SMTP server over STARTTLS.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    recipient: Mailbox,
}

impl SmtpMailer {
    /// Build a pooled STARTTLS transport from the given settings.
    pub fn new(config: SmtpMailerConfig) -> Result<Self, MailerError> {
        let sender: Mailbox = config
            .sender
            .parse()
            .map_err(|err| MailerError::transport(format!("invalid sender address: {err}")))?;
        let recipient: Mailbox = config
            .recipient
            .parse()
            .map_err(|err| MailerError::transport(format!("invalid recipient address: {err}")))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|err| MailerError::transport(format!("SMTP relay setup failed: {err}")))?
            .port(config.port)
            .credentials(Credentials::new(config.username, config.password))
            .build();

        Ok(Self {
            transport,
            sender,
            recipient,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutboundMail) -> Result<(), MailerError> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(self.recipient.clone())
            .subject(&mail.subject)
            .body(mail.body)
            .map_err(|err| MailerError::transport(format!("message assembly failed: {err}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|err| MailerError::transport(err.to_string()))?;
        Ok(())
    }
}

/// Fallback mailer for deployments without an SMTP relay.
///
/// Accepts every message and records it in the log instead of sending.
#[derive(Clone, Default)]
pub struct LoggingMailer;

#[async_trait]
impl Mailer for LoggingMailer {
    async fn send(&self, mail: OutboundMail) -> Result<(), MailerError> {
        info!(subject = %mail.subject, "no SMTP relay configured; logging mail instead");
        Ok(())
    }
}
