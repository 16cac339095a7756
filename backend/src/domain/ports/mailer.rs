//! Port abstraction for outbound mail delivery.

use async_trait::async_trait;

/// Delivery errors raised by mail transport adapters.
///
/// The caller surfaces these as a generic failure; the core never retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MailerError {
    /// The transport could not deliver the message.
    #[error("mail delivery failed: {message}")]
    Transport { message: String },
}

impl MailerError {
    /// Create a transport error with the given message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// A fully composed message handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMail {
    pub subject: String,
    pub body: String,
}

/// Driven port for the authenticated outbound mail channel.
///
/// The recipient is fixed by configuration (the site owner); the port only
/// carries message content.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a message, or fail without retrying.
    async fn send(&self, mail: OutboundMail) -> Result<(), MailerError>;
}
