//! Contact-form message composition.

use super::error::Error;
use super::ports::{Mailer, MailerError, OutboundMail};
use super::user::EmailAddress;
use tracing::warn;

/// Validation errors for contact submissions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("message must not be empty")]
    EmptyMessage,
    #[error("reply email is invalid")]
    InvalidEmail,
}

/// A validated contact-form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    name: String,
    reply_to: EmailAddress,
    phone: String,
    message: String,
}

impl ContactMessage {
    /// Validate a submission from raw form inputs. The phone field is free
    /// text and may be empty.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        phone: &str,
        message: &str,
    ) -> Result<Self, ContactValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ContactValidationError::EmptyName);
        }
        if message.trim().is_empty() {
            return Err(ContactValidationError::EmptyMessage);
        }
        let reply_to =
            EmailAddress::new(email).map_err(|_| ContactValidationError::InvalidEmail)?;
        Ok(Self {
            name: name.to_owned(),
            reply_to,
            phone: phone.trim().to_owned(),
            message: message.to_owned(),
        })
    }

    /// Compose the outbound mail for the site owner.
    fn compose(&self) -> OutboundMail {
        OutboundMail {
            subject: format!("New message from {}", self.name),
            body: format!(
                "{}\n\nReply immediately to {} or call at {}.",
                self.message, self.reply_to, self.phone
            ),
        }
    }

    /// Deliver the message through the given transport.
    ///
    /// Transport failures surface as a generic delivery failure; the core
    /// never retries.
    pub async fn deliver(&self, mailer: &dyn Mailer) -> Result<(), Error> {
        mailer.send(self.compose()).await.map_err(|err| {
            let MailerError::Transport { message } = err;
            warn!(error = %message, "contact mail delivery failed");
            Error::service_unavailable("message could not be sent")
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use async_trait::async_trait;
    use rstest::rstest;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutboundMail>>,
        fail: bool,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, mail: OutboundMail) -> Result<(), MailerError> {
            if self.fail {
                return Err(MailerError::transport("relay refused the connection"));
            }
            self.sent.lock().expect("sent lock").push(mail);
            Ok(())
        }
    }

    #[rstest]
    #[case("", "ada@example.com", "555", "hi", ContactValidationError::EmptyName)]
    #[case("Ada", "bad", "555", "hi", ContactValidationError::InvalidEmail)]
    #[case("Ada", "ada@example.com", "555", " ", ContactValidationError::EmptyMessage)]
    fn invalid_submissions_are_rejected(
        #[case] name: &str,
        #[case] email: &str,
        #[case] phone: &str,
        #[case] message: &str,
        #[case] expected: ContactValidationError,
    ) {
        let err =
            ContactMessage::try_from_parts(name, email, phone, message).expect_err("must fail");
        assert_eq!(err, expected);
    }

    #[tokio::test]
    async fn delivered_mail_carries_subject_and_reply_details() {
        let mailer = RecordingMailer::default();
        let message =
            ContactMessage::try_from_parts("Ada", "ada@example.com", "555-0100", "Hello there")
                .expect("valid submission");

        message.deliver(&mailer).await.expect("delivery succeeds");

        let sent = mailer.sent.lock().expect("sent lock");
        let mail = sent.first().expect("one mail sent");
        assert_eq!(mail.subject, "New message from Ada");
        assert!(mail.body.starts_with("Hello there"));
        assert!(mail
            .body
            .contains("Reply immediately to ada@example.com or call at 555-0100."));
    }

    #[tokio::test]
    async fn transport_failure_maps_to_generic_unavailable() {
        let mailer = RecordingMailer {
            fail: true,
            ..RecordingMailer::default()
        };
        let message = ContactMessage::try_from_parts("Ada", "ada@example.com", "", "Hello")
            .expect("valid submission");

        let err = message.deliver(&mailer).await.expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
        assert_eq!(err.message(), "message could not be sent");
    }
}
