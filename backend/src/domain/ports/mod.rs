//! Domain ports and supporting types for the hexagonal boundary.

mod clock;
mod content_repository;
mod mailer;
mod user_repository;

pub use clock::{Clock, SystemClock};
pub use content_repository::{
    ContentPersistenceError, ContentRepository, NewCommentRecord, NewPostRecord,
};
pub use mailer::{Mailer, MailerError, OutboundMail};
pub use user_repository::{NewUserRecord, UserPersistenceError, UserRepository};
