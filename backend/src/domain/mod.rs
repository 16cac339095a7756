//! Domain entities, use-case services, and ports.
//!
//! Purpose: define strongly typed entities with validated components, the
//! account/blog/contact use-cases, and the port traits that adapters
//! implement. Nothing here knows about HTTP, Diesel, or SMTP.

pub mod accounts;
pub mod auth;
pub mod blog;
pub mod comment;
pub mod contact;
pub mod error;
pub mod identity;
pub mod password;
pub mod ports;
pub mod post;
pub mod user;

pub use self::accounts::AccountService;
pub use self::auth::{CredentialValidationError, LoginCredentials, Registration};
pub use self::blog::BlogService;
pub use self::comment::{Comment, CommentId, CommentText, CommentValidationError};
pub use self::contact::{ContactMessage, ContactValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::{require_admin, require_authenticated, Identity};
pub use self::password::{PasswordHash, PasswordHashError, PBKDF2_ROUNDS};
pub use self::post::{
    format_publication_date, BlogPost, ImageUrl, PostChanges, PostDraft, PostId,
    PostValidationError,
};
pub use self::user::{DisplayName, EmailAddress, User, UserId, UserValidationError};

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;
