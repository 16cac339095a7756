//! Port abstraction for the user directory and its errors.

use async_trait::async_trait;

use crate::domain::password::PasswordHash;
use crate::domain::user::{DisplayName, EmailAddress, User, UserId};

/// Persistence errors raised by user directory adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserPersistenceError {
    /// Another account already holds this email.
    #[error("an account with that email already exists")]
    DuplicateEmail,
    /// Repository connection could not be established.
    #[error("user directory connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user directory query failed: {message}")]
    Query { message: String },
}

impl UserPersistenceError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Fields persisted for a new account.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password: PasswordHash,
}

/// Driven port for user identity storage.
///
/// ## Contract
/// - `create` assigns the next stable id and fails with
///   [`UserPersistenceError::DuplicateEmail`] on an email collision; under a
///   concurrent race exactly one caller wins.
/// - The first account ever created is granted the administrator role
///   within the same transactional unit as the insert.
/// - Lookups return `Ok(None)` for absent records, never an error.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account and return it with its assigned id and role.
    async fn create(&self, record: NewUserRecord) -> Result<User, UserPersistenceError>;

    /// Fetch a user by normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by identifier; used by session resolution.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;
}
