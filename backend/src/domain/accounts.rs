//! Account use-cases: registration, credential authentication, and session
//! identity lookup.

use std::sync::Arc;

use tracing::{info, warn};

use super::auth::{LoginCredentials, Registration};
use super::error::Error;
use super::identity::Identity;
use super::password::PasswordHash;
use super::ports::{NewUserRecord, UserPersistenceError, UserRepository};
use super::user::{User, UserId};

/// Message used for every credential failure.
///
/// Unknown email and wrong password must be indistinguishable to the caller
/// so account emails cannot be enumerated through the login form.
const INVALID_CREDENTIALS: &str = "invalid email or password";

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::DuplicateEmail => {
            Error::conflict("an account with that email already exists")
                .with_details(serde_json::json!({ "field": "email" }))
        }
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
    }
}

/// Registration, login, and identity resolution against the user directory.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    /// Create a service backed by the given user directory.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Create an account from a validated registration.
    ///
    /// The plaintext password is hashed here and never reaches the
    /// repository. The directory grants the administrator role to the first
    /// account it creates.
    pub async fn register(&self, registration: Registration) -> Result<User, Error> {
        let password = PasswordHash::derive(registration.password())
            .map_err(|err| Error::internal(format!("password hashing failed: {err}")))?;

        let user = self
            .users
            .create(NewUserRecord {
                name: registration.name().clone(),
                email: registration.email().clone(),
                password,
            })
            .await
            .map_err(map_persistence_error)?;

        info!(user_id = %user.id(), admin = user.is_admin(), "account registered");
        Ok(user)
    }

    /// Validate credentials and return the authenticated user.
    ///
    /// Both failure paths produce the same error so the response never
    /// reveals whether the email is registered.
    pub async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_persistence_error)?;

        match user {
            Some(user) if user.password().verify(credentials.password()) => Ok(user),
            Some(user) => {
                warn!(user_id = %user.id(), "login rejected: wrong password");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
            None => {
                warn!("login rejected: unknown email");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }

    /// Resolve a session-stored user id to a caller identity.
    ///
    /// A stale id (user since removed, or a tampered cookie) resolves to
    /// [`Identity::Anonymous`] rather than an error.
    pub async fn resolve_identity(&self, user_id: Option<UserId>) -> Result<Identity, Error> {
        let Some(id) = user_id else {
            return Ok(Identity::Anonymous);
        };
        let user = self
            .users
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)?;
        match user {
            Some(user) => Ok(Identity::User(user)),
            None => {
                warn!(user_id = %id, "session user id no longer resolves; treating as anonymous");
                Ok(Identity::Anonymous)
            }
        }
    }
}
