//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! The create path runs inside one transaction so the first-account
//! administrator grant and the insert commit together; a concurrent pair of
//! first registrations cannot both end up with the role.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{NewUserRecord, UserPersistenceError, UserRepository};
use crate::domain::{DisplayName, EmailAddress, PasswordHash, User, UserId};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    let (PoolError::Checkout { message } | PoolError::Build { message }) = error;
    UserPersistenceError::connection(message)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserPersistenceError::DuplicateEmail
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        _ => UserPersistenceError::query("database error"),
    }
}

/// Convert a database row to a domain user.
///
/// Row values were validated before insert; a row that no longer parses
/// indicates out-of-band tampering and surfaces as a query error.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let name = DisplayName::new(row.name)
        .map_err(|err| UserPersistenceError::query(format!("corrupt user name: {err}")))?;
    let email = EmailAddress::new(row.email)
        .map_err(|err| UserPersistenceError::query(format!("corrupt user email: {err}")))?;
    Ok(User::new(
        UserId::new(row.id),
        name,
        email,
        PasswordHash::from_stored(row.password),
        row.is_admin,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, record: NewUserRecord) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = conn
            .transaction(|conn| {
                async move {
                    let existing: i64 = users::table.count().get_result(conn).await?;
                    let new_row = NewUserRow {
                        name: record.name.as_ref(),
                        email: record.email.as_ref(),
                        password: record.password.as_str(),
                        is_admin: existing == 0,
                    };

                    diesel::insert_into(users::table)
                        .values(&new_row)
                        .returning(UserRow::as_returning())
                        .get_result(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row_to_user(row)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.value())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }
}
