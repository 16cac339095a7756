//! Caller identity and the authorization policy gates.
//!
//! Identity is always an explicit parameter: services receive the resolved
//! caller rather than reading ambient per-request state, so every gate is
//! visible at the call site and trivially testable.

use super::error::Error;
use super::user::User;

/// The resolved caller for a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    /// No session, or a session that no longer maps to a user.
    Anonymous,
    /// A logged-in user.
    User(User),
}

impl Identity {
    /// The authenticated user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::User(user) => Some(user),
        }
    }

    /// Whether the caller is logged in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::User(_))
    }

    /// True iff the caller is authenticated and holds the admin role.
    ///
    /// Anonymous callers are never admin.
    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }
}

/// Gate for admin-only operations (post create/edit/delete).
///
/// Returns `Unauthorized` for anonymous callers and `Forbidden` for
/// authenticated non-admins. Callers must invoke this before any side
/// effect.
pub fn require_admin(identity: &Identity) -> Result<&User, Error> {
    let user = require_authenticated(identity)?;
    if user.is_admin() {
        Ok(user)
    } else {
        Err(Error::forbidden("administrator access required"))
    }
}

/// Gate for operations any logged-in user may perform (commenting).
pub fn require_authenticated(identity: &Identity) -> Result<&User, Error> {
    identity
        .user()
        .ok_or_else(|| Error::unauthorized("login required"))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::password::PasswordHash;
    use crate::domain::user::{DisplayName, EmailAddress, UserId};
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn user(id: i32, admin: bool) -> User {
        User::new(
            UserId::new(id),
            DisplayName::new("Ada Lovelace").expect("valid name"),
            EmailAddress::new("ada@example.com").expect("valid email"),
            PasswordHash::from_stored("$pbkdf2-sha256$unused"),
            admin,
        )
    }

    #[rstest]
    fn anonymous_is_never_admin() {
        assert!(!Identity::Anonymous.is_admin());
        assert!(!Identity::Anonymous.is_authenticated());
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn admin_follows_the_stored_role(#[case] admin: bool) {
        let identity = Identity::User(user(1, admin));
        assert_eq!(identity.is_admin(), admin);
        assert!(identity.is_authenticated());
    }

    #[rstest]
    fn require_admin_rejects_anonymous_as_unauthorized() {
        let err = require_admin(&Identity::Anonymous).expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    fn require_admin_rejects_non_admin_as_forbidden() {
        let identity = Identity::User(user(2, false));
        let err = require_admin(&identity).expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    fn require_admin_passes_the_admin_through() {
        let identity = Identity::User(user(1, true));
        let user = require_admin(&identity).expect("admin passes");
        assert_eq!(user.id(), UserId::new(1));
    }

    #[rstest]
    fn require_authenticated_accepts_any_user() {
        let identity = Identity::User(user(7, false));
        assert!(require_authenticated(&identity).is_ok());
        assert!(require_authenticated(&Identity::Anonymous).is_err());
    }
}
