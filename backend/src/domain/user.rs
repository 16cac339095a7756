//! User identity records and their validated components.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::password::PasswordHash;

/// Validation errors returned by the user component constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("display name must not be empty")]
    EmptyDisplayName,
    #[error("display name must be at most {max} characters")]
    DisplayNameTooLong { max: usize },
    #[error("email address must not be empty")]
    EmptyEmail,
    #[error("email address must contain a single '@' with text either side")]
    InvalidEmail,
}

/// Stable numeric user identifier assigned by the user directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a directory-assigned identifier.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw integer value, used by persistence adapters and sessions.
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 250;

/// Human readable name shown as a post or comment author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`], trimming surrounding space.
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        let trimmed = display_name.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalised email address: trimmed and lowercased on construction so that
/// directory lookups are exact matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let normalised = email.into().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        let mut parts = normalised.split('@');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(local), Some(host), None) if !local.is_empty() && !host.is_empty() => {}
            _ => return Err(UserValidationError::InvalidEmail),
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Registered user.
///
/// ## Invariants
/// - `email` is unique across the directory.
/// - `admin` is assigned at creation (first registrant) and never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    name: DisplayName,
    email: EmailAddress,
    password: PasswordHash,
    admin: bool,
}

impl User {
    /// Assemble a user from directory-provided components.
    pub fn new(
        id: UserId,
        name: DisplayName,
        email: EmailAddress,
        password: PasswordHash,
        admin: bool,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password,
            admin,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name shown on authored posts and comments.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Normalised login email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Stored, non-reversible password credential.
    pub fn password(&self) -> &PasswordHash {
        &self.password
    }

    /// Whether this user holds the single administrator role.
    pub fn is_admin(&self) -> bool {
        self.admin
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("  Ada Lovelace  ", "Ada Lovelace")]
    #[case("Bob", "Bob")]
    fn display_names_are_trimmed(#[case] input: &str, #[case] expected: &str) {
        let name = DisplayName::new(input).expect("valid name");
        assert_eq!(name.as_ref(), expected);
    }

    #[rstest]
    fn blank_display_name_is_rejected() {
        let err = DisplayName::new("   ").expect_err("must fail");
        assert_eq!(err, UserValidationError::EmptyDisplayName);
    }

    #[rstest]
    #[case("Ada@Example.COM", "ada@example.com")]
    #[case("  bob@example.com ", "bob@example.com")]
    fn emails_are_normalised(#[case] input: &str, #[case] expected: &str) {
        let email = EmailAddress::new(input).expect("valid email");
        assert_eq!(email.as_ref(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("no-at-sign")]
    #[case("@host")]
    #[case("local@")]
    #[case("two@at@signs")]
    fn malformed_emails_are_rejected(#[case] input: &str) {
        assert!(EmailAddress::new(input).is_err());
    }

    #[rstest]
    fn normalised_emails_compare_equal() {
        let a = EmailAddress::new("Ada@Example.com").expect("valid");
        let b = EmailAddress::new("ada@example.COM").expect("valid");
        assert_eq!(a, b);
    }
}
