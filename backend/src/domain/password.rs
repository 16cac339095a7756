//! Password credential store: salted, iterated hashing and verification.
//!
//! Credentials are PBKDF2-SHA256 PHC strings. The salt and the iteration
//! count travel inside the credential, so verification never needs
//! out-of-band parameters and old credentials keep verifying if the
//! iteration floor is raised later.

use std::fmt;

use pbkdf2::password_hash::rand_core::OsRng;
use pbkdf2::password_hash::{PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::{Params, Pbkdf2};
use serde::{Deserialize, Serialize};

/// Iteration count for newly derived credentials.
///
/// Chosen to resist offline brute force on current hardware; raising it only
/// affects credentials hashed after the change.
pub const PBKDF2_ROUNDS: u32 = 600_000;

/// Errors raised while deriving a credential from a plaintext password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("password hashing failed: {message}")]
    Derivation { message: String },
}

/// Stored, non-reversible representation of a user's password.
///
/// The inner value is a PHC string (`$pbkdf2-sha256$i=…,l=…$salt$hash`).
/// [`PasswordHash::verify`] is total: malformed credentials verify as
/// `false`, never as a distinguishable error.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Derive a credential from a plaintext password with a fresh random
    /// salt and [`PBKDF2_ROUNDS`] iterations.
    pub fn derive(plaintext: &str) -> Result<Self, PasswordHashError> {
        if plaintext.is_empty() {
            return Err(PasswordHashError::EmptyPassword);
        }
        let salt = SaltString::generate(&mut OsRng);
        let params = Params {
            rounds: PBKDF2_ROUNDS,
            ..Params::default()
        };
        let hash = Pbkdf2
            .hash_password_customized(plaintext.as_bytes(), None, None, params, &salt)
            .map_err(|err| PasswordHashError::Derivation {
                message: err.to_string(),
            })?;
        Ok(Self(hash.to_string()))
    }

    /// Recompute the derivation with the credential's embedded salt and
    /// parameters and compare in constant time.
    ///
    /// Returns `false` for wrong passwords and for credentials that fail to
    /// parse; no error path is exposed to the caller.
    pub fn verify(&self, plaintext: &str) -> bool {
        let Ok(parsed) = pbkdf2::password_hash::PasswordHash::new(&self.0) else {
            return false;
        };
        Pbkdf2
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// Opaque stored form, handed to persistence adapters.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Rehydrate a credential previously produced by [`PasswordHash::derive`].
    ///
    /// No validation happens here: a corrupted stored value simply fails
    /// every [`PasswordHash::verify`] call.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

// Debug must not print the derived value.
impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
