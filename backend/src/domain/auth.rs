//! Authentication primitives: login credentials and password hashing.
//!
//! Plain-text passwords are held in [`Zeroizing`] buffers and only ever
//! leave this module as an argon2 PHC string.

use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash as PhcString, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use zeroize::Zeroizing;

use super::user::{EmailAddress, UserValidationError};

const PASSWORD_MIN: usize = 8;

/// Domain error returned when login or password input is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or malformed.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
    /// A new password was shorter than the minimum.
    PasswordTooShort {
        /// Minimum accepted length in characters.
        min: usize,
    },
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for LoginValidationError {}

impl From<UserValidationError> for LoginValidationError {
    fn from(_: UserValidationError) -> Self {
        Self::InvalidEmail
    }
}

/// Validated login credentials used by the login service.
///
/// # Examples
/// ```
/// use leaderboard::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Admin@Example.com", "secret").unwrap();
/// assert_eq!(creds.email().as_ref(), "admin@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    ///
    /// The password is only checked for presence; its length policy applies
    /// when it is set, not when it is presented.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the account lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password presented by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// A new password chosen for an account.
///
/// ## Invariants
/// - At least 8 characters.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a new password.
    pub fn new(raw: &str) -> Result<Self, LoginValidationError> {
        if raw.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        if raw.chars().count() < PASSWORD_MIN {
            return Err(LoginValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Failure while producing a password hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordHashError(String);

/// Argon2id PHC string stored alongside a user.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash `password` with a fresh random salt.
    ///
    /// # Examples
    /// ```
    /// use leaderboard::domain::{Password, PasswordHash};
    ///
    /// let password = Password::new("correct horse").unwrap();
    /// let hash = PasswordHash::hash(&password).unwrap();
    /// assert!(hash.verify("correct horse"));
    /// assert!(!hash.verify("wrong horse"));
    /// ```
    pub fn hash(password: &Password) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|phc| Self(phc.to_string()))
            .map_err(|err| PasswordHashError(err.to_string()))
    }

    /// Wrap a PHC string loaded from storage.
    pub fn from_stored(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Check `candidate` against the stored hash. Unparseable hashes never
    /// verify.
    pub fn verify(&self, candidate: &str) -> bool {
        PhcString::new(&self.0)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(candidate.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// PHC string for persistence.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
