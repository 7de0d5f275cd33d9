//! User identity and profile primitives.
//!
//! Every constructor validates its input so services and adapters can rely on
//! the invariants documented on each type. A user's `total_points` is a cached
//! aggregate owned by the ledger; nothing in this module changes it.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::auth::PasswordHash;

const NAME_MAX: usize = 255;
const EMAIL_MIN: usize = 3;
const EMAIL_MAX: usize = 255;

/// Validation errors raised by user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Identifiers are positive database keys.
    NonPositiveId,
    /// Name was blank once trimmed.
    EmptyName,
    /// Name exceeded the column width.
    NameTooLong {
        /// Maximum permitted length in characters.
        max: usize,
    },
    /// Email length fell outside the accepted range.
    EmailLength {
        /// Minimum permitted length in characters.
        min: usize,
        /// Maximum permitted length in characters.
        max: usize,
    },
    /// Email lacked a single `@` between non-empty parts.
    InvalidEmail,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId => write!(f, "user id must be a positive integer"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::EmailLength { min, max } => {
                write!(f, "email must be between {min} and {max} characters")
            }
            Self::InvalidEmail => write!(f, "email must be a valid address"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Database identifier of a user.
///
/// # Examples
/// ```
/// use leaderboard::domain::UserId;
///
/// assert_eq!(UserId::new(7).unwrap().as_i64(), 7);
/// assert!(UserId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Validate a raw identifier.
    pub fn new(id: i64) -> Result<Self, UserValidationError> {
        if id <= 0 {
            return Err(UserValidationError::NonPositiveId);
        }
        Ok(Self(id))
    }

    /// Raw integer key.
    #[must_use]
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Human-readable user name.
///
/// ## Invariants
/// - Trimmed, non-empty, at most 255 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate and normalise a name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

/// Login email address, stored lower-cased.
///
/// ## Invariants
/// - 3..=255 characters after trimming.
/// - Exactly one `@` with non-empty local and domain parts and no whitespace.
///
/// # Examples
/// ```
/// use leaderboard::domain::EmailAddress;
///
/// let email = EmailAddress::new(" Ada@Example.COM ").unwrap();
/// assert_eq!(email.as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        let length = normalised.chars().count();
        if !(EMAIL_MIN..=EMAIL_MAX).contains(&length) {
            return Err(UserValidationError::EmailLength {
                min: EMAIL_MIN,
                max: EMAIL_MAX,
            });
        }
        if normalised.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        match normalised.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(normalised))
            }
            _ => Err(UserValidationError::InvalidEmail),
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Stored user as exposed to callers. Credentials never leave the store
/// through this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    name: UserName,
    email: EmailAddress,
    total_points: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Field bundle for [`User::new`].
#[derive(Debug, Clone)]
pub struct UserDraft {
    /// Identifier.
    pub id: UserId,
    /// Display name.
    pub name: UserName,
    /// Login email.
    pub email: EmailAddress,
    /// Cached ledger sum.
    pub total_points: i64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last profile or ledger change.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Assemble a user from validated parts.
    #[must_use]
    pub fn new(draft: UserDraft) -> Self {
        let UserDraft {
            id,
            name,
            email,
            total_points,
            created_at,
            updated_at,
        } = draft;
        Self {
            id,
            name,
            email,
            total_points,
            created_at,
            updated_at,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Login email.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Sum of the user's ledger records.
    #[must_use]
    pub fn total_points(&self) -> i64 {
        self.total_points
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the last profile or ledger change.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Insert payload for a brand-new user; totals start at zero.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: UserName,
    /// Unique login email.
    pub email: EmailAddress,
    /// Argon2 hash of the initial password.
    pub password_hash: PasswordHash,
}

/// Profile changes applied by an administrator.
///
/// `password_hash` is `None` when the password is left unchanged.
#[derive(Debug, Clone)]
pub struct UserProfileUpdate {
    /// Replacement name.
    pub name: UserName,
    /// Replacement email; must stay unique.
    pub email: EmailAddress,
    /// Replacement credential.
    pub password_hash: Option<PasswordHash>,
}

#[cfg(test)]
mod tests;
