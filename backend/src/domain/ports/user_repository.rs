//! Port abstraction for user persistence adapters and their errors.
//!
//! The repository never touches `total_points`; that column belongs to the
//! ledger adapter.

use async_trait::async_trait;

use crate::domain::{EmailAddress, ListingRequest, NewUser, PasswordHash, User, UserId, UserProfileUpdate};

use super::{ListingSlice, define_port_error};

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email.
        DuplicateEmail { email: String } => "email {email} is already registered",
    }
}

/// Stored credential used by the login flow.
#[derive(Debug, Clone)]
pub struct StoredCredentials {
    /// Account the credential belongs to.
    pub user_id: UserId,
    /// Argon2 hash of the account password.
    pub password_hash: PasswordHash,
}

/// Driven port for user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user with a zero total and return it.
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Replace a user's profile. Returns `None` when the user is unknown.
    async fn update_profile(
        &self,
        id: UserId,
        update: &UserProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Delete a user and, by cascade, their ledger records. Returns whether a
    /// row was removed.
    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch the stored credential for a login email.
    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Newest-first listing filtered by name or email.
    async fn list(
        &self,
        request: &ListingRequest,
    ) -> Result<ListingSlice<User>, UserPersistenceError>;
}
