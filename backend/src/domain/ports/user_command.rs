//! Driving port for account management.

use async_trait::async_trait;

use crate::domain::{Actor, Error, User, UserId};

/// Unvalidated fields for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Initial password.
    pub password: String,
}

/// Unvalidated profile replacement. `password` is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserRequest {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// New password, or `None` to keep the current one.
    pub password: Option<String>,
}

/// Administrator-only account mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCommand: Send + Sync {
    /// Register an account with a zero total.
    async fn create_user(&self, actor: &Actor, request: CreateUserRequest) -> Result<User, Error>;

    /// Replace an account's profile; totals are untouched.
    async fn update_user(
        &self,
        actor: &Actor,
        id: UserId,
        request: UpdateUserRequest,
    ) -> Result<User, Error>;

    /// Remove an account together with its ledger records.
    async fn delete_user(&self, actor: &Actor, id: UserId) -> Result<(), Error>;
}
