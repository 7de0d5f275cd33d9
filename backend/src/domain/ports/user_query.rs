//! Driving port for account reads.

use async_trait::async_trait;

use crate::domain::{Error, ListingPage, ListingRequest, User, UserId};

/// Read-side account use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserQuery: Send + Sync {
    /// Searchable, newest-first account listing.
    async fn list_users(&self, request: ListingRequest) -> Result<ListingPage<User>, Error>;

    /// One account.
    async fn get_user(&self, id: UserId) -> Result<User, Error>;
}
