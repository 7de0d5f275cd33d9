//! Driving port for ledger reads.

use async_trait::async_trait;

use crate::domain::{Error, ListingPage, ListingRequest, PointEntry, PointRecord, PointRecordId, UserId};

/// Read-side ledger use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Every record of a user, newest first.
    async fn point_history(&self, user_id: UserId) -> Result<Vec<PointRecord>, Error>;

    /// Searchable, paginated record listing.
    async fn list_points(&self, request: ListingRequest) -> Result<ListingPage<PointEntry>, Error>;

    /// One record with its owner.
    async fn get_point(&self, id: PointRecordId) -> Result<PointEntry, Error>;
}
