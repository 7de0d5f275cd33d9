//! Port abstraction for the points ledger.
//!
//! Each mutating method is one atomic unit: the record change and every
//! owner-total adjustment it implies commit together or not at all. Adapters
//! report a missing user or record through the dedicated error variants after
//! rolling back.

use async_trait::async_trait;

use crate::domain::{ListingRequest, PointAward, PointEntry, PointRecord, PointRecordId, UserId};

use super::{ListingSlice, define_port_error};

define_port_error! {
    /// Persistence errors raised by ledger adapters.
    pub enum LedgerPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "ledger query failed: {message}",
        /// The referenced user does not exist.
        UserNotFound { user_id: i64 } => "user {user_id} not found",
        /// The referenced ledger record does not exist.
        RecordNotFound { record_id: i64 } => "point record {record_id} not found",
    }
}

/// Driven port for ledger records and the totals they drive.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Insert a record and add its points to the owner's total.
    async fn award(&self, award: &PointAward) -> Result<PointRecord, LedgerPersistenceError>;

    /// Subtract the record's current points from its current owner, rewrite
    /// the record, then add the new points to the new owner.
    async fn revise(
        &self,
        id: PointRecordId,
        award: &PointAward,
    ) -> Result<PointRecord, LedgerPersistenceError>;

    /// Subtract the record's points from its owner and delete it. Returns the
    /// removed record.
    async fn revoke(&self, id: PointRecordId) -> Result<PointRecord, LedgerPersistenceError>;

    /// Fetch one record with its owner.
    async fn find(&self, id: PointRecordId) -> Result<Option<PointEntry>, LedgerPersistenceError>;

    /// A user's records, newest first. `None` when the user does not exist.
    async fn history(
        &self,
        user_id: UserId,
    ) -> Result<Option<Vec<PointRecord>>, LedgerPersistenceError>;

    /// Newest-first listing filtered by action type or owner name.
    async fn list(
        &self,
        request: &ListingRequest,
    ) -> Result<ListingSlice<PointEntry>, LedgerPersistenceError>;
}
