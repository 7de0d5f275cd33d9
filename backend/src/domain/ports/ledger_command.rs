//! Driving port for ledger mutations.

use async_trait::async_trait;

use crate::domain::{Actor, Error, PointRecord, PointRecordId};

/// Unvalidated award fields as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointAwardRequest {
    /// Owner of the record.
    pub user_id: i64,
    /// Amount; must be positive.
    pub points: i64,
    /// Reason; must not be blank.
    pub action_type: String,
}

/// Award, revise and revoke use-cases.
///
/// Implementations check the access policy before touching storage, then
/// validate input before any write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerCommand: Send + Sync {
    /// Create a record and credit its owner.
    async fn award(&self, actor: &Actor, request: PointAwardRequest) -> Result<PointRecord, Error>;

    /// Rewrite a record, moving its points between owners as needed.
    async fn revise(
        &self,
        actor: &Actor,
        id: PointRecordId,
        request: PointAwardRequest,
    ) -> Result<PointRecord, Error>;

    /// Delete a record and debit its owner.
    async fn revoke(&self, actor: &Actor, id: PointRecordId) -> Result<(), Error>;
}
