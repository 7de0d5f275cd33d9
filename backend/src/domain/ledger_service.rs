//! Ledger domain service.
//!
//! Implements the award/revise/revoke commands and the ledger read model on
//! top of [`LedgerRepository`]. Every command runs the access policy first,
//! then validates input, and only then reaches storage, so a refused or
//! malformed request has no side effects.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Page;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    LedgerCommand, LedgerPersistenceError, LedgerQuery, LedgerRepository, PointAwardRequest,
};
use crate::domain::{
    AccessPolicy, ActionType, Actor, Error, ListingPage, ListingRequest, Operation, PointAward,
    PointEntry, PointRecord, PointRecordId, PointsAmount, PointsValidationError, Target, UserId,
};

fn map_ledger_error(error: LedgerPersistenceError) -> Error {
    match error {
        LedgerPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("ledger unavailable: {message}"))
        }
        LedgerPersistenceError::Query { message } => {
            Error::internal(format!("ledger error: {message}"))
        }
        LedgerPersistenceError::UserNotFound { user_id } => {
            Error::not_found(format!("user {user_id} not found"))
        }
        LedgerPersistenceError::RecordNotFound { record_id } => {
            Error::not_found(format!("point record {record_id} not found"))
        }
    }
}

fn points_validation_error(field: &'static str, error: &PointsValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

/// Validate raw award fields.
///
/// A non-positive `user_id` cannot name a stored user, so it surfaces as
/// `NotFound` rather than a validation failure.
fn validate_award(request: PointAwardRequest) -> Result<PointAward, Error> {
    let PointAwardRequest {
        user_id,
        points,
        action_type,
    } = request;
    let points = PointsAmount::new(points).map_err(|err| points_validation_error("points", &err))?;
    let action_type =
        ActionType::new(action_type).map_err(|err| points_validation_error("actionType", &err))?;
    let user_id =
        UserId::new(user_id).map_err(|_| Error::not_found(format!("user {user_id} not found")))?;
    Ok(PointAward {
        user_id,
        points,
        action_type,
    })
}

/// Ledger service implementing [`LedgerCommand`] and [`LedgerQuery`].
#[derive(Clone)]
pub struct LedgerService<L> {
    ledger: Arc<L>,
    policy: Arc<AccessPolicy>,
}

impl<L> LedgerService<L> {
    /// Create a service over `ledger`, gated by `policy`.
    pub fn new(ledger: Arc<L>, policy: Arc<AccessPolicy>) -> Self {
        Self { ledger, policy }
    }
}

#[async_trait]
impl<L> LedgerCommand for LedgerService<L>
where
    L: LedgerRepository,
{
    async fn award(&self, actor: &Actor, request: PointAwardRequest) -> Result<PointRecord, Error> {
        let award = validate_award(request)?;
        self.policy.require(
            actor,
            Operation::AwardPoints,
            Target::NewPointRecord(award.user_id),
        )?;

        let record = self.ledger.award(&award).await.map_err(map_ledger_error)?;
        info!(
            actor_id = %actor.id(),
            record_id = %record.id,
            user_id = %record.user_id,
            points = record.points.get(),
            "points awarded"
        );
        Ok(record)
    }

    async fn revise(
        &self,
        actor: &Actor,
        id: PointRecordId,
        request: PointAwardRequest,
    ) -> Result<PointRecord, Error> {
        self.policy
            .require(actor, Operation::RevisePoints, Target::PointRecord(id))?;
        let award = validate_award(request)?;

        let record = self
            .ledger
            .revise(id, &award)
            .await
            .map_err(map_ledger_error)?;
        info!(
            actor_id = %actor.id(),
            record_id = %record.id,
            user_id = %record.user_id,
            points = record.points.get(),
            "points revised"
        );
        Ok(record)
    }

    async fn revoke(&self, actor: &Actor, id: PointRecordId) -> Result<(), Error> {
        self.policy
            .require(actor, Operation::RevokePoints, Target::PointRecord(id))?;

        let removed = self.ledger.revoke(id).await.map_err(map_ledger_error)?;
        info!(
            actor_id = %actor.id(),
            record_id = %removed.id,
            user_id = %removed.user_id,
            points = removed.points.get(),
            "points revoked"
        );
        Ok(())
    }
}

#[async_trait]
impl<L> LedgerQuery for LedgerService<L>
where
    L: LedgerRepository,
{
    async fn point_history(&self, user_id: UserId) -> Result<Vec<PointRecord>, Error> {
        self.ledger
            .history(user_id)
            .await
            .map_err(map_ledger_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }

    async fn list_points(&self, request: ListingRequest) -> Result<ListingPage<PointEntry>, Error> {
        let slice = self.ledger.list(&request).await.map_err(map_ledger_error)?;
        Ok(ListingPage {
            items: Page::new(slice.items, request.page(), slice.total),
            filters: request.filter(),
        })
    }

    async fn get_point(&self, id: PointRecordId) -> Result<PointEntry, Error> {
        self.ledger
            .find(id)
            .await
            .map_err(map_ledger_error)?
            .ok_or_else(|| Error::not_found(format!("point record {id} not found")))
    }
}

#[cfg(test)]
#[path = "ledger_service_tests.rs"]
mod tests;
