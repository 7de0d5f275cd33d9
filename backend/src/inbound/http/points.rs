//! Ledger record handlers.
//!
//! ```text
//! GET    /api/v1/points?search=quiz
//! POST   /api/v1/points {"userId":7,"points":50,"actionType":"Quiz"}
//! GET    /api/v1/points/31
//! PUT    /api/v1/points/31 {"userId":8,"points":30,"actionType":"Quiz"}
//! DELETE /api/v1/points/31
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::PointAwardRequest;
use crate::domain::{DEFAULT_ACTION_TYPE, Error, ListingPage, PointEntry, PointRecord};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    ErrorSchema, PointEntrySchema, PointListingSchema, PointRecordSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, ListingQuery, parse_point_id, require_field};

/// Body for awarding or revising a record.
///
/// `actionType` defaults to `"Manual Award"` when omitted; an explicit blank
/// value is rejected.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PointBody {
    #[schema(example = 7)]
    pub user_id: Option<i64>,
    #[schema(example = 50)]
    pub points: Option<i64>,
    #[schema(example = "Manual Award")]
    pub action_type: Option<String>,
}

impl TryFrom<PointBody> for PointAwardRequest {
    type Error = Error;

    fn try_from(body: PointBody) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: require_field(body.user_id, FieldName::new("userId"))?,
            points: require_field(body.points, FieldName::new("points"))?,
            action_type: body
                .action_type
                .unwrap_or_else(|| DEFAULT_ACTION_TYPE.to_owned()),
        })
    }
}

/// Searchable, newest-first ledger listing with owner names.
#[utoipa::path(
    get,
    path = "/api/v1/points",
    params(ListingQuery),
    responses(
        (status = 200, description = "Ledger records", body = PointListingSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["points"],
    operation_id = "listPoints"
)]
#[get("/points")]
pub async fn list_points(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    query: web::Query<ListingQuery>,
) -> ApiResult<web::Json<ListingPage<PointEntry>>> {
    session.require_actor(&state).await?;
    let request = query.into_inner().into_request(state.page_size)?;
    let mut page = state.ledger_query.list_points(request).await?;
    page.items = page.items.with_links(&req.full_url());
    Ok(web::Json(page))
}

/// Award points and credit the owner's total.
#[utoipa::path(
    post,
    path = "/api/v1/points",
    request_body = PointBody,
    responses(
        (status = 201, description = "Awarded", body = PointRecordSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Owner not found", body = ErrorSchema)
    ),
    tags = ["points"],
    operation_id = "awardPoints"
)]
#[post("/points")]
pub async fn award_points(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PointBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor(&state).await?;
    let request = PointAwardRequest::try_from(payload.into_inner())?;
    let record = state.ledger.award(&actor, request).await?;
    Ok(HttpResponse::Created().json(record))
}

/// Fetch one record with its owner.
#[utoipa::path(
    get,
    path = "/api/v1/points/{id}",
    params(("id" = i64, Path, description = "Record id")),
    responses(
        (status = 200, description = "Ledger record", body = PointEntrySchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["points"],
    operation_id = "getPoint"
)]
#[get("/points/{id}")]
pub async fn get_point(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<PointEntry>> {
    session.require_actor(&state).await?;
    let id = parse_point_id(path.into_inner())?;
    Ok(web::Json(state.ledger_query.get_point(id).await?))
}

/// Rewrite a record, moving its points between owners. Administrator only.
#[utoipa::path(
    put,
    path = "/api/v1/points/{id}",
    params(("id" = i64, Path, description = "Record id")),
    request_body = PointBody,
    responses(
        (status = 200, description = "Revised", body = PointRecordSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Record or owner not found", body = ErrorSchema)
    ),
    tags = ["points"],
    operation_id = "revisePoints"
)]
#[put("/points/{id}")]
pub async fn revise_points(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<PointBody>,
) -> ApiResult<web::Json<PointRecord>> {
    let actor = session.require_actor(&state).await?;
    let id = parse_point_id(path.into_inner())?;
    let request = PointAwardRequest::try_from(payload.into_inner())?;
    Ok(web::Json(state.ledger.revise(&actor, id, request).await?))
}

/// Delete a record and debit its owner. Administrator only.
#[utoipa::path(
    delete,
    path = "/api/v1/points/{id}",
    params(("id" = i64, Path, description = "Record id")),
    responses(
        (status = 204, description = "Revoked"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["points"],
    operation_id = "revokePoints"
)]
#[delete("/points/{id}")]
pub async fn revoke_points(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor(&state).await?;
    let id = parse_point_id(path.into_inner())?;
    state.ledger.revoke(&actor, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "points_tests.rs"]
mod tests;
