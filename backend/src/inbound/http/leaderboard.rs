//! Leaderboard handler.
//!
//! ```text
//! GET /api/v1/leaderboard?from=2025-11-01&to=2025-11-30&page=2
//! ```
//!
//! `from` and `to` are passed through untouched: the domain decides whether
//! they form a usable window, and an unusable pair simply disables the date
//! filter. Both are echoed back under `filters` and kept in page links.

use actix_web::{HttpRequest, get, web};
use serde::Deserialize;

use crate::domain::{LeaderboardFilter, LeaderboardPage, LeaderboardRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, LeaderboardPageSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::page_request;

/// Query string for `GET /api/v1/leaderboard`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LeaderboardParams {
    /// First day of the activity window (`YYYY-MM-DD` or RFC 3339).
    pub from: Option<String>,
    /// Last day of the activity window, inclusive.
    pub to: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size, 1 to 100.
    pub per_page: Option<u32>,
}

/// Users ranked by total points, ties broken by ascending id.
#[utoipa::path(
    get,
    path = "/api/v1/leaderboard",
    params(LeaderboardParams),
    responses(
        (status = 200, description = "Ranked users", body = LeaderboardPageSchema),
        (status = 400, description = "Invalid page parameters", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["leaderboard"],
    operation_id = "rankedUsers"
)]
#[get("/leaderboard")]
pub async fn ranked_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    query: web::Query<LeaderboardParams>,
) -> ApiResult<web::Json<LeaderboardPage>> {
    session.require_actor(&state).await?;
    let LeaderboardParams {
        from,
        to,
        page,
        per_page,
    } = query.into_inner();
    let request = LeaderboardRequest {
        filter: LeaderboardFilter { from, to },
        page: page_request(page, per_page, state.page_size)?,
    };
    let mut ranked = state.leaderboard.ranked_users(request).await?;
    ranked.users = ranked.users.with_links(&req.full_url());
    Ok(web::Json(ranked))
}
