//! User management handlers.
//!
//! ```text
//! GET    /api/v1/users?search=ada&page=1
//! POST   /api/v1/users {"name":"Ada","email":"ada@example.com","password":"..."}
//! GET    /api/v1/users/7
//! PUT    /api/v1/users/7 {"name":"Ada","email":"ada@example.com"}
//! DELETE /api/v1/users/7
//! GET    /api/v1/users/7/points
//! ```
//!
//! Every handler resolves the acting user from the session first, so a
//! request without a valid session is answered with `401` before anything
//! else is looked at.

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{CreateUserRequest, UpdateUserRequest};
use crate::domain::{ListingPage, PointRecord, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, PointRecordSchema, UserListingSchema, UserSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, ListingQuery, parse_user_id, require_field};

/// Body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserBody {
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    /// At least 8 characters.
    pub password: Option<String>,
}

impl TryFrom<CreateUserBody> for CreateUserRequest {
    type Error = crate::domain::Error;

    fn try_from(body: CreateUserBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: require_field(body.name, FieldName::new("name"))?,
            email: require_field(body.email, FieldName::new("email"))?,
            password: require_field(body.password, FieldName::new("password"))?,
        })
    }
}

/// Body for `PUT /api/v1/users/{id}`. Omit `password` to keep the current
/// one.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<UpdateUserBody> for UpdateUserRequest {
    type Error = crate::domain::Error;

    fn try_from(body: UpdateUserBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: require_field(body.name, FieldName::new("name"))?,
            email: require_field(body.email, FieldName::new("email"))?,
            password: body.password,
        })
    }
}

/// Searchable, newest-first user listing.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(ListingQuery),
    responses(
        (status = 200, description = "Users", body = UserListingSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
    query: web::Query<ListingQuery>,
) -> ApiResult<web::Json<ListingPage<User>>> {
    session.require_actor(&state).await?;
    let request = query.into_inner().into_request(state.page_size)?;
    let mut page = state.users_query.list_users(request).await?;
    page.items = page.items.with_links(&req.full_url());
    Ok(web::Json(page))
}

/// Register a user with zero points. Administrator only.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserBody,
    responses(
        (status = 201, description = "Created", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateUserBody>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor(&state).await?;
    let request = CreateUserRequest::try_from(payload.into_inner())?;
    let user = state.users.create_user(&actor, request).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<User>> {
    session.require_actor(&state).await?;
    let id = parse_user_id(path.into_inner())?;
    Ok(web::Json(state.users_query.get_user(id).await?))
}

/// Replace a user's profile. Administrator only; totals are untouched.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserBody,
    responses(
        (status = 200, description = "Updated", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<UpdateUserBody>,
) -> ApiResult<web::Json<User>> {
    let actor = session.require_actor(&state).await?;
    let id = parse_user_id(path.into_inner())?;
    let request = UpdateUserRequest::try_from(payload.into_inner())?;
    Ok(web::Json(state.users.update_user(&actor, id, request).await?))
}

/// Delete a user and their ledger records. Administrator only, and never
/// the caller's own account.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_actor(&state).await?;
    let id = parse_user_id(path.into_inner())?;
    state.users.delete_user(&actor, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Every ledger record of a user, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/points",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Point history", body = [PointRecordSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "pointHistory"
)]
#[get("/users/{id}/points")]
pub async fn point_history(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<PointRecord>>> {
    session.require_actor(&state).await?;
    let id = parse_user_id(path.into_inner())?;
    Ok(web::Json(state.ledger_query.point_history(id).await?))
}
