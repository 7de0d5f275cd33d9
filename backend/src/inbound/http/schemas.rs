//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module mirrors their serialised shape for the OpenAPI document using
//! utoipa's external schema registration.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request collides with existing data.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "forbidden")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Please login as super admin!")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details, such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    #[schema(example = 7)]
    id: i64,
    #[schema(example = "Ada Lovelace")]
    name: String,
    #[schema(example = "ada@example.com")]
    email: String,
    /// Sum of the user's ledger records.
    #[schema(example = 120)]
    total_points: i64,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

/// OpenAPI schema for [`crate::domain::UserSummary`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserSummary, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSummarySchema {
    id: i64,
    name: String,
    email: String,
    total_points: i64,
    updated_at: chrono::DateTime<chrono::Utc>,
}

/// OpenAPI schema for [`crate::domain::PointRecord`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PointRecord, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PointRecordSchema {
    #[schema(example = 31)]
    id: i64,
    #[schema(example = 7)]
    user_id: i64,
    /// Always positive.
    #[schema(example = 50, minimum = 1)]
    points: i32,
    #[schema(example = "Manual Award")]
    action_type: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

/// OpenAPI schema for [`crate::domain::PointOwner`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PointOwner)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PointOwnerSchema {
    id: i64,
    name: String,
}

/// OpenAPI schema for [`crate::domain::PointEntry`]: the record's fields
/// plus its owner.
#[derive(ToSchema)]
#[schema(as = crate::domain::PointEntry, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PointEntrySchema {
    id: i64,
    user_id: i64,
    points: i32,
    action_type: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    user: PointOwnerSchema,
}

/// OpenAPI schema for `pagination::PageMeta`.
#[derive(ToSchema)]
#[schema(as = pagination::PageMeta, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PageMetaSchema {
    #[schema(example = 1)]
    current_page: u32,
    #[schema(example = 15)]
    per_page: u32,
    total: u64,
    last_page: u32,
    from: Option<u64>,
    to: Option<u64>,
}

/// OpenAPI schema for `pagination::PageLinks`.
#[derive(ToSchema)]
#[schema(as = pagination::PageLinks)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PageLinksSchema {
    first: Option<String>,
    last: Option<String>,
    prev: Option<String>,
    next: Option<String>,
}

/// Search echo returned with user and point listings.
#[derive(ToSchema)]
#[schema(as = crate::domain::SearchFilter)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SearchFilterSchema {
    search: Option<String>,
}

/// Raw date filter echoed with a leaderboard page.
#[derive(ToSchema)]
#[schema(as = crate::domain::LeaderboardFilter)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct LeaderboardFilterSchema {
    #[schema(example = "2025-11-01")]
    from: Option<String>,
    #[schema(example = "2025-11-30")]
    to: Option<String>,
}

/// Paginated user listing.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserListingSchema {
    data: Vec<UserSchema>,
    meta: PageMetaSchema,
    links: PageLinksSchema,
    filters: SearchFilterSchema,
}

/// Paginated ledger listing.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PointListingSchema {
    data: Vec<PointEntrySchema>,
    meta: PageMetaSchema,
    links: PageLinksSchema,
    filters: SearchFilterSchema,
}

/// One ranked leaderboard page.
#[derive(ToSchema)]
#[schema(as = crate::domain::LeaderboardPage)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct LeaderboardPageSchema {
    data: Vec<UserSummarySchema>,
    meta: PageMetaSchema,
    links: PageLinksSchema,
    filters: LeaderboardFilterSchema,
}
