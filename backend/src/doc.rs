//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer together
//! with the wrapper schemas from [`crate::inbound::http::schemas`], which
//! describe domain types without coupling them to utoipa. The document backs
//! Swagger UI in debug builds and the `openapi-dump` binary.

use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::points::PointBody;
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, LeaderboardFilterSchema, LeaderboardPageSchema, PageLinksSchema,
    PageMetaSchema, PointEntrySchema, PointListingSchema, PointOwnerSchema, PointRecordSchema,
    SearchFilterSchema, UserListingSchema, UserSchema, UserSummarySchema,
};
use crate::inbound::http::users::{CreateUserBody, UpdateUserBody};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Points leaderboard API",
        description = "Administer users, keep a ledger of point awards, and rank users by total points."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::point_history,
        crate::inbound::http::points::list_points,
        crate::inbound::http::points::award_points,
        crate::inbound::http::points::get_point,
        crate::inbound::http::points::revise_points,
        crate::inbound::http::points::revoke_points,
        crate::inbound::http::leaderboard::ranked_users,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserSchema,
        UserSummarySchema,
        PointRecordSchema,
        PointOwnerSchema,
        PointEntrySchema,
        PageMetaSchema,
        PageLinksSchema,
        SearchFilterSchema,
        LeaderboardFilterSchema,
        UserListingSchema,
        PointListingSchema,
        LeaderboardPageSchema,
        LoginRequest,
        CreateUserBody,
        UpdateUserBody,
        PointBody,
    )),
    tags(
        (name = "auth", description = "Session login and logout"),
        (name = "users", description = "User administration"),
        (name = "points", description = "Point ledger records"),
        (name = "leaderboard", description = "Users ranked by total points"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document's shape.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";
    const USER_SCHEMA_NAME: &str = "crate.domain.User";
    const POINT_SCHEMA_NAME: &str = "crate.domain.PointRecord";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case(ERROR_SCHEMA_NAME, &["code", "message", "traceId"])]
    #[case(USER_SCHEMA_NAME, &["id", "name", "email", "totalPoints"])]
    #[case(POINT_SCHEMA_NAME, &["id", "userId", "points", "actionType"])]
    fn schemas_expose_wire_fields(#[case] name: &str, #[case] fields: &[&str]) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(name).expect("schema registered");

        for field in fields {
            assert_object_schema_has_field(schema, field);
        }
    }

    #[rstest]
    #[case("/api/v1/login")]
    #[case("/api/v1/users/{id}")]
    #[case("/api/v1/users/{id}/points")]
    #[case("/api/v1/points/{id}")]
    #[case("/api/v1/leaderboard")]
    #[case("/health/ready")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn session_cookie_scheme_is_declared() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");

        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
