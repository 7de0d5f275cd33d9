//! Shared validation helpers for inbound HTTP adapters.
//!
//! Field-level failures are reported as `invalid_request` with a
//! `{field, code}` details object so clients can highlight the offending
//! input.

use pagination::{PageRequest, PageRequestError};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{Error, ListingRequest, PointRecordId, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    OutOfRange,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::OutOfRange => "out_of_range",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {name}"),
    )
}

/// Unwrap a required body field.
pub(crate) fn require_field<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Validate `page`/`perPage` query parameters.
pub(crate) fn page_request(
    page: Option<u32>,
    per_page: Option<u32>,
    default_per_page: u32,
) -> Result<PageRequest, Error> {
    PageRequest::from_query(page, per_page, default_per_page).map_err(|err| {
        let field = match err {
            PageRequestError::ZeroPage => FieldName::new("page"),
            PageRequestError::PerPageOutOfRange { .. } => FieldName::new("perPage"),
        };
        field_error(field, ErrorCode::OutOfRange, err.to_string())
    })
}

/// Path ids that cannot name a stored row resolve to `404`.
pub(crate) fn parse_user_id(raw: i64) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|_| Error::not_found(format!("user {raw} not found")))
}

/// Path ids that cannot name a stored row resolve to `404`.
pub(crate) fn parse_point_id(raw: i64) -> Result<PointRecordId, Error> {
    PointRecordId::new(raw).map_err(|_| Error::not_found(format!("point record {raw} not found")))
}

/// Query string accepted by the searchable listings.
///
/// ```text
/// GET /api/v1/points?search=bonus&page=2&perPage=20
/// ```
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListingQuery {
    /// Case-insensitive substring filter.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size, 1 to 100.
    pub per_page: Option<u32>,
}

impl ListingQuery {
    pub(crate) fn into_request(self, default_per_page: u32) -> Result<ListingRequest, Error> {
        let page = page_request(self.page, self.per_page, default_per_page)?;
        Ok(ListingRequest::new(self.search, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;

    #[rstest]
    #[case(Some(0), None, "page")]
    #[case(None, Some(0), "perPage")]
    #[case(None, Some(101), "perPage")]
    fn page_request_reports_offending_field(
        #[case] page: Option<u32>,
        #[case] per_page: Option<u32>,
        #[case] field: &str,
    ) {
        let err = page_request(page, per_page, 15).expect_err("out of range");

        assert_eq!(err.code(), DomainCode::InvalidRequest);
        let details = err.details().expect("details");
        assert_eq!(details["field"], field);
        assert_eq!(details["code"], "out_of_range");
    }

    #[rstest]
    fn listing_query_defaults_to_configured_page_size() {
        let request = ListingQuery {
            search: Some(" ".to_owned()),
            ..ListingQuery::default()
        }
        .into_request(25)
        .expect("valid query");

        assert_eq!(request.page().per_page(), 25);
        assert_eq!(request.page().page(), 1);
        assert_eq!(request.search(), None);
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    fn non_positive_path_ids_are_not_found(#[case] raw: i64) {
        assert_eq!(
            parse_user_id(raw).expect_err("rejected").code(),
            DomainCode::NotFound
        );
        assert_eq!(
            parse_point_id(raw).expect_err("rejected").code(),
            DomainCode::NotFound
        );
    }

    #[rstest]
    fn missing_field_names_the_field() {
        let err = require_field::<String>(None, FieldName::new("email")).expect_err("missing");

        assert_eq!(err.message(), "missing required field: email");
        assert_eq!(err.details().expect("details")["code"], "missing_field");
    }
}
