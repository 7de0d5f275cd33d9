//! Shared helpers for Diesel repository implementations.
//!
//! - Pool and Diesel error mapping into port error constructors
//! - `ILIKE` pattern escaping for substring search
//! - Page arithmetic conversions into SQL `LIMIT`/`OFFSET` values

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use pagination::PageRequest;
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel errors onto query/connection constructors.
///
/// Callers that care about a specific database error kind (unique or foreign
/// key violations) match on it first and fall back to this helper.
pub(crate) fn map_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
            query("concurrent update conflict")
        }
        _ => query("database error"),
    }
}

/// Whether `error` is a unique violation on `constraint`.
pub(crate) fn is_unique_violation(error: &DieselError, constraint: &str) -> bool {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => info
            .constraint_name()
            .is_none_or(|name| name == constraint),
        _ => false,
    }
}

/// Build an `ILIKE` pattern matching `needle` as a literal substring.
///
/// `%`, `_` and the escape character itself are escaped with a backslash,
/// PostgreSQL's default `LIKE` escape.
///
/// # Examples
/// ```ignore
/// assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
/// ```
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// `LIMIT` and `OFFSET` for a page, saturating at `i64::MAX`.
pub(crate) fn limit_offset(page: PageRequest) -> (i64, i64) {
    let limit = i64::try_from(page.limit()).unwrap_or(i64::MAX);
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
    (limit, offset)
}

/// Convert a `COUNT(*)` result into the page total.
pub(crate) fn count_to_total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

/// Collect row conversion results, mapping the first error through `map_err`.
pub(crate) fn collect_rows<T, E>(
    results: impl Iterator<Item = Result<T, String>>,
    map_err: impl FnOnce(String) -> E,
) -> Result<Vec<T>, E> {
    results.collect::<Result<Vec<_>, _>>().map_err(map_err)
}
