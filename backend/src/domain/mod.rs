//! Domain primitives, services, and ports.
//!
//! Purpose: define the strongly typed entities of the points ledger and the
//! services that keep `User::total_points` equal to the sum of the user's
//! ledger records. Inbound adapters call the driving ports in [`ports`];
//! outbound adapters implement the driven ones.
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: transport-agnostic failure payload.
//! - [`User`], [`PointRecord`], [`UserSummary`]: read models.
//! - [`AccessPolicy`]: authorization predicate for every mutation.
//! - [`LedgerService`], [`UserService`], [`LeaderboardService`]: use-cases.

pub mod access_policy;
pub mod auth;
pub mod error;
pub mod leaderboard;
pub mod leaderboard_service;
pub mod ledger_service;
pub mod listing;
pub mod points;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::access_policy::{
    AccessPolicy, Actor, AdminIdentity, Decision, DenialReason, Operation, Target,
};
pub use self::auth::{
    LoginCredentials, LoginValidationError, Password, PasswordHash, PasswordHashError,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::leaderboard::{
    LeaderboardFilter, LeaderboardPage, LeaderboardRequest, UpdatedWindow, UserSummary,
    parse_calendar_date,
};
pub use self::leaderboard_service::LeaderboardService;
pub use self::ledger_service::LedgerService;
pub use self::listing::{ListingPage, ListingRequest, SearchFilter};
pub use self::points::{
    ActionType, DEFAULT_ACTION_TYPE, PointAward, PointEntry, PointOwner, PointRecord,
    PointRecordId, PointsAmount, PointsValidationError,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, NewUser, User, UserDraft, UserId, UserName, UserProfileUpdate,
    UserValidationError,
};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use leaderboard::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
