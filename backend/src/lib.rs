//! Points ledger and leaderboard backend.
//!
//! Administrators award, revise, and revoke points; every user's
//! `total_points` stays equal to the sum of their ledger records, and users
//! are ranked by that total.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
