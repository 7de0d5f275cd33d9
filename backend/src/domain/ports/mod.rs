//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters; driving
//! ports (`*Command`, `*Query`, [`LoginService`]) are implemented by domain
//! services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod leaderboard_query;
mod leaderboard_repository;
mod ledger_command;
mod ledger_query;
mod ledger_repository;
mod login_service;
mod user_command;
mod user_query;
mod user_repository;

#[cfg(test)]
pub use leaderboard_query::MockLeaderboardQuery;
pub use leaderboard_query::LeaderboardQuery;
#[cfg(test)]
pub use leaderboard_repository::MockLeaderboardRepository;
pub use leaderboard_repository::{LeaderboardPersistenceError, LeaderboardRepository};
#[cfg(test)]
pub use ledger_command::MockLedgerCommand;
pub use ledger_command::{LedgerCommand, PointAwardRequest};
#[cfg(test)]
pub use ledger_query::MockLedgerQuery;
pub use ledger_query::LedgerQuery;
#[cfg(test)]
pub use ledger_repository::MockLedgerRepository;
pub use ledger_repository::{LedgerPersistenceError, LedgerRepository};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use user_command::MockUserCommand;
pub use user_command::{CreateUserRequest, UpdateUserRequest, UserCommand};
#[cfg(test)]
pub use user_query::MockUserQuery;
pub use user_query::UserQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredCredentials, UserPersistenceError, UserRepository};

/// One page of rows as returned by a repository, plus the unpaginated count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSlice<T> {
    /// Rows on the requested page.
    pub items: Vec<T>,
    /// Number of rows matching the query across all pages.
    pub total: u64,
}
