//! Read-only port backing the ranking query.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{UpdatedWindow, UserSummary};

use super::{ListingSlice, define_port_error};

define_port_error! {
    /// Persistence errors raised by leaderboard adapters.
    pub enum LeaderboardPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "leaderboard connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "leaderboard query failed: {message}",
    }
}

/// Driven port returning users ordered by `total_points` descending, then id
/// ascending.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeaderboardRepository: Send + Sync {
    /// One page of ranked users, restricted to `window` when present.
    async fn ranked_users(
        &self,
        window: Option<UpdatedWindow>,
        page: PageRequest,
    ) -> Result<ListingSlice<UserSummary>, LeaderboardPersistenceError>;
}
