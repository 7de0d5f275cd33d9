//! Driving port for the ranking query.

use async_trait::async_trait;

use crate::domain::{Error, LeaderboardPage, LeaderboardRequest};

/// Ranked, paginated, optionally date-filtered user listing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeaderboardQuery: Send + Sync {
    /// Resolve one leaderboard page.
    async fn ranked_users(&self, request: LeaderboardRequest) -> Result<LeaderboardPage, Error>;
}
