//! Leaderboard ranking service.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Page;
use tracing::debug;

use crate::domain::ports::{LeaderboardPersistenceError, LeaderboardQuery, LeaderboardRepository};
use crate::domain::{Error, LeaderboardPage, LeaderboardRequest};

fn map_repository_error(error: LeaderboardPersistenceError) -> Error {
    match error {
        LeaderboardPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("leaderboard unavailable: {message}"))
        }
        LeaderboardPersistenceError::Query { message } => {
            Error::internal(format!("leaderboard error: {message}"))
        }
    }
}

/// Ranks users by total points, highest first, ties broken by ascending id.
#[derive(Clone)]
pub struct LeaderboardService<R> {
    repo: Arc<R>,
}

impl<R> LeaderboardService<R> {
    /// Create a service backed by `repo`.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> LeaderboardQuery for LeaderboardService<R>
where
    R: LeaderboardRepository,
{
    async fn ranked_users(&self, request: LeaderboardRequest) -> Result<LeaderboardPage, Error> {
        let window = request.filter.window();
        debug!(filtered = window.is_some(), page = request.page.page(), "ranking users");
        let slice = self
            .repo
            .ranked_users(window, request.page)
            .await
            .map_err(map_repository_error)?;
        Ok(LeaderboardPage {
            users: Page::new(slice.items, request.page, slice.total),
            filters: request.filter,
        })
    }
}
