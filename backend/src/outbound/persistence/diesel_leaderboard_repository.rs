//! PostgreSQL-backed `LeaderboardRepository` implementation.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{LeaderboardPersistenceError, LeaderboardRepository, ListingSlice};
use crate::domain::{UpdatedWindow, UserSummary};

use super::diesel_helpers::{
    collect_rows, count_to_total, limit_offset, map_diesel_error, map_pool_error,
};
use super::models::UserRow;
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the leaderboard repository port.
#[derive(Clone)]
pub struct DieselLeaderboardRepository {
    pool: DbPool,
}

impl DieselLeaderboardRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_diesel(error: diesel::result::Error) -> LeaderboardPersistenceError {
    map_diesel_error(
        error,
        LeaderboardPersistenceError::query,
        LeaderboardPersistenceError::connection,
    )
}

fn windowed_users(window: Option<UpdatedWindow>) -> users::BoxedQuery<'static, Pg> {
    let query = users::table.into_boxed();
    match window {
        Some(bounds) => query.filter(users::updated_at.between(bounds.start(), bounds.end())),
        None => query,
    }
}

#[async_trait]
impl LeaderboardRepository for DieselLeaderboardRepository {
    async fn ranked_users(
        &self,
        window: Option<UpdatedWindow>,
        page: PageRequest,
    ) -> Result<ListingSlice<UserSummary>, LeaderboardPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, LeaderboardPersistenceError::connection))?;
        let (limit, offset) = limit_offset(page);

        let count: i64 = windowed_users(window)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;
        let rows: Vec<UserRow> = windowed_users(window)
            .select(UserRow::as_select())
            .order((users::total_points.desc(), users::id.asc()))
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(ListingSlice {
            items: collect_rows(
                rows.into_iter().map(UserSummary::try_from),
                LeaderboardPersistenceError::query,
            )?,
            total: count_to_total(count),
        })
    }
}
