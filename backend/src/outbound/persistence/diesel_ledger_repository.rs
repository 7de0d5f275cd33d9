//! PostgreSQL-backed `LedgerRepository` implementation using Diesel ORM.
//!
//! Each mutation runs in one transaction. The ledger record (when one exists)
//! is locked first, then every affected user row with `SELECT ... FOR UPDATE`
//! in ascending id order. Totals are adjusted in place with
//! `total_points = total_points + $n`, so concurrent awards never lose an
//! increment and revise/revoke on a shared user serialise without deadlock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::{InnerJoin, IntoBoxed};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{LedgerPersistenceError, LedgerRepository, ListingSlice};
use crate::domain::{
    ListingRequest, PointAward, PointEntry, PointOwner, PointRecord, PointRecordId, UserId,
};

use super::diesel_helpers::{
    collect_rows, contains_pattern, count_to_total, limit_offset, map_diesel_error,
    map_pool_error,
};
use super::models::{NewPointRow, OwnerRow, PointChangeset, PointRow};
use super::pool::{DbPool, PoolError};
use super::schema::{points, users};

/// Diesel-backed implementation of the ledger repository port.
#[derive(Clone)]
pub struct DieselLedgerRepository {
    pool: DbPool,
}

impl DieselLedgerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside a ledger transaction; either aborts and rolls back.
#[derive(Debug)]
enum TxError {
    Diesel(diesel::result::Error),
    Ledger(LedgerPersistenceError),
}

impl From<diesel::result::Error> for TxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<LedgerPersistenceError> for TxError {
    fn from(error: LedgerPersistenceError) -> Self {
        Self::Ledger(error)
    }
}

fn map_pool(error: PoolError) -> LedgerPersistenceError {
    map_pool_error(error, LedgerPersistenceError::connection)
}

fn map_diesel(error: diesel::result::Error) -> LedgerPersistenceError {
    map_diesel_error(
        error,
        LedgerPersistenceError::query,
        LedgerPersistenceError::connection,
    )
}

fn map_tx(error: TxError) -> LedgerPersistenceError {
    match error {
        TxError::Diesel(inner) => map_diesel(inner),
        TxError::Ledger(inner) => inner,
    }
}

fn to_record(row: PointRow) -> Result<PointRecord, LedgerPersistenceError> {
    PointRecord::try_from(row).map_err(LedgerPersistenceError::query)
}

fn to_entry((point, owner): (PointRow, OwnerRow)) -> Result<PointEntry, String> {
    Ok(PointEntry {
        record: PointRecord::try_from(point)?,
        user: PointOwner::try_from(owner)?,
    })
}

/// Lock the given user rows in ascending id order and fail with
/// `UserNotFound` naming `required` when it is absent.
async fn lock_users(
    conn: &mut AsyncPgConnection,
    ids: &[i64],
    required: i64,
) -> Result<(), TxError> {
    let mut ordered = ids.to_vec();
    ordered.sort_unstable();
    ordered.dedup();
    let locked: Vec<i64> = users::table
        .filter(users::id.eq_any(ordered))
        .order(users::id.asc())
        .select(users::id)
        .for_update()
        .load(conn)
        .await?;
    if !locked.contains(&required) {
        return Err(LedgerPersistenceError::user_not_found(required).into());
    }
    Ok(())
}

async fn lock_record(
    conn: &mut AsyncPgConnection,
    id: PointRecordId,
) -> Result<PointRow, TxError> {
    points::table
        .find(id.as_i64())
        .select(PointRow::as_select())
        .for_update()
        .first(conn)
        .await
        .optional()?
        .ok_or_else(|| LedgerPersistenceError::record_not_found(id.as_i64()).into())
}

async fn adjust_total(
    conn: &mut AsyncPgConnection,
    user_id: i64,
    delta: i64,
    now: DateTime<Utc>,
) -> Result<(), TxError> {
    diesel::update(users::table.find(user_id))
        .set((
            users::total_points.eq(users::total_points + delta),
            users::updated_at.eq(now),
        ))
        .execute(conn)
        .await?;
    Ok(())
}

type EntrySource = InnerJoin<points::table, users::table>;

/// Ledger entries matching the optional search on action type or owner name.
fn searched_entries(search: Option<&str>) -> IntoBoxed<'static, EntrySource, Pg> {
    let mut query = points::table.inner_join(users::table).into_boxed();
    if let Some(needle) = search {
        let pattern = contains_pattern(needle);
        query = query.filter(
            points::action_type
                .ilike(pattern.clone())
                .or(users::name.ilike(pattern)),
        );
    }
    query
}

#[async_trait]
impl LedgerRepository for DieselLedgerRepository {
    async fn award(&self, award: &PointAward) -> Result<PointRecord, LedgerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let owner = award.user_id.as_i64();
        let row = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    lock_users(conn, &[owner], owner).await?;
                    let now = Utc::now();
                    let inserted: PointRow = diesel::insert_into(points::table)
                        .values(&NewPointRow {
                            user_id: owner,
                            points: award.points.get(),
                            action_type: award.action_type.as_ref(),
                            created_at: now,
                            updated_at: now,
                        })
                        .returning(PointRow::as_returning())
                        .get_result(conn)
                        .await?;
                    adjust_total(conn, owner, award.points.as_i64(), now).await?;
                    Ok(inserted)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_tx)?;
        debug!(record_id = row.id, user_id = owner, "ledger award committed");
        to_record(row)
    }

    async fn revise(
        &self,
        id: PointRecordId,
        award: &PointAward,
    ) -> Result<PointRecord, LedgerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let new_owner = award.user_id.as_i64();
        let row = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    let existing = lock_record(conn, id).await?;
                    lock_users(conn, &[existing.user_id, new_owner], new_owner).await?;
                    let now = Utc::now();
                    adjust_total(conn, existing.user_id, -i64::from(existing.points), now)
                        .await?;
                    let revised: PointRow = diesel::update(points::table.find(id.as_i64()))
                        .set(&PointChangeset {
                            user_id: new_owner,
                            points: award.points.get(),
                            action_type: award.action_type.as_ref(),
                            updated_at: now,
                        })
                        .returning(PointRow::as_returning())
                        .get_result(conn)
                        .await?;
                    adjust_total(conn, new_owner, award.points.as_i64(), now).await?;
                    Ok(revised)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_tx)?;
        debug!(record_id = row.id, user_id = new_owner, "ledger revise committed");
        to_record(row)
    }

    async fn revoke(&self, id: PointRecordId) -> Result<PointRecord, LedgerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = conn
            .transaction::<_, TxError, _>(|conn| {
                async move {
                    let existing = lock_record(conn, id).await?;
                    lock_users(conn, &[existing.user_id], existing.user_id).await?;
                    diesel::delete(points::table.find(id.as_i64()))
                        .execute(conn)
                        .await?;
                    adjust_total(
                        conn,
                        existing.user_id,
                        -i64::from(existing.points),
                        Utc::now(),
                    )
                    .await?;
                    Ok(existing)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_tx)?;
        debug!(record_id = row.id, user_id = row.user_id, "ledger revoke committed");
        to_record(row)
    }

    async fn find(&self, id: PointRecordId) -> Result<Option<PointEntry>, LedgerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row: Option<(PointRow, OwnerRow)> = points::table
            .inner_join(users::table)
            .filter(points::id.eq(id.as_i64()))
            .select((PointRow::as_select(), OwnerRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        row.map(to_entry)
            .transpose()
            .map_err(LedgerPersistenceError::query)
    }

    async fn history(
        &self,
        user_id: UserId,
    ) -> Result<Option<Vec<PointRecord>>, LedgerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let exists: Option<i64> = users::table
            .find(user_id.as_i64())
            .select(users::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        if exists.is_none() {
            return Ok(None);
        }
        let rows: Vec<PointRow> = points::table
            .filter(points::user_id.eq(user_id.as_i64()))
            .select(PointRow::as_select())
            .order((points::created_at.desc(), points::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;
        collect_rows(
            rows.into_iter().map(PointRecord::try_from),
            LedgerPersistenceError::query,
        )
        .map(Some)
    }

    async fn list(
        &self,
        request: &ListingRequest,
    ) -> Result<ListingSlice<PointEntry>, LedgerPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let (limit, offset) = limit_offset(request.page());

        let count: i64 = searched_entries(request.search())
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;
        let rows: Vec<(PointRow, OwnerRow)> = searched_entries(request.search())
            .select((PointRow::as_select(), OwnerRow::as_select()))
            .order((points::created_at.desc(), points::id.desc()))
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(ListingSlice {
            items: collect_rows(rows.into_iter().map(to_entry), LedgerPersistenceError::query)?,
            total: count_to_total(count),
        })
    }
}
