//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! The adapter never writes `total_points`; only the ledger adapter does.

use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{
    ListingSlice, StoredCredentials, UserPersistenceError, UserRepository,
};
use crate::domain::{EmailAddress, ListingRequest, NewUser, User, UserId, UserProfileUpdate};

use super::diesel_helpers::{
    collect_rows, contains_pattern, count_to_total, is_unique_violation, limit_offset,
    map_diesel_error, map_pool_error,
};
use super::models::{CredentialRow, NewUserRow, UserProfileChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn map_write_error(error: diesel::result::Error, email: &EmailAddress) -> UserPersistenceError {
    if is_unique_violation(&error, EMAIL_CONSTRAINT) {
        UserPersistenceError::duplicate_email(email.to_string())
    } else {
        map_diesel(error)
    }
}

fn to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    User::try_from(row).map_err(UserPersistenceError::query)
}

/// Users matching the optional search on name or email.
fn searched_users(search: Option<&str>) -> users::BoxedQuery<'static, Pg> {
    let mut query = users::table.into_boxed();
    if let Some(needle) = search {
        let pattern = contains_pattern(needle);
        query = query.filter(
            users::name
                .ilike(pattern.clone())
                .or(users::email.ilike(pattern)),
        );
    }
    query
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = NewUserRow {
            name: user.name.as_ref(),
            email: user.email.as_ref(),
            password_hash: user.password_hash.as_str(),
        };

        let stored: UserRow = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write_error(err, &user.email))?;
        to_user(stored)
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &UserProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let changeset = UserProfileChangeset {
            name: update.name.as_ref(),
            email: update.email.as_ref(),
            password_hash: update.password_hash.as_ref().map(|hash| hash.as_str()),
            updated_at: Utc::now(),
        };

        let stored: Option<UserRow> = diesel::update(users::table.find(id.as_i64()))
            .set(&changeset)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_write_error(err, &update.email))?;
        stored.map(to_user).transpose()
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let removed = diesel::delete(users::table.find(id.as_i64()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel)?;
        Ok(removed > 0)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row: Option<UserRow> = users::table
            .find(id.as_i64())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        row.map(to_user).transpose()
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row: Option<CredentialRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(CredentialRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;
        row.map(|found| {
            found
                .into_parts()
                .map(|(user_id, password_hash)| StoredCredentials {
                    user_id,
                    password_hash,
                })
                .map_err(UserPersistenceError::query)
        })
        .transpose()
    }

    async fn list(
        &self,
        request: &ListingRequest,
    ) -> Result<ListingSlice<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let (limit, offset) = limit_offset(request.page());

        let count: i64 = searched_users(request.search())
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel)?;
        let rows: Vec<UserRow> = searched_users(request.search())
            .select(UserRow::as_select())
            .order((users::created_at.desc(), users::id.desc()))
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        Ok(ListingSlice {
            items: collect_rows(rows.into_iter().map(User::try_from), UserPersistenceError::query)?,
            total: count_to_total(count),
        })
    }
}
