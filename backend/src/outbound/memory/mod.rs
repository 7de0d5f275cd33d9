//! In-process adapter implementing every repository port.
//!
//! Used when no database is configured and by integration tests. One mutex
//! guards users and ledger records together, so each port call is atomic with
//! respect to every other call. Orderings and search semantics mirror the
//! Diesel adapters.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use pagination::PageRequest;
use tracing::debug;

use crate::domain::ports::{
    LeaderboardPersistenceError, LeaderboardRepository, LedgerPersistenceError, LedgerRepository,
    ListingSlice, StoredCredentials, UserPersistenceError, UserRepository,
};
use crate::domain::{
    ActionType, EmailAddress, ListingRequest, NewUser, PasswordHash, PointAward, PointEntry,
    PointOwner, PointRecord, PointRecordId, PointsAmount, UpdatedWindow, User, UserDraft, UserId,
    UserName, UserProfileUpdate, UserSummary,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Debug, Clone)]
struct UserRow {
    id: UserId,
    name: UserName,
    email: EmailAddress,
    password_hash: PasswordHash,
    total_points: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn to_user(&self) -> User {
        User::new(UserDraft {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            total_points: self.total_points,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }

    fn to_summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            total_points: self.total_points,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
struct PointRow {
    id: PointRecordId,
    user_id: UserId,
    points: PointsAmount,
    action_type: ActionType,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PointRow {
    fn to_record(&self) -> PointRecord {
        PointRecord {
            id: self.id,
            user_id: self.user_id,
            points: self.points,
            action_type: self.action_type.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    users: BTreeMap<UserId, UserRow>,
    points: BTreeMap<PointRecordId, PointRow>,
    last_user_id: i64,
    last_point_id: i64,
}

impl StoreState {
    fn email_taken(&self, email: &EmailAddress, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|row| &row.email == email && Some(row.id) != except)
    }

    fn entry(&self, row: &PointRow) -> Option<PointEntry> {
        self.users.get(&row.user_id).map(|owner| PointEntry {
            record: row.to_record(),
            user: PointOwner {
                id: owner.id,
                name: owner.name.clone(),
            },
        })
    }

    /// Owner totals after applying `deltas`. Nothing is written; callers commit
    /// the result only once every check has passed.
    fn adjusted_totals(&self, deltas: &[(UserId, i64)]) -> Result<BTreeMap<UserId, i64>, String> {
        let mut totals = BTreeMap::new();
        for (user_id, delta) in deltas {
            let current = match totals.get(user_id) {
                Some(total) => *total,
                None => self
                    .users
                    .get(user_id)
                    .map(|row| row.total_points)
                    .ok_or_else(|| format!("user {user_id} vanished mid-operation"))?,
            };
            let next = current
                .checked_add(*delta)
                .ok_or_else(|| format!("total points overflow for user {user_id}"))?;
            totals.insert(*user_id, next);
        }
        Ok(totals)
    }

    fn commit_totals(&mut self, totals: BTreeMap<UserId, i64>, now: DateTime<Utc>) {
        for (user_id, total) in totals {
            if let Some(row) = self.users.get_mut(&user_id) {
                row.total_points = total;
                row.updated_at = now;
            }
        }
    }
}

fn page_bounds(page: PageRequest) -> (usize, usize) {
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    (offset, limit)
}

fn paginate<T>(items: Vec<T>, page: PageRequest) -> ListingSlice<T> {
    let total = u64::try_from(items.len()).unwrap_or(u64::MAX);
    let (offset, limit) = page_bounds(page);
    ListingSlice {
        items: items.into_iter().skip(offset).take(limit).collect(),
        total,
    }
}

/// Mutex-guarded store shared by the user, ledger, and leaderboard ports.
pub struct InMemoryStore {
    state: Mutex<StoreState>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemoryStore {
    /// Empty store stamping rows with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, String> {
        self.state.lock().map_err(|_| {
            debug!("{POISONED}");
            POISONED.to_owned()
        })
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let now = self.now();
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        if state.email_taken(&user.email, None) {
            return Err(UserPersistenceError::duplicate_email(user.email.to_string()));
        }
        let next_id = state.last_user_id + 1;
        let id = UserId::new(next_id).map_err(|err| UserPersistenceError::query(err.to_string()))?;
        state.last_user_id = next_id;
        let row = UserRow {
            id,
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            total_points: 0,
            created_at: now,
            updated_at: now,
        };
        let created = row.to_user();
        state.users.insert(id, row);
        Ok(created)
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &UserProfileUpdate,
    ) -> Result<Option<User>, UserPersistenceError> {
        let now = self.now();
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        if !state.users.contains_key(&id) {
            return Ok(None);
        }
        if state.email_taken(&update.email, Some(id)) {
            return Err(UserPersistenceError::duplicate_email(update.email.to_string()));
        }
        let Some(row) = state.users.get_mut(&id) else {
            return Ok(None);
        };
        row.name = update.name.clone();
        row.email = update.email.clone();
        if let Some(hash) = &update.password_hash {
            row.password_hash = hash.clone();
        }
        row.updated_at = now;
        Ok(Some(row.to_user()))
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        if state.users.remove(&id).is_none() {
            return Ok(false);
        }
        state.points.retain(|_, row| row.user_id != id);
        Ok(true)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state.users.get(&id).map(UserRow::to_user))
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state
            .users
            .values()
            .find(|row| &row.email == email)
            .map(|row| StoredCredentials {
                user_id: row.id,
                password_hash: row.password_hash.clone(),
            }))
    }

    async fn list(
        &self,
        request: &ListingRequest,
    ) -> Result<ListingSlice<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        let mut rows: Vec<&UserRow> = state
            .users
            .values()
            .filter(|row| request.matches_any(&[row.name.as_ref(), row.email.as_ref()]))
            .collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(paginate(
            rows.into_iter().map(UserRow::to_user).collect(),
            request.page(),
        ))
    }
}

#[async_trait]
impl LedgerRepository for InMemoryStore {
    async fn award(&self, award: &PointAward) -> Result<PointRecord, LedgerPersistenceError> {
        let now = self.now();
        let mut state = self.lock().map_err(LedgerPersistenceError::query)?;
        if !state.users.contains_key(&award.user_id) {
            return Err(LedgerPersistenceError::user_not_found(award.user_id.as_i64()));
        }
        let totals = state
            .adjusted_totals(&[(award.user_id, award.points.as_i64())])
            .map_err(LedgerPersistenceError::query)?;
        let next_id = state.last_point_id + 1;
        let id = PointRecordId::new(next_id)
            .map_err(|err| LedgerPersistenceError::query(err.to_string()))?;

        state.last_point_id = next_id;
        let row = PointRow {
            id,
            user_id: award.user_id,
            points: award.points,
            action_type: award.action_type.clone(),
            created_at: now,
            updated_at: now,
        };
        let record = row.to_record();
        state.points.insert(id, row);
        state.commit_totals(totals, now);
        Ok(record)
    }

    async fn revise(
        &self,
        id: PointRecordId,
        award: &PointAward,
    ) -> Result<PointRecord, LedgerPersistenceError> {
        let now = self.now();
        let mut state = self.lock().map_err(LedgerPersistenceError::query)?;
        let Some(existing) = state.points.get(&id).cloned() else {
            return Err(LedgerPersistenceError::record_not_found(id.as_i64()));
        };
        if !state.users.contains_key(&award.user_id) {
            return Err(LedgerPersistenceError::user_not_found(award.user_id.as_i64()));
        }
        let totals = state
            .adjusted_totals(&[
                (existing.user_id, -existing.points.as_i64()),
                (award.user_id, award.points.as_i64()),
            ])
            .map_err(LedgerPersistenceError::query)?;

        let revised = PointRow {
            id,
            user_id: award.user_id,
            points: award.points,
            action_type: award.action_type.clone(),
            created_at: existing.created_at,
            updated_at: now,
        };
        let record = revised.to_record();
        state.points.insert(id, revised);
        state.commit_totals(totals, now);
        Ok(record)
    }

    async fn revoke(&self, id: PointRecordId) -> Result<PointRecord, LedgerPersistenceError> {
        let now = self.now();
        let mut state = self.lock().map_err(LedgerPersistenceError::query)?;
        let Some(existing) = state.points.get(&id).cloned() else {
            return Err(LedgerPersistenceError::record_not_found(id.as_i64()));
        };
        let totals = state
            .adjusted_totals(&[(existing.user_id, -existing.points.as_i64())])
            .map_err(LedgerPersistenceError::query)?;

        state.points.remove(&id);
        state.commit_totals(totals, now);
        Ok(existing.to_record())
    }

    async fn find(&self, id: PointRecordId) -> Result<Option<PointEntry>, LedgerPersistenceError> {
        let state = self.lock().map_err(LedgerPersistenceError::query)?;
        Ok(state.points.get(&id).and_then(|row| state.entry(row)))
    }

    async fn history(
        &self,
        user_id: UserId,
    ) -> Result<Option<Vec<PointRecord>>, LedgerPersistenceError> {
        let state = self.lock().map_err(LedgerPersistenceError::query)?;
        if !state.users.contains_key(&user_id) {
            return Ok(None);
        }
        let mut rows: Vec<&PointRow> = state
            .points
            .values()
            .filter(|row| row.user_id == user_id)
            .collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(Some(rows.into_iter().map(PointRow::to_record).collect()))
    }

    async fn list(
        &self,
        request: &ListingRequest,
    ) -> Result<ListingSlice<PointEntry>, LedgerPersistenceError> {
        let state = self.lock().map_err(LedgerPersistenceError::query)?;
        let mut entries: Vec<PointEntry> = state
            .points
            .values()
            .filter_map(|row| state.entry(row))
            .filter(|entry| {
                request.matches_any(&[entry.record.action_type.as_ref(), entry.user.name.as_ref()])
            })
            .collect();
        entries.sort_by(|a, b| {
            (b.record.created_at, b.record.id).cmp(&(a.record.created_at, a.record.id))
        });
        Ok(paginate(entries, request.page()))
    }
}

#[async_trait]
impl LeaderboardRepository for InMemoryStore {
    async fn ranked_users(
        &self,
        window: Option<UpdatedWindow>,
        page: PageRequest,
    ) -> Result<ListingSlice<UserSummary>, LeaderboardPersistenceError> {
        let state = self.lock().map_err(LeaderboardPersistenceError::query)?;
        let mut rows: Vec<&UserRow> = state
            .users
            .values()
            .filter(|row| window.is_none_or(|w| w.contains(row.updated_at)))
            .collect();
        rows.sort_by(|a, b| b.total_points.cmp(&a.total_points).then(a.id.cmp(&b.id)));
        Ok(paginate(
            rows.into_iter().map(UserRow::to_summary).collect(),
            page,
        ))
    }
}
