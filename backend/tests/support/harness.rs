//! Service graph over the in-memory store with a controllable clock.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, Utc};
use mockable::Clock;

use leaderboard::domain::ports::{CreateUserRequest, UserQuery};
use leaderboard::domain::{
    AccessPolicy, Actor, AdminIdentity, EmailAddress, LeaderboardService, LedgerService, UserId,
    UserService,
};
use leaderboard::outbound::memory::InMemoryStore;

pub const ADMIN_EMAIL: &str = "test@gmail.com";

/// Clock that reports whatever instant the test last set.
pub struct SettableClock(Mutex<DateTime<Utc>>);

impl SettableClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self(Mutex::new(start))
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.0.lock().expect("clock lock") = instant;
    }
}

impl Clock for SettableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock lock")
    }
}

/// Services wired the way the server wires them when no database is set.
pub struct Harness {
    pub clock: Arc<SettableClock>,
    pub users: Arc<UserService<InMemoryStore>>,
    pub ledger: Arc<LedgerService<InMemoryStore>>,
    pub leaderboard: Arc<LeaderboardService<InMemoryStore>>,
    /// Administrator actor recognised by email; it has no stored row.
    pub admin: Actor,
}

impl Harness {
    pub fn new(start: DateTime<Utc>) -> Self {
        let clock = Arc::new(SettableClock::new(start));
        let store = Arc::new(InMemoryStore::new(clock.clone()));
        let admin_email = EmailAddress::new(ADMIN_EMAIL).expect("admin email");
        let policy = Arc::new(AccessPolicy::new(AdminIdentity::new(
            None,
            Some(admin_email.clone()),
        )));
        Self {
            clock,
            users: Arc::new(UserService::new(store.clone(), policy.clone())),
            ledger: Arc::new(LedgerService::new(store.clone(), policy)),
            leaderboard: Arc::new(LeaderboardService::new(store)),
            admin: Actor::new(UserId::new(9_999).expect("admin id"), admin_email),
        }
    }

    /// Create an account directly, bypassing the access policy.
    pub async fn add_user(&self, name: &str, email: &str) -> UserId {
        self.users
            .ensure_account(CreateUserRequest {
                name: name.to_owned(),
                email: email.to_owned(),
                password: "correct-horse".to_owned(),
            })
            .await
            .expect("create user")
    }

    /// Actor for a stored, non-administrator user.
    pub async fn actor(&self, id: UserId) -> Actor {
        let user = self.users.get_user(id).await.expect("stored user");
        Actor::from(&user)
    }

    pub async fn total(&self, id: UserId) -> i64 {
        self.users
            .get_user(id)
            .await
            .expect("stored user")
            .total_points()
    }
}
