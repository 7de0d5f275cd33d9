//! Builders for HTTP state over either storage backend.

use std::sync::Arc;

use tracing::{info, warn};

use leaderboard::domain::ports::{LeaderboardRepository, LedgerRepository, UserRepository};
use leaderboard::domain::{Error, LeaderboardService, LedgerService, UserService};
use leaderboard::inbound::http::state::{HttpState, HttpStatePorts};
use leaderboard::outbound::memory::InMemoryStore;
use leaderboard::outbound::persistence::{
    DieselLeaderboardRepository, DieselLedgerRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Repository adapters backing one service graph.
struct Repositories<U, L, R> {
    users: Arc<U>,
    ledger: Arc<L>,
    leaderboard: Arc<R>,
}

/// Wire services over Diesel when a pool is configured, otherwise over a
/// fresh in-memory store, then seed the administrator account.
///
/// # Errors
///
/// Returns the domain [`Error`] raised while creating the administrator.
pub(crate) async fn build_http_state(config: &ServerConfig) -> Result<HttpState, Error> {
    match &config.db_pool {
        Some(pool) => {
            info!(storage = "postgres", "building services");
            assemble(
                Repositories {
                    users: Arc::new(DieselUserRepository::new(pool.clone())),
                    ledger: Arc::new(DieselLedgerRepository::new(pool.clone())),
                    leaderboard: Arc::new(DieselLeaderboardRepository::new(pool.clone())),
                },
                config,
            )
            .await
        }
        None => {
            warn!(storage = "memory", "no database configured; data is lost on restart");
            let store = Arc::new(InMemoryStore::default());
            assemble(
                Repositories {
                    users: store.clone(),
                    ledger: store.clone(),
                    leaderboard: store,
                },
                config,
            )
            .await
        }
    }
}

async fn assemble<U, L, R>(
    repos: Repositories<U, L, R>,
    config: &ServerConfig,
) -> Result<HttpState, Error>
where
    U: UserRepository + 'static,
    L: LedgerRepository + 'static,
    R: LeaderboardRepository + 'static,
{
    let policy = Arc::new(config.access_policy());
    let users = Arc::new(UserService::new(repos.users, policy.clone()));
    let ledger = Arc::new(LedgerService::new(repos.ledger, policy));

    match &config.admin_account {
        Some(account) => {
            let admin_id = users.ensure_account(account.clone()).await?;
            info!(user_id = %admin_id, "administrator account ready");
        }
        None => warn!("no administrator password configured; skipping account bootstrap"),
    }

    let state = HttpState::new(HttpStatePorts {
        login: users.clone(),
        users: users.clone(),
        users_query: users,
        ledger: ledger.clone(),
        ledger_query: ledger,
        leaderboard: Arc::new(LeaderboardService::new(repos.leaderboard)),
    });
    Ok(state.with_page_size(config.page_size))
}
