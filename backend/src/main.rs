//! Leaderboard server entry-point: loads configuration, prepares storage,
//! and serves the REST API.

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use leaderboard::domain::ports::CreateUserRequest;
use leaderboard::domain::{EmailAddress, UserId};
use leaderboard::inbound::http::health::HealthState;
use leaderboard::inbound::http::session_config::{BuildMode, session_settings_from_env};
use leaderboard::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(|err| io::Error::other(err.to_string()))?;
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;

    let mut config = ServerConfig::new(session, bind_addr)
        .with_admin(admin_id(&settings), admin_email(&settings))
        .with_page_size(settings.page_size());

    if let Some(password) = settings.admin_password.clone() {
        config = config.with_admin_account(CreateUserRequest {
            name: settings.admin_name().to_owned(),
            email: settings.admin_email().to_owned(),
            password,
        });
    }

    if let Some(database_url) = settings.database_url.as_deref() {
        run_pending_migrations(database_url)
            .await
            .map_err(io::Error::other)?;
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
        )
        .await
        .map_err(io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    info!(%bind_addr, "starting leaderboard server");
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config).await?.await
}

fn admin_id(settings: &ServerSettings) -> Option<UserId> {
    UserId::new(settings.admin_user_id())
        .inspect_err(|err| warn!(error = %err, "ignoring invalid administrator id"))
        .ok()
}

fn admin_email(settings: &ServerSettings) -> Option<EmailAddress> {
    EmailAddress::new(settings.admin_email())
        .inspect_err(|err| warn!(error = %err, "ignoring invalid administrator email"))
        .ok()
}
