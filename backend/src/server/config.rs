//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use leaderboard::domain::ports::CreateUserRequest;
use leaderboard::domain::{AccessPolicy, AdminIdentity, EmailAddress, UserId};
use leaderboard::inbound::http::session_config::SessionSettings;
use leaderboard::outbound::persistence::DbPool;
use pagination::DEFAULT_PER_PAGE;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) admin: AdminIdentity,
    pub(crate) admin_account: Option<CreateUserRequest>,
    pub(crate) page_size: u32,
}

impl ServerConfig {
    /// Construct a configuration from validated session settings.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            admin: AdminIdentity::new(None, None),
            admin_account: None,
            page_size: DEFAULT_PER_PAGE,
        }
    }

    /// Attach a database connection pool; without one the server runs
    /// against the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Designate the administrator by id and email.
    #[must_use]
    pub fn with_admin(mut self, id: Option<UserId>, email: Option<EmailAddress>) -> Self {
        self.admin = AdminIdentity::new(id, email);
        self
    }

    /// Account created at startup when no user holds its email yet.
    #[must_use]
    pub fn with_admin_account(mut self, account: CreateUserRequest) -> Self {
        self.admin_account = Some(account);
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub(crate) fn access_policy(&self) -> AccessPolicy {
        AccessPolicy::new(self.admin.clone())
    }
}
