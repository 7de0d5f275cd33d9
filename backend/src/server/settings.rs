//! Server settings loaded via OrthoConfig.

use std::net::{AddrParseError, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use pagination::{DEFAULT_PER_PAGE, MAX_PER_PAGE};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ADMIN_EMAIL: &str = "test@gmail.com";
const DEFAULT_ADMIN_NAME: &str = "Super Admin";

/// Startup configuration, read from `LEADERBOARD_*` environment variables,
/// configuration files, and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LEADERBOARD")]
pub struct ServerSettings {
    /// Listen address.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Id of the designated administrator.
    #[ortho_config(default = 1)]
    pub admin_user_id: i64,
    /// Email of the designated administrator.
    pub admin_email: Option<String>,
    /// Display name used when the administrator account is created.
    pub admin_name: Option<String>,
    /// Password for the administrator account. Without it no account is
    /// created at startup.
    pub admin_password: Option<String>,
    /// Listing page size used when a request does not send `perPage`.
    pub page_size: Option<u32>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
}

impl ServerSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns [`AddrParseError`] when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).parse()
    }

    /// Raw id of the designated administrator; validated by the caller.
    pub fn admin_user_id(&self) -> i64 {
        self.admin_user_id
    }

    /// Return the administrator email, falling back to the default.
    pub fn admin_email(&self) -> &str {
        self.admin_email.as_deref().unwrap_or(DEFAULT_ADMIN_EMAIL)
    }

    /// Return the administrator display name, falling back to the default.
    pub fn admin_name(&self) -> &str {
        self.admin_name.as_deref().unwrap_or(DEFAULT_ADMIN_NAME)
    }

    /// Configured page size, clamped to `1..=MAX_PER_PAGE`.
    pub fn page_size(&self) -> u32 {
        self.page_size
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    /// Pool size, never below one connection.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.max(1)
    }
}
