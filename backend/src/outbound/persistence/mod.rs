//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the user, ledger, and leaderboard repository
//! ports backed by PostgreSQL through `diesel-async` and a `bb8` pool.
//!
//! - **Thin adapters**: repositories translate between Diesel rows and
//!   domain types. Ledger invariants live in the transactions of
//!   [`DieselLedgerRepository`]; nothing else writes `total_points`.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: Diesel and pool failures map onto each port's error
//!   enum.
//!
//! # Example
//!
//! ```ignore
//! use leaderboard::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/leaderboard")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

pub(crate) mod diesel_helpers;
mod diesel_leaderboard_repository;
mod diesel_ledger_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_leaderboard_repository::DieselLeaderboardRepository;
pub use diesel_ledger_repository::DieselLedgerRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
