//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: in-process store used without a database and in tests
//!
//! Adapters translate between domain types and storage representations. The
//! ledger adapters additionally own the atomicity of each ledger mutation.

pub mod memory;
pub mod persistence;
