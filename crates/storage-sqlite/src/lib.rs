//! SQLite storage implementation for Pairgoal.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `pairgoal-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations (including the seeded goal-setting questions)
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! Reads go straight to the pool. Every write is funnelled through the single
//! writer actor, so multi-row invariants such as "one active partner mapping
//! per user" or "both rows of a goal pair change together" hold under
//! concurrent requests.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod goals;
pub mod partners;
pub mod subscriptions;
pub mod unavailability;
pub mod users;

#[cfg(test)]
mod test_support;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from pairgoal-core for convenience
pub use pairgoal_core::errors::{DatabaseError, Error, Result};
