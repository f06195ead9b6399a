//! Shared fixtures for repository tests.

use std::sync::Arc;
use tempfile::{tempdir, TempDir};

use pairgoal_core::constants::{ROLE_APP_USER, STATUS_ACTIVE};
use pairgoal_core::users::NewUserRecord;

use crate::db::{create_pool, init, run_migrations, spawn_writer, DbPool, WriteHandle};

/// Fresh migrated database in a temp dir. Keep the `TempDir` alive for the
/// duration of the test. Must be called from inside a Tokio runtime.
pub fn setup_db() -> (Arc<DbPool>, WriteHandle, TempDir) {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");
    let db_path = init(&db_path.to_string_lossy()).expect("Failed to init database");

    let pool = create_pool(&db_path).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");

    // spawn_writer takes the pool itself, not the Arc.
    let writer = spawn_writer((*pool).clone());
    (pool, writer, temp_dir)
}

pub fn new_user_record(email: &str, unique_code: &str) -> NewUserRecord {
    let first_name = email
        .split('@')
        .next()
        .unwrap_or("user")
        .to_string();
    NewUserRecord {
        role_id: ROLE_APP_USER,
        first_name,
        last_name: "Tester".to_string(),
        gender: "Female".to_string(),
        email: email.to_string(),
        password: "$argon2id$stub".to_string(),
        unique_code: unique_code.to_string(),
        status: STATUS_ACTIVE,
    }
}
