//! Shared test utilities for roadmap integration tests.
//!
//! Each test gets its own SQLite database file inside a temporary directory,
//! with migrations already applied. The directory is removed when the
//! returned [`TempDir`] guard is dropped.

use sqlx::SqlitePool;
use tempfile::TempDir;

use roadmap_db::config::DbConfig;
use roadmap_db::pool;

/// Create a temporary database with migrations applied.
///
/// Returns `(pool, dir)`. Keep `dir` alive for as long as the pool is in use;
/// pass both to [`drop_test_db`] when the test is done.
pub async fn create_test_db() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("failed to create temp dir for test database");
    let config = DbConfig::for_path(dir.path().join("roadmap_test.db"));

    let pool = pool::create_pool(&config)
        .await
        .unwrap_or_else(|e| panic!("failed to open test database: {e:#}"));

    pool::run_migrations(&pool)
        .await
        .expect("migrations should succeed");

    (pool, dir)
}

/// Close the pool and remove the temporary database directory.
pub async fn drop_test_db(pool: SqlitePool, dir: TempDir) {
    pool.close().await;
    let _ = dir.close();
}
