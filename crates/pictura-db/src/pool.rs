//! Connection pool management for SQLite via r2d2.

use pictura_core::config::DatabaseConfig;
use pictura_core::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

fn foreign_keys_pragma(enforce: bool) -> &'static str {
    if enforce {
        "PRAGMA foreign_keys = ON;"
    } else {
        "PRAGMA foreign_keys = OFF;"
    }
}

/// Initialize a database pool backed by the file named in `config`.
///
/// Creates the SQLite file if it does not exist, applies the configured
/// foreign-key mode and WAL journal mode on every new connection, and runs
/// pending migrations.
pub fn init_pool(config: &DatabaseConfig) -> Result<DbPool> {
    let fk = foreign_keys_pragma(config.enforce_foreign_keys);
    let manager = SqliteConnectionManager::file(&config.path).with_init(move |conn| {
        conn.execute_batch(fk)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")
    });

    tracing::debug!(
        path = %config.path.display(),
        pool_size = config.pool_size,
        "opening database"
    );
    build_and_migrate(manager, config.pool_size)
}

/// Initialize an in-memory database pool with default settings (useful for tests).
pub fn init_memory_pool() -> Result<DbPool> {
    init_memory_pool_with(&DatabaseConfig::default())
}

/// Initialize an in-memory database pool honouring `config`'s pool size and
/// foreign-key mode. The file path is ignored.
///
/// Each call creates a uniquely-named shared-cache in-memory database so
/// that parallel tests do not interfere with each other, while all
/// connections *within* a single pool still share state.
pub fn init_memory_pool_with(config: &DatabaseConfig) -> Result<DbPool> {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let uri = format!("file:pictura_mem_{n}?mode=memory&cache=shared");

    let fk = foreign_keys_pragma(config.enforce_foreign_keys);
    let manager = SqliteConnectionManager::file(uri).with_init(move |conn| conn.execute_batch(fk));

    build_and_migrate(manager, config.pool_size)
}

fn build_and_migrate(manager: SqliteConnectionManager, max_size: u32) -> Result<DbPool> {
    // r2d2 panics on a zero-sized pool.
    if max_size == 0 {
        return Err(Error::Config("database.pool_size must be at least 1".into()));
    }

    let pool = Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| Error::database(format!("Failed to create connection pool: {e}")))?;

    let conn = pool
        .get()
        .map_err(|e| Error::database(format!("Failed to get connection for migrations: {e}")))?;

    migrations::run_migrations(&conn)?;

    Ok(pool)
}

/// Convenience helper to get a connection from the pool.
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("Failed to get connection from pool: {e}")))
}
