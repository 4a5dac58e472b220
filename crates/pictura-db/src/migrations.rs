//! Embedded SQL migrations and runner.
//!
//! Migrations are stored as `&str` constants and executed in order. A
//! `schema_migrations` table tracks which versions have been applied.
//!
//! `pictures` is created before `file_assets`, so its foreign key names a
//! table that does not exist yet when V1 runs. SQLite only resolves
//! foreign-key parents when rows are written, which makes this order
//! workable; it is kept as-is rather than reordered.

use pictura_core::{Error, Result};
use rusqlite::Connection;

/// V1: pictures, with a file asset link and a polymorphic owner pair.
const V1_CREATE_PICTURES: &str = r#"
CREATE TABLE pictures (
    id             TEXT PRIMARY KEY,
    name           TEXT,
    file_asset_id  TEXT REFERENCES file_assets(id),
    imageable_type TEXT,
    imageable_id   TEXT,
    created_at     TEXT NOT NULL,
    updated_at     TEXT NOT NULL
);

CREATE INDEX idx_pictures_file_asset ON pictures(file_asset_id);
CREATE INDEX idx_pictures_imageable  ON pictures(imageable_type, imageable_id);
"#;

/// V2: file asset metadata.
const V2_CREATE_FILE_ASSETS: &str = r#"
CREATE TABLE file_assets (
    id           TEXT PRIMARY KEY,
    path         TEXT,
    content_type TEXT,
    permission   TEXT,
    filename     TEXT,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);
"#;

/// A single migration with its SQL content.
pub(crate) struct Migration {
    pub(crate) version: i64,
    pub(crate) name: &'static str,
    pub(crate) sql: &'static str,
}

/// All available migrations, in application order.
pub(crate) const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_pictures",
        sql: V1_CREATE_PICTURES,
    },
    Migration {
        version: 2,
        name: "create_file_assets",
        sql: V2_CREATE_FILE_ASSETS,
    },
];

fn init_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            name       TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .map_err(|e| Error::database(format!("Failed to create schema_migrations: {e}")))
}

/// Run all pending migrations on `conn`.
///
/// Creates the `schema_migrations` tracking table if it does not exist,
/// then applies each outstanding migration inside its own transaction.
/// Returns the number of migrations applied.
pub fn run_migrations(conn: &Connection) -> Result<usize> {
    init_migrations_table(conn)?;

    let mut applied = 0;
    for migration in MIGRATIONS {
        let already: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM schema_migrations WHERE version = ?1",
                [migration.version],
                |row| row.get(0),
            )
            .map_err(Error::database)?;

        if already {
            continue;
        }

        let tx = conn.unchecked_transaction().map_err(Error::database)?;

        tx.execute_batch(migration.sql).map_err(|e| {
            Error::database(format!("Migration V{} failed: {e}", migration.version))
        })?;

        tx.execute(
            "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
            rusqlite::params![migration.version, migration.name],
        )
        .map_err(Error::database)?;

        tx.commit().map_err(Error::database)?;

        applied += 1;
        tracing::info!(
            version = migration.version,
            name = migration.name,
            "applied migration"
        );
    }

    Ok(applied)
}

/// Get the current schema version without applying migrations.
pub fn current_version(conn: &Connection) -> Result<i64> {
    init_migrations_table(conn)?;

    conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
        row.get::<_, Option<i64>>(0)
    })
    .map(|v| v.unwrap_or(0))
    .map_err(Error::database)
}

/// Get the latest available migration version.
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
            [name],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(run_migrations(&conn).unwrap(), MIGRATIONS.len());
        // second call is a no-op
        assert_eq!(run_migrations(&conn).unwrap(), 0);
        assert_eq!(current_version(&conn).unwrap(), latest_version());
    }

    #[test]
    fn test_fresh_database_is_version_zero() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(current_version(&conn).unwrap(), 0);
        assert_eq!(latest_version(), 2);
    }

    #[test]
    fn test_all_tables_created() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
        run_migrations(&conn).unwrap();

        for t in ["pictures", "file_assets", "schema_migrations"] {
            assert!(table_exists(&conn, t), "table {t} should exist");
        }
    }

    #[test]
    fn test_imageable_pair_is_indexed() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let mut stmt = conn
            .prepare("SELECT name FROM pragma_index_info('idx_pictures_imageable') ORDER BY seqno")
            .unwrap();
        let cols: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(cols, ["imageable_type", "imageable_id"]);
    }

    #[test]
    fn test_pictures_migration_precedes_its_fk_target() {
        // Applied order is pictures first, then file_assets.
        let names: Vec<&str> = MIGRATIONS.iter().map(|m| m.name).collect();
        assert_eq!(names, ["create_pictures", "create_file_assets"]);

        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();

        // V1 alone declares a foreign key to a table that is not there yet.
        conn.execute_batch(MIGRATIONS[0].sql).unwrap();
        assert!(table_exists(&conn, "pictures"));
        assert!(!table_exists(&conn, "file_assets"));

        let target: String = conn
            .query_row(
                "SELECT \"table\" FROM pragma_foreign_key_list('pictures')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(target, "file_assets");

        // Once V2 lands, the constraint is enforced.
        conn.execute_batch(MIGRATIONS[1].sql).unwrap();
        let err = conn.execute(
            "INSERT INTO pictures (id, name, file_asset_id, created_at, updated_at)
             VALUES ('p', 'n', 'missing', 't', 't')",
            [],
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_timestamps_are_not_null() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let err = conn.execute(
            "INSERT INTO file_assets (id, filename) VALUES ('a', 'x.png')",
            [],
        );
        assert!(err.is_err());
    }
}
