//! File asset CRUD operations.

use pictura_core::{Error, FileAssetId, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::models::FileAsset;

const COLS: &str = "id, path, content_type, permission, filename, created_at, updated_at";

/// Column values for a new file asset. Unset fields are stored as NULL.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewFileAsset<'a> {
    pub path: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub permission: Option<&'a str>,
    pub filename: Option<&'a str>,
}

/// Create a new file asset record.
pub fn create_file_asset(conn: &Connection, new: &NewFileAsset<'_>) -> Result<FileAsset> {
    let id = FileAssetId::new();
    let now = super::now();

    conn.execute(
        "INSERT INTO file_assets (id, path, content_type, permission, filename, created_at, updated_at)
         VALUES (?1,?2,?3,?4,?5,?6,?6)",
        rusqlite::params![
            id.to_string(),
            new.path,
            new.content_type,
            new.permission,
            new.filename,
            now,
        ],
    )
    .map_err(Error::database)?;

    Ok(FileAsset {
        id,
        path: new.path.map(String::from),
        content_type: new.content_type.map(String::from),
        permission: new.permission.map(String::from),
        filename: new.filename.map(String::from),
        created_at: now.clone(),
        updated_at: now,
    })
}

/// Get a file asset by ID.
pub fn get_file_asset(conn: &Connection, id: FileAssetId) -> Result<Option<FileAsset>> {
    let q = format!("SELECT {COLS} FROM file_assets WHERE id = ?1");
    conn.query_row(&q, [id.to_string()], FileAsset::from_row)
        .optional()
        .map_err(Error::database)
}

/// Total number of file asset rows.
pub fn count_file_assets(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM file_assets", [], |row| row.get(0))
        .map_err(Error::database)
}

/// Delete a file asset by ID.
///
/// Only the `file_assets` row is touched. Pictures pointing at it are not
/// cascaded: by default those pictures keep a dangling `file_asset_id`;
/// with foreign keys enforced the database refuses the delete instead.
pub fn delete_file_asset(conn: &Connection, id: FileAssetId) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM file_assets WHERE id = ?1", [id.to_string()])
        .map_err(Error::database)?;
    Ok(n > 0)
}
