//! Rust structs mapping to database tables.
//!
//! Each model implements `from_row` for constructing itself from a
//! `rusqlite::Row`, with columns in the order of the owning query module's
//! `COLS` constant.

use pictura_core::{FileAssetId, Imageable, PictureId};
use rusqlite::types::Type;
use serde::Serialize;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

/// Parse a UUID-based ID from a text column.
fn parse_id<T: From<Uuid>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T> {
    let s: String = row.get(idx)?;
    let uuid = Uuid::parse_str(&s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))?;
    Ok(T::from(uuid))
}

fn parse_opt_id<T: From<Uuid>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<T>> {
    let s: Option<String> = row.get(idx)?;
    match s {
        Some(v) => {
            let uuid = Uuid::parse_str(&v).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
            })?;
            Ok(Some(T::from(uuid)))
        }
        None => Ok(None),
    }
}

/// Resolve the `(imageable_type, imageable_id)` pair starting at `idx`.
fn parse_imageable(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Imageable> {
    let kind: String = row.get(idx)?;
    let id: String = row.get(idx + 1)?;
    Imageable::from_parts(&kind, &id)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// ---------------------------------------------------------------------------
// FileAsset
// ---------------------------------------------------------------------------

/// Metadata describing a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileAsset {
    pub id: FileAssetId,
    pub path: Option<String>,
    pub content_type: Option<String>,
    pub permission: Option<String>,
    pub filename: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl FileAsset {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            path: row.get(1)?,
            content_type: row.get(2)?,
            permission: row.get(3)?,
            filename: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Picture
// ---------------------------------------------------------------------------

/// An image owned by some imageable entity.
///
/// `file_asset_id` is `None` only between the two steps of picture
/// creation; a picture returned by `create_picture` always has it set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Picture {
    pub id: PictureId,
    pub name: Option<String>,
    pub file_asset_id: Option<FileAssetId>,
    pub imageable: Imageable,
    pub created_at: String,
    pub updated_at: String,
}

impl Picture {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            name: row.get(1)?,
            file_asset_id: parse_opt_id(row, 2)?,
            imageable: parse_imageable(row, 3)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

/// A freshly created picture together with the file asset made for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedPicture {
    pub picture: Picture,
    pub file_asset: FileAsset,
}
