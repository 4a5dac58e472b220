//! Picture lifecycle and queries.
//!
//! Creating a picture is an explicit two-step workflow run in one
//! transaction: persist the picture row, then create its file asset and
//! link it back. Both steps are public so they can be exercised on their
//! own; [`create_picture`] is the entry point application code should use.

use pictura_core::{Error, Imageable, PictureId, Result};
use rusqlite::{Connection, OptionalExtension};

use super::file_assets::{self, NewFileAsset};
use crate::models::{CreatedPicture, FileAsset, Picture};

const COLS: &str = "id, name, file_asset_id, imageable_type, imageable_id, created_at, updated_at";

/// Permission given to every file asset created alongside a picture.
pub const DEFAULT_FILE_PERMISSION: &str = "public";

/// Create a picture owned by `imageable`, together with its file asset.
///
/// The file asset gets `permission = "public"` and `filename = name`. If
/// any step fails the transaction is rolled back and no picture row is
/// left behind.
pub fn create_picture(conn: &Connection, name: &str, imageable: &Imageable) -> Result<CreatedPicture> {
    let tx = conn.unchecked_transaction().map_err(Error::database)?;

    let mut picture = insert_picture_row(&tx, name, imageable)?;
    let file_asset = attach_file_asset(&tx, &mut picture)?;

    tx.commit().map_err(Error::database)?;

    tracing::debug!(
        picture_id = %picture.id,
        file_asset_id = %file_asset.id,
        owner = %imageable,
        "created picture"
    );

    Ok(CreatedPicture {
        picture,
        file_asset,
    })
}

/// Persist a picture row with no file asset linked yet.
pub fn insert_picture_row(conn: &Connection, name: &str, imageable: &Imageable) -> Result<Picture> {
    let id = PictureId::new();
    let now = super::now();

    conn.execute(
        "INSERT INTO pictures (id, name, file_asset_id, imageable_type, imageable_id, created_at, updated_at)
         VALUES (?1,?2,NULL,?3,?4,?5,?5)",
        rusqlite::params![
            id.to_string(),
            name,
            imageable.kind().as_str(),
            imageable.id().to_string(),
            now,
        ],
    )
    .map_err(Error::database)?;

    Ok(Picture {
        id,
        name: Some(name.to_string()),
        file_asset_id: None,
        imageable: *imageable,
        created_at: now.clone(),
        updated_at: now,
    })
}

/// Create the file asset for a freshly inserted picture and link it.
///
/// Fails with [`Error::Conflict`] if the picture already has a file asset;
/// the step runs once per picture. Run it inside the same transaction as
/// [`insert_picture_row`] so a failed link does not leave an unused asset.
pub fn attach_file_asset(conn: &Connection, picture: &mut Picture) -> Result<FileAsset> {
    if let Some(existing) = picture.file_asset_id {
        return Err(Error::Conflict(format!(
            "picture {} already has file asset {existing}",
            picture.id
        )));
    }

    let file_asset = file_assets::create_file_asset(
        conn,
        &NewFileAsset {
            permission: Some(DEFAULT_FILE_PERMISSION),
            filename: picture.name.as_deref(),
            ..NewFileAsset::default()
        },
    )?;

    let n = conn
        .execute(
            "UPDATE pictures SET file_asset_id = ?1 WHERE id = ?2 AND file_asset_id IS NULL",
            [file_asset.id.to_string(), picture.id.to_string()],
        )
        .map_err(Error::database)?;

    if n == 0 {
        return Err(Error::not_found("unlinked picture", picture.id));
    }

    picture.file_asset_id = Some(file_asset.id);
    Ok(file_asset)
}

/// Get a picture by ID.
pub fn get_picture(conn: &Connection, id: PictureId) -> Result<Option<Picture>> {
    let q = format!("SELECT {COLS} FROM pictures WHERE id = ?1");
    conn.query_row(&q, [id.to_string()], Picture::from_row)
        .optional()
        .map_err(Error::database)
}

/// Load the file asset a picture is linked to.
///
/// Returns `None` when the picture has no link or the linked row is gone.
pub fn get_picture_file_asset(conn: &Connection, picture: &Picture) -> Result<Option<FileAsset>> {
    match picture.file_asset_id {
        Some(id) => file_assets::get_file_asset(conn, id),
        None => Ok(None),
    }
}

/// List the pictures owned by `imageable`, oldest first.
pub fn list_pictures_for_imageable(conn: &Connection, imageable: &Imageable) -> Result<Vec<Picture>> {
    let q = format!(
        "SELECT {COLS} FROM pictures
         WHERE imageable_type = ?1 AND imageable_id = ?2
         ORDER BY created_at, rowid"
    );
    let mut stmt = conn.prepare(&q).map_err(Error::database)?;
    let rows = stmt
        .query_map(
            [imageable.kind().as_str().to_string(), imageable.id().to_string()],
            Picture::from_row,
        )
        .map_err(Error::database)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(Error::database)?;
    Ok(rows)
}

/// Rename a picture. The linked file asset is left untouched.
pub fn rename_picture(conn: &Connection, id: PictureId, name: &str) -> Result<bool> {
    let n = conn
        .execute(
            "UPDATE pictures SET name = ?1, updated_at = ?2 WHERE id = ?3",
            [name.to_string(), super::now(), id.to_string()],
        )
        .map_err(Error::database)?;

    if n > 0 {
        tracing::debug!(picture_id = %id, name, "renamed picture");
    }
    Ok(n > 0)
}

/// Delete a picture row and return it as it was.
///
/// The linked file asset is not deleted; its id is available on the
/// returned picture so the caller can decide what to do with it.
pub fn delete_picture(conn: &Connection, id: PictureId) -> Result<Option<Picture>> {
    let q = format!("DELETE FROM pictures WHERE id = ?1 RETURNING {COLS}");
    let Some(picture) = conn
        .query_row(&q, [id.to_string()], Picture::from_row)
        .optional()
        .map_err(Error::database)?
    else {
        return Ok(None);
    };

    tracing::debug!(
        picture_id = %id,
        file_asset_id = ?picture.file_asset_id,
        "deleted picture"
    );
    Ok(Some(picture))
}
