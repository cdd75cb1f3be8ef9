//! File-backed persistence for recipes and ingredient catalogs.
//!
//! Every write goes through a temporary file in the destination directory which is then
//! renamed into place, so readers never observe a half-written document.

use crate::error::SoapforgeError;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub mod ingredients;
pub mod layout;
pub mod recipes;

pub use ingredients::{Catalog, CatalogRecord, IngredientStore};
pub use layout::StorageLayout;
pub use recipes::{sanitize_name, RecipeStore};

/// Serializes `value` as pretty UTF-8 JSON into a temp file beside `path`.
fn stage_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<NamedTempFile, SoapforgeError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let body = serde_json::to_vec_pretty(value).map_err(|e| SoapforgeError::json(path, e))?;
    let mut staged = NamedTempFile::new_in(dir).map_err(|e| SoapforgeError::io(dir, e))?;
    staged
        .write_all(&body)
        .and_then(|_| staged.as_file().sync_all())
        .map_err(|e| SoapforgeError::io(staged.path(), e))?;
    Ok(staged)
}

/// Writes `value` to `path`, replacing any existing file.
pub(crate) fn write_json_replace<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), SoapforgeError> {
    let staged = stage_json(path, value)?;
    staged
        .persist(path)
        .map_err(|e| SoapforgeError::io(path, e.error))?;
    Ok(())
}

/// Writes `value` to `path` only if nothing exists there yet.
///
/// Returns `Ok(false)` when the path is already taken.
pub(crate) fn write_json_new<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<bool, SoapforgeError> {
    let staged = stage_json(path, value)?;
    match staged.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(SoapforgeError::io(path, e.error)),
    }
}
