use super::{layout::StorageLayout, write_json_new};
use crate::error::SoapforgeError;
use soapforge_schemas::recipe::Recipe;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const RECIPE_EXTENSION: &str = "json";
const UNSAFE_NAME_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Turns a display name into a storage-safe base name.
///
/// Strips `\/*?:"<>|`, replaces spaces with underscores, and falls back to `recipe`
/// when nothing is left.
pub fn sanitize_name(display_name: &str) -> String {
    let cleaned: String = display_name
        .chars()
        .filter(|c| !UNSAFE_NAME_CHARS.contains(c))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();
    if cleaned.is_empty() {
        "recipe".to_string()
    } else {
        cleaned
    }
}

/// Named recipe records stored as one JSON file each.
///
/// A recipe's identity is its file name (`Lavender_Soap_1.json`), which `save` picks and
/// which is independent of the recipe's display name afterwards.
#[derive(Debug, Clone)]
pub struct RecipeStore {
    dir: PathBuf,
}

impl RecipeStore {
    pub fn new(layout: &StorageLayout) -> Self {
        Self {
            dir: layout.recipes_dir(),
        }
    }

    /// Resolves an identity to its file. Anything other than a single plain file name
    /// is rejected so callers cannot reach outside the recipe directory.
    fn path_for(&self, identity: &str) -> Result<PathBuf, SoapforgeError> {
        let plain = !identity.contains(|c: char| c == '/' || c == '\\')
            && identity != ".."
            && Path::new(identity).file_name().and_then(|name| name.to_str()) == Some(identity);
        if !plain {
            return Err(SoapforgeError::InvalidIdentity(identity.to_string()));
        }
        Ok(self.dir.join(identity))
    }

    /// Stores `recipe` under the first free identity derived from `display_name`.
    ///
    /// Probes `base.json`, `base_1.json`, `base_2.json`, ... and never overwrites an
    /// existing file. Returns the identity actually used.
    pub fn save(&self, display_name: &str, recipe: &Recipe) -> Result<String, SoapforgeError> {
        fs::create_dir_all(&self.dir).map_err(|e| SoapforgeError::io(&self.dir, e))?;
        let base = sanitize_name(display_name);

        let mut counter = 0u64;
        loop {
            let identity = if counter == 0 {
                format!("{base}.{RECIPE_EXTENSION}")
            } else {
                format!("{base}_{counter}.{RECIPE_EXTENSION}")
            };
            let path = self.path_for(&identity)?;
            if !path.exists() && write_json_new(&path, recipe)? {
                info!(identity = %identity, "recipe saved");
                return Ok(identity);
            }
            counter += 1;
        }
    }

    /// Stored identities in lexicographic order. An unreadable directory lists as empty.
    pub fn list(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %self.dir.display(), error = %e, "recipe directory not readable");
                return Vec::new();
            }
        };

        let mut identities: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().map_or(false, |ext| ext == RECIPE_EXTENSION)
            })
            .filter_map(|path| path.file_name()?.to_str().map(str::to_string))
            .collect();
        identities.sort();
        identities
    }

    /// Loads a stored recipe. A missing identity is `Ok(None)`, not an error.
    pub fn load(&self, identity: &str) -> Result<Option<Recipe>, SoapforgeError> {
        let path = self.path_for(identity)?;
        if !path.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| SoapforgeError::io(&path, e))?;
        let recipe = serde_json::from_str(&content).map_err(|e| SoapforgeError::json(&path, e))?;
        Ok(Some(recipe))
    }

    /// Removes a stored recipe. Missing identities are ignored.
    pub fn delete(&self, identity: &str) -> Result<(), SoapforgeError> {
        let path = self.path_for(identity)?;
        if path.exists() {
            fs::remove_file(&path).map_err(|e| SoapforgeError::io(&path, e))?;
            info!(identity, "recipe deleted");
        }
        Ok(())
    }

    /// Renames a stored recipe, appending `.json` to `new_identity` if absent.
    ///
    /// Unlike `save` this does not look for a free name: an existing target is an error.
    /// Returns the new identity, or `None` when `old_identity` does not exist.
    pub fn rename(
        &self,
        old_identity: &str,
        new_identity: &str,
    ) -> Result<Option<String>, SoapforgeError> {
        let suffix = format!(".{RECIPE_EXTENSION}");
        let new_identity = if new_identity.ends_with(&suffix) {
            new_identity.to_string()
        } else {
            format!("{new_identity}{suffix}")
        };

        let from = self.path_for(old_identity)?;
        let to = self.path_for(&new_identity)?;
        if !from.exists() {
            return Ok(None);
        }
        if to.exists() {
            return Err(SoapforgeError::RenameTargetExists(new_identity));
        }
        fs::rename(&from, &to).map_err(|source| SoapforgeError::RenameFailed {
            from: old_identity.to_string(),
            to: new_identity.clone(),
            source,
        })?;
        info!(from = old_identity, to = %new_identity, "recipe renamed");
        Ok(Some(new_identity))
    }
}
