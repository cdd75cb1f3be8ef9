use crate::error::SoapforgeError;
use std::fs;
use std::path::{Path, PathBuf};

/// The persistence root and its three subdirectories.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    root: PathBuf,
}

impl StorageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ingredient catalogs.
    pub fn resources_dir(&self) -> PathBuf {
        self.root.join("resources")
    }

    pub fn recipes_dir(&self) -> PathBuf {
        self.root.join("recipes")
    }

    /// Rendered reports.
    pub fn exports_dir(&self) -> PathBuf {
        self.root.join("exports")
    }

    /// Creates all three subdirectories if they are missing.
    pub fn ensure(&self) -> Result<(), SoapforgeError> {
        for dir in [self.resources_dir(), self.recipes_dir(), self.exports_dir()] {
            fs::create_dir_all(&dir).map_err(|e| SoapforgeError::io(&dir, e))?;
        }
        Ok(())
    }
}
