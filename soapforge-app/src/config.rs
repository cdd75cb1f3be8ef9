use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use soapforge_core::{IngredientStore, RecipeStore, StorageLayout};
use std::{fs, path::Path, path::PathBuf};

/// Settings read from `soapforge.yaml`. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root holding the `resources`, `recipes` and `exports` directories.
    pub storage_root: PathBuf,
    /// Bundled default catalogs used to seed a fresh storage root.
    pub defaults_dir: PathBuf,
    /// Fallback `tracing` filter when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("SaveData"),
            defaults_dir: PathBuf::from("assets"),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Reads the config file, or returns the defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML from {:?}", path))
    }
}

/// Everything a command needs: the storage layout, the loaded catalogs and the recipe store.
pub struct Workspace {
    pub layout: StorageLayout,
    pub ingredients: IngredientStore,
    pub recipes: RecipeStore,
}

impl Workspace {
    pub fn open(config: &AppConfig) -> Result<Self> {
        let layout = StorageLayout::new(&config.storage_root);
        layout
            .ensure()
            .with_context(|| format!("Failed to prepare storage root {:?}", config.storage_root))?;

        let defaults = Some(config.defaults_dir.as_path()).filter(|dir| dir.is_dir());
        let ingredients = IngredientStore::open(&layout, defaults);
        let recipes = RecipeStore::new(&layout);

        Ok(Self {
            layout,
            ingredients,
            recipes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("soapforge.yaml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_config_overrides_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("soapforge.yaml");
        fs::write(&path, "storage_root: /tmp/soaps\nlog_filter: debug\n").unwrap();
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.storage_root, PathBuf::from("/tmp/soaps"));
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.defaults_dir, PathBuf::from("assets"));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("soapforge.yaml");
        fs::write(&path, "storage_root: [unclosed").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn test_workspace_creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            storage_root: dir.path().join("data"),
            defaults_dir: dir.path().join("no-assets"),
            ..AppConfig::default()
        };
        let ws = Workspace::open(&config).unwrap();
        assert!(ws.layout.recipes_dir().is_dir());
        assert!(ws.layout.exports_dir().is_dir());
        assert!(ws.ingredients.oils().is_empty());
    }
}
