use super::{layout::StorageLayout, write_json_replace};
use crate::error::SoapforgeError;
use serde::{de::DeserializeOwned, Serialize};
use soapforge_schemas::{
    file_formats::{AdditiveFile, EssentialOilFile, OilFile},
    ingredient::{Additive, EssentialOil, Oil},
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    Oils,
    Additives,
    EssentialOils,
}

impl Catalog {
    pub const ALL: [Catalog; 3] = [Catalog::Oils, Catalog::Additives, Catalog::EssentialOils];

    /// The object key holding the record list in the catalog file.
    pub fn root_key(self) -> &'static str {
        match self {
            Catalog::Oils => "oils",
            Catalog::Additives => "additives",
            Catalog::EssentialOils => "essential_oils",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.json", self.root_key())
    }
}

impl std::fmt::Display for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Catalog::Oils => write!(f, "oils"),
            Catalog::Additives => write!(f, "additives"),
            Catalog::EssentialOils => write!(f, "essential oils"),
        }
    }
}

/// A record type that lives in one of the three catalogs.
pub trait CatalogRecord: Clone + Sized {
    const CATALOG: Catalog;
    /// The on-disk wrapper, e.g. `{"oils": [...]}`.
    type File: Serialize + DeserializeOwned + Default;

    fn name(&self) -> &str;
    fn from_file(file: Self::File) -> Vec<Self>;
    fn into_file(records: Vec<Self>) -> Self::File;
    fn records(store: &IngredientStore) -> &Vec<Self>;
    fn records_mut(store: &mut IngredientStore) -> &mut Vec<Self>;
}

impl CatalogRecord for Oil {
    const CATALOG: Catalog = Catalog::Oils;
    type File = OilFile;

    fn name(&self) -> &str {
        &self.name
    }
    fn from_file(file: OilFile) -> Vec<Self> {
        file.oils
    }
    fn into_file(oils: Vec<Self>) -> OilFile {
        OilFile { oils }
    }
    fn records(store: &IngredientStore) -> &Vec<Self> {
        &store.oils
    }
    fn records_mut(store: &mut IngredientStore) -> &mut Vec<Self> {
        &mut store.oils
    }
}

impl CatalogRecord for Additive {
    const CATALOG: Catalog = Catalog::Additives;
    type File = AdditiveFile;

    fn name(&self) -> &str {
        &self.name
    }
    fn from_file(file: AdditiveFile) -> Vec<Self> {
        file.additives
    }
    fn into_file(additives: Vec<Self>) -> AdditiveFile {
        AdditiveFile { additives }
    }
    fn records(store: &IngredientStore) -> &Vec<Self> {
        &store.additives
    }
    fn records_mut(store: &mut IngredientStore) -> &mut Vec<Self> {
        &mut store.additives
    }
}

impl CatalogRecord for EssentialOil {
    const CATALOG: Catalog = Catalog::EssentialOils;
    type File = EssentialOilFile;

    fn name(&self) -> &str {
        &self.name
    }
    fn from_file(file: EssentialOilFile) -> Vec<Self> {
        file.essential_oils
    }
    fn into_file(essential_oils: Vec<Self>) -> EssentialOilFile {
        EssentialOilFile { essential_oils }
    }
    fn records(store: &IngredientStore) -> &Vec<Self> {
        &store.essential_oils
    }
    fn records_mut(store: &mut IngredientStore) -> &mut Vec<Self> {
        &mut store.essential_oils
    }
}

fn read_catalog_file<T: CatalogRecord>(path: &Path) -> Result<Vec<T>, SoapforgeError> {
    let content = fs::read_to_string(path).map_err(|e| SoapforgeError::io(path, e))?;
    let file: T::File =
        serde_json::from_str(&content).map_err(|e| SoapforgeError::json(path, e))?;
    Ok(T::from_file(file))
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// The oils, additives and essential-oil catalogs, held in memory and mirrored to disk.
///
/// Opening never fails: a catalog that cannot be seeded or read degrades to an empty list
/// and the problem is logged.
#[derive(Debug, Clone, Default)]
pub struct IngredientStore {
    resources_dir: PathBuf,
    oils: Vec<Oil>,
    additives: Vec<Additive>,
    essential_oils: Vec<EssentialOil>,
}

impl IngredientStore {
    /// Seeds missing catalog files from `defaults_dir` (or empty skeletons) and loads all three.
    pub fn open(layout: &StorageLayout, defaults_dir: Option<&Path>) -> Self {
        let mut store = Self {
            resources_dir: layout.resources_dir(),
            ..Self::default()
        };
        store.oils = store.bootstrap_and_load::<Oil>(defaults_dir);
        store.additives = store.bootstrap_and_load::<Additive>(defaults_dir);
        store.essential_oils = store.bootstrap_and_load::<EssentialOil>(defaults_dir);
        info!(
            oils = store.oils.len(),
            additives = store.additives.len(),
            essential_oils = store.essential_oils.len(),
            "ingredient catalogs loaded"
        );
        store
    }

    fn catalog_path(&self, catalog: Catalog) -> PathBuf {
        self.resources_dir.join(catalog.file_name())
    }

    fn bootstrap_and_load<T: CatalogRecord>(&self, defaults_dir: Option<&Path>) -> Vec<T> {
        if let Err(e) = self.bootstrap::<T>(defaults_dir) {
            warn!(catalog = %T::CATALOG, error = %e, "catalog bootstrap failed");
            return Vec::new();
        }
        let path = self.catalog_path(T::CATALOG);
        read_catalog_file::<T>(&path).unwrap_or_else(|e| {
            warn!(catalog = %T::CATALOG, error = %e, "catalog unreadable, using an empty one");
            Vec::new()
        })
    }

    /// Makes sure the catalog file exists, copying a valid bundled default when there is one.
    fn bootstrap<T: CatalogRecord>(
        &self,
        defaults_dir: Option<&Path>,
    ) -> Result<(), SoapforgeError> {
        let target = self.catalog_path(T::CATALOG);
        if target.exists() {
            return Ok(());
        }
        fs::create_dir_all(&self.resources_dir).map_err(|e| {
            SoapforgeError::ResourceIntegrity(format!(
                "cannot create '{}': {e}",
                self.resources_dir.display()
            ))
        })?;

        let seeded = defaults_dir
            .map(|dir| dir.join(T::CATALOG.file_name()))
            .filter(|source| source.is_file())
            .and_then(|source| match read_catalog_file::<T>(&source) {
                Ok(records) => Some(records),
                Err(e) => {
                    warn!(source = %source.display(), error = %e, "bundled default rejected");
                    None
                }
            });

        let records = match seeded {
            Some(records) => {
                info!(
                    catalog = %T::CATALOG,
                    records = records.len(),
                    "seeding catalog from defaults"
                );
                records
            }
            None => {
                info!(catalog = %T::CATALOG, "no bundled default, writing an empty catalog");
                Vec::new()
            }
        };
        write_json_replace(&target, &T::into_file(records))
            .map_err(|e| SoapforgeError::ResourceIntegrity(e.to_string()))
    }

    /// All records of one catalog, in insertion order.
    pub fn load<T: CatalogRecord>(&self) -> &[T] {
        T::records(self)
    }

    pub fn oils(&self) -> &[Oil] {
        &self.oils
    }

    pub fn additives(&self) -> &[Additive] {
        &self.additives
    }

    pub fn essential_oils(&self) -> &[EssentialOil] {
        &self.essential_oils
    }

    /// Linear scan by exact name.
    pub fn find<T: CatalogRecord>(&self, name: &str) -> Option<&T> {
        T::records(self).iter().find(|r| r.name() == name)
    }

    pub fn find_oil(&self, name: &str) -> Option<&Oil> {
        self.find::<Oil>(name)
    }

    pub fn find_additive(&self, name: &str) -> Option<&Additive> {
        self.find::<Additive>(name)
    }

    pub fn find_essential_oil(&self, name: &str) -> Option<&EssentialOil> {
        self.find::<EssentialOil>(name)
    }

    /// Additives that may replace part of the lye water.
    pub fn liquid_substitutes(&self) -> impl Iterator<Item = &Additive> {
        self.additives.iter().filter(|a| a.is_liquid())
    }

    /// Appends a record and rewrites the whole catalog file.
    ///
    /// Empty names and names already present (ignoring case and surrounding spaces) are
    /// rejected. If the write fails the in-memory catalog is left unchanged.
    pub fn append_and_persist<T: CatalogRecord>(
        &mut self,
        record: T,
    ) -> Result<(), SoapforgeError> {
        let catalog = T::CATALOG;
        if record.name().trim().is_empty() {
            return Err(SoapforgeError::EmptyIngredientName(catalog.to_string()));
        }
        if T::records(self).iter().any(|r| same_name(r.name(), record.name())) {
            return Err(SoapforgeError::DuplicateIngredient {
                catalog: catalog.to_string(),
                name: record.name().to_string(),
            });
        }

        let mut records = T::records(self).clone();
        let name = record.name().to_string();
        records.push(record);

        fs::create_dir_all(&self.resources_dir)
            .map_err(|e| SoapforgeError::io(&self.resources_dir, e))?;
        write_json_replace(&self.catalog_path(catalog), &T::into_file(records.clone()))?;
        *T::records_mut(self) = records;
        info!(catalog = %catalog, name = %name, "ingredient added");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use soapforge_schemas::ingredient::{AdditiveCategory, Toxicity};

    fn oil(name: &str, sap: f64) -> Oil {
        Oil {
            name: name.to_string(),
            saponification_value: sap,
            quality_notes: "Mild".to_string(),
            foam_rating: "Creamy".to_string(),
            recommendation: "up to 100%".to_string(),
        }
    }

    #[test]
    fn test_bootstrap_without_defaults_writes_empty_skeletons() {
        let temp_dir = tempfile::tempdir().unwrap();
        let layout = StorageLayout::new(temp_dir.path());
        let store = IngredientStore::open(&layout, None);

        assert!(store.oils().is_empty());
        for catalog in Catalog::ALL {
            let path = layout.resources_dir().join(catalog.file_name());
            let value: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
            assert_eq!(value, serde_json::json!({ catalog.root_key(): [] }));
        }
    }

    #[test]
    fn test_bootstrap_seeds_from_defaults_and_keeps_existing_files() {
        let defaults = tempfile::tempdir().unwrap();
        fs::write(
            defaults.path().join("oils.json"),
            r#"{"oils": [{"name": "Olive Oil", "saponification_value": 0.134}]}"#,
        )
        .unwrap();
        fs::write(defaults.path().join("additives.json"), "garbage").unwrap();

        let root = tempfile::tempdir().unwrap();
        let layout = StorageLayout::new(root.path());
        let store = IngredientStore::open(&layout, Some(defaults.path()));
        assert_eq!(store.oils().len(), 1);
        assert_eq!(store.find_oil("Olive Oil").unwrap().saponification_value, 0.134);
        // The malformed default is treated as unavailable.
        assert!(store.additives().is_empty());

        fs::write(
            defaults.path().join("oils.json"),
            r#"{"oils": []}"#,
        )
        .unwrap();
        let reopened = IngredientStore::open(&layout, Some(defaults.path()));
        assert_eq!(reopened.oils().len(), 1);
    }

    #[test]
    fn test_corrupt_catalog_degrades_to_empty() {
        let root = tempfile::tempdir().unwrap();
        let layout = StorageLayout::new(root.path());
        fs::create_dir_all(layout.resources_dir()).unwrap();
        fs::write(layout.resources_dir().join("oils.json"), "[1, 2").unwrap();

        let store = IngredientStore::open(&layout, None);
        assert!(store.oils().is_empty());
    }

    #[test]
    fn test_append_persists_whole_catalog_in_order() {
        let root = tempfile::tempdir().unwrap();
        let layout = StorageLayout::new(root.path());
        let mut store = IngredientStore::open(&layout, None);

        store.append_and_persist(oil("Olive Oil", 0.134)).unwrap();
        store.append_and_persist(oil("Coconut Oil", 0.183)).unwrap();
        store
            .append_and_persist(Additive {
                name: "Goat Milk".to_string(),
                property_notes: "Creamy lather".to_string(),
                recommended_percent: "up to 100%".to_string(),
                category: AdditiveCategory::Liquid,
            })
            .unwrap();
        store
            .append_and_persist(EssentialOil {
                name: "Lavender".to_string(),
                property_notes: "Calming".to_string(),
                toxicity: Toxicity::Low,
            })
            .unwrap();

        let reopened = IngredientStore::open(&layout, None);
        let names: Vec<_> = reopened.load::<Oil>().iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Olive Oil", "Coconut Oil"]);
        assert_eq!(reopened.liquid_substitutes().count(), 1);
        assert_eq!(
            reopened.find_essential_oil("Lavender").unwrap().toxicity,
            Toxicity::Low
        );
    }

    #[test]
    fn test_append_rejects_duplicates_and_empty_names() {
        let root = tempfile::tempdir().unwrap();
        let mut store = IngredientStore::open(&StorageLayout::new(root.path()), None);
        store.append_and_persist(oil("Olive Oil", 0.134)).unwrap();

        let err = store.append_and_persist(oil(" olive oil ", 0.2)).unwrap_err();
        assert!(matches!(err, SoapforgeError::DuplicateIngredient { .. }));
        let err = store.append_and_persist(oil("  ", 0.2)).unwrap_err();
        assert!(matches!(err, SoapforgeError::EmptyIngredientName(_)));
        assert_eq!(store.oils().len(), 1);
    }
}
