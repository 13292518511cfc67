//! Name-keyed catalogs for dataset sources and metadata.
//!
//! Catalogs are plain owned values; construct them at startup, register
//! every split, and pass them to whatever consumes datasets. Registration is
//! strict: a name can only be registered once.

use std::collections::HashMap;

use crate::{
    error::{CatalogError, DataError},
    loader::{self, SemSegSample, SemSegSource},
    metadata::SemSegMetadata,
};

/// Registry of dataset sources, keyed by split name.
#[derive(Debug, Clone, Default)]
pub struct DatasetCatalog {
    entries: HashMap<String, SemSegSource>,
}

impl DatasetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source under `name`.
    ///
    /// Fails with [`CatalogError::DuplicateKey`] if the name is taken.
    pub fn register(&mut self, name: impl Into<String>, source: SemSegSource) -> Result<(), CatalogError> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(CatalogError::DuplicateKey { name });
        }
        debug!("registered dataset `{name}`");
        self.entries.insert(name, source);
        Ok(())
    }

    /// Look up the source registered under `name`.
    pub fn get(&self, name: &str) -> Result<&SemSegSource, CatalogError> {
        self.entries.get(name).ok_or_else(|| CatalogError::NotFound {
            name: name.to_string(),
        })
    }

    /// Scan the split registered under `name` into per-sample records.
    pub fn load(&self, name: &str) -> Result<Vec<SemSegSample>, DataError> {
        let source = self.get(name)?;
        loader::load_sem_seg(source)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Registry of dataset metadata records, keyed by split name.
#[derive(Debug, Clone, Default)]
pub struct MetadataCatalog {
    entries: HashMap<String, SemSegMetadata>,
}

impl MetadataCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a metadata record to `name`.
    ///
    /// Fails with [`CatalogError::DuplicateKey`] if the name already has
    /// metadata; records are immutable once set.
    pub fn set(&mut self, name: impl Into<String>, metadata: SemSegMetadata) -> Result<(), CatalogError> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(CatalogError::DuplicateKey { name });
        }
        self.entries.insert(name, metadata);
        Ok(())
    }

    /// Look up the metadata registered under `name`.
    pub fn get(&self, name: &str) -> Result<&SemSegMetadata, CatalogError> {
        self.entries.get(name).ok_or_else(|| CatalogError::NotFound {
            name: name.to_string(),
        })
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut catalog = DatasetCatalog::new();
        catalog
            .register("s1", SemSegSource::new("a", "b"))
            .unwrap();
        assert!(catalog.contains("s1"));
        assert_eq!(catalog.get("s1").unwrap().image_root.to_str(), Some("a"));
        assert!(matches!(
            catalog.get("s2").unwrap_err(),
            CatalogError::NotFound { .. }
        ));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut catalog = DatasetCatalog::new();
        catalog
            .register("s1", SemSegSource::new("a", "b"))
            .unwrap();
        let err = catalog
            .register("s1", SemSegSource::new("c", "d"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateKey { name } if name == "s1"));
        // the original entry is untouched
        assert_eq!(catalog.get("s1").unwrap().image_root.to_str(), Some("a"));
    }

    #[test]
    fn test_metadata_set_once() {
        let mut catalog = MetadataCatalog::new();
        catalog.set("s1", SemSegMetadata::carla_semantic()).unwrap();
        assert!(catalog.set("s1", SemSegMetadata::new("sem_seg")).is_err());
        assert_eq!(catalog.get("s1").unwrap().num_classes(), 13);
    }

    #[test]
    fn test_names_sorted() {
        let mut catalog = DatasetCatalog::new();
        catalog.register("b", SemSegSource::new("x", "y")).unwrap();
        catalog.register("a", SemSegSource::new("x", "y")).unwrap();
        assert_eq!(catalog.names(), vec!["a", "b"]);
    }
}
