//! # segdata
//!
//! Dataset registration for semantic-segmentation training: name-keyed
//! catalogs of dataset sources and metadata, the static carla/bdd split
//! declarations, and the file-system scanner that turns a registered split
//! into per-sample records.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use segdata::{DatasetCatalog, MetadataCatalog, register_all, DEFAULT_ROOT};
//!
//! let mut datasets = DatasetCatalog::new();
//! let mut metadata = MetadataCatalog::new();
//! register_all(&mut datasets, &mut metadata, DEFAULT_ROOT).unwrap();
//!
//! // Scan a split lazily, when training actually needs it
//! let samples = datasets.load("semantic-carla-origin-train").unwrap();
//! println!("{} samples", samples.len());
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Name-keyed registries for sources and metadata
//! - [`register`] - Static split declarations and bulk registration
//! - [`loader`] - Source records and the sample scanner
//! - [`metadata`] - Per-split class metadata
//! - [`error`] - Error types

#[macro_use]
extern crate log;

/// Name-keyed registries for dataset sources and metadata.
pub mod catalog;

/// Error types for catalogs and dataset scanning.
pub mod error;

/// Dataset source records and the sample scanner.
pub mod loader;

/// Per-split class metadata.
pub mod metadata;

/// Static split declarations and catalog registration.
pub mod register;

// Re-export main types for convenience
pub use catalog::{DatasetCatalog, MetadataCatalog};
pub use error::{CatalogError, DataError};
pub use loader::{SemSegSample, SemSegSource, load_sem_seg};
pub use metadata::SemSegMetadata;
pub use register::{DEFAULT_ROOT, SPLITS, SplitSpec, register_all, register_split};
