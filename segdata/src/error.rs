//! Error types for catalogs and dataset scanning.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the name-keyed catalogs.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("dataset `{name}` is already registered")]
    DuplicateKey { name: String },

    #[error("dataset `{name}` is not registered")]
    NotFound { name: String },
}

/// Errors raised while scanning a dataset on disk.
#[derive(Error, Debug)]
pub enum DataError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("no ground truth for image {image}, expected {expected}")]
    MissingGroundTruth { image: PathBuf, expected: PathBuf },
}
