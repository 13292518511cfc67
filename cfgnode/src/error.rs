//! Error types and result definitions for configuration operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading, merging or converting configs.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {file}: {source}")]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parsing error in {file}: {source}")]
    Parse {
        file: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unsafe YAML tag `{tag}` at {path} in {file}")]
    UnsafeTag {
        file: PathBuf,
        path: String,
        tag: String,
    },

    #[error("base file cycle detected: {chain:?}")]
    BaseCycle { chain: Vec<PathBuf> },

    #[error("`_BASE_` must be a string path, got {actual}")]
    InvalidBase { actual: String },

    #[error("non-string mapping key at {path}")]
    NonStringKey { path: String },

    #[error("type mismatch at {path}: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("`VERSION` must be an integer, got {actual}")]
    InvalidVersion { actual: String },

    #[error("cannot merge a v{loaded} config into a v{current} config")]
    VersionTooNew { loaded: u32, current: u32 },

    #[error("merge_from_file requires a config at the latest version v{latest}, tree is at v{current}")]
    NotLatestVersion { current: u32, latest: u32 },

    #[error("no converter for config version {version}")]
    NoConverter { version: u32 },

    #[error("failed to serialize config")]
    Dump(#[source] serde_yaml::Error),
}
