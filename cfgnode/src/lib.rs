//! # cfgnode
//!
//! Versioned hierarchical configuration trees with YAML base-file
//! inheritance, built for training pipelines that carry one large config
//! tree through many experiment files.
//!
//! ## Features
//!
//! - Typed config tree ([`CfgNode`]/[`CfgValue`]) with dot-separated key paths
//! - YAML loading with `_BASE_` parent-file inheritance and cycle detection
//! - Checked recursive merging with per-path type-mismatch errors
//! - Schema versioning: old config files are translated through
//!   upgrade/downgrade converters on merge
//! - A locked process-wide config handle for read-mostly sharing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cfgnode::get_cfg;
//!
//! // Copy of the canonical defaults, at the latest schema version
//! let mut cfg = get_cfg();
//!
//! // Merge an experiment file; old versions upgrade automatically
//! cfg.merge_from_file("configs/experiment.yaml").unwrap();
//!
//! // Publish for read-mostly global access
//! cfgnode::set_global_cfg(&cfg);
//! ```
//!
//! ## Modules
//!
//! - [`node`] - Config tree types, key paths and merging
//! - [`load`] - YAML loading with `_BASE_` inheritance and file merging
//! - [`compat`] - Schema version converters and version guessing
//! - [`defaults`] - The canonical default tree
//! - [`global`] - Process-wide config handle
//! - [`error`] - Error types and result definitions

#[macro_use]
extern crate log;

/// Backward compatibility converters between schema versions.
pub mod compat;

/// The canonical default configuration tree.
pub mod defaults;

/// Error types and result definitions for configuration operations.
pub mod error;

/// Process-wide configuration handle.
pub mod global;

/// YAML loading with base-file inheritance.
pub mod load;

/// Config tree types, key paths and merging.
pub mod node;

// Re-export main types for convenience
pub use compat::LATEST_VERSION;
pub use defaults::get_cfg;
pub use error::{ConfigError, Result};
pub use global::{global_cfg, set_global_cfg};
pub use load::BASE_KEY;
pub use node::{CfgNode, CfgValue, VERSION_KEY};
