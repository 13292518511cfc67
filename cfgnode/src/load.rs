//! YAML loading with base-file inheritance and versioned file merging.
//!
//! A config file may name a parent document under the `_BASE_` key; the
//! parent is loaded first (recursively) and the child's own keys are merged
//! over it. [`CfgNode::merge_from_file`] adds the schema-version gate on top:
//! same-version documents merge directly, older documents are translated
//! through the converter chain in [`crate::compat`].

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    compat,
    error::{ConfigError, Result},
    node::{CfgNode, CfgValue},
};

/// Key naming the parent document of a config file.
pub const BASE_KEY: &str = "_BASE_";

impl CfgNode {
    /// Load a YAML file, resolving `_BASE_` references recursively.
    ///
    /// Relative base paths resolve against the referring file's directory
    /// and a leading `~/` expands to the home directory. Tagged YAML values
    /// are rejected unless `allow_unsafe` is set, in which case the tag is
    /// stripped and the inner value kept.
    pub fn load_yaml_with_base(path: impl AsRef<Path>, allow_unsafe: bool) -> Result<CfgNode> {
        let mut stack = Vec::new();
        load_inner(path.as_ref(), allow_unsafe, &mut stack)
    }

    /// Merge the document at `path` into this tree, upgrading old versions.
    ///
    /// Unsafe parsing is allowed by default; config files are expected to
    /// come from trusted checkouts.
    pub fn merge_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.merge_from_file_with(path, true)
    }

    /// [`CfgNode::merge_from_file`] with explicit unsafe-parsing control.
    ///
    /// The target tree must already be at [`compat::LATEST_VERSION`]. The
    /// loaded document's version is read from its `VERSION` key, or guessed
    /// when absent. A newer document is an error and leaves the tree
    /// untouched; an older one is merged at its own version and the result
    /// upgraded back through the converter chain.
    pub fn merge_from_file_with(&mut self, path: impl AsRef<Path>, allow_unsafe: bool) -> Result<()> {
        let path = path.as_ref();
        let loaded = Self::load_yaml_with_base(path, allow_unsafe)?;

        let latest = compat::LATEST_VERSION;
        let current = self.version()?.unwrap_or(0);
        if current != latest {
            return Err(ConfigError::NotLatestVersion { current, latest });
        }

        let loaded_ver = match loaded.version()? {
            Some(v) => v,
            None => compat::guess_version(&loaded, path),
        };
        if loaded_ver > latest {
            return Err(ConfigError::VersionTooNew {
                loaded: loaded_ver,
                current: latest,
            });
        }

        if loaded_ver == latest {
            return self.merge_from_other_cfg(&loaded);
        }

        warn!(
            "loading an old v{} config file '{}' by automatically upgrading to v{}",
            loaded_ver,
            path.display(),
            latest
        );
        let mut old = compat::downgrade_config(self.clone(), loaded_ver)?;
        old.merge_from_other_cfg(&loaded)?;
        let upgraded = compat::upgrade_config(old)?;
        self.clear();
        self.update(&upgraded);
        Ok(())
    }
}

fn load_inner(path: &Path, allow_unsafe: bool, stack: &mut Vec<PathBuf>) -> Result<CfgNode> {
    let canonical = path.canonicalize().map_err(|e| ConfigError::Io {
        file: path.to_path_buf(),
        source: e,
    })?;
    if stack.contains(&canonical) {
        let mut chain = stack.clone();
        chain.push(canonical);
        return Err(ConfigError::BaseCycle { chain });
    }
    stack.push(canonical.clone());
    let result = load_one(&canonical, allow_unsafe, stack);
    stack.pop();
    result
}

fn load_one(path: &Path, allow_unsafe: bool, stack: &mut Vec<PathBuf>) -> Result<CfgNode> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        file: path.to_path_buf(),
        source: e,
    })?;
    let value: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            file: path.to_path_buf(),
            source: e,
        })?;
    let mut node = node_from_yaml(&value, allow_unsafe, "", path)?;

    if let Some(base_value) = node.remove(BASE_KEY) {
        let base_str = match base_value.as_str() {
            Some(s) => s.to_string(),
            None => {
                return Err(ConfigError::InvalidBase {
                    actual: base_value.kind().to_string(),
                });
            }
        };
        let base_path = resolve_base_path(&base_str, path);
        let mut base = load_inner(&base_path, allow_unsafe, stack)?;
        base.merge_from_other_cfg(&node)?;
        node = base;
    }
    Ok(node)
}

fn resolve_base_path(base: &str, referrer: &Path) -> PathBuf {
    let expanded = expand_home(base);
    if expanded.is_absolute() {
        return expanded;
    }
    match referrer.parent() {
        Some(parent) => parent.join(expanded),
        None => expanded,
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}

fn node_from_yaml(
    value: &serde_yaml::Value,
    allow_unsafe: bool,
    path: &str,
    file: &Path,
) -> Result<CfgNode> {
    match value {
        // an empty document parses as null
        serde_yaml::Value::Null => Ok(CfgNode::new()),
        serde_yaml::Value::Mapping(map) => {
            let mut node = CfgNode::new();
            for (key, val) in map {
                let key = match key {
                    serde_yaml::Value::String(s) => s.clone(),
                    _ => {
                        return Err(ConfigError::NonStringKey {
                            path: path.to_string(),
                        });
                    }
                };
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                let converted = value_from_yaml(val, allow_unsafe, &child_path, file)?;
                node.insert(key, converted);
            }
            Ok(node)
        }
        other => Err(ConfigError::TypeMismatch {
            path: if path.is_empty() {
                "<root>".to_string()
            } else {
                path.to_string()
            },
            expected: "mapping".to_string(),
            actual: yaml_kind(other).to_string(),
        }),
    }
}

fn value_from_yaml(
    value: &serde_yaml::Value,
    allow_unsafe: bool,
    path: &str,
    file: &Path,
) -> Result<CfgValue> {
    match value {
        serde_yaml::Value::Null => Ok(CfgValue::Null),
        serde_yaml::Value::Bool(b) => Ok(CfgValue::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(CfgValue::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(CfgValue::Float(f))
            } else {
                Err(ConfigError::TypeMismatch {
                    path: path.to_string(),
                    expected: "integer or number".to_string(),
                    actual: n.to_string(),
                })
            }
        }
        serde_yaml::Value::String(s) => Ok(CfgValue::Str(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let mut items = Vec::with_capacity(seq.len());
            for (i, item) in seq.iter().enumerate() {
                let item_path = format!("{path}[{i}]");
                items.push(value_from_yaml(item, allow_unsafe, &item_path, file)?);
            }
            Ok(CfgValue::List(items))
        }
        serde_yaml::Value::Mapping(_) => {
            Ok(CfgValue::Node(node_from_yaml(value, allow_unsafe, path, file)?))
        }
        serde_yaml::Value::Tagged(tagged) => {
            if allow_unsafe {
                value_from_yaml(&tagged.value, allow_unsafe, path, file)
            } else {
                Err(ConfigError::UnsafeTag {
                    file: file.to_path_buf(),
                    path: path.to_string(),
                    tag: tagged.tag.to_string(),
                })
            }
        }
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "boolean",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "array",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged",
    }
}
