//! Hierarchical configuration tree types.
//!
//! A [`CfgNode`] is an ordered mapping from string keys to [`CfgValue`]s,
//! where a value may itself be a nested node. Keys are addressed with
//! dot-separated paths (`"SOLVER.BASE_LR"`), mirroring how config files
//! spell overrides.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{ConfigError, Result};

/// Key under which a root tree stores its schema version.
pub const VERSION_KEY: &str = "VERSION";

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CfgValue {
    /// Explicit null, may be replaced by (or replace) any other kind.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<CfgValue>),
    /// Nested configuration node.
    Node(CfgNode),
}

impl CfgValue {
    /// Human-readable kind name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            CfgValue::Null => "null",
            CfgValue::Bool(_) => "boolean",
            CfgValue::Int(_) => "integer",
            CfgValue::Float(_) => "number",
            CfgValue::Str(_) => "string",
            CfgValue::List(_) => "array",
            CfgValue::Node(_) => "mapping",
        }
    }

    /// Get the nested node, if this value is a mapping.
    pub fn as_node(&self) -> Option<&CfgNode> {
        match self {
            CfgValue::Node(n) => Some(n),
            _ => None,
        }
    }

    /// Get the integer value, if this value is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            CfgValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the string value, if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CfgValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for CfgValue {
    fn from(v: bool) -> Self {
        CfgValue::Bool(v)
    }
}

impl From<i64> for CfgValue {
    fn from(v: i64) -> Self {
        CfgValue::Int(v)
    }
}

impl From<i32> for CfgValue {
    fn from(v: i32) -> Self {
        CfgValue::Int(v as i64)
    }
}

impl From<u32> for CfgValue {
    fn from(v: u32) -> Self {
        CfgValue::Int(v as i64)
    }
}

impl From<f64> for CfgValue {
    fn from(v: f64) -> Self {
        CfgValue::Float(v)
    }
}

impl From<&str> for CfgValue {
    fn from(v: &str) -> Self {
        CfgValue::Str(v.to_string())
    }
}

impl From<String> for CfgValue {
    fn from(v: String) -> Self {
        CfgValue::Str(v)
    }
}

impl From<CfgNode> for CfgValue {
    fn from(v: CfgNode) -> Self {
        CfgValue::Node(v)
    }
}

impl<T: Into<CfgValue>> From<Vec<T>> for CfgValue {
    fn from(v: Vec<T>) -> Self {
        CfgValue::List(v.into_iter().map(Into::into).collect())
    }
}

/// An ordered configuration tree.
///
/// `Clone` produces a fully independent deep copy; mutating a clone never
/// affects the original.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CfgNode {
    entries: BTreeMap<String, CfgValue>,
}

impl CfgNode {
    /// Create an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direct child keys, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over direct children.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CfgValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Remove all children.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Insert a direct child, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CfgValue>) -> Option<CfgValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Get a direct child by key (no path resolution).
    pub fn child(&self, key: &str) -> Option<&CfgValue> {
        self.entries.get(key)
    }

    /// Shallow-extend this node with clones of `other`'s direct children.
    ///
    /// Existing keys are overwritten without type checking; use
    /// [`CfgNode::merge_from_other_cfg`] for checked recursive merging.
    pub fn update(&mut self, other: &CfgNode) {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), v.clone());
        }
    }

    /// Resolve a dot-separated path to a value.
    pub fn get(&self, path: &str) -> Option<&CfgValue> {
        let mut node = self;
        let mut parts = path.split('.').peekable();
        while let Some(part) = parts.next() {
            let value = node.entries.get(part)?;
            if parts.peek().is_none() {
                return Some(value);
            }
            node = value.as_node()?;
        }
        None
    }

    /// Resolve a dot-separated path to a mutable value.
    pub fn get_mut(&mut self, path: &str) -> Option<&mut CfgValue> {
        let mut node = self;
        let mut parts = path.split('.').peekable();
        while let Some(part) = parts.next() {
            let value = node.entries.get_mut(part)?;
            if parts.peek().is_none() {
                return Some(value);
            }
            node = match value {
                CfgValue::Node(n) => n,
                _ => return None,
            };
        }
        None
    }

    /// Set the value at a dot-separated path, creating intermediate nodes.
    ///
    /// An intermediate key holding a non-mapping value is replaced by a
    /// fresh node.
    pub fn set(&mut self, path: &str, value: impl Into<CfgValue>) {
        let mut node = self;
        let mut parts = path.split('.').peekable();
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                node.entries.insert(part.to_string(), value.into());
                return;
            }
            let entry = node
                .entries
                .entry(part.to_string())
                .or_insert_with(|| CfgValue::Node(CfgNode::new()));
            if !matches!(entry, CfgValue::Node(_)) {
                *entry = CfgValue::Node(CfgNode::new());
            }
            node = match entry {
                CfgValue::Node(n) => n,
                _ => unreachable!(),
            };
        }
    }

    /// Remove the value at a dot-separated path, returning it if present.
    ///
    /// Intermediate nodes are left in place even when emptied.
    pub fn remove(&mut self, path: &str) -> Option<CfgValue> {
        let (parent_path, key) = match path.rsplit_once('.') {
            Some((parent, key)) => (Some(parent), key),
            None => (None, path),
        };
        let node = match parent_path {
            Some(p) => match self.get_mut(p)? {
                CfgValue::Node(n) => n,
                _ => return None,
            },
            None => self,
        };
        node.entries.remove(key)
    }

    /// Schema version stored at the root, if declared.
    pub fn version(&self) -> Result<Option<u32>> {
        match self.entries.get(VERSION_KEY) {
            None => Ok(None),
            Some(CfgValue::Int(v)) if *v >= 0 => Ok(Some(*v as u32)),
            Some(CfgValue::Int(v)) => Err(ConfigError::InvalidVersion {
                actual: v.to_string(),
            }),
            Some(other) => Err(ConfigError::InvalidVersion {
                actual: other.kind().to_string(),
            }),
        }
    }

    /// Set the schema version at the root.
    pub fn set_version(&mut self, version: u32) {
        self.entries
            .insert(VERSION_KEY.to_string(), CfgValue::Int(version as i64));
    }

    /// Recursively merge `other` into this node.
    ///
    /// Matching keys are overridden, new keys are added, and nested nodes
    /// merge key-wise. An existing key whose value kind differs from the
    /// incoming kind fails with [`ConfigError::TypeMismatch`]; `null` on
    /// either side always permits replacement.
    pub fn merge_from_other_cfg(&mut self, other: &CfgNode) -> Result<()> {
        merge_node(self, other, "")
    }

    /// Serialize the tree to a YAML string.
    pub fn dump(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(ConfigError::Dump)
    }
}

fn merge_node(dst: &mut CfgNode, src: &CfgNode, prefix: &str) -> Result<()> {
    for (key, incoming) in &src.entries {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match dst.entries.get_mut(key) {
            None => {
                dst.entries.insert(key.clone(), incoming.clone());
            }
            Some(existing) => {
                if let (CfgValue::Node(d), CfgValue::Node(s)) = (&mut *existing, incoming) {
                    merge_node(d, s, &path)?;
                } else if existing.kind() == incoming.kind()
                    || matches!(existing, CfgValue::Null)
                    || matches!(incoming, CfgValue::Null)
                {
                    *existing = incoming.clone();
                } else {
                    return Err(ConfigError::TypeMismatch {
                        path,
                        expected: existing.kind().to_string(),
                        actual: incoming.kind().to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CfgNode {
        let mut c = CfgNode::new();
        c.set_version(2);
        c.set("MODEL.X", 1);
        c.set("MODEL.NAME", "net");
        c.set("SOLVER.BASE_LR", 0.01);
        c
    }

    #[test]
    fn test_path_get_set() {
        let c = sample();
        assert_eq!(c.get("MODEL.X").and_then(CfgValue::as_int), Some(1));
        assert_eq!(c.get("MODEL.NAME").and_then(CfgValue::as_str), Some("net"));
        assert!(c.get("MODEL.MISSING").is_none());
        assert!(c.get("MODEL.X.DEEPER").is_none());
    }

    #[test]
    fn test_clone_is_independent() {
        let a = sample();
        let mut b = a.clone();
        b.set("MODEL.X", 99);
        assert_eq!(a.get("MODEL.X").and_then(CfgValue::as_int), Some(1));
        assert_eq!(b.get("MODEL.X").and_then(CfgValue::as_int), Some(99));
    }

    #[test]
    fn test_merge_overrides_and_adds() {
        let mut c = sample();
        let mut other = CfgNode::new();
        other.set("MODEL.X", 5);
        other.set("MODEL.NEW", true);
        c.merge_from_other_cfg(&other).unwrap();
        assert_eq!(c.get("MODEL.X").and_then(CfgValue::as_int), Some(5));
        assert_eq!(c.get("MODEL.NEW"), Some(&CfgValue::Bool(true)));
        // untouched keys survive
        assert_eq!(c.get("MODEL.NAME").and_then(CfgValue::as_str), Some("net"));
        assert_eq!(c.get("SOLVER.BASE_LR"), Some(&CfgValue::Float(0.01)));
    }

    #[test]
    fn test_merge_type_mismatch() {
        let mut c = sample();
        let mut other = CfgNode::new();
        other.set("MODEL.X", "not a number");
        let err = c.merge_from_other_cfg(&other).unwrap_err();
        match err {
            crate::ConfigError::TypeMismatch { path, expected, actual } => {
                assert_eq!(path, "MODEL.X");
                assert_eq!(expected, "integer");
                assert_eq!(actual, "string");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_merge_null_replaces_either_way() {
        let mut c = CfgNode::new();
        c.set("A", CfgValue::Null);
        c.set("B", 1);
        let mut other = CfgNode::new();
        other.set("A", 7);
        other.set("B", CfgValue::Null);
        c.merge_from_other_cfg(&other).unwrap();
        assert_eq!(c.get("A").and_then(CfgValue::as_int), Some(7));
        assert_eq!(c.get("B"), Some(&CfgValue::Null));
    }

    #[test]
    fn test_remove_and_version() {
        let mut c = sample();
        assert_eq!(c.version().unwrap(), Some(2));
        assert_eq!(c.remove("MODEL.X"), Some(CfgValue::Int(1)));
        assert!(c.get("MODEL.X").is_none());
        c.insert(VERSION_KEY, "two");
        assert!(c.version().is_err());
    }

    #[test]
    fn test_update_is_shallow_replace() {
        let mut c = sample();
        let mut other = CfgNode::new();
        other.set("MODEL.Y", 3);
        c.update(&other);
        // the whole MODEL subtree was replaced, not merged
        assert!(c.get("MODEL.X").is_none());
        assert_eq!(c.get("MODEL.Y").and_then(CfgValue::as_int), Some(3));
    }

    #[test]
    fn test_dump_round_trips_keys() {
        let c = sample();
        let text = c.dump().unwrap();
        assert!(text.contains("VERSION: 2"));
        assert!(text.contains("BASE_LR"));
    }
}
