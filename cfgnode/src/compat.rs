//! Backward compatibility of config schema versions.
//!
//! Each version step is described by a converter holding key renames; the
//! upgrade direction applies them old→new and the downgrade direction is its
//! exact inverse, so translating a tree to an adjacent version and back is
//! the identity on keys present in both versions.

use std::path::Path;

use crate::{
    error::{ConfigError, Result},
    node::CfgNode,
};

/// Latest schema version of the default config tree.
pub const LATEST_VERSION: u32 = 2;

/// Key renames taking a tree from version N-1 to version N.
struct Converter {
    renames: &'static [(&'static str, &'static str)],
}

impl Converter {
    fn upgrade(&self, cfg: &mut CfgNode) {
        for (old, new) in self.renames {
            rename_key(cfg, old, new);
        }
    }

    fn downgrade(&self, cfg: &mut CfgNode) {
        for (old, new) in self.renames {
            rename_key(cfg, new, old);
        }
    }
}

/// v1 → v2: solver keys were renamed to match the optimizer terminology.
const TO_V2: Converter = Converter {
    renames: &[
        ("SOLVER.LR", "SOLVER.BASE_LR"),
        ("SOLVER.ITERS", "SOLVER.MAX_ITER"),
    ],
};

fn converter_to(version: u32) -> Option<&'static Converter> {
    match version {
        2 => Some(&TO_V2),
        _ => None,
    }
}

fn rename_key(cfg: &mut CfgNode, from: &str, to: &str) {
    // keys absent from the document are simply not translated
    if let Some(value) = cfg.remove(from) {
        cfg.set(to, value);
    }
}

/// Upgrade a config tree from its declared version to [`LATEST_VERSION`].
pub fn upgrade_config(mut cfg: CfgNode) -> Result<CfgNode> {
    let current = cfg.version()?.unwrap_or(0);
    for version in (current + 1)..=LATEST_VERSION {
        let converter = converter_to(version).ok_or(ConfigError::NoConverter { version })?;
        converter.upgrade(&mut cfg);
        cfg.set_version(version);
    }
    Ok(cfg)
}

/// Downgrade a config tree from its declared version down to `to_version`.
pub fn downgrade_config(mut cfg: CfgNode, to_version: u32) -> Result<CfgNode> {
    let current = cfg.version()?.unwrap_or(LATEST_VERSION);
    for version in ((to_version + 1)..=current).rev() {
        let converter = converter_to(version).ok_or(ConfigError::NoConverter { version })?;
        converter.downgrade(&mut cfg);
        cfg.set_version(version - 1);
    }
    Ok(cfg)
}

/// Guess the schema version of a document without an explicit `VERSION`.
///
/// Any key that only exists in an old version marks the document as that
/// version; otherwise the document is assumed to already be current, with a
/// warning since the guess is best-effort.
pub fn guess_version(cfg: &CfgNode, source: &Path) -> u32 {
    const V1_ONLY_KEYS: &[&str] = &["SOLVER.LR", "SOLVER.ITERS"];
    for key in V1_ONLY_KEYS {
        if cfg.get(key).is_some() {
            debug!(
                "config '{}' has no VERSION, guessed v1 from key `{}`",
                source.display(),
                key
            );
            return 1;
        }
    }
    warn!(
        "config '{}' has no VERSION and no version-specific keys, assuming v{}",
        source.display(),
        LATEST_VERSION
    );
    LATEST_VERSION
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::get_cfg;

    #[test]
    fn test_downgrade_renames_solver_keys() {
        let cfg = get_cfg();
        let old = downgrade_config(cfg, 1).unwrap();
        assert_eq!(old.version().unwrap(), Some(1));
        assert!(old.get("SOLVER.LR").is_some());
        assert!(old.get("SOLVER.ITERS").is_some());
        assert!(old.get("SOLVER.BASE_LR").is_none());
        assert!(old.get("SOLVER.MAX_ITER").is_none());
    }

    #[test]
    fn test_adjacent_round_trip_is_identity() {
        let cfg = get_cfg();
        let round_tripped = upgrade_config(downgrade_config(cfg.clone(), 1).unwrap()).unwrap();
        assert_eq!(round_tripped, cfg);
    }

    #[test]
    fn test_guess_version() {
        let mut old = CfgNode::new();
        old.set("SOLVER.LR", 0.1);
        assert_eq!(guess_version(&old, Path::new("old.yaml")), 1);

        let mut current = CfgNode::new();
        current.set("SOLVER.BASE_LR", 0.1);
        assert_eq!(guess_version(&current, Path::new("new.yaml")), LATEST_VERSION);
    }

    #[test]
    fn test_upgrade_without_converter_fails() {
        let mut cfg = CfgNode::new();
        cfg.set_version(0);
        assert!(matches!(
            upgrade_config(cfg).unwrap_err(),
            ConfigError::NoConverter { version: 1 }
        ));
    }
}
