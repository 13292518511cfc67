//! Process-wide configuration handle.
//!
//! A single shared tree guarded by an `RwLock`, starting out empty. The lock
//! itself is the stable handle: [`set_global_cfg`] replaces the tree's
//! contents, never the lock, so every reader observes the update.

use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard};

use crate::node::CfgNode;

static GLOBAL: LazyLock<RwLock<CfgNode>> = LazyLock::new(|| RwLock::new(CfgNode::new()));

/// Replace the global config's contents with a copy of `cfg`.
pub fn set_global_cfg(cfg: &CfgNode) {
    let mut global = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    global.clear();
    global.update(cfg);
    debug!("global config replaced ({} top-level keys)", global.len());
}

/// Read access to the global config.
///
/// The guard holds a read lock; drop it before calling [`set_global_cfg`]
/// from the same thread.
pub fn global_cfg() -> RwLockReadGuard<'static, CfgNode> {
    GLOBAL.read().unwrap_or_else(PoisonError::into_inner)
}
