//! The canonical default configuration tree.
//!
//! [`get_cfg`] hands out deep copies of a fixed default tree for
//! semantic-segmentation training; callers mutate their copy and the
//! canonical instance never changes.

use std::sync::LazyLock;

use crate::{compat::LATEST_VERSION, node::CfgNode};

static DEFAULT: LazyLock<CfgNode> = LazyLock::new(build_default);

/// Get a copy of the default config.
///
/// Every call returns an independent tree at [`LATEST_VERSION`].
pub fn get_cfg() -> CfgNode {
    DEFAULT.clone()
}

fn build_default() -> CfgNode {
    let mut c = CfgNode::new();
    c.set_version(LATEST_VERSION);

    c.set("MODEL.META_ARCHITECTURE", "SemanticSegmentor");
    c.set("MODEL.DEVICE", "cuda");
    c.set("MODEL.WEIGHTS", "");
    c.set("MODEL.SEM_SEG_HEAD.NUM_CLASSES", 13);
    c.set("MODEL.SEM_SEG_HEAD.IGNORE_VALUE", 255);
    c.set("MODEL.SEM_SEG_HEAD.LOSS_WEIGHT", 1.0);

    c.set("DATASETS.TRAIN", Vec::<String>::new());
    c.set("DATASETS.TEST", Vec::<String>::new());

    c.set("DATALOADER.NUM_WORKERS", 4);
    c.set("DATALOADER.FILTER_EMPTY_ANNOTATIONS", true);

    c.set("INPUT.MIN_SIZE_TRAIN", vec![640, 672, 704, 736, 768, 800]);
    c.set("INPUT.MIN_SIZE_TEST", 800);
    c.set("INPUT.MAX_SIZE_TRAIN", 1333);
    c.set("INPUT.MAX_SIZE_TEST", 1333);
    c.set("INPUT.RANDOM_FLIP", "horizontal");

    c.set("SOLVER.IMS_PER_BATCH", 16);
    c.set("SOLVER.BASE_LR", 0.01);
    c.set("SOLVER.MAX_ITER", 40_000);
    c.set("SOLVER.MOMENTUM", 0.9);
    c.set("SOLVER.WEIGHT_DECAY", 0.0001);
    c.set("SOLVER.WARMUP_ITERS", 1000);
    c.set("SOLVER.CHECKPOINT_PERIOD", 5000);

    c.set("TEST.EVAL_PERIOD", 0);
    c.set("OUTPUT_DIR", "./output");
    c.set("SEED", -1);
    c.set("CUDNN_BENCHMARK", false);

    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::CfgValue;

    #[test]
    fn test_default_is_latest_version() {
        let cfg = get_cfg();
        assert_eq!(cfg.version().unwrap(), Some(LATEST_VERSION));
    }

    #[test]
    fn test_copies_are_independent() {
        let mut a = get_cfg();
        let b = get_cfg();
        a.set("SOLVER.BASE_LR", 0.5);
        assert_eq!(a.get("SOLVER.BASE_LR"), Some(&CfgValue::Float(0.5)));
        assert_eq!(b.get("SOLVER.BASE_LR"), Some(&CfgValue::Float(0.01)));
        // the canonical instance is untouched as well
        assert_eq!(get_cfg().get("SOLVER.BASE_LR"), Some(&CfgValue::Float(0.01)));
    }
}
