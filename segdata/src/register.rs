//! Static split declarations and catalog registration.
//!
//! The carla and bdd exports come in an `origin` and a `randomized` variant;
//! both variants of a split share the same semantic ground truth.

use std::path::Path;

use crate::{
    catalog::{DatasetCatalog, MetadataCatalog},
    loader::SemSegSource,
    metadata::SemSegMetadata,
};

/// Root directory the relative split paths are joined under.
pub const DEFAULT_ROOT: &str = "datasets";

/// One declared dataset split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitSpec {
    /// Catalog key for this split.
    pub name: &'static str,
    /// Image directory, relative to the datasets root.
    pub image_dir: &'static str,
    /// Ground-truth directory, relative to the datasets root.
    pub gt_dir: &'static str,
}

/// All known semantic-segmentation splits.
pub const SPLITS: [SplitSpec; 8] = [
    SplitSpec {
        name: "semantic-carla-origin-train",
        image_dir: "carla/origin/train",
        gt_dir: "carla/semantic/train",
    },
    SplitSpec {
        name: "semantic-carla-randomized-train",
        image_dir: "carla/randomized/train",
        gt_dir: "carla/semantic/train",
    },
    SplitSpec {
        name: "semantic-bdd-origin-train",
        image_dir: "bdd/origin/train",
        gt_dir: "bdd/semantic/train",
    },
    SplitSpec {
        name: "semantic-bdd-randomized-train",
        image_dir: "bdd/randomized/train",
        gt_dir: "bdd/semantic/train",
    },
    SplitSpec {
        name: "semantic-carla-origin-test",
        image_dir: "carla/origin/test",
        gt_dir: "carla/semantic/test",
    },
    SplitSpec {
        name: "semantic-carla-randomized-test",
        image_dir: "carla/randomized/test",
        gt_dir: "carla/semantic/test",
    },
    SplitSpec {
        name: "semantic-bdd-origin-test",
        image_dir: "bdd/origin/test",
        gt_dir: "bdd/semantic/test",
    },
    SplitSpec {
        name: "semantic-bdd-randomized-test",
        image_dir: "bdd/randomized/test",
        gt_dir: "bdd/semantic/test",
    },
];

/// Register one split into both catalogs under `root`.
///
/// The split gets a [`SemSegSource`] in the dataset catalog and the carla
/// class metadata, with resolved roots, in the metadata catalog.
pub fn register_split(
    datasets: &mut DatasetCatalog,
    metadata: &mut MetadataCatalog,
    split: &SplitSpec,
    root: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let image_root = root.as_ref().join(split.image_dir);
    let gt_root = root.as_ref().join(split.gt_dir);

    datasets.register(split.name, SemSegSource::new(&image_root, &gt_root))?;
    metadata.set(
        split.name,
        SemSegMetadata::carla_semantic().with_roots(&image_root, &gt_root),
    )?;
    Ok(())
}

/// Register every declared split into the given catalogs under `root`.
pub fn register_all(
    datasets: &mut DatasetCatalog,
    metadata: &mut MetadataCatalog,
    root: impl AsRef<Path>,
) -> anyhow::Result<()> {
    for split in &SPLITS {
        register_split(datasets, metadata, split, root.as_ref())?;
    }
    info!("registered {} semantic-segmentation splits", SPLITS.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_register_all_splits() {
        let mut datasets = DatasetCatalog::new();
        let mut metadata = MetadataCatalog::new();
        register_all(&mut datasets, &mut metadata, DEFAULT_ROOT).unwrap();

        assert_eq!(datasets.len(), SPLITS.len());
        assert_eq!(metadata.len(), SPLITS.len());

        let source = datasets.get("semantic-carla-origin-train").unwrap();
        assert_eq!(source.image_root, PathBuf::from("datasets/carla/origin/train"));
        assert_eq!(source.gt_root, PathBuf::from("datasets/carla/semantic/train"));

        let meta = metadata.get("semantic-bdd-randomized-test").unwrap();
        assert_eq!(meta.image_root, PathBuf::from("datasets/bdd/randomized/test"));
        assert_eq!(meta.sem_seg_root, PathBuf::from("datasets/bdd/semantic/test"));
        assert_eq!(meta.num_classes(), 13);
        assert_eq!(meta.evaluator_type, "sem_seg");
    }

    #[test]
    fn test_register_split_joins_root() {
        let mut datasets = DatasetCatalog::new();
        let mut metadata = MetadataCatalog::new();
        let split = SplitSpec {
            name: "s1",
            image_dir: "a",
            gt_dir: "b",
        };
        register_split(&mut datasets, &mut metadata, &split, DEFAULT_ROOT).unwrap();

        let meta = metadata.get("s1").unwrap();
        assert_eq!(meta.image_root, PathBuf::from("datasets/a"));
        assert_eq!(meta.sem_seg_root, PathBuf::from("datasets/b"));
    }

    #[test]
    fn test_second_registration_fails() {
        let mut datasets = DatasetCatalog::new();
        let mut metadata = MetadataCatalog::new();
        register_all(&mut datasets, &mut metadata, DEFAULT_ROOT).unwrap();
        assert!(register_all(&mut datasets, &mut metadata, DEFAULT_ROOT).is_err());
    }

    #[test]
    fn test_variants_share_ground_truth() {
        for variant_pair in [
            ("semantic-carla-origin-train", "semantic-carla-randomized-train"),
            ("semantic-bdd-origin-test", "semantic-bdd-randomized-test"),
        ] {
            let origin = SPLITS.iter().find(|s| s.name == variant_pair.0).unwrap();
            let randomized = SPLITS.iter().find(|s| s.name == variant_pair.1).unwrap();
            assert_eq!(origin.gt_dir, randomized.gt_dir);
            assert_ne!(origin.image_dir, randomized.image_dir);
        }
    }
}
