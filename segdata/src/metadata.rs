//! Descriptive metadata for semantic-segmentation datasets.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// Metadata record attached to a registered dataset split.
///
/// Immutable once registered; build it with the `with_*` methods and hand it
/// to [`crate::MetadataCatalog::set`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemSegMetadata {
    /// Class names, indexed by contiguous training id.
    pub stuff_classes: Vec<String>,
    /// RGB color per class, for visualization.
    pub stuff_colors: Vec<[u8; 3]>,
    /// Mapping from raw label id in the ground truth to training id.
    pub dataset_id_to_contiguous_id: BTreeMap<u32, u32>,
    /// Which evaluator consumes predictions on this split.
    pub evaluator_type: String,
    /// Directory holding the input images.
    pub image_root: PathBuf,
    /// Directory holding the ground-truth label images.
    pub sem_seg_root: PathBuf,
}

impl SemSegMetadata {
    /// Create an empty record with the given evaluator type.
    pub fn new(evaluator_type: impl Into<String>) -> Self {
        Self {
            stuff_classes: Vec::new(),
            stuff_colors: Vec::new(),
            dataset_id_to_contiguous_id: BTreeMap::new(),
            evaluator_type: evaluator_type.into(),
            image_root: PathBuf::new(),
            sem_seg_root: PathBuf::new(),
        }
    }

    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stuff_classes = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_colors(mut self, colors: Vec<[u8; 3]>) -> Self {
        self.stuff_colors = colors;
        self
    }

    pub fn with_id_map(mut self, map: BTreeMap<u32, u32>) -> Self {
        self.dataset_id_to_contiguous_id = map;
        self
    }

    /// Set both root directories.
    pub fn with_roots(mut self, image_root: impl AsRef<Path>, sem_seg_root: impl AsRef<Path>) -> Self {
        self.image_root = image_root.as_ref().to_path_buf();
        self.sem_seg_root = sem_seg_root.as_ref().to_path_buf();
        self
    }

    /// Number of classes in this record.
    pub fn num_classes(&self) -> usize {
        self.stuff_classes.len()
    }

    /// The canonical carla semantic-segmentation metadata (13 classes).
    pub fn carla_semantic() -> Self {
        let classes = [
            "Unlabeled",
            "Building",
            "Fence",
            "Other",
            "Pedestrian",
            "Pole",
            "Road line",
            "Road",
            "Sidewalk",
            "Vegetation",
            "Car",
            "Wall",
            "Traffic sign",
        ];
        let colors = vec![
            [0, 0, 0],
            [70, 70, 70],
            [190, 153, 153],
            [250, 170, 160],
            [220, 20, 60],
            [153, 153, 153],
            [157, 234, 50],
            [128, 64, 128],
            [244, 35, 232],
            [107, 142, 35],
            [0, 0, 142],
            [102, 102, 156],
            [220, 220, 0],
        ];
        // raw id 2 is unused by the exporter and intentionally unmapped
        let id_map: BTreeMap<u32, u32> = [0, 1, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]
            .into_iter()
            .map(|id| (id, id))
            .collect();

        Self::new("sem_seg")
            .with_classes(classes)
            .with_colors(colors)
            .with_id_map(id_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carla_semantic_shape() {
        let meta = SemSegMetadata::carla_semantic();
        assert_eq!(meta.num_classes(), 13);
        assert_eq!(meta.stuff_colors.len(), 13);
        assert_eq!(meta.evaluator_type, "sem_seg");
        // raw id 2 is not mapped
        assert!(!meta.dataset_id_to_contiguous_id.contains_key(&2));
        assert_eq!(meta.dataset_id_to_contiguous_id.get(&12), Some(&12));
        assert_eq!(meta.dataset_id_to_contiguous_id.len(), 12);
    }

    #[test]
    fn test_builder_sets_roots() {
        let meta = SemSegMetadata::carla_semantic().with_roots("datasets/a", "datasets/b");
        assert_eq!(meta.image_root, PathBuf::from("datasets/a"));
        assert_eq!(meta.sem_seg_root, PathBuf::from("datasets/b"));
    }
}
