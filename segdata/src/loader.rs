//! Dataset sources and the semantic-segmentation sample scanner.
//!
//! A [`SemSegSource`] is a plain registration record carrying the paths and
//! extensions needed to enumerate a split; [`load_sem_seg`] performs the
//! actual file-system scan when a consumer asks for the samples.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Registration record for one semantic-segmentation split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemSegSource {
    /// Directory holding the input images.
    pub image_root: PathBuf,
    /// Directory holding the ground-truth label images.
    pub gt_root: PathBuf,
    /// File extension of input images.
    pub image_ext: String,
    /// File extension of ground-truth images.
    pub gt_ext: String,
}

impl SemSegSource {
    /// Create a source with the default `png` extensions.
    pub fn new(image_root: impl AsRef<Path>, gt_root: impl AsRef<Path>) -> Self {
        Self {
            image_root: image_root.as_ref().to_path_buf(),
            gt_root: gt_root.as_ref().to_path_buf(),
            image_ext: "png".to_string(),
            gt_ext: "png".to_string(),
        }
    }

    pub fn with_exts(mut self, image_ext: impl Into<String>, gt_ext: impl Into<String>) -> Self {
        self.image_ext = image_ext.into();
        self.gt_ext = gt_ext.into();
        self
    }
}

/// One training sample: an image and its ground-truth label file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemSegSample {
    pub file_name: PathBuf,
    pub sem_seg_file_name: PathBuf,
}

/// Scan a source's directories and pair images with their ground truth.
///
/// Images are matched to label files by their path relative to the
/// respective root, so nested directory layouts are preserved. The result is
/// in sorted order. An image without a matching ground-truth file is an
/// error.
pub fn load_sem_seg(source: &SemSegSource) -> Result<Vec<SemSegSample>, DataError> {
    if !source.image_root.is_dir() {
        return Err(DataError::NotADirectory {
            path: source.image_root.clone(),
        });
    }
    if !source.gt_root.is_dir() {
        return Err(DataError::NotADirectory {
            path: source.gt_root.clone(),
        });
    }

    let mut relative = Vec::new();
    collect_files(&source.image_root, Path::new(""), &source.image_ext, &mut relative)?;
    relative.sort();

    let mut samples = Vec::with_capacity(relative.len());
    for rel in relative {
        let image = source.image_root.join(&rel);
        let gt = source.gt_root.join(rel.with_extension(&source.gt_ext));
        if !gt.is_file() {
            return Err(DataError::MissingGroundTruth {
                image,
                expected: gt,
            });
        }
        samples.push(SemSegSample {
            file_name: image,
            sem_seg_file_name: gt,
        });
    }

    info!(
        "loaded {} samples from {}",
        samples.len(),
        source.image_root.display()
    );
    Ok(samples)
}

fn collect_files(
    root: &Path,
    prefix: &Path,
    ext: &str,
    out: &mut Vec<PathBuf>,
) -> Result<(), DataError> {
    let dir = root.join(prefix);
    let entries = fs::read_dir(&dir).map_err(|e| DataError::Io {
        path: dir.clone(),
        source: e,
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| DataError::Io {
            path: dir.clone(),
            source: e,
        })?;
        let rel = prefix.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| DataError::Io {
            path: root.join(&rel),
            source: e,
        })?;
        if file_type.is_dir() {
            collect_files(root, &rel, ext, out)?;
        } else if rel.extension().and_then(|e| e.to_str()) == Some(ext) {
            out.push(rel);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_scan_pairs_images_with_gt() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = TempDir::new().unwrap();
        let images = dir.path().join("images");
        let gt = dir.path().join("labels");
        touch(&images.join("b.png"));
        touch(&images.join("a.png"));
        touch(&images.join("town/c.png"));
        touch(&gt.join("a.png"));
        touch(&gt.join("b.png"));
        touch(&gt.join("town/c.png"));
        // non-matching extensions are ignored
        touch(&images.join("notes.txt"));

        let samples = load_sem_seg(&SemSegSource::new(&images, &gt)).unwrap();
        assert_eq!(samples.len(), 3);
        // sorted by relative path
        assert_eq!(samples[0].file_name, images.join("a.png"));
        assert_eq!(samples[0].sem_seg_file_name, gt.join("a.png"));
        assert_eq!(samples[2].file_name, images.join("town/c.png"));
    }

    #[test]
    fn test_scan_missing_gt_fails() {
        let dir = TempDir::new().unwrap();
        let images = dir.path().join("images");
        let gt = dir.path().join("labels");
        touch(&images.join("a.png"));
        fs::create_dir_all(&gt).unwrap();

        let err = load_sem_seg(&SemSegSource::new(&images, &gt)).unwrap_err();
        assert!(matches!(err, DataError::MissingGroundTruth { .. }));
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        let source = SemSegSource::new(dir.path().join("nope"), dir.path());
        assert!(matches!(
            load_sem_seg(&source).unwrap_err(),
            DataError::NotADirectory { .. }
        ));
    }

    #[test]
    fn test_custom_extensions() {
        let dir = TempDir::new().unwrap();
        let images = dir.path().join("images");
        let gt = dir.path().join("labels");
        touch(&images.join("a.jpg"));
        touch(&gt.join("a.png"));

        let source = SemSegSource::new(&images, &gt).with_exts("jpg", "png");
        let samples = load_sem_seg(&source).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].sem_seg_file_name, gt.join("a.png"));
    }
}
