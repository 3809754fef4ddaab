//! Loader for segment images on the local filesystem (PNG, JPEG, BMP, TIFF, WebP).

use std::path::{Path, PathBuf};

use crate::data::loader::{ImageLoadError, SegmentImage, SegmentSource};

/// Decodes segments found under a fixed segment directory.
#[derive(Debug, Clone)]
pub struct ImageLoader {
    segment_dir: PathBuf,
}

impl ImageLoader {
    pub fn new(segment_dir: impl Into<PathBuf>) -> Self {
        Self {
            segment_dir: segment_dir.into(),
        }
    }

    pub fn segment_dir(&self) -> &Path {
        &self.segment_dir
    }

    /// Full path of a segment.
    pub fn resolve(&self, segment_path: &str) -> PathBuf {
        self.segment_dir.join(segment_path)
    }
}

impl SegmentSource for ImageLoader {
    fn load(&self, segment_path: &str) -> Result<SegmentImage, ImageLoadError> {
        let path = self.resolve(segment_path);
        let data = std::fs::read(&path).map_err(|e| ImageLoadError::from_io(&path, e))?;

        let img = image::load_from_memory(&data)
            .map_err(|source| ImageLoadError::Corrupt {
                path: path.clone(),
                source,
            })?
            .to_rgba8();

        let (width, height) = img.dimensions();
        log::trace!(
            "ImageLoader: loaded {} ({}x{})",
            path.display(),
            width,
            height
        );

        Ok(SegmentImage::new(width, height, img.into_raw()))
    }
}
