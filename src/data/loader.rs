//! Image loading seam used by the annotation session.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// A decoded segment ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 pixels, row-major.
    pub rgba: Arc<[u8]>,
}

impl SegmentImage {
    pub fn new(width: u32, height: u32, rgba: impl Into<Arc<[u8]>>) -> Self {
        Self {
            width,
            height,
            rgba: rgba.into(),
        }
    }
}

/// Why a segment image could not be loaded.
///
/// The session treats every variant the same way; the distinction is for
/// diagnostics.
#[derive(Error, Debug)]
pub enum ImageLoadError {
    /// No file at the resolved path
    #[error("Image not found: {path:?}")]
    NotFound {
        /// Resolved path
        path: PathBuf,
    },

    /// The file exists but could not be read
    #[error("Failed to read image {path:?}: {source}")]
    Unreadable {
        /// Resolved path
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file could not be decoded as an image
    #[error("Failed to decode image {path:?}: {source}")]
    Corrupt {
        /// Resolved path
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl ImageLoadError {
    /// Create a not-found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Map an I/O error, splitting out the not-found case.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Unreadable { path, source }
        }
    }

    /// Path the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound { path } | Self::Unreadable { path, .. } | Self::Corrupt { path, .. } => {
                path
            }
        }
    }
}

/// Source of decoded segment images.
pub trait SegmentSource {
    /// Load the segment stored under `segment_path` (as written in the dataset).
    fn load(&self, segment_path: &str) -> Result<SegmentImage, ImageLoadError>;
}
