//! Segment image loading.
//!
//! This module provides:
//! - `SegmentSource`: the seam the session loads images through
//! - `ImageLoader`: decodes segments from the configured segment directory
//! - `ImageLoadError`: not-found / unreadable / corrupt diagnostics

mod image_loader;
mod loader;

pub use image_loader::ImageLoader;
pub use loader::{ImageLoadError, SegmentImage, SegmentSource};
