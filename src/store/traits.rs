//! Storage seam for the dataset.

use crate::store::dataset::Dataset;
use crate::store::error::StoreError;

/// Backing store for the dataset.
///
/// `save` is called after every commit, so implementations must be cheap for
/// datasets of a few thousand rows and must never leave a partially written
/// dataset behind.
pub trait RecordStore {
    /// Read the full dataset.
    fn load(&self) -> Result<Dataset, StoreError>;

    /// Replace the stored dataset with `dataset`.
    fn save(&mut self, dataset: &Dataset) -> Result<(), StoreError>;
}
