//! Dataset storage.
//!
//! This module provides:
//! - `Dataset` / `Record`: the in-memory table of segments and label state
//! - `RecordStore`: the load/save seam the session writes through
//! - `CsvStore`: the CSV file implementation with atomic replace-on-save

mod csv_store;
mod dataset;
mod error;
mod traits;

pub use csv_store::CsvStore;
pub use dataset::{
    COL_LABELLED, COL_PREDICTED_LABEL, COL_SEGMENT_PATH, COL_TRUE_LABEL, Columns, Dataset,
    REQUIRED_COLUMNS, Record, parse_flag,
};
pub use error::StoreError;
pub use traits::RecordStore;
