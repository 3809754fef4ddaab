//! Global constants for the labeling workstation

/// Label committed when the operator submits an empty string; marks the row
/// as excluded from training.
pub const OMIT_LABEL: &str = "__OMIT__";

/// Default location of the dataset file.
pub const DEFAULT_DATASET_PATH: &str = "images/training/fact_table.csv";

/// Default directory that segment paths are resolved against.
pub const DEFAULT_SEGMENT_DIR: &str = "images/training/segments/";

/// Window title.
pub const WINDOW_TITLE: &str = "Image Annotation Tool";

/// Height of the band above the image holding the status line.
pub const DEFAULT_PADDING_TOP: f32 = 50.0;

/// Height of the band below the image holding the label line.
pub const DEFAULT_PADDING_BOTTOM: f32 = 50.0;

/// Minimum window width regardless of image width.
pub const DEFAULT_MIN_WINDOW_WIDTH: f32 = 600.0;

/// Sub-directory of the platform config dir holding `config.json`.
pub const CONFIG_DIR_NAME: &str = "seglabel";

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "config.json";
