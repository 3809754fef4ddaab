//! In-memory dataset of image segments and their label state.

use crate::store::error::StoreError;

/// Column holding the segment path.
pub const COL_SEGMENT_PATH: &str = "segment_file_path";
/// Column holding the classifier's suggestion.
pub const COL_PREDICTED_LABEL: &str = "predicted_label";
/// Column holding the operator-confirmed label.
pub const COL_TRUE_LABEL: &str = "true_label";
/// Column holding the labelled flag.
pub const COL_LABELLED: &str = "labelled";

/// Columns every dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    COL_SEGMENT_PATH,
    COL_PREDICTED_LABEL,
    COL_TRUE_LABEL,
    COL_LABELLED,
];

/// One image segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Location of the segment, relative to the segment directory.
    pub segment_path: String,
    /// Suggested label, possibly empty.
    pub predicted_label: String,
    /// Committed label; `None` until the operator commits.
    pub true_label: Option<String>,
    /// Whether the operator has committed a label.
    pub labelled: bool,
    /// Cells of columns outside [`REQUIRED_COLUMNS`], so they survive a save.
    cells: Vec<String>,
}

impl Record {
    /// Create an unlabelled record.
    pub fn new(segment_path: impl Into<String>, predicted_label: impl Into<String>) -> Self {
        Self {
            segment_path: segment_path.into(),
            predicted_label: predicted_label.into(),
            true_label: None,
            labelled: false,
            cells: Vec::new(),
        }
    }

    /// Builder: mark as already labelled.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.true_label = Some(label.into());
        self.labelled = true;
        self
    }
}

/// Header layout and the positions of the required columns within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    headers: Vec<String>,
    segment_path: usize,
    predicted_label: usize,
    true_label: usize,
    labelled: usize,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            headers: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            segment_path: 0,
            predicted_label: 1,
            true_label: 2,
            labelled: 3,
        }
    }
}

impl Columns {
    /// Locate the required columns in a header row.
    pub fn from_headers(headers: Vec<String>) -> Result<Self, StoreError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| StoreError::missing_column(name))
        };
        Ok(Self {
            segment_path: find(COL_SEGMENT_PATH)?,
            predicted_label: find(COL_PREDICTED_LABEL)?,
            true_label: find(COL_TRUE_LABEL)?,
            labelled: find(COL_LABELLED)?,
            headers,
        })
    }

    fn required_indices(&self) -> [usize; 4] {
        [
            self.segment_path,
            self.predicted_label,
            self.true_label,
            self.labelled,
        ]
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Build a record from a raw row. `row` is only used for error reporting.
    pub fn parse_row(&self, row: usize, cells: Vec<String>) -> Result<Record, StoreError> {
        let cell = |index: usize| cells.get(index).cloned().unwrap_or_default();

        let labelled_cell = cell(self.labelled);
        let labelled = parse_flag(&labelled_cell)
            .ok_or_else(|| StoreError::invalid_value(row, COL_LABELLED, labelled_cell.as_str()))?;
        let true_label = Some(cell(self.true_label)).filter(|label| !label.is_empty());

        if labelled && true_label.is_none() {
            log::warn!("Row {} is marked labelled but has no true_label", row);
        }

        let segment_path = cell(self.segment_path);
        let predicted_label = cell(self.predicted_label);

        // Required columns live in the typed fields; keep only the rest here.
        let mut cells = cells;
        for index in self.required_indices() {
            if let Some(value) = cells.get_mut(index) {
                value.clear();
            }
        }

        Ok(Record {
            segment_path,
            predicted_label,
            true_label,
            labelled,
            cells,
        })
    }

    /// Raw cells for a record, with the required columns refreshed.
    pub fn render_row(&self, record: &Record) -> Vec<String> {
        let mut cells = record.cells.clone();
        cells.resize(self.headers.len(), String::new());
        cells[self.segment_path] = record.segment_path.clone();
        cells[self.predicted_label] = record.predicted_label.clone();
        cells[self.true_label] = record.true_label.clone().unwrap_or_default();
        cells[self.labelled] = format_flag(record.labelled).to_string();
        cells
    }
}

/// Parse the labelled flag in the spellings tabular tools emit.
pub fn parse_flag(cell: &str) -> Option<bool> {
    match cell.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "1.0" => Some(true),
        "false" | "0" | "0.0" | "" => Some(false),
        _ => None,
    }
}

fn format_flag(flag: bool) -> &'static str {
    if flag { "True" } else { "False" }
}

/// The full dataset, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    columns: Columns,
    records: Vec<Record>,
}

impl Dataset {
    /// Dataset with the standard four columns.
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            columns: Columns::default(),
            records,
        }
    }

    /// Dataset with an explicit header layout (as read from a file).
    pub fn with_columns(columns: Columns, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Indices of rows not yet labelled, in dataset order.
    pub fn unlabelled_indices(&self) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| !record.labelled)
            .map(|(index, _)| index)
            .collect()
    }

    /// Number of labelled rows.
    pub fn labelled_count(&self) -> usize {
        self.records.iter().filter(|r| r.labelled).count()
    }

    /// Record a committed label for a row. Returns `false` if the row doesn't exist.
    pub fn set_label(&mut self, index: usize, label: impl Into<String>) -> bool {
        match self.records.get_mut(index) {
            Some(record) => {
                record.true_label = Some(label.into());
                record.labelled = true;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_flag_variants() {
        assert_eq!(parse_flag("True"), Some(true));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("0.0"), Some(false));
        assert_eq!(parse_flag(""), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_columns_in_any_order() {
        let columns = Columns::from_headers(cells(&[
            "labelled",
            "source",
            "true_label",
            "segment_file_path",
            "predicted_label",
        ]))
        .unwrap();

        let record = columns
            .parse_row(0, cells(&["False", "cam1", "", "a.png", "R001"]))
            .unwrap();
        assert_eq!(record.segment_path, "a.png");
        assert_eq!(record.predicted_label, "R001");
        assert_eq!(record.true_label, None);
        assert!(!record.labelled);

        let mut record = record;
        record.true_label = Some("R002".to_string());
        record.labelled = true;
        assert_eq!(
            columns.render_row(&record),
            cells(&["True", "cam1", "R002", "a.png", "R001"])
        );
    }

    #[test]
    fn test_missing_column() {
        let err = Columns::from_headers(cells(&["segment_file_path", "predicted_label", "labelled"]))
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingColumn { column } if column == "true_label"));
    }

    #[test]
    fn test_invalid_flag_rejected() {
        let columns = Columns::default();
        let err = columns
            .parse_row(3, cells(&["a.png", "", "", "yes"]))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidValue { row: 3, .. }));
    }

    #[test]
    fn test_unlabelled_indices_keep_order() {
        let dataset = Dataset::new(vec![
            Record::new("a.png", ""),
            Record::new("b.png", "").with_label("B"),
            Record::new("c.png", ""),
        ]);
        assert_eq!(dataset.unlabelled_indices(), vec![0, 2]);
        assert_eq!(dataset.labelled_count(), 1);
    }

    #[test]
    fn test_set_label() {
        let mut dataset = Dataset::new(vec![Record::new("a.png", "x")]);
        assert!(dataset.set_label(0, "R001"));
        assert!(!dataset.set_label(5, "nope"));

        let record = dataset.get(0).unwrap();
        assert_eq!(record.true_label.as_deref(), Some("R001"));
        assert!(record.labelled);
    }
}
