//! CSV-backed dataset store.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::store::dataset::{Columns, Dataset};
use crate::store::error::StoreError;
use crate::store::traits::RecordStore;

/// Dataset stored as a single CSV file with a header row.
///
/// Saves go to a temporary file next to the target which is then renamed over
/// it, so a failed write leaves the previous contents untouched.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl RecordStore for CsvStore {
    fn load(&self) -> Result<Dataset, StoreError> {
        let file = File::open(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file);

        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let columns = Columns::from_headers(headers)?;

        let mut records = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let raw = result?;
            let cells = raw.iter().map(str::to_string).collect();
            records.push(columns.parse_row(row, cells)?);
        }

        log::info!(
            "Loaded {} rows from {}",
            records.len(),
            self.path.display()
        );
        Ok(Dataset::with_columns(columns, records))
    }

    fn save(&mut self, dataset: &Dataset) -> Result<(), StoreError> {
        let dir = self.parent_dir();
        let temp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;

        let mut writer = csv::Writer::from_writer(temp);
        writer.write_record(dataset.columns().headers())?;
        for record in dataset.records() {
            writer.write_record(dataset.columns().render_row(record))?;
        }

        let mut temp = writer
            .into_inner()
            .map_err(|e| {
                let source = std::io::Error::new(e.error().kind(), e.error().to_string());
                StoreError::io(&self.path, source)
            })?;
        temp.flush().map_err(|e| StoreError::io(temp.path(), e))?;
        // The temp file is created owner-only; keep the dataset's own mode.
        if let Ok(metadata) = std::fs::metadata(&self.path) {
            temp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| StoreError::io(temp.path(), e))?;
        }
        temp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io(temp.path(), e))?;
        temp.persist(&self.path)?;

        log::debug!(
            "Saved {} rows ({} labelled) to {}",
            dataset.len(),
            dataset.labelled_count(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Record;

    const SAMPLE: &str = "\
segment_file_path,predicted_label,true_label,labelled,source
a.png,R001,,False,cam1
b.png,R002,R002,True,cam1
c.png,,,0,\"cam 2, left\"
";

    fn write_sample(dir: &Path) -> PathBuf {
        let path = dir.join("fact_table.csv");
        std::fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn test_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(write_sample(dir.path()));

        let dataset = store.load().unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.unlabelled_indices(), vec![0, 2]);
        assert_eq!(dataset.get(1).unwrap().true_label.as_deref(), Some("R002"));
        assert_eq!(dataset.get(2).unwrap().predicted_label, "");
    }

    #[test]
    fn test_round_trip_preserves_extra_columns() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvStore::new(write_sample(dir.path()));

        let mut dataset = store.load().unwrap();
        dataset.set_label(0, "R001");
        store.save(&dataset).unwrap();

        let written = std::fs::read_to_string(store.path()).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(
            lines[0],
            "segment_file_path,predicted_label,true_label,labelled,source"
        );
        assert_eq!(lines[1], "a.png,R001,R001,True,cam1");
        assert_eq!(lines[3], "c.png,,,False,\"cam 2, left\"");

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded, dataset);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("nope.csv"));
        assert!(matches!(store.load(), Err(StoreError::Io { .. })));
    }

    #[test]
    fn test_missing_column_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "segment_file_path,labelled\na.png,False\n").unwrap();

        let store = CsvStore::new(path);
        assert!(matches!(
            store.load(),
            Err(StoreError::MissingColumn { column }) if column == "predicted_label"
        ));
    }

    #[test]
    fn test_ragged_row_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ragged.csv");
        std::fs::write(
            &path,
            "segment_file_path,predicted_label,true_label,labelled\na.png,R001\n",
        )
        .unwrap();

        let store = CsvStore::new(path);
        assert!(matches!(store.load(), Err(StoreError::Csv(_))));
    }

    #[test]
    fn test_failed_save_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(dir.path());

        // Target path is a directory, so the final rename fails.
        let mut broken = CsvStore::new(dir.path());
        let dataset = Dataset::new(vec![Record::new("x.png", "").with_label("X")]);
        assert!(broken.save(&dataset).is_err());

        assert_eq!(std::fs::read_to_string(&path).unwrap(), SAMPLE);
    }

    #[test]
    fn test_save_new_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvStore::new(dir.path().join("new.csv"));
        let dataset = Dataset::new(vec![
            Record::new("a.png", "R001").with_label("__OMIT__"),
            Record::new("b.png", "R002"),
        ]);
        store.save(&dataset).unwrap();

        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            "segment_file_path,predicted_label,true_label,labelled\n\
             a.png,R001,__OMIT__,True\n\
             b.png,R002,,False\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(dir.path());
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let mut store = CsvStore::new(&path);
        let mut dataset = store.load().unwrap();
        dataset.set_label(0, "R1");
        store.save(&dataset).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }
}
