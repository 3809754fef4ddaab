//! Annotation session state machine.
//!
//! A [`Session`] snapshots the unlabelled rows of a dataset once at start,
//! then walks them in dataset order. Each row gets a fresh [`TextEditor`]
//! seeded with its predicted label. Committing writes the label back to the
//! row's original position and immediately saves the whole dataset, so an
//! abrupt exit loses at most the row being edited.
//!
//! ```text
//!            start
//!              │ queue empty ──────────────► Terminated(NoUnlabelled)
//!              ▼
//!   ┌────► Editing ── Quit ────────────────► Terminated(Quit)
//!   │          │
//!   │        Commit ── save/image failure ─► Terminated(Halted)
//!   │          │
//!   └─ more ◄──┴── queue exhausted ────────► Terminated(Completed)
//! ```


use thiserror::Error;

use crate::constants::OMIT_LABEL;
use crate::data::{ImageLoadError, SegmentImage, SegmentSource};
use crate::editor::TextEditor;
use crate::frontend::{Command, DisplayModel, status_text};
use crate::store::{Dataset, Record, RecordStore, StoreError};

/// Errors that end a session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The dataset could not be read or written
    #[error("Dataset store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// The image for the current row could not be loaded
    #[error("Image unavailable for segment '{segment_path}': {source}")]
    ImageUnavailable {
        /// Segment path as written in the dataset
        segment_path: String,
        #[source]
        source: ImageLoadError,
    },

    /// Any other failure while the session was running
    #[error("Unexpected runtime fault: {0}")]
    RuntimeFault(String),
}

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// There was nothing to label.
    NoUnlabelled,
    /// Every queued row was committed.
    Completed,
    /// The operator quit.
    Quit,
    /// An error stopped the session.
    Halted,
}

/// Operator-visible session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Editing,
    Terminated(TerminationReason),
}

/// Effect of applying one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The session had already terminated; nothing happened.
    Ignored,
    /// The label line changed (or the cursor moved).
    Edited,
    /// The row was committed and the next row is loaded.
    Advanced,
    /// The session stopped.
    Terminated(TerminationReason),
}

/// The row currently on screen.
#[derive(Debug)]
struct CurrentRow {
    editor: TextEditor,
    image: SegmentImage,
}

/// Drives the queue of unlabelled rows.
pub struct Session<S, L> {
    store: S,
    loader: L,
    dataset: Dataset,
    /// Original dataset indices of the unlabelled rows, in order.
    queue: Vec<usize>,
    position: usize,
    current: Option<CurrentRow>,
    state: SessionState,
}

impl<S: RecordStore, L: SegmentSource> Session<S, L> {
    /// Load the dataset from `store` and open the first unlabelled row.
    pub fn start(store: S, loader: L) -> Result<Self, SessionError> {
        let dataset = store.load()?;
        Self::with_dataset(store, loader, dataset)
    }

    /// Open a session over an already loaded dataset.
    ///
    /// Fails with [`SessionError::ImageUnavailable`] if the first row's image
    /// cannot be loaded.
    pub fn with_dataset(store: S, loader: L, dataset: Dataset) -> Result<Self, SessionError> {
        let queue = dataset.unlabelled_indices();
        let mut session = Self {
            store,
            loader,
            dataset,
            queue,
            position: 0,
            current: None,
            state: SessionState::Editing,
        };

        if session.queue.is_empty() {
            log::info!("No unlabelled images found.");
            session.state = SessionState::Terminated(TerminationReason::NoUnlabelled);
            return Ok(session);
        }

        log::info!(
            "Starting annotation: {} of {} rows unlabelled",
            session.queue.len(),
            session.dataset.len()
        );
        session.open_current()?;
        Ok(session)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Apply one operator command.
    pub fn apply(&mut self, command: Command) -> Result<Transition, SessionError> {
        if self.is_terminated() {
            log::trace!("Ignoring {:?}: session terminated", command);
            return Ok(Transition::Ignored);
        }

        match command {
            Command::Edit(edit) => {
                if let Some(current) = self.current.as_mut() {
                    current.editor.apply(edit);
                }
                Ok(Transition::Edited)
            }
            Command::Commit => self.commit(),
            Command::Quit => {
                log::info!(
                    "Quit at row {}/{} without committing it",
                    self.position + 1,
                    self.queue.len()
                );
                Ok(self.terminate(TerminationReason::Quit))
            }
        }
    }

    fn commit(&mut self) -> Result<Transition, SessionError> {
        let row = self.current_row_index()?;
        let text = self
            .current
            .as_ref()
            .map(|current| current.editor.text().to_string())
            .unwrap_or_default();
        let label = if text.is_empty() {
            OMIT_LABEL.to_string()
        } else {
            text
        };

        self.dataset.set_label(row, label.as_str());
        if let Err(err) = self.store.save(&self.dataset) {
            log::error!("Failed to save dataset after labelling row {}: {}", row, err);
            self.terminate(TerminationReason::Halted);
            return Err(err.into());
        }
        log::debug!("Row {} labelled '{}'", row, label);

        self.position += 1;
        if self.position >= self.queue.len() {
            log::info!("All images have been labelled!");
            return Ok(self.terminate(TerminationReason::Completed));
        }

        self.open_current()?;
        Ok(Transition::Advanced)
    }

    /// Load the image for the row at `position` and seed a fresh editor.
    fn open_current(&mut self) -> Result<(), SessionError> {
        let row = self.current_row_index()?;
        let Some(record) = self.dataset.get(row) else {
            self.terminate(TerminationReason::Halted);
            return Err(SessionError::RuntimeFault(format!(
                "queued row {} missing from dataset",
                row
            )));
        };

        match self.loader.load(&record.segment_path) {
            Ok(image) => {
                log::debug!(
                    "Opened {} ({}x{})",
                    record.segment_path,
                    image.width,
                    image.height
                );
                self.current = Some(CurrentRow {
                    editor: TextEditor::new(&record.predicted_label),
                    image,
                });
                Ok(())
            }
            Err(source) => {
                let segment_path = record.segment_path.clone();
                log::error!("Halting: cannot load image for '{}': {}", segment_path, source);
                self.terminate(TerminationReason::Halted);
                Err(SessionError::ImageUnavailable {
                    segment_path,
                    source,
                })
            }
        }
    }

    fn current_row_index(&self) -> Result<usize, SessionError> {
        self.queue.get(self.position).copied().ok_or_else(|| {
            SessionError::RuntimeFault(format!(
                "queue position {} out of range ({} rows)",
                self.position,
                self.queue.len()
            ))
        })
    }

    fn terminate(&mut self, reason: TerminationReason) -> Transition {
        self.state = SessionState::Terminated(reason);
        self.current = None;
        Transition::Terminated(reason)
    }

    // =========================================================================
    // Shutdown
    // =========================================================================

    /// Flush the dataset one final time.
    ///
    /// Every commit has already been written through; this is a safety net
    /// for the normal exit path. A still-running session is treated as quit.
    pub fn finish(&mut self) -> Result<(), SessionError> {
        if !self.is_terminated() {
            self.terminate(TerminationReason::Quit);
        }
        self.store.save(&self.dataset)?;
        log::info!(
            "Updated fact_table saved ({} of {} rows labelled).",
            self.dataset.labelled_count(),
            self.dataset.len()
        );
        Ok(())
    }

    /// Best-effort save on a fault path. Halts the session; failures are logged.
    pub fn emergency_save(&mut self) {
        self.terminate(TerminationReason::Halted);
        match self.store.save(&self.dataset) {
            Ok(()) => log::warn!("Dataset saved after fault"),
            Err(err) => log::error!("Emergency save failed: {}", err),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.state, SessionState::Terminated(_))
    }

    /// In-memory dataset, reflecting every commit so far.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Number of rows queued at start.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn queue_position(&self) -> usize {
        self.position
    }

    /// Editor for the row on screen; `None` once terminated.
    pub fn editor(&self) -> Option<&TextEditor> {
        self.current.as_ref().map(|current| &current.editor)
    }

    /// Dataset record for the row on screen.
    pub fn current_record(&self) -> Option<&Record> {
        self.current.as_ref()?;
        self.dataset.get(*self.queue.get(self.position)?)
    }

    /// What the UI should draw, or `None` once terminated.
    pub fn display_model(&self) -> Option<DisplayModel> {
        let current = self.current.as_ref()?;
        let record = self.current_record()?;
        Some(DisplayModel {
            queue_position: self.position,
            image: current.image.clone(),
            status_text: status_text(&record.segment_path, self.position, self.queue.len()),
            label_text: current.editor.text().to_string(),
            cursor_offset: current.editor.cursor(),
        })
    }
}
