//! Wires an annotation [`Session`] to the native UI.

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use seglabel_ui::{Application, Event, Settings, UiError, View};
use thiserror::Error;

use crate::config::AppConfig;
use crate::constants::WINDOW_TITLE;
use crate::data::{ImageLoader, SegmentSource};
use crate::keybindings::KeyBindings;
use crate::session::{Session, SessionError};
use crate::store::{CsvStore, RecordStore};

/// Errors that end the program.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Ui(#[from] UiError),
}

/// First error raised while the window was open, read back after it closes.
pub type SharedOutcome = Rc<RefCell<Option<SessionError>>>;

/// UI application driving one annotation session.
pub struct AnnotatorApp<S: RecordStore, L: SegmentSource> {
    session: Session<S, L>,
    bindings: KeyBindings,
    outcome: SharedOutcome,
}

impl<S: RecordStore, L: SegmentSource> AnnotatorApp<S, L> {
    pub fn new(session: Session<S, L>, bindings: KeyBindings, outcome: SharedOutcome) -> Self {
        Self {
            session,
            bindings,
            outcome,
        }
    }

    pub fn session(&self) -> &Session<S, L> {
        &self.session
    }

    fn record_error(&self, err: SessionError) {
        let mut outcome = self.outcome.borrow_mut();
        if outcome.is_none() {
            *outcome = Some(err);
        }
    }
}

impl<S: RecordStore, L: SegmentSource> Application for AnnotatorApp<S, L> {
    fn title(&self) -> String {
        WINDOW_TITLE.to_string()
    }

    fn update(&mut self, event: Event) {
        for command in self.bindings.commands_for(&event) {
            if self.session.is_terminated() {
                break;
            }

            let session = &mut self.session;
            match panic::catch_unwind(AssertUnwindSafe(|| session.apply(command))) {
                Ok(Ok(_)) => {}
                Ok(Err(err)) => {
                    log::error!("{}", err);
                    self.record_error(err);
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    log::error!("Unexpected runtime fault while applying {:?}: {}", command, message);
                    self.session.emergency_save();
                    self.record_error(SessionError::RuntimeFault(message));
                }
            }
        }
    }

    fn view(&self) -> View {
        self.session
            .display_model()
            .map(|model| View::from(&model))
            .unwrap_or_default()
    }

    fn wants_close(&self) -> bool {
        self.session.is_terminated()
    }

    fn on_close(&mut self) {
        if let Err(err) = self.session.finish() {
            log::error!("Final save failed: {}", err);
            self.record_error(err);
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run the workstation with the given configuration until the queue is done
/// or the operator quits.
pub fn run(config: &AppConfig) -> Result<(), AppError> {
    let store = CsvStore::new(&config.dataset_path);
    let loader = ImageLoader::new(&config.segment_dir);
    let mut session = Session::start(store, loader)?;

    if session.is_terminated() {
        session.finish()?;
        return Ok(());
    }

    let outcome = SharedOutcome::default();
    let app = AnnotatorApp::new(session, KeyBindings::default(), Rc::clone(&outcome));
    let settings = Settings {
        window_title: Some(WINDOW_TITLE.to_string()),
        layout: config.layout.into(),
        ..Settings::default()
    };
    seglabel_ui::run(app, settings)?;

    match outcome.take() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ImageLoadError, SegmentImage};
    use crate::session::{SessionState, TerminationReason};
    use crate::store::{Dataset, Record, StoreError};
    use seglabel_ui::{Key, Modifiers};

    #[derive(Default)]
    struct CountingStore {
        dataset: Dataset,
        saves: usize,
    }

    impl RecordStore for CountingStore {
        fn load(&self) -> Result<Dataset, StoreError> {
            Ok(self.dataset.clone())
        }

        fn save(&mut self, dataset: &Dataset) -> Result<(), StoreError> {
            self.dataset = dataset.clone();
            self.saves += 1;
            Ok(())
        }
    }

    /// Panics when asked for the segment named "boom.png".
    struct PanickyLoader;

    impl SegmentSource for PanickyLoader {
        fn load(&self, segment_path: &str) -> Result<SegmentImage, ImageLoadError> {
            if segment_path == "boom.png" {
                panic!("decoder exploded");
            }
            Ok(SegmentImage::new(1, 1, vec![0u8; 4]))
        }
    }

    fn app(records: Vec<Record>) -> (AnnotatorApp<CountingStore, PanickyLoader>, SharedOutcome) {
        let store = CountingStore {
            dataset: Dataset::new(records),
            saves: 0,
        };
        let session = Session::start(store, PanickyLoader).unwrap();
        let outcome = SharedOutcome::default();
        let app = AnnotatorApp::new(session, KeyBindings::default(), Rc::clone(&outcome));
        (app, outcome)
    }

    fn press(key: Key) -> Event {
        Event::KeyPressed {
            key,
            modifiers: Modifiers::NONE,
            repeat: false,
        }
    }

    #[test]
    fn test_typing_and_commit_through_events() {
        let (mut app, outcome) = app(vec![Record::new("a.png", "R00"), Record::new("b.png", "")]);

        app.update(Event::Text("1".to_string()));
        app.update(press(Key::Enter));

        let record = app.session().dataset().get(0).unwrap();
        assert_eq!(record.true_label.as_deref(), Some("R001"));
        assert_eq!(app.view().status_text, "Annotating b.png (2/2)");
        assert!(!app.wants_close());
        assert!(outcome.borrow().is_none());
    }

    #[test]
    fn test_held_enter_commits_once() {
        let (mut app, _) = app(vec![Record::new("a.png", "A"), Record::new("b.png", "B")]);

        app.update(press(Key::Enter));
        for _ in 0..3 {
            app.update(Event::KeyPressed {
                key: Key::Enter,
                modifiers: Modifiers::NONE,
                repeat: true,
            });
        }

        assert!(app.session().dataset().get(0).unwrap().labelled);
        assert!(!app.session().dataset().get(1).unwrap().labelled);
        assert_eq!(app.session().store().saves, 1);
        assert_eq!(app.view().status_text, "Annotating b.png (2/2)");
    }

    #[test]
    fn test_escape_closes_and_flushes() {
        let (mut app, outcome) = app(vec![Record::new("a.png", "R001")]);

        app.update(press(Key::Escape));
        assert!(app.wants_close());
        app.on_close();

        assert_eq!(app.session().store().saves, 1);
        assert!(!app.session().store().dataset.get(0).unwrap().labelled);
        assert!(outcome.borrow().is_none());
    }

    #[test]
    fn test_window_close_is_quit() {
        let (mut app, _) = app(vec![Record::new("a.png", "R001")]);
        app.update(Event::CloseRequested);
        assert_eq!(
            app.session().state(),
            SessionState::Terminated(TerminationReason::Quit)
        );
    }

    #[test]
    fn test_panic_triggers_emergency_save() {
        let (mut app, outcome) = app(vec![
            Record::new("a.png", "A"),
            Record::new("boom.png", "B"),
        ]);

        app.update(press(Key::Enter));

        assert!(app.wants_close());
        assert_eq!(
            app.session().state(),
            SessionState::Terminated(TerminationReason::Halted)
        );
        // One write-through for the commit, one emergency save.
        assert_eq!(app.session().store().saves, 2);
        assert!(app.session().store().dataset.get(0).unwrap().labelled);
        assert!(matches!(
            outcome.borrow().as_ref(),
            Some(SessionError::RuntimeFault(message)) if message == "decoder exploded"
        ));
    }

    #[test]
    fn test_panic_message_variants() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42u8), "unknown panic");
    }
}
