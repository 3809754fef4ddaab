//! seglabel_ui - host UI adapter for the segment labeling workstation
//!
//! Translates raw toolkit input into [`Event`]s, and renders a [`View`]
//! (image, status line, label line with cursor) in a window sized to the
//! image plus fixed top and bottom bands.

mod application;
mod event;
mod view;

pub use application::{Application, Settings, UiError, run};
pub use event::{Event, Key, Modifiers};
pub use view::{CURSOR_GLYPH, ImageFrame, View, WindowLayout};
