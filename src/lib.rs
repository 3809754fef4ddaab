//! seglabel - image segment labeling workstation
//!
//! Shows cropped image segments one at a time, lets the operator edit a
//! label seeded from a classifier's prediction, and writes every committed
//! label straight back to the dataset CSV.

pub mod app;
pub mod config;
pub mod constants;
pub mod data;
pub mod editor;
pub mod frontend;
pub mod keybindings;
pub mod session;
pub mod store;

pub use app::{AnnotatorApp, AppError, run};
pub use config::AppConfig;
pub use session::{Session, SessionError, SessionState, TerminationReason};
