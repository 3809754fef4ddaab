//! Toolkit-independent input events.
//!
//! The native runner translates raw host events into these before handing
//! them to the [`Application`](crate::Application).

/// Events that the application can respond to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Keyboard key pressed. `repeat` is set for auto-repeat while held.
    KeyPressed {
        key: Key,
        modifiers: Modifiers,
        repeat: bool,
    },
    /// Text typed by the user, already composed by the host toolkit.
    Text(String),
    /// The host window was asked to close.
    CloseRequested,
}

/// Keyboard keys relevant to label editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// No modifier held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Only Ctrl held.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    /// Only Alt held.
    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
        meta: false,
    };
}

/// Convert an egui key event into an [`Event`], if it is one we care about.
pub(crate) fn from_egui(event: &egui::Event) -> Option<Event> {
    match event {
        egui::Event::Key {
            key,
            pressed: true,
            repeat,
            modifiers,
            ..
        } => {
            let key = match key {
                egui::Key::Enter => Key::Enter,
                egui::Key::Escape => Key::Escape,
                egui::Key::Backspace => Key::Backspace,
                egui::Key::Delete => Key::Delete,
                egui::Key::ArrowLeft => Key::Left,
                egui::Key::ArrowRight => Key::Right,
                egui::Key::Home => Key::Home,
                egui::Key::End => Key::End,
                _ => return None,
            };
            Some(Event::KeyPressed {
                key,
                modifiers: Modifiers {
                    shift: modifiers.shift,
                    ctrl: modifiers.ctrl,
                    alt: modifiers.alt,
                    meta: modifiers.mac_cmd,
                },
                repeat: *repeat,
            })
        }
        egui::Event::Text(text) => Some(Event::Text(text.clone())),
        _ => None,
    }
}
