//! Keybindings for the label editor.
//!
//! Maps toolkit-independent input events onto session [`Command`]s.

use seglabel_ui::{Event, Key, Modifiers};

use crate::editor::EditCommand;
use crate::frontend::Command;

/// Which modifier turns arrow keys into word jumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordModifier {
    Ctrl,
    Alt,
    /// Either Ctrl or Alt (covers Linux/Windows and macOS conventions)
    #[default]
    Either,
}

impl WordModifier {
    fn is_held(self, modifiers: Modifiers) -> bool {
        match self {
            WordModifier::Ctrl => modifiers.ctrl,
            WordModifier::Alt => modifiers.alt,
            WordModifier::Either => modifiers.ctrl || modifiers.alt,
        }
    }
}

/// Keybinding configuration.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    /// Commit the current label
    pub commit: Key,
    /// Leave the session
    pub quit: Key,
    /// Modifier for word-wise cursor movement
    pub word_modifier: WordModifier,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            commit: Key::Enter,
            quit: Key::Escape,
            word_modifier: WordModifier::Either,
        }
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands produced by one input event, in order.
    ///
    /// Auto-repeat of the commit and quit keys produces nothing, so holding
    /// Enter cannot commit rows that were never on screen.
    pub fn commands_for(&self, event: &Event) -> Vec<Command> {
        match event {
            Event::CloseRequested => vec![Command::Quit],
            Event::Text(text) => text
                .chars()
                .filter(|ch| !ch.is_control())
                .map(|ch| Command::Edit(EditCommand::Insert(ch)))
                .collect(),
            Event::KeyPressed {
                key,
                modifiers,
                repeat,
            } => {
                if *repeat && (*key == self.commit || *key == self.quit) {
                    log::trace!("Ignoring auto-repeat of {:?}", key);
                    return Vec::new();
                }
                self.command_for_key(*key, *modifiers).into_iter().collect()
            }
        }
    }

    /// Command for a single key press, if it is bound.
    pub fn command_for_key(&self, key: Key, modifiers: Modifiers) -> Option<Command> {
        if key == self.commit {
            return Some(Command::Commit);
        }
        if key == self.quit {
            return Some(Command::Quit);
        }

        let word = self.word_modifier.is_held(modifiers);
        let edit = match key {
            Key::Backspace => EditCommand::Backspace,
            Key::Delete => EditCommand::DeleteForward,
            Key::Left if word => EditCommand::MoveWordLeft,
            Key::Left => EditCommand::MoveLeft,
            Key::Right if word => EditCommand::MoveWordRight,
            Key::Right => EditCommand::MoveRight,
            Key::Home => EditCommand::MoveHome,
            Key::End => EditCommand::MoveEnd,
            Key::Enter | Key::Escape => return None,
        };
        Some(Command::Edit(edit))
    }
}
