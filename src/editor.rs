//! Label text editing state.
//!
//! [`TextEditor`] holds the in-progress label and its insertion point.
//! Positions count chars, not bytes, so the cursor always sits on a valid
//! boundary. Every operation is total: out-of-range requests are clamped
//! or ignored.

// =============================================================================
// Commands
// =============================================================================

/// Editing operations the label line understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    Insert(char),
    Backspace,
    DeleteForward,
    MoveLeft,
    MoveRight,
    MoveWordLeft,
    MoveWordRight,
    MoveHome,
    MoveEnd,
}

// =============================================================================
// Word Boundaries
// =============================================================================

/// Char offsets at which whitespace-delimited words start.
///
/// Runs of whitespace never produce empty words.
pub fn word_starts(text: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut prev_is_space = true;
    for (i, ch) in text.chars().enumerate() {
        let is_space = ch.is_whitespace();
        if !is_space && prev_is_space {
            starts.push(i);
        }
        prev_is_space = is_space;
    }
    starts
}

/// Start of the closest word strictly before `cursor`, or 0.
pub fn previous_word_start(text: &str, cursor: usize) -> usize {
    word_starts(text)
        .into_iter()
        .filter(|&start| start < cursor)
        .max()
        .unwrap_or(0)
}

/// Start of the closest word strictly after `cursor`, or the end of the text.
pub fn next_word_start(text: &str, cursor: usize) -> usize {
    word_starts(text)
        .into_iter()
        .find(|&start| start > cursor)
        .unwrap_or_else(|| text.chars().count())
}

// =============================================================================
// Editor State
// =============================================================================

/// In-progress label text and cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEditor {
    text: String,
    cursor: usize,
    len: usize,
}

impl TextEditor {
    /// Editor seeded with `seed`, cursor at the end.
    pub fn new(seed: &str) -> Self {
        let mut editor = Self::default();
        editor.reset(seed);
        editor
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Insertion point, in chars.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length of the text in chars.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Replace the text and move the cursor to its end.
    pub fn reset(&mut self, seed: &str) {
        self.text = seed.to_string();
        self.len = self.text.chars().count();
        self.cursor = self.len;
    }

    /// Dispatch a single command.
    pub fn apply(&mut self, command: EditCommand) {
        match command {
            EditCommand::Insert(ch) => self.insert(ch),
            EditCommand::Backspace => self.backspace(),
            EditCommand::DeleteForward => self.delete_forward(),
            EditCommand::MoveLeft => self.move_left(),
            EditCommand::MoveRight => self.move_right(),
            EditCommand::MoveWordLeft => self.move_word_left(),
            EditCommand::MoveWordRight => self.move_word_right(),
            EditCommand::MoveHome => self.cursor = 0,
            EditCommand::MoveEnd => self.cursor = self.len,
        }
    }

    /// Splice a printable char in at the cursor. Control chars are ignored.
    pub fn insert(&mut self, ch: char) {
        if ch.is_control() {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.text.insert(at, ch);
        self.len += 1;
        self.cursor += 1;
    }

    /// Remove the char before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let at = self.byte_index(self.cursor - 1);
        self.text.remove(at);
        self.len -= 1;
        self.cursor -= 1;
    }

    /// Remove the char at the cursor.
    pub fn delete_forward(&mut self) {
        if self.cursor >= self.len {
            return;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        self.len -= 1;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len);
    }

    pub fn move_word_left(&mut self) {
        self.cursor = previous_word_start(&self.text, self.cursor);
    }

    pub fn move_word_right(&mut self) {
        self.cursor = next_word_start(&self.text, self.cursor);
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}
