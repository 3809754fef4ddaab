//! Display model handed to the renderer each frame.

use std::sync::Arc;

/// Marker drawn at the insertion point of the label line.
pub const CURSOR_GLYPH: char = '|';

/// Decoded RGBA8 image ready for upload.
#[derive(Debug, Clone)]
pub struct ImageFrame {
    /// Identity of the image; the texture is only re-uploaded when this changes.
    pub key: u64,
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<[u8]>,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Default)]
pub struct View {
    pub image: Option<ImageFrame>,
    pub status_text: String,
    pub label_text: String,
    /// Cursor position in chars within `label_text`.
    pub cursor: usize,
}

impl View {
    /// Label line as drawn, with the cursor glyph spliced in.
    pub fn label_with_cursor(&self) -> String {
        let mut out = String::with_capacity(self.label_text.len() + 1);
        let mut placed = false;
        for (i, ch) in self.label_text.chars().enumerate() {
            if i == self.cursor {
                out.push(CURSOR_GLYPH);
                placed = true;
            }
            out.push(ch);
        }
        if !placed {
            out.push(CURSOR_GLYPH);
        }
        out
    }
}

/// Window geometry rule: the image plus fixed bands above and below it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowLayout {
    /// Band above the image holding the status line.
    pub padding_top: f32,
    /// Band below the image holding the label line.
    pub padding_bottom: f32,
    /// Narrow images still get a window at least this wide.
    pub min_width: f32,
}

impl Default for WindowLayout {
    fn default() -> Self {
        Self {
            padding_top: 50.0,
            padding_bottom: 50.0,
            min_width: 600.0,
        }
    }
}

impl WindowLayout {
    /// Inner window size for an image of the given pixel dimensions.
    pub fn window_size(&self, image_width: u32, image_height: u32) -> (f32, f32) {
        let width = (image_width as f32).max(self.min_width);
        let height = image_height as f32 + self.padding_top + self.padding_bottom;
        (width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(text: &str, cursor: usize) -> View {
        View {
            label_text: text.to_string(),
            cursor,
            ..View::default()
        }
    }

    #[test]
    fn test_cursor_glyph_placement() {
        assert_eq!(view("abc", 0).label_with_cursor(), "|abc");
        assert_eq!(view("abc", 1).label_with_cursor(), "a|bc");
        assert_eq!(view("abc", 3).label_with_cursor(), "abc|");
        assert_eq!(view("", 0).label_with_cursor(), "|");
    }

    #[test]
    fn test_cursor_glyph_multibyte() {
        assert_eq!(view("äöü", 2).label_with_cursor(), "äö|ü");
    }

    #[test]
    fn test_window_size_min_width() {
        let layout = WindowLayout::default();
        assert_eq!(layout.window_size(120, 40), (600.0, 140.0));
        assert_eq!(layout.window_size(800, 300), (800.0, 400.0));
    }
}
