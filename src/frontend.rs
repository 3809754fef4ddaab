//! Contract between the annotation session and the UI adapter.
//!
//! The adapter turns host input into [`Command`]s and renders a
//! [`DisplayModel`]; nothing here depends on how either is done.

use seglabel_ui::{ImageFrame, View};

use crate::data::SegmentImage;
use crate::editor::EditCommand;

/// Abstract operator commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Edit the label line.
    Edit(EditCommand),
    /// Finalize the current label and advance.
    Commit,
    /// Stop without committing the current row.
    Quit,
}

impl From<EditCommand> for Command {
    fn from(command: EditCommand) -> Self {
        Self::Edit(command)
    }
}

/// What the adapter draws for the current row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayModel {
    /// Position in the queue; identifies the image across frames.
    pub queue_position: usize,
    pub image: SegmentImage,
    pub status_text: String,
    pub label_text: String,
    /// Cursor offset in chars within `label_text`.
    pub cursor_offset: usize,
}

/// Status line for a row.
pub fn status_text(segment_path: &str, queue_position: usize, queue_len: usize) -> String {
    format!(
        "Annotating {} ({}/{})",
        segment_path,
        queue_position + 1,
        queue_len
    )
}

impl From<&DisplayModel> for View {
    fn from(model: &DisplayModel) -> Self {
        View {
            image: Some(ImageFrame {
                key: model.queue_position as u64,
                width: model.image.width,
                height: model.image.height,
                rgba: model.image.rgba.clone(),
            }),
            status_text: model.status_text.clone(),
            label_text: model.label_text.clone(),
            cursor: model.cursor_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text_is_one_based() {
        assert_eq!(status_text("a.png", 0, 5), "Annotating a.png (1/5)");
        assert_eq!(status_text("b/c.png", 4, 5), "Annotating b/c.png (5/5)");
    }

    #[test]
    fn test_view_conversion() {
        let model = DisplayModel {
            queue_position: 2,
            image: SegmentImage::new(1, 1, vec![0, 0, 0, 255]),
            status_text: "Annotating a.png (3/4)".to_string(),
            label_text: "R001".to_string(),
            cursor_offset: 2,
        };
        let view = View::from(&model);
        assert_eq!(view.image.as_ref().map(|i| i.key), Some(2));
        assert_eq!(view.label_with_cursor(), "R0|01");
    }
}
