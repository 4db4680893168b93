//! Cursor position and internal scroll for the InputBox.
//!
//! The buffer itself belongs to `InputBox`; every method takes it as a
//! parameter.

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

use super::text_wrap::{
    CONTENT_OFFSET, MAX_VISIBLE_LINES, inner_width, wrap_line_count, wrap_options, wrapped_lines,
};

pub(super) struct CursorState {
    /// Byte offset in the buffer (0..=buffer.len())
    pub pos: usize,
    /// First visible wrapped line (0 when content fits)
    pub scroll_offset: u16,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
        }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// Wrapped line (0-based) the cursor is on.
    pub fn line(&self, buffer: &str, content_width: u16) -> u16 {
        let width = inner_width(content_width);
        if width == 0 {
            return 0;
        }
        wrap_line_count(&buffer[..self.pos], width).saturating_sub(1)
    }

    /// Keep the cursor line inside the visible window.
    pub fn update_scroll_offset(&mut self, buffer: &str, content_width: u16) {
        let total_lines = wrap_line_count(buffer, inner_width(content_width));
        if total_lines <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
            return;
        }

        let line = self.line(buffer, content_width);
        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if line >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = line + 1 - MAX_VISIBLE_LINES;
        }
    }

    /// Screen (column, row) of the cursor inside `area`.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let width = inner_width(area.width);
        if width == 0 {
            return (area.x + CONTENT_OFFSET, area.y + 1);
        }

        let before = &buffer[..self.pos];
        // Measure from the last newline: textwrap trims trailing spaces
        let logical_line = before.rsplit('\n').next().unwrap_or_default();
        let segments = textwrap::wrap(logical_line, wrap_options(width));
        let consumed: usize = segments
            .iter()
            .take(segments.len().saturating_sub(1))
            .map(|s| s.width())
            .sum();
        let column = logical_line.width().saturating_sub(consumed) as u16;

        let line = wrapped_lines(before, width).len().saturating_sub(1) as u16;
        let visible_line = line.saturating_sub(self.scroll_offset);

        (
            area.x + CONTENT_OFFSET + column.min(width),
            area.y + 1 + visible_line,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(pos: usize) -> CursorState {
        CursorState {
            pos,
            scroll_offset: 0,
        }
    }

    #[test]
    fn test_screen_pos_single_line() {
        let area = Rect::new(0, 10, 20, 3);
        assert_eq!(at(0).screen_pos("", area), (2, 11));
        assert_eq!(at(5).screen_pos("hello", area), (7, 11));
    }

    #[test]
    fn test_screen_pos_keeps_trailing_space() {
        let area = Rect::new(0, 0, 20, 3);
        assert_eq!(at(6).screen_pos("hello ", area), (8, 1));
    }

    #[test]
    fn test_screen_pos_after_newline() {
        let area = Rect::new(0, 0, 20, 4);
        assert_eq!(at(3).screen_pos("ab\n", area), (2, 2));
    }

    #[test]
    fn test_screen_pos_counts_display_width() {
        // Wide CJK characters take two columns each
        let area = Rect::new(0, 0, 20, 3);
        let text = "法律";
        assert_eq!(at(text.len()).screen_pos(text, area), (6, 1));
    }

    #[test]
    fn test_scroll_follows_cursor() {
        let text = "1\n2\n3\n4\n5\n6\n7";
        let mut cursor = at(text.len());
        cursor.update_scroll_offset(text, 40);
        // 7 lines, 5 visible, cursor on the last → first visible is line 2
        assert_eq!(cursor.scroll_offset, 2);

        cursor.pos = 0;
        cursor.update_scroll_offset(text, 40);
        assert_eq!(cursor.scroll_offset, 0);
    }
}
