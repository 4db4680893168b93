//! Formatted message text → ratatui `Text`.
//!
//! Maps the bold/line-break structure from `core::format` onto styled
//! `Line`/`Span` values. Bold fragments keep the base color and add
//! `Modifier::BOLD`.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

use crate::core::format::{FormattedText, format_markdown};

const TAB_WIDTH: usize = 4;

/// Format `content` and convert it to owned `Text` in the given color.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    to_text(&format_markdown(content), base_fg)
}

pub fn to_text(formatted: &FormattedText, base_fg: Color) -> Text<'static> {
    let base = Style::default().fg(base_fg);
    let lines: Vec<Line<'static>> = formatted
        .lines
        .iter()
        .map(|line| {
            let spans: Vec<Span<'static>> = line
                .fragments
                .iter()
                .map(|fragment| {
                    let style = if fragment.bold {
                        base.add_modifier(Modifier::BOLD)
                    } else {
                        base
                    };
                    // Paragraph doesn't expand tabs
                    Span::styled(fragment.text.replace('\t', &" ".repeat(TAB_WIDTH)), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    Text::from(lines)
}
