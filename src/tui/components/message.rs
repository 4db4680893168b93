use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::direction::TextAlign;
use crate::core::history::Role;
use crate::core::view::{MessageKind, MessageNode};
use crate::tui::component::Component;
use crate::tui::markdown;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// A single chat bubble, created fresh each frame by `MessageList`.
///
/// User messages are green, replies blue, error messages red with a
/// warning marker in the title. Right-to-left text is right aligned.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub node: &'a MessageNode,
}

impl<'a> Message<'a> {
    pub fn new(node: &'a MessageNode) -> Self {
        Self { node }
    }

    /// Height the message occupies at `width`, borders included.
    ///
    /// Uses the same `Paragraph` that `render` draws so the prediction
    /// can't drift from the real wrapping.
    pub fn calculate_height(node: &MessageNode, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Too narrow for borders + padding; still take up a row
            return 1;
        }
        if node.content.trim().is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let lines = paragraph(node).line_count(content_width);
        (lines as u16).max(1) + VERTICAL_OVERHEAD
    }
}

fn title(node: &MessageNode) -> &'static str {
    match (node.kind, node.role) {
        (MessageKind::Error, _) => "⚠ adl",
        (MessageKind::Normal, Role::User) => "you",
        (MessageKind::Normal, Role::Assistant) => "adl",
    }
}

fn style(node: &MessageNode) -> Style {
    match (node.kind, node.role) {
        (MessageKind::Error, _) => Style::default().fg(Color::Red),
        (MessageKind::Normal, Role::User) => Style::default().fg(Color::Green),
        (MessageKind::Normal, Role::Assistant) => Style::default().fg(Color::Blue),
    }
}

fn alignment(node: &MessageNode) -> Alignment {
    match node.direction.alignment() {
        TextAlign::Leading => Alignment::Left,
        TextAlign::Trailing => Alignment::Right,
    }
}

fn paragraph(node: &MessageNode) -> Paragraph<'static> {
    let style = style(node);
    let fg = style.fg.unwrap_or(Color::Reset);
    Paragraph::new(markdown::render(node.content.trim_end(), fg))
        .style(style)
        .alignment(alignment(node))
        .wrap(Wrap { trim: false })
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let border_style = style(self.node).add_modifier(Modifier::DIM);

        let mut block = Block::bordered()
            .title(title(self.node))
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));
        if self.node.direction.is_rtl() {
            block = block.title_alignment(Alignment::Right);
        }

        let inner_area = block.inner(area);
        block.render(area, buf);
        paragraph(self.node).render(inner_area, buf);
    }
}

impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::direction::{self, Direction};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn node(role: Role, kind: MessageKind, content: &str) -> MessageNode {
        MessageNode {
            role,
            kind,
            content: content.to_string(),
            direction: direction::detect(content),
            revision: 0,
        }
    }

    fn draw(node: &MessageNode, width: u16) -> Vec<String> {
        let height = Message::calculate_height(node, width);
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                Component::render(&mut Message::new(node), f, area)
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn calculate_height_empty_content_returns_border_height() {
        let n = node(Role::Assistant, MessageKind::Normal, "");
        assert_eq!(Message::calculate_height(&n, 80), VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_zero_width_returns_minimum() {
        let n = node(Role::User, MessageKind::Normal, "Hello world");
        assert_eq!(Message::calculate_height(&n, 0), 1);
        assert_eq!(Message::calculate_height(&n, HORIZONTAL_OVERHEAD), 1);
    }

    #[test]
    fn calculate_height_single_line_fits() {
        let n = node(Role::User, MessageKind::Normal, "Hello");
        assert_eq!(Message::calculate_height(&n, 80), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_counts_line_breaks() {
        let n = node(Role::Assistant, MessageKind::Normal, "a\nb\nc");
        assert_eq!(Message::calculate_height(&n, 80), 3 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_wraps_at_width_boundary() {
        let n = node(Role::User, MessageKind::Normal, "Hello world");
        // content width 5: "Hello" | "world"
        assert_eq!(Message::calculate_height(&n, 9), 2 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn bold_markers_not_drawn() {
        let n = node(Role::Assistant, MessageKind::Normal, "**Article 5** applies");
        let rows = draw(&n, 40);
        assert!(rows[1].contains("Article 5 applies"));
        assert!(!rows[1].contains("**"));
    }

    #[test]
    fn error_message_marked() {
        let n = node(Role::Assistant, MessageKind::Error, "⚠️ Error: boom");
        assert_eq!(title(&n), "⚠ adl");
        assert_eq!(style(&n).fg, Some(Color::Red));
    }

    #[test]
    fn rtl_text_right_aligned() {
        let n = node(Role::Assistant, MessageKind::Normal, "مرحبا");
        assert_eq!(n.direction, Direction::Rtl);
        assert_eq!(alignment(&n), Alignment::Right);

        let ltr = node(Role::Assistant, MessageKind::Normal, "hello");
        assert_eq!(alignment(&ltr), Alignment::Left);
    }

    #[test]
    fn role_titles() {
        assert_eq!(title(&node(Role::User, MessageKind::Normal, "q")), "you");
        assert_eq!(title(&node(Role::Assistant, MessageKind::Normal, "a")), "adl");
    }
}
