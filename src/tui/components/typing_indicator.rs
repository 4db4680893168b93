//! Three-dot "typing" bubble shown while the service hasn't produced text yet.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};

use crate::tui::component::Component;

/// Rows the indicator occupies (one line of dots plus borders).
pub const HEIGHT: u16 = 3;
/// Animation frames per dot.
const FRAMES_PER_STEP: usize = 3;
const DOTS: usize = 3;

#[derive(Clone, Copy)]
pub struct TypingIndicator {
    pub frame_index: usize,
}

impl TypingIndicator {
    pub fn new(frame_index: usize) -> Self {
        Self { frame_index }
    }

    /// Index of the highlighted dot for the current frame.
    fn active_dot(&self) -> usize {
        (self.frame_index / FRAMES_PER_STEP) % DOTS
    }

    fn line(&self) -> Line<'static> {
        let active = self.active_dot();
        let spans: Vec<Span<'static>> = (0..DOTS)
            .map(|i| {
                let style = if i == active {
                    Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Blue).add_modifier(Modifier::DIM)
                };
                Span::styled(if i + 1 < DOTS { "● " } else { "●" }, style)
            })
            .collect();
        Line::from(spans)
    }
}

impl Widget for TypingIndicator {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let block = Block::bordered()
            .title("adl")
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Blue).add_modifier(Modifier::DIM))
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        block.render(area, buf);
        Paragraph::new(self.line()).render(inner, buf);
    }
}

impl Component for TypingIndicator {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
