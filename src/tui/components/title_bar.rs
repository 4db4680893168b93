//! # TitleBar Component
//!
//! One-line header: the service the client talks to, the current
//! status, and a "↓ New" marker when the user has scrolled away from
//! content that is still arriving.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

pub struct TitleBar {
    /// Host (and port) of the chat service
    pub service_label: String,
    /// Status message (e.g. "Answering...", "Ready · 3 sources")
    pub status_message: String,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(service_label: String, status_message: String, has_unseen_content: bool) -> Self {
        Self {
            service_label,
            status_message,
            has_unseen_content,
        }
    }

    fn text(&self) -> String {
        let mut text = format!("Adl Legal Assistant ({})", self.service_label);
        if !self.status_message.is_empty() {
            text.push_str(" | ");
            text.push_str(&self.status_message);
        }
        if self.has_unseen_content {
            text.push_str(" | ↓ New");
        }
        text
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Span::raw(self.text()), area);
    }
}
