//! # Chat View
//!
//! The renderer contract the stream consumer drives, and `ChatView`,
//! the in-memory view the TUI draws from.
//!
//! ```text
//! Session ──append_message / create_message_element / update_message──▶ Renderer
//!         ──set_loading(bool)─────────────────────────────────────────▶
//! ```
//!
//! A user message is written once. The assistant's reply node is created
//! empty and rewritten with the full accumulated text on every fragment.

use crate::core::direction::{self, Direction};
use crate::core::history::Role;

/// Handle to a message node created with [`Renderer::create_message_element`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Normal,
    /// Visibly marked (server error frames, connection failures).
    Error,
}

pub trait Renderer {
    /// Adds a complete, immutable message and scrolls it into view.
    fn append_message(&mut self, role: Role, kind: MessageKind, text: &str);

    /// Adds an empty message whose content is filled in later.
    fn create_message_element(&mut self, role: Role) -> MessageId;

    /// Replaces the content of a node created by `create_message_element`.
    fn update_message(&mut self, id: MessageId, text: &str, direction: Direction);

    /// Shows or hides the typing indicator and disables or enables sending.
    /// Hiding an indicator that isn't shown is a no-op.
    fn set_loading(&mut self, loading: bool);

    fn scroll_to_bottom(&mut self) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageNode {
    pub role: Role,
    pub kind: MessageKind,
    pub content: String,
    pub direction: Direction,
    /// Bumped on every content change so cached layout can be invalidated.
    pub revision: u32,
}

#[derive(Debug, Default)]
pub struct ChatView {
    messages: Vec<MessageNode>,
    typing: bool,
    scroll_requested: bool,
}

impl ChatView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[MessageNode] {
        &self.messages
    }

    pub fn message(&self, id: MessageId) -> Option<&MessageNode> {
        self.messages.get(id.0)
    }

    /// Whether the typing indicator is shown.
    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn send_enabled(&self) -> bool {
        !self.typing
    }

    /// Returns and clears a pending scroll-to-bottom request.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }
}

impl Renderer for ChatView {
    fn append_message(&mut self, role: Role, kind: MessageKind, text: &str) {
        self.messages.push(MessageNode {
            role,
            kind,
            content: text.to_string(),
            direction: direction::detect(text),
            revision: 0,
        });
        self.scroll_to_bottom();
    }

    fn create_message_element(&mut self, role: Role) -> MessageId {
        self.messages.push(MessageNode {
            role,
            kind: MessageKind::Normal,
            content: String::new(),
            direction: Direction::Ltr,
            revision: 0,
        });
        MessageId(self.messages.len() - 1)
    }

    fn update_message(&mut self, id: MessageId, text: &str, direction: Direction) {
        if let Some(node) = self.messages.get_mut(id.0) {
            node.content.clear();
            node.content.push_str(text);
            node.direction = direction;
            node.revision = node.revision.wrapping_add(1);
        }
    }

    fn set_loading(&mut self, loading: bool) {
        if loading {
            self.typing = true;
            self.scroll_to_bottom();
        } else {
            self.typing = false;
        }
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_requested = true;
    }
}
