//! # Chat Session
//!
//! Owns the conversation history and the lifecycle of the one request
//! that may be in flight. Every turn walks the same state machine:
//!
//! ```text
//!            begin()            first event
//!   Idle ────────────▶ Sending ────────────▶ Streaming
//!    ▲                    │                      │
//!    └──── finish() / fail() / cancel() ─────────┘
//! ```
//!
//! `begin()` outside `Idle` is rejected, so overlapping sends are
//! impossible no matter what the UI allows. Every path back to `Idle`
//! hides the typing indicator.

use std::fmt;

use log::{debug, info, warn};

use crate::backend::{ChatRequest, SourceDocument, StreamEvent, UserContext};
use crate::core::direction;
use crate::core::history::{ConversationHistory, Role};
use crate::core::view::{MessageId, MessageKind, Renderer};

/// Shown once when the service can't be reached or answers with an error status.
pub const CONNECTION_FAILURE_MESSAGE: &str =
    "Sorry, I couldn't connect to the Adl Legal Service. Please make sure the backend is running.";

const ERROR_PREFIX: &str = "⚠️ Error: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Request sent, nothing received yet.
    Sending,
    /// At least one event received.
    Streaming,
}

/// Why `begin()` refused to start a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejected {
    /// Nothing but whitespace was submitted.
    Empty,
    /// A request is already in flight.
    Busy,
}

impl fmt::Display for SendRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendRejected::Empty => write!(f, "message is empty"),
            SendRejected::Busy => write!(f, "a reply is still streaming"),
        }
    }
}

impl std::error::Error for SendRejected {}

/// Identifies one turn so late events from an abandoned request can be dropped.
pub type TurnId = u64;

/// The in-flight turn.
#[derive(Debug)]
struct PendingTurn {
    id: TurnId,
    query: String,
    response: String,
    assistant: Option<MessageId>,
    sources: Vec<SourceDocument>,
}

#[derive(Debug)]
pub struct Session {
    history: ConversationHistory,
    platform: String,
    phase: Phase,
    pending: Option<PendingTurn>,
    next_turn: TurnId,
    last_sources: Vec<SourceDocument>,
}

impl Session {
    pub fn new(history_limit: usize, platform: impl Into<String>) -> Self {
        Self {
            history: ConversationHistory::new(history_limit),
            platform: platform.into(),
            phase: Phase::Idle,
            pending: None,
            next_turn: 1,
            last_sources: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Id of the turn in flight, if any.
    pub fn current_turn(&self) -> Option<TurnId> {
        self.pending.as_ref().map(|p| p.id)
    }

    /// Sources of the turn in flight, or of the last finished one.
    pub fn sources(&self) -> &[SourceDocument] {
        match &self.pending {
            Some(pending) => &pending.sources,
            None => &self.last_sources,
        }
    }

    /// Starts a turn: renders the user message, shows the typing
    /// indicator, and builds the request from the history as it stands.
    pub fn begin(
        &mut self,
        text: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<(TurnId, ChatRequest), SendRejected> {
        let query = text.trim();
        if query.is_empty() {
            return Err(SendRejected::Empty);
        }
        if self.phase != Phase::Idle {
            warn!("Rejecting send while {:?}", self.phase);
            return Err(SendRejected::Busy);
        }

        renderer.append_message(Role::User, MessageKind::Normal, query);
        renderer.set_loading(true);

        let id = self.next_turn;
        self.next_turn += 1;
        self.phase = Phase::Sending;
        self.pending = Some(PendingTurn {
            id,
            query: query.to_string(),
            response: String::new(),
            assistant: None,
            sources: Vec::new(),
        });

        info!("Turn {} started (history_len={})", id, self.history.len());

        let request = ChatRequest {
            query: query.to_string(),
            history: self.history.turns().to_vec(),
            user_context: UserContext {
                platform: self.platform.clone(),
            },
        };
        Ok((id, request))
    }

    /// Applies one stream event to the in-flight turn.
    pub fn on_event(&mut self, event: StreamEvent, renderer: &mut dyn Renderer) {
        let Some(pending) = self.pending.as_mut() else {
            debug!("Dropping event with no turn in flight: {:?}", event);
            return;
        };
        self.phase = Phase::Streaming;

        match event {
            StreamEvent::Content { content } => {
                let id = match pending.assistant {
                    Some(id) => id,
                    None => {
                        renderer.set_loading(false);
                        let id = renderer.create_message_element(Role::Assistant);
                        pending.assistant = Some(id);
                        id
                    }
                };
                pending.response.push_str(&content);
                let direction = direction::detect(&pending.response);
                renderer.update_message(id, &pending.response, direction);
                renderer.scroll_to_bottom();
            }
            StreamEvent::Sources { sources } => {
                info!("Sources received: {}", sources.len());
                for source in &sources {
                    debug!(
                        "Source id={:?} type={:?} score={:?}",
                        source.id, source.source_type, source.score
                    );
                }
                pending.sources = sources;
            }
            StreamEvent::Error { content } => {
                warn!("Service reported error: {}", content);
                renderer.append_message(
                    Role::Assistant,
                    MessageKind::Error,
                    &format!("{ERROR_PREFIX}{content}"),
                );
            }
            StreamEvent::Unknown => {
                debug!("Ignoring event of unknown type");
            }
        }
    }

    /// The body was exhausted: record the exchange and return to idle.
    pub fn finish(&mut self, renderer: &mut dyn Renderer) {
        let Some(pending) = self.end_turn(renderer) else {
            return;
        };
        info!(
            "Turn {} finished: {} response bytes",
            pending.id,
            pending.response.len()
        );
        self.history
            .record_exchange(&pending.query, &pending.response);
        self.last_sources = pending.sources;
    }

    /// The transport failed: show the failure message and return to idle.
    /// History is left as it was.
    pub fn fail(&mut self, reason: &str, renderer: &mut dyn Renderer) {
        let Some(pending) = self.end_turn(renderer) else {
            return;
        };
        warn!("Turn {} failed: {}", pending.id, reason);
        renderer.append_message(
            Role::Assistant,
            MessageKind::Error,
            CONNECTION_FAILURE_MESSAGE,
        );
    }

    /// Abandons the turn in flight (user cancelled or the view is closing).
    pub fn cancel(&mut self, renderer: &mut dyn Renderer) {
        if let Some(pending) = self.end_turn(renderer) {
            info!(
                "Turn {} cancelled after {} response bytes",
                pending.id,
                pending.response.len()
            );
        }
    }

    fn end_turn(&mut self, renderer: &mut dyn Renderer) -> Option<PendingTurn> {
        renderer.set_loading(false);
        self.phase = Phase::Idle;
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::direction::Direction;
    use crate::core::history::ChatTurn;
    use crate::core::view::ChatView;

    fn content(text: &str) -> StreamEvent {
        StreamEvent::Content {
            content: text.to_string(),
        }
    }

    fn session() -> Session {
        Session::new(10, "terminal")
    }

    #[test]
    fn test_begin_renders_user_message_and_loading() {
        let mut session = session();
        let mut view = ChatView::new();

        let (_, request) = session.begin("  hello  ", &mut view).unwrap();

        assert_eq!(request.query, "hello");
        assert!(request.history.is_empty());
        assert_eq!(request.user_context.platform, "terminal");
        assert_eq!(view.messages().len(), 1);
        assert_eq!(view.messages()[0].content, "hello");
        assert!(view.is_typing());
        assert_eq!(session.phase(), Phase::Sending);
    }

    #[test]
    fn test_empty_text_is_rejected_without_side_effects() {
        let mut session = session();
        let mut view = ChatView::new();

        assert_eq!(session.begin(" \n\t", &mut view), Err(SendRejected::Empty));
        assert!(view.messages().is_empty());
        assert!(!view.is_typing());
        assert!(session.is_idle());
    }

    #[test]
    fn test_second_send_while_in_flight_is_rejected() {
        let mut session = session();
        let mut view = ChatView::new();

        session.begin("first", &mut view).unwrap();
        assert_eq!(session.begin("second", &mut view), Err(SendRejected::Busy));

        session.on_event(content("x"), &mut view);
        assert_eq!(session.begin("third", &mut view), Err(SendRejected::Busy));
        // Only the first user message was rendered
        assert_eq!(
            view.messages().iter().filter(|m| m.role == Role::User).count(),
            1
        );
    }

    #[test]
    fn test_first_content_creates_node_and_hides_loading() {
        let mut session = session();
        let mut view = ChatView::new();
        session.begin("hello", &mut view).unwrap();

        session.on_event(content("Hi"), &mut view);
        assert!(!view.is_typing());
        assert_eq!(session.phase(), Phase::Streaming);

        session.on_event(content(" there"), &mut view);
        assert_eq!(view.messages().len(), 2);
        assert_eq!(view.messages()[1].content, "Hi there");
        assert_eq!(view.messages()[1].role, Role::Assistant);
    }

    #[test]
    fn test_finish_records_exchange() {
        let mut session = session();
        let mut view = ChatView::new();
        session.begin("hello", &mut view).unwrap();
        session.on_event(content("Hi"), &mut view);
        session.on_event(content(" there"), &mut view);
        session.finish(&mut view);

        assert!(session.is_idle());
        assert!(!view.is_typing());
        assert_eq!(
            session.history().turns(),
            &[ChatTurn::user("hello"), ChatTurn::assistant("Hi there")]
        );

        // The next request carries the recorded history
        let (_, request) = session.begin("again", &mut view).unwrap();
        assert_eq!(request.history.len(), 2);
    }

    #[test]
    fn test_direction_flips_when_rtl_arrives_later() {
        let mut session = session();
        let mut view = ChatView::new();
        session.begin("q", &mut view).unwrap();

        session.on_event(content("Article 5 "), &mut view);
        assert_eq!(view.messages()[1].direction, Direction::Ltr);

        session.on_event(content("المادة"), &mut view);
        assert_eq!(view.messages()[1].direction, Direction::Rtl);
    }

    #[test]
    fn test_error_event_is_separate_message_and_stream_continues() {
        let mut session = session();
        let mut view = ChatView::new();
        session.begin("q", &mut view).unwrap();

        session.on_event(content("partial"), &mut view);
        session.on_event(
            StreamEvent::Error {
                content: "retrieval timed out".to_string(),
            },
            &mut view,
        );
        session.on_event(content(" answer"), &mut view);
        session.finish(&mut view);

        let messages = view.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].content, "partial answer");
        assert_eq!(messages[2].kind, MessageKind::Error);
        assert_eq!(messages[2].content, "⚠️ Error: retrieval timed out");
        assert_eq!(session.history().turns()[1].content, "partial answer");
    }

    #[test]
    fn test_sources_do_not_render() {
        let mut session = session();
        let mut view = ChatView::new();
        session.begin("q", &mut view).unwrap();

        session.on_event(
            StreamEvent::Sources {
                sources: vec![SourceDocument::default(), SourceDocument::default()],
            },
            &mut view,
        );
        assert_eq!(view.messages().len(), 1);
        assert!(view.is_typing());
        assert_eq!(session.sources().len(), 2);

        session.finish(&mut view);
        assert_eq!(session.sources().len(), 2);
    }

    #[test]
    fn test_fail_shows_one_failure_message_and_keeps_history() {
        for content_events in 0..3 {
            let mut session = session();
            let mut view = ChatView::new();
            session.begin("q", &mut view).unwrap();
            for _ in 0..content_events {
                session.on_event(content("x"), &mut view);
            }
            session.fail("connection refused", &mut view);

            assert!(!view.is_typing());
            assert!(session.is_idle());
            assert!(session.history().is_empty());
            let failures = view
                .messages()
                .iter()
                .filter(|m| m.role == Role::Assistant && m.content == CONNECTION_FAILURE_MESSAGE)
                .count();
            assert_eq!(failures, 1, "with {content_events} content events");
        }
    }

    #[test]
    fn test_cancel_returns_to_idle_without_history() {
        let mut session = session();
        let mut view = ChatView::new();
        session.begin("q", &mut view).unwrap();
        session.on_event(content("half"), &mut view);
        session.cancel(&mut view);

        assert!(session.is_idle());
        assert!(!view.is_typing());
        assert!(session.history().is_empty());
        assert!(session.current_turn().is_none());
        // A new turn can start
        assert!(session.begin("again", &mut view).is_ok());
    }

    #[test]
    fn test_events_after_turn_ended_are_dropped() {
        let mut session = session();
        let mut view = ChatView::new();
        session.begin("q", &mut view).unwrap();
        session.finish(&mut view);

        session.on_event(content("late"), &mut view);
        session.finish(&mut view);

        assert_eq!(view.messages().len(), 1);
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_turn_ids_increase() {
        let mut session = session();
        let mut view = ChatView::new();
        let (first, _) = session.begin("a", &mut view).unwrap();
        session.finish(&mut view);
        let (second, _) = session.begin("b", &mut view).unwrap();
        assert!(second > first);
        assert_eq!(session.current_turn(), Some(second));
    }
}
