//! # Application State
//!
//! Core business state for the chat client. No TUI-specific types here;
//! presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── session: Session          // history + in-flight turn state machine
//! ├── view: ChatView            // rendered messages + typing indicator
//! ├── status_message: String    // status bar text
//! └── service_label: String     // host the client talks to
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::config::ResolvedConfig;
use crate::core::session::Session;
use crate::core::view::ChatView;

pub const READY_STATUS: &str = "Ready";

pub struct App {
    pub session: Session,
    pub view: ChatView,
    pub status_message: String,
    pub service_label: String,
}

impl App {
    pub fn new(history_limit: usize, platform: &str, service_label: impl Into<String>) -> Self {
        Self {
            session: Session::new(history_limit, platform),
            view: ChatView::new(),
            status_message: READY_STATUS.to_string(),
            service_label: service_label.into(),
        }
    }

    pub fn from_config(config: &ResolvedConfig, service_label: impl Into<String>) -> Self {
        Self::new(config.history_limit, &config.platform, service_label)
    }

    pub fn is_loading(&self) -> bool {
        !self.session.is_idle()
    }
}
