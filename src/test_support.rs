//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::backend::{BackendError, ChatBackend, ChatRequest, StreamEvent};
use crate::core::state::App;

/// Replays a fixed list of events for every request, optionally ending
/// the first request with an error after the events are sent.
pub struct ScriptedBackend {
    events: Vec<StreamEvent>,
    failure: Mutex<Option<BackendError>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedBackend {
    pub fn ok(events: Vec<StreamEvent>) -> Self {
        Self {
            events,
            failure: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(events: Vec<StreamEvent>, error: BackendError) -> Self {
        Self {
            events,
            failure: Mutex::new(Some(error)),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn label(&self) -> String {
        "scripted".to_string()
    }

    async fn stream_chat(
        &self,
        request: &ChatRequest,
        sender: Sender<StreamEvent>,
    ) -> Result<(), BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        for event in self.events.clone() {
            sender
                .send(event)
                .await
                .map_err(|_| BackendError::ChannelClosed)?;
        }
        let failure = self.failure.lock().unwrap().take();
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Creates a test App with default settings.
pub fn test_app() -> App {
    App::new(10, "terminal", "test-service")
}
