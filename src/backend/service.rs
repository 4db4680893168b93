use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use super::types::{ChatRequest, StreamEvent};

/// Errors that can end a chat request before the body is exhausted.
#[derive(Debug)]
pub enum BackendError {
    /// Client misconfigured (unparseable base URL, bad header value).
    Config(String),
    /// Network-level failure (DNS, connection refused, body read aborted).
    Network(String),
    /// The service answered with a non-success status.
    Api { status: u16, message: String },
    /// The consumer dropped its receiver mid-stream.
    ChannelClosed,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Config(msg) => write!(f, "config error: {msg}"),
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Api { status, message } => {
                write!(f, "service error (HTTP {status}): {message}")
            }
            BackendError::ChannelClosed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for BackendError {}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Human-readable target, shown in the title bar.
    fn label(&self) -> String;

    /// Sends one request and forwards every decoded event, in order, to `sender`.
    /// Returns once the response body is exhausted.
    async fn stream_chat(
        &self,
        request: &ChatRequest,
        sender: Sender<StreamEvent>,
    ) -> Result<(), BackendError>;
}
