//! HTTP client for the legal assistant's streaming chat route.
//!
//! One `POST` per turn; the response is `text/event-stream`-style and is
//! read chunk by chunk through [`SseDecoder`]. Events are forwarded over
//! an mpsc channel as soon as each line completes.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, info, warn};
use reqwest::Url;
use tokio::sync::mpsc::Sender;

use super::service::{BackendError, ChatBackend};
use super::sse::SseDecoder;
use super::types::{ChatRequest, StreamEvent};

/// Route appended to the configured base URL.
pub const STREAM_ROUTE: &str = "/api/v1/chat/stream";
pub const SERVICE_KEY_HEADER: &str = "X-SERVICE-KEY";

const LOCAL_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "0.0.0.0"];

/// Local development hosts. Plain `http` is only expected for these.
pub fn is_local_host(host: &str) -> bool {
    LOCAL_HOSTS.contains(&host)
}

/// Joins the base URL and the stream route, tolerating a trailing slash.
pub fn stream_url(base_url: &str) -> Result<Url, BackendError> {
    let joined = format!("{}{}", base_url.trim_end_matches('/'), STREAM_ROUTE);
    Url::parse(&joined).map_err(|e| BackendError::Config(format!("invalid base URL '{base_url}': {e}")))
}

pub struct AdlClient {
    endpoint: Url,
    service_key: Option<String>,
    client: reqwest::Client,
}

impl AdlClient {
    /// Creates a client for the service at `base_url`.
    ///
    /// # Arguments
    /// * `base_url` - Scheme and host (and optional prefix) of the service
    /// * `service_key` - Sent as `X-SERVICE-KEY` when present
    /// * `connect_timeout` - Bounds connection setup only; the stream itself is unbounded
    pub fn new(
        base_url: &str,
        service_key: Option<String>,
        connect_timeout: Option<Duration>,
    ) -> Result<Self, BackendError> {
        let endpoint = stream_url(base_url)?;

        let host = endpoint.host_str().unwrap_or_default();
        if service_key.is_some() && endpoint.scheme() == "http" && !is_local_host(host) {
            warn!(
                "Service key will be sent over plain HTTP to non-local host {}",
                host
            );
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::Config(e.to_string()))?;

        Ok(Self {
            endpoint,
            service_key,
            client,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends the request and returns the response if the status is a success.
    async fn send_request(&self, request: &ChatRequest) -> Result<reqwest::Response, BackendError> {
        let mut builder = self.client.post(self.endpoint.clone()).json(request);
        if let Some(key) = &self.service_key {
            builder = builder.header(SERVICE_KEY_HEADER, key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        debug!("Chat service response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Chat service error: {} - {}", status, err_body);
            return Err(BackendError::Api {
                status,
                message: err_body,
            });
        }

        Ok(response)
    }
}

async fn forward(sender: &Sender<StreamEvent>, event: StreamEvent) -> Result<(), BackendError> {
    sender.send(event).await.map_err(|_| {
        warn!("Event send failed: receiver dropped");
        BackendError::ChannelClosed
    })
}

#[async_trait]
impl ChatBackend for AdlClient {
    fn label(&self) -> String {
        match (self.endpoint.host_str(), self.endpoint.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            _ => self.endpoint.to_string(),
        }
    }

    async fn stream_chat(
        &self,
        request: &ChatRequest,
        sender: Sender<StreamEvent>,
    ) -> Result<(), BackendError> {
        info!(
            "Chat request: endpoint={}, query_len={}, history_len={}",
            self.endpoint,
            request.query.len(),
            request.history.len()
        );

        let response = self.send_request(request).await?;

        let mut decoder = SseDecoder::new();
        let mut body = response.bytes_stream();
        let mut chunk_count = 0usize;
        let mut event_count = 0usize;

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| BackendError::Network(e.to_string()))?;
            chunk_count += 1;
            debug!("Raw chunk received: {} bytes", chunk.len());

            for event in decoder.push(&chunk) {
                event_count += 1;
                forward(&sender, event).await?;
            }
        }

        for event in decoder.finish() {
            event_count += 1;
            forward(&sender, event).await?;
        }

        info!(
            "Stream ended: {} chunks, {} events, {} skipped frames",
            chunk_count,
            event_count,
            decoder.skipped_frames()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_url_joins_route() {
        let url = stream_url("http://localhost:8000").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/chat/stream");
    }

    #[test]
    fn test_stream_url_trailing_slash() {
        let url = stream_url("https://legal.example.com/").unwrap();
        assert_eq!(url.as_str(), "https://legal.example.com/api/v1/chat/stream");
    }

    #[test]
    fn test_stream_url_keeps_prefix() {
        let url = stream_url("https://example.com/adl").unwrap();
        assert_eq!(url.path(), "/adl/api/v1/chat/stream");
    }

    #[test]
    fn test_stream_url_rejects_garbage() {
        assert!(matches!(stream_url("not a url"), Err(BackendError::Config(_))));
    }

    #[test]
    fn test_local_hosts() {
        assert!(is_local_host("localhost"));
        assert!(is_local_host("127.0.0.1"));
        assert!(is_local_host("0.0.0.0"));
        assert!(!is_local_host("legal.example.com"));
    }

    #[test]
    fn test_label_includes_port() {
        let client = AdlClient::new("http://127.0.0.1:8000", None, None).unwrap();
        assert_eq!(client.label(), "127.0.0.1:8000");

        let client = AdlClient::new("https://legal.example.com", None, None).unwrap();
        assert_eq!(client.label(), "legal.example.com");
    }
}
