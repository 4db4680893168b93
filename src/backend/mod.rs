pub mod adl;
pub mod service;
pub mod sse;
pub mod types;

pub use adl::AdlClient;
pub use service::{BackendError, ChatBackend};
pub use sse::SseDecoder;
pub use types::{ChatRequest, SourceDocument, StreamEvent, UserContext};
