//! Drives one whole turn from a single async flow.
//!
//! The backend future and the dispatch loop run side by side with
//! `tokio::join!`. The backend owns the sender, so the loop only ends
//! once every event has been applied. The outcome is handled after
//! that, which keeps the failure message after any partial reply.

use log::debug;
use tokio::sync::mpsc;

use crate::backend::{BackendError, ChatBackend};
use crate::core::session::{SendRejected, Session};
use crate::core::view::Renderer;

/// Capacity of the event channel between the backend and the consumer.
pub const EVENT_BUFFER: usize = 100;

#[derive(Debug)]
pub enum TurnOutcome {
    Completed,
    Failed(BackendError),
}

pub async fn send_message(
    session: &mut Session,
    backend: &dyn ChatBackend,
    text: &str,
    renderer: &mut dyn Renderer,
) -> Result<TurnOutcome, SendRejected> {
    let (turn, request) = session.begin(text, renderer)?;
    debug!("Dispatching turn {} to {}", turn, backend.label());

    let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);
    let stream = backend.stream_chat(&request, tx);
    let dispatch = async {
        while let Some(event) = rx.recv().await {
            session.on_event(event, renderer);
        }
    };

    let (result, ()) = tokio::join!(stream, dispatch);

    Ok(match result {
        Ok(()) => {
            session.finish(renderer);
            TurnOutcome::Completed
        }
        Err(e) => {
            session.fail(&e.to_string(), renderer);
            TurnOutcome::Failed(e)
        }
    })
}
