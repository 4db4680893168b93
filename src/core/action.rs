//! # Actions
//!
//! Everything that can happen in the client becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! A frame arrives? That's `Action::Stream { turn, event }`.
//!
//! `update()` applies an action to the state and returns an `Effect`
//! for the event loop to carry out. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Stream actions carry the turn they belong to. Anything addressed to
//! a turn that was cancelled or already finished is dropped.

use log::debug;

use crate::backend::{ChatRequest, StreamEvent};
use crate::core::session::{SendRejected, TurnId};
use crate::core::state::{App, READY_STATUS};

#[derive(Debug)]
pub enum Action {
    Submit(String),
    Stream { turn: TurnId, event: StreamEvent },
    StreamFinished { turn: TurnId },
    StreamFailed { turn: TurnId, reason: String },
    Cancel,
    Quit,
}

#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    SpawnRequest { turn: TurnId, request: ChatRequest },
    AbortRequest,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => match app.session.begin(&text, &mut app.view) {
            Ok((turn, request)) => {
                app.status_message = "Waiting for the service...".to_string();
                Effect::SpawnRequest { turn, request }
            }
            Err(SendRejected::Empty) => Effect::None,
            Err(SendRejected::Busy) => {
                app.status_message = "Still answering (Esc to cancel)".to_string();
                Effect::None
            }
        },
        Action::Stream { turn, event } => {
            if !is_current(app, turn) {
                debug!("Dropping stale event for turn {}", turn);
                return Effect::None;
            }
            let is_sources = matches!(event, StreamEvent::Sources { .. });
            app.session.on_event(event, &mut app.view);
            app.status_message = if is_sources {
                format!("Answering · {}", sources_label(app.session.sources().len()))
            } else {
                "Answering...".to_string()
            };
            Effect::None
        }
        Action::StreamFinished { turn } => {
            if is_current(app, turn) {
                app.session.finish(&mut app.view);
                let sources = app.session.sources().len();
                app.status_message = if sources > 0 {
                    format!("{READY_STATUS} · {}", sources_label(sources))
                } else {
                    READY_STATUS.to_string()
                };
            }
            Effect::None
        }
        Action::StreamFailed { turn, reason } => {
            if is_current(app, turn) {
                app.session.fail(&reason, &mut app.view);
                app.status_message = "Connection failed".to_string();
            }
            Effect::None
        }
        Action::Cancel => {
            if app.session.is_idle() {
                return Effect::None;
            }
            app.session.cancel(&mut app.view);
            app.status_message = "Cancelled".to_string();
            Effect::AbortRequest
        }
        Action::Quit => {
            app.session.cancel(&mut app.view);
            Effect::Quit
        }
    }
}

fn is_current(app: &App, turn: TurnId) -> bool {
    app.session.current_turn() == Some(turn)
}

fn sources_label(count: usize) -> String {
    match count {
        1 => "1 source".to_string(),
        n => format!("{n} sources"),
    }
}
