//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (typing indicator visible): draws every ~80ms.
//! - **Idle**: sleeps up to 500ms, only redraws on events, stream
//!   actions or terminal resize.
//!
//! ## Request lifetime
//!
//! Each turn runs in one tokio task. Esc aborts it, and so does leaving
//! the loop for any reason, so nothing keeps writing to a view that no
//! longer exists.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use tokio::task::AbortHandle;

use crate::backend::{ChatBackend, ChatRequest};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::conversation::EVENT_BUFFER;
use crate::core::session::TurnId;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol makes Shift+Enter distinguishable; terminals
        // without it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            SetCursorStyle::DefaultUserShape
        );
    }
}

/// The in-flight request task, aborted when dropped.
#[derive(Default)]
struct ActiveRequest(Option<AbortHandle>);

impl ActiveRequest {
    fn replace(&mut self, handle: AbortHandle) {
        self.abort();
        self.0 = Some(handle);
    }

    fn abort(&mut self) {
        if let Some(handle) = self.0.take() {
            debug!("Aborting request task");
            handle.abort();
        }
    }
}

impl Drop for ActiveRequest {
    fn drop(&mut self) {
        self.abort();
    }
}

pub fn run(config: &ResolvedConfig, backend: Arc<dyn ChatBackend>) -> std::io::Result<()> {
    let mut app = App::from_config(config, backend.label());
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from the request task
    let (tx, rx) = mpsc::channel();
    let mut active = ActiveRequest::default();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'event_loop: loop {
        tui.input_box.disabled = app.is_loading();

        let animating = app.view.is_typing();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let frame_index = (start_time.elapsed().as_millis() / 80) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, frame_index))?;
            needs_redraw = false;
        }

        // Short timeout while animating (~12fps) or streaming, long when idle
        let timeout = if animating || app.is_loading() {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let action = match event {
                TuiEvent::Resize => continue,
                TuiEvent::ForceQuit => Some(Action::Quit),
                TuiEvent::Escape => Some(Action::Cancel),
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown => {
                    tui.message_list.handle_event(&event);
                    None
                }
                _ => match tui.input_box.handle_event(&event) {
                    Some(InputEvent::Submit(text)) => Some(Action::Submit(text)),
                    Some(InputEvent::ContentChanged) | None => None,
                },
            };

            if let Some(action) = action
                && apply(&mut app, action, &backend, &tx, &mut active)
            {
                break 'event_loop;
            }
        }

        // Actions from the request task (stream events, completion)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if apply(&mut app, action, &backend, &tx, &mut active) {
                break 'event_loop;
            }
        }

        if app.view.take_scroll_request() {
            tui.message_list.stick_to_bottom = true;
        }
    }

    active.abort();
    ratatui::restore();
    info!("Terminal restored");
    Ok(())
}

/// Runs `update` and carries out its effect. Returns true to quit.
fn apply(
    app: &mut App,
    action: Action,
    backend: &Arc<dyn ChatBackend>,
    tx: &mpsc::Sender<Action>,
    active: &mut ActiveRequest,
) -> bool {
    match update(app, action) {
        Effect::None => false,
        Effect::SpawnRequest { turn, request } => {
            active.replace(spawn_request(backend.clone(), turn, request, tx.clone()));
            false
        }
        Effect::AbortRequest => {
            active.abort();
            false
        }
        Effect::Quit => {
            active.abort();
            true
        }
    }
}

/// Streams one turn on a tokio task, forwarding every event as an
/// `Action` and finishing with `StreamFinished` or `StreamFailed`.
fn spawn_request(
    backend: Arc<dyn ChatBackend>,
    turn: TurnId,
    request: ChatRequest,
    tx: mpsc::Sender<Action>,
) -> AbortHandle {
    info!("Spawning request for turn {}", turn);

    let handle = tokio::spawn(async move {
        let (event_tx, mut event_rx) = tokio::sync::mpsc::channel(EVENT_BUFFER);
        let request_start = Instant::now();

        let stream = backend.stream_chat(&request, event_tx);
        let forward = async {
            let mut forwarded = 0usize;
            while let Some(event) = event_rx.recv().await {
                forwarded += 1;
                if tx.send(Action::Stream { turn, event }).is_err() {
                    warn!("Failed to forward stream event: receiver dropped");
                    break;
                }
            }
            forwarded
        };

        let (result, forwarded) = tokio::join!(stream, forward);
        info!(
            "Turn {} stream ended after {}ms, {} events forwarded",
            turn,
            request_start.elapsed().as_millis(),
            forwarded
        );

        let action = match result {
            Ok(()) => Action::StreamFinished { turn },
            Err(e) => Action::StreamFailed {
                turn,
                reason: e.to_string(),
            },
        };
        if tx.send(action).is_err() {
            warn!("Failed to send end of turn {}: receiver dropped", turn);
        }
    });

    handle.abort_handle()
}
