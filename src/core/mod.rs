//! # Core Application Logic
//!
//! The chat client's business logic. It knows nothing about any
//! specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Session (turns)      │
//!                    │  • ChatView (Renderer)  │
//!                    │  • Action / update()    │
//!                    │                         │
//!                    │  No terminal I/O.       │
//!                    └───────────┬─────────────┘
//!                                │
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │    TUI     │              │   Plain    │
//!           │  Adapter   │              │  (stdout)  │
//!           │ (ratatui)  │              │  one-shot  │
//!           └────────────┘              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`session`]: per-turn state machine and stream dispatch policy
//! - [`view`]: the `Renderer` contract and the `ChatView` the TUI draws
//! - [`history`]: the rolling conversation window
//! - [`format`]: bold/newline formatting
//! - [`direction`]: right-to-left detection
//! - [`action`]: the `Action` enum and `update()` reducer
//! - [`conversation`]: single-flow turn driver
//! - [`config`]: layered configuration

pub mod action;
pub mod config;
pub mod conversation;
pub mod direction;
pub mod format;
pub mod history;
pub mod session;
pub mod state;
pub mod view;
