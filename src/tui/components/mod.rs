//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: service label, status, unseen-content marker
//! - `Message`: one chat bubble
//! - `TypingIndicator`: animated dots while waiting for the first fragment
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `InputBox`: question editor, disabled while a reply streams
//! - `MessageList`: scrollable conversation with a per-message layout cache
//!
//! Components receive their data as props (struct fields) rather than
//! reading `App` directly:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(app.service_label.clone(), app.status_message.clone(), false);
//! title_bar.render(frame, area);
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod input_box;
pub use input_box::{InputBox, InputEvent};
pub mod message;
pub mod message_list;
pub use message_list::{MessageList, MessageListState};
pub mod typing_indicator;
