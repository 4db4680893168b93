//! Line-oriented renderer for one-shot mode (`--query`).
//!
//! The reply is streamed to stdout as it grows: each update prints only
//! the part of the accumulated text not yet written. Error messages go
//! to stderr. Streamed text is printed raw; whole messages have their
//! bold markers stripped.

use std::io::{self, Stderr, Stdout, Write};

use log::warn;

use crate::core::direction::Direction;
use crate::core::format::format_markdown;
use crate::core::history::Role;
use crate::core::view::{MessageId, MessageKind, Renderer};

pub struct PlainRenderer<W: Write, E: Write> {
    out: W,
    err: E,
    /// Bytes already printed for each created message.
    printed: Vec<usize>,
    /// Whether the reply needs a trailing newline before anything else is printed.
    open_line: bool,
}

impl PlainRenderer<Stdout, Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<W: Write, E: Write> PlainRenderer<W, E> {
    pub fn new(out: W, err: E) -> Self {
        Self {
            out,
            err,
            printed: Vec::new(),
            open_line: false,
        }
    }

    /// Terminates a partially printed reply.
    pub fn finish(&mut self) {
        if std::mem::take(&mut self.open_line) {
            self.write_out("\n");
        }
    }

    pub fn into_inner(self) -> (W, E) {
        (self.out, self.err)
    }

    fn write_out(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            warn!("Failed to write reply: {}", e);
        }
    }
}

fn plain_text(text: &str) -> String {
    format_markdown(text)
        .lines
        .iter()
        .map(|line| line.plain_text())
        .collect::<Vec<_>>()
        .join("\n")
}

impl<W: Write, E: Write> Renderer for PlainRenderer<W, E> {
    fn append_message(&mut self, role: Role, kind: MessageKind, text: &str) {
        // The user's own question is already on their terminal
        if role == Role::User {
            return;
        }
        self.finish();
        match kind {
            MessageKind::Error => {
                if let Err(e) = writeln!(self.err, "{}", plain_text(text)) {
                    warn!("Failed to write error message: {}", e);
                }
            }
            MessageKind::Normal => {
                let line = format!("{}\n", plain_text(text));
                self.write_out(&line);
            }
        }
    }

    fn create_message_element(&mut self, _role: Role) -> MessageId {
        self.printed.push(0);
        MessageId(self.printed.len() - 1)
    }

    fn update_message(&mut self, id: MessageId, text: &str, _direction: Direction) {
        let Some(&already) = self.printed.get(id.0) else {
            return;
        };
        // Raw text only ever grows by appending, so the unprinted part is a suffix
        let Some(suffix) = text.get(already..) else {
            return;
        };
        if suffix.is_empty() {
            return;
        }
        self.write_out(suffix);
        self.printed[id.0] = text.len();
        self.open_line = !text.ends_with('\n');
    }

    fn set_loading(&mut self, _loading: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> PlainRenderer<Vec<u8>, Vec<u8>> {
        PlainRenderer::new(Vec::new(), Vec::new())
    }

    fn output(r: PlainRenderer<Vec<u8>, Vec<u8>>) -> (String, String) {
        let (out, err) = r.into_inner();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_prints_only_new_suffix() {
        let mut r = renderer();
        let id = r.create_message_element(Role::Assistant);
        r.update_message(id, "Hi", Direction::Ltr);
        r.update_message(id, "Hi there", Direction::Ltr);
        r.finish();

        let (out, err) = output(r);
        assert_eq!(out, "Hi there\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_user_message_not_echoed() {
        let mut r = renderer();
        r.append_message(Role::User, MessageKind::Normal, "hello");
        let (out, _) = output(r);
        assert!(out.is_empty());
    }

    #[test]
    fn test_errors_go_to_stderr_after_partial_reply() {
        let mut r = renderer();
        let id = r.create_message_element(Role::Assistant);
        r.update_message(id, "par", Direction::Ltr);
        r.append_message(Role::Assistant, MessageKind::Error, "boom");

        let (out, err) = output(r);
        assert_eq!(out, "par\n");
        assert_eq!(err, "boom\n");
    }

    #[test]
    fn test_error_message_bold_stripped() {
        let mut r = renderer();
        r.append_message(Role::Assistant, MessageKind::Error, "**Oops** again");

        let (_, err) = output(r);
        assert_eq!(err, "Oops again\n");
    }

    #[test]
    fn test_finished_reply_with_newline_not_doubled() {
        let mut r = renderer();
        let id = r.create_message_element(Role::Assistant);
        r.update_message(id, "done\n", Direction::Ltr);
        r.finish();

        let (out, _) = output(r);
        assert_eq!(out, "done\n");
    }

    #[test]
    fn test_unchanged_update_prints_nothing() {
        let mut r = renderer();
        let id = r.create_message_element(Role::Assistant);
        r.update_message(id, "same", Direction::Ltr);
        r.update_message(id, "same", Direction::Ltr);
        r.finish();

        let (out, _) = output(r);
        assert_eq!(out, "same\n");
    }
}
