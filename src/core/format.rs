//! # Message Formatting
//!
//! The tiny markdown subset messages support:
//!
//! - `**bold**` (non-greedy, never spanning a line break)
//! - literal newlines become line breaks
//!
//! Nothing else is interpreted. Control characters are stripped first
//! so streamed text can't smuggle terminal escape sequences into the
//! view. The result is UI-agnostic; `tui::markdown` turns it into
//! ratatui spans.

use std::sync::LazyLock;

use regex::Regex;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"));

/// A run of text with uniform emphasis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub bold: bool,
}

impl Fragment {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            bold: false,
        }
    }

    fn bold(text: &str) -> Self {
        Self {
            text: text.to_string(),
            bold: true,
        }
    }
}

/// One visual line (everything between two line breaks).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormattedLine {
    pub fragments: Vec<Fragment>,
}

impl FormattedLine {
    pub fn plain_text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormattedText {
    pub lines: Vec<FormattedLine>,
}

impl FormattedText {
    /// Number of line breaks rendered (lines minus one).
    pub fn line_breaks(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    pub fn bold_fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.lines
            .iter()
            .flat_map(|l| l.fragments.iter())
            .filter(|f| f.bold)
    }
}

/// Removes control characters except newline and tab.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|&c| !c.is_control() || c == '\n' || c == '\t')
        .collect()
}

pub fn format_markdown(text: &str) -> FormattedText {
    let clean = sanitize(text);
    FormattedText {
        lines: clean.split('\n').map(format_line).collect(),
    }
}

fn format_line(line: &str) -> FormattedLine {
    let mut fragments = Vec::new();
    let mut last = 0;

    for caps in BOLD.captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            fragments.push(Fragment::plain(&line[last..whole.start()]));
        }
        if !inner.as_str().is_empty() {
            fragments.push(Fragment::bold(inner.as_str()));
        }
        last = whole.end();
    }

    if last < line.len() {
        fragments.push(Fragment::plain(&line[last..]));
    }

    FormattedLine { fragments }
}
