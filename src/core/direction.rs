//! Text direction detection.
//!
//! A message is laid out right-to-left as soon as it contains a single
//! Arabic-script character. The check runs against the whole accumulated
//! text on every render, so a streamed reply can flip direction mid-way.

use std::ops::RangeInclusive;

/// Arabic block (U+0600–U+06FF).
const RTL_RANGE: RangeInclusive<char> = '\u{0600}'..='\u{06FF}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

/// Horizontal alignment relative to the reading direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Leading,
    Trailing,
}

impl Direction {
    pub fn alignment(self) -> TextAlign {
        match self {
            Direction::Ltr => TextAlign::Leading,
            Direction::Rtl => TextAlign::Trailing,
        }
    }

    pub fn is_rtl(self) -> bool {
        self == Direction::Rtl
    }
}

pub fn detect(text: &str) -> Direction {
    if text.chars().any(|c| RTL_RANGE.contains(&c)) {
        Direction::Rtl
    } else {
        Direction::Ltr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin_text_is_ltr() {
        assert_eq!(detect("Hello, world"), Direction::Ltr);
        assert_eq!(detect(""), Direction::Ltr);
        assert_eq!(detect("Ελληνικά и кириллица"), Direction::Ltr);
    }

    #[test]
    fn test_single_arabic_char_is_rtl() {
        assert_eq!(detect("see article م"), Direction::Rtl);
        assert_eq!(detect("ما هي حقوق المستأجر؟"), Direction::Rtl);
    }

    #[test]
    fn test_range_boundaries() {
        assert_eq!(detect("\u{0600}"), Direction::Rtl);
        assert_eq!(detect("\u{06FF}"), Direction::Rtl);
        assert_eq!(detect("\u{05FF}"), Direction::Ltr);
        assert_eq!(detect("\u{0700}"), Direction::Ltr);
    }

    #[test]
    fn test_direction_updates_as_text_accumulates() {
        let mut accumulated = String::new();
        accumulated.push_str("The tenant ");
        assert_eq!(detect(&accumulated), Direction::Ltr);

        accumulated.push_str("(المستأجر)");
        assert_eq!(detect(&accumulated), Direction::Rtl);
        assert_eq!(detect(&accumulated).alignment(), TextAlign::Trailing);
    }

    #[test]
    fn test_alignment() {
        assert_eq!(Direction::Ltr.alignment(), TextAlign::Leading);
        assert_eq!(Direction::Rtl.alignment(), TextAlign::Trailing);
    }
}
