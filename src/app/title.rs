//! Episode title parsing
//!
//! Feed titles look like `Episode 12. Something Great` (or the Russian
//! `Выпуск 12. ...`). The parser splits them into the episode number, used
//! as a file name prefix, and the display title.

use std::sync::OnceLock;

use regex::Regex;

use crate::constants::files;

/// Episode marker word, number, optional dots and whitespace, then the title
const TITLE_PATTERN: &str = r"^(?:Выпуск|Episode)\s+([[:alnum:]]+)\.*\s*(.*?)$";

fn title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(TITLE_PATTERN).expect("Title pattern should be valid"))
}

/// Result of splitting a raw feed title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTitle {
    /// Episode number, empty when the title carries none
    pub prefix: String,
    /// Display title, safe to use as a path component
    pub title: String,
}

impl ParsedTitle {
    /// Title written into the ID3 tag, e.g. `[12] Something Great`
    pub fn display(&self) -> String {
        format!("[{}] {}", self.prefix, self.title)
    }

    /// Output file name, e.g. `12 - Something Great.mp3`
    pub fn file_name(&self) -> String {
        format!(
            "{} - {}.{}",
            self.prefix,
            self.title,
            files::EPISODE_EXTENSION
        )
    }
}

/// Splits raw feed titles into prefix and title
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleParser;

impl TitleParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a raw title, falling back to the author when the title part is empty
    pub fn parse(&self, raw_title: &str, author: &str) -> ParsedTitle {
        let Some(captures) = title_pattern().captures(raw_title) else {
            return ParsedTitle {
                prefix: String::new(),
                title: sanitize_component(raw_title),
            };
        };

        let prefix = captures
            .get(1)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let title = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
        let title = if title.is_empty() { author } else { title };

        ParsedTitle {
            prefix,
            title: sanitize_component(title),
        }
    }
}

/// Replace path separators so the value stays a single path component
fn sanitize_component(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c == '/' || c == std::path::MAIN_SEPARATOR {
                '_'
            } else {
                c
            }
        })
        .collect()
}
