// ABOUTME: Inline markdown parsing for slide text
// ABOUTME: Splits a string into plain and emphasized runs delimited by `**`

use regex::Regex;
use std::sync::OnceLock;

/// A maximal substring with uniform emphasis state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub emphasized: bool,
}

impl Run {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasized: false,
        }
    }

    pub fn emphasized(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasized: true,
        }
    }
}

fn bold_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"))
}

/// Parse `**bold**` spans into runs.
///
/// Spans are matched non-greedily from left to right, so nested markers are
/// not supported and an unmatched `**` stays in the surrounding plain text.
/// Empty runs are dropped, except that an input with no visible text yields a
/// single empty plain run.
pub fn parse_markdown(text: &str) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut cursor = 0;

    for captures in bold_pattern().captures_iter(text) {
        let (Some(whole), Some(inner)) = (captures.get(0), captures.get(1)) else {
            continue;
        };

        if whole.start() > cursor {
            runs.push(Run::plain(&text[cursor..whole.start()]));
        }
        if !inner.as_str().is_empty() {
            runs.push(Run::emphasized(inner.as_str()));
        }
        cursor = whole.end();
    }

    if cursor < text.len() {
        runs.push(Run::plain(&text[cursor..]));
    }

    if runs.is_empty() {
        runs.push(Run::plain(""));
    }

    runs
}

/// Concatenate run text, dropping emphasis.
pub fn strip_markdown(text: &str) -> String {
    parse_markdown(text).into_iter().map(|run| run.text).collect()
}
