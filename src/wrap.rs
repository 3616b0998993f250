// ABOUTME: Greedy line breaking for markdown-aware slide text
// ABOUTME: Packs words into lines while keeping emphasized phrases together

use crate::fonts::Font;
use crate::markdown::Run;
use crate::metrics::{MetricsCache, Weight};

/// A word (or an emphasized phrase kept whole) placed on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordUnit {
    pub text: String,
    pub emphasized: bool,
}

/// Consecutive units on one line sharing the same emphasis, joined by spaces.
///
/// An emphasized group gets one highlight rectangle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunGroup {
    pub text: String,
    pub emphasized: bool,
}

impl RunGroup {
    pub fn weight(&self) -> Weight {
        Weight::for_emphasis(self.emphasized)
    }
}

pub type Line = Vec<RunGroup>;

struct LineBuilder<'c, 'f> {
    metrics: &'c mut MetricsCache<'f>,
    max_width: f32,
    current: Vec<WordUnit>,
    lines: Vec<Vec<WordUnit>>,
}

impl<'c, 'f> LineBuilder<'c, 'f> {
    fn new(metrics: &'c mut MetricsCache<'f>, max_width: f32) -> Self {
        Self {
            metrics,
            max_width,
            current: Vec::new(),
            lines: Vec::new(),
        }
    }

    // Width of the current line with `text` appended, measured the same way
    // the line is later positioned and painted.
    fn width_with(&mut self, text: &str, emphasized: bool) -> f32 {
        let mut candidate = self.current.clone();
        candidate.push(WordUnit {
            text: text.to_string(),
            emphasized,
        });
        line_width(&group_units(&candidate), self.metrics)
    }

    fn fits(&mut self, text: &str, emphasized: bool) -> bool {
        self.width_with(text, emphasized) <= self.max_width
    }

    fn push(&mut self, text: &str, emphasized: bool) {
        self.current.push(WordUnit {
            text: text.to_string(),
            emphasized,
        });
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
    }

    /// Place a single word, starting a new line when it does not fit.
    /// An empty line always accepts the word so an over-wide word gets its own line.
    fn place_word(&mut self, word: &str, emphasized: bool) {
        if !self.current.is_empty() && !self.fits(word, emphasized) {
            self.flush();
        }
        self.push(word, emphasized);
    }

    fn place_plain(&mut self, text: &str) {
        for word in text.split_whitespace() {
            self.place_word(word, false);
        }
    }

    fn place_emphasized(&mut self, text: &str) {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return;
        }
        let phrase = words.join(" ");

        if self.fits(&phrase, true) {
            self.push(&phrase, true);
            return;
        }

        self.flush();
        if self.metrics.width(&phrase, Weight::Bold) <= self.max_width {
            self.push(&phrase, true);
            return;
        }

        // Phrase is wider than a whole line: split it by word, and split any
        // word that is still too wide into the longest prefixes that fit.
        for word in words {
            if self.metrics.width(word, Weight::Bold) <= self.max_width {
                self.place_word(word, true);
            } else {
                for piece in split_to_width(self.metrics, word, Weight::Bold, self.max_width) {
                    self.place_word(&piece, true);
                }
            }
        }
    }

    fn finish(mut self) -> Vec<Vec<WordUnit>> {
        self.flush();
        self.lines
    }
}

/// Split a word into character runs no wider than `max_width`.
/// Each run holds at least one character.
fn split_to_width(
    metrics: &mut MetricsCache<'_>,
    word: &str,
    weight: Weight,
    max_width: f32,
) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();

    for ch in word.chars() {
        let mut candidate = piece.clone();
        candidate.push(ch);
        if !piece.is_empty() && metrics.width(&candidate, weight) > max_width {
            pieces.push(std::mem::take(&mut piece));
            piece.push(ch);
        } else {
            piece = candidate;
        }
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

/// Merge consecutive units sharing an emphasis flag.
pub fn group_units(units: &[WordUnit]) -> Line {
    let mut groups: Line = Vec::new();
    for unit in units {
        match groups.last_mut() {
            Some(group) if group.emphasized == unit.emphasized => {
                group.text.push(' ');
                group.text.push_str(&unit.text);
            }
            _ => groups.push(RunGroup {
                text: unit.text.clone(),
                emphasized: unit.emphasized,
            }),
        }
    }
    groups
}

/// Break runs into lines no wider than `max_width`, returning word units per line.
///
/// Plain runs break at any whitespace. An emphasized run is kept whole when it
/// fits on the current line, otherwise it moves to a fresh line; only a phrase
/// wider than an empty line is split. A single unit wider than `max_width`
/// sits alone on its line and overflows.
pub fn break_units(runs: &[Run], metrics: &mut MetricsCache<'_>, max_width: f32) -> Vec<Vec<WordUnit>> {
    let mut builder = LineBuilder::new(metrics, max_width);
    for run in runs {
        if run.emphasized {
            builder.place_emphasized(&run.text);
        } else {
            builder.place_plain(&run.text);
        }
    }
    builder.finish()
}

/// Break runs into lines of [`RunGroup`]s.
pub fn break_lines(runs: &[Run], metrics: &mut MetricsCache<'_>, max_width: f32) -> Vec<Line> {
    break_units(runs, metrics, max_width)
        .iter()
        .map(|units| group_units(units))
        .collect()
}

/// Pixel width of a line: group widths plus one space before every group but the first.
pub fn line_width(line: &[RunGroup], metrics: &mut MetricsCache<'_>) -> f32 {
    line.iter()
        .enumerate()
        .map(|(index, group)| {
            let width = metrics.width(&group.text, group.weight());
            if index == 0 {
                width
            } else {
                width + metrics.space_width(group.weight())
            }
        })
        .sum()
}

/// Wrap text without markdown handling into plain strings.
///
/// Each candidate line is measured as a whole string. A word wider than
/// `max_width` is placed on a line of its own.
pub fn wrap_plain(text: &str, font: &Font, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if font.measure(&candidate).width <= max_width {
            current = candidate;
        } else if current.is_empty() {
            lines.push(word.to_string());
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
