// ABOUTME: Slide deck input model parsed from JSON
// ABOUTME: Validates per-template data into typed slide content

use crate::emoji::DEFAULT_EMOJI;
use crate::errors::{Result, SlideError};
use crate::templates::Field;
use serde::Deserialize;
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;

/// The template a slide is drawn on, derived from its template file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateKind {
    Opening,
    Chapter,
    Definition,
    Quote,
    Question,
    SideBySide,
    Steps,
    Blank,
    /// A template image without a field layout; only the background is drawn.
    Custom(String),
}

impl TemplateKind {
    /// Resolve `opening`, `opening.png`, `templates/opening.png`, ...
    pub fn from_template_name(name: &str) -> Self {
        let stem = Path::new(name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        match stem.as_str() {
            "opening" => TemplateKind::Opening,
            "chapter" => TemplateKind::Chapter,
            "definition" => TemplateKind::Definition,
            "quote" => TemplateKind::Quote,
            "question" => TemplateKind::Question,
            "side_by_side" => TemplateKind::SideBySide,
            "steps" => TemplateKind::Steps,
            "blank" => TemplateKind::Blank,
            _ => TemplateKind::Custom(stem),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TemplateKind::Opening => "opening",
            TemplateKind::Chapter => "chapter",
            TemplateKind::Definition => "definition",
            TemplateKind::Quote => "quote",
            TemplateKind::Question => "question",
            TemplateKind::SideBySide => "side_by_side",
            TemplateKind::Steps => "steps",
            TemplateKind::Blank => "blank",
            TemplateKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn default_emoji() -> String {
    DEFAULT_EMOJI.to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Definition {
    pub term: String,
    pub definition: String,
    #[serde(default = "default_emoji")]
    pub emoji: String,
}

/// One side of a side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Column {
    pub content: String,
    #[serde(default = "default_emoji")]
    pub emoji: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    pub title: String,
    pub content: String,
}

#[derive(Deserialize)]
struct TitleData {
    title: String,
}

#[derive(Deserialize)]
struct SideBySideData {
    left: Column,
    right: Column,
}

#[derive(Deserialize)]
struct StepsData {
    #[serde(default)]
    title: Option<String>,
    steps: Vec<Step>,
}

/// Validated content of a slide, one variant per template kind.
#[derive(Debug, Clone, PartialEq)]
pub enum SlideContent {
    Title(String),
    Definition(Definition),
    SideBySide { left: Column, right: Column },
    Steps { heading: Option<String>, steps: Vec<Step> },
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub template: TemplateKind,
    pub content: SlideContent,
}

/// A slide as written in the deck file, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSlide {
    pub template: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Slide {
    pub fn title(template: TemplateKind, title: impl Into<String>) -> Self {
        Self {
            template,
            content: SlideContent::Title(title.into()),
        }
    }

    /// Validate raw slide data against its template kind.
    /// `index` is the 1-based position of the slide in its deck.
    pub fn from_raw(index: usize, raw: RawSlide) -> Result<Self> {
        let template = TemplateKind::from_template_name(&raw.template);
        let invalid = |e: serde_json::Error| SlideError::InvalidSlide {
            index,
            message: format!("invalid data for '{}' template: {}", template, e),
        };

        let content = match template {
            TemplateKind::Opening
            | TemplateKind::Chapter
            | TemplateKind::Quote
            | TemplateKind::Question => {
                let data: TitleData = serde_json::from_value(raw.data).map_err(invalid)?;
                SlideContent::Title(data.title)
            }
            TemplateKind::Definition => {
                SlideContent::Definition(serde_json::from_value(raw.data).map_err(invalid)?)
            }
            TemplateKind::SideBySide => {
                let data: SideBySideData = serde_json::from_value(raw.data).map_err(invalid)?;
                SlideContent::SideBySide {
                    left: data.left,
                    right: data.right,
                }
            }
            TemplateKind::Steps => {
                let data: StepsData = serde_json::from_value(raw.data).map_err(invalid)?;
                if data.steps.is_empty() {
                    return Err(SlideError::InvalidSlide {
                        index,
                        message: "'steps' template needs at least one step".to_string(),
                    });
                }
                SlideContent::Steps {
                    heading: data.title,
                    steps: data.steps,
                }
            }
            TemplateKind::Blank | TemplateKind::Custom(_) => SlideContent::Blank,
        };

        Ok(Self { template, content })
    }

    /// Text shown in a layout field, `None` when this slide has no such field.
    pub fn field_text(&self, field: Field) -> Option<Cow<'_, str>> {
        let text = match (&self.content, field) {
            (SlideContent::Title(title), Field::Title) => title.as_str(),
            (SlideContent::Definition(def), Field::Term) => def.term.as_str(),
            (SlideContent::Definition(def), Field::Definition) => def.definition.as_str(),
            (SlideContent::Definition(def), Field::Emoji) => def.emoji.as_str(),
            (SlideContent::SideBySide { left, .. }, Field::LeftContent) => left.content.as_str(),
            (SlideContent::SideBySide { left, .. }, Field::LeftEmoji) => left.emoji.as_str(),
            (SlideContent::SideBySide { right, .. }, Field::RightContent) => right.content.as_str(),
            (SlideContent::SideBySide { right, .. }, Field::RightEmoji) => right.emoji.as_str(),
            (SlideContent::Steps { heading, .. }, Field::Title) => heading.as_deref()?,
            (SlideContent::Steps { steps, .. }, Field::StepNumber(i)) => {
                return (i < steps.len()).then(|| Cow::Owned((i + 1).to_string()));
            }
            (SlideContent::Steps { steps, .. }, Field::StepTitle(i)) => steps.get(i)?.title.as_str(),
            (SlideContent::Steps { steps, .. }, Field::StepContent(i)) => {
                steps.get(i)?.content.as_str()
            }
            _ => return None,
        };
        Some(Cow::Borrowed(text))
    }

    pub fn step_count(&self) -> usize {
        match &self.content {
            SlideContent::Steps { steps, .. } => steps.len(),
            _ => 0,
        }
    }
}

/// Parse a deck: a JSON array of `{ "template": ..., "data": {...} }` objects.
///
/// The outer `Result` fails only when the document is not an array; each
/// slide is validated separately so one bad slide does not sink the deck.
pub fn parse_deck(json: &str) -> Result<Vec<Result<Slide>>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    Ok(values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let index = i + 1;
            let raw: RawSlide =
                serde_json::from_value(value).map_err(|e| SlideError::InvalidSlide {
                    index,
                    message: e.to_string(),
                })?;
            Slide::from_raw(index, raw)
        })
        .collect())
}

/// Read and parse a deck file.
pub fn load_deck(path: &Path) -> Result<Vec<Result<Slide>>> {
    if !path.exists() {
        return Err(SlideError::PathNotFoundError(path.to_path_buf()));
    }
    let json = fs::read_to_string(path)?;
    parse_deck(&json)
}
