// ABOUTME: Configuration module for the slidecraft application
// ABOUTME: Provides configuration settings and environment variable handling

use crate::compose::{ComposeConfig, NamingScheme};
use crate::errors::{Result, SlideError};
use crate::layout::{DEFAULT_LINE_SPACING, DEFAULT_TITLE_LINE_SPACING, TextStyle};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_REGULAR_FONT: &str = "NotoSans-Regular.ttf";
pub const DEFAULT_BOLD_FONT: &str = "NotoSans-Bold.ttf";

/// Global configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub template_dir: PathBuf,
    pub font_dir: PathBuf,
    pub emoji_dir: PathBuf,
    pub output_dir: PathBuf,
    pub hue: Option<u16>,
    pub naming: NamingScheme,
    pub line_spacing: f32,
    pub title_line_spacing: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("templates"),
            font_dir: PathBuf::from("fonts"),
            emoji_dir: PathBuf::from("emojis"),
            output_dir: PathBuf::from("output"),
            hue: None,
            naming: NamingScheme::Indexed,
            line_spacing: DEFAULT_LINE_SPACING,
            title_line_spacing: DEFAULT_TITLE_LINE_SPACING,
        }
    }
}

/// Parse a hue in degrees, rejecting values outside 0..=360.
pub fn parse_hue(value: &str) -> Result<u16> {
    match value.trim().parse::<u16>() {
        Ok(hue) if hue <= 360 => Ok(hue),
        _ => Err(SlideError::ConfigError(format!(
            "Hue must be an integer between 0 and 360, got '{}'",
            value
        ))),
    }
}

/// Parse a positive line-spacing factor.
pub fn parse_spacing(value: &str) -> Result<f32> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| SlideError::ConfigError(format!("Invalid line spacing: '{}'", value)))
}

fn spacing_from_env(key: &str, default: f32) -> Result<f32> {
    match env::var(key) {
        Ok(value) => parse_spacing(&value)
            .map_err(|_| SlideError::ConfigError(format!("Invalid {}: '{}'", key, value))),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Unset variables keep their defaults; malformed values are reported
    /// rather than silently ignored.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let dir = |key: &str, default: PathBuf| env::var(key).map(PathBuf::from).unwrap_or(default);

        let hue = env::var("SLIDE_HUE").ok().map(|s| parse_hue(&s)).transpose()?;
        let naming = match env::var("SLIDE_NAMING") {
            Ok(s) => s.parse::<NamingScheme>()?,
            Err(_) => defaults.naming,
        };
        let line_spacing = spacing_from_env("LINE_SPACING", defaults.line_spacing)?;
        let title_line_spacing =
            spacing_from_env("TITLE_LINE_SPACING", defaults.title_line_spacing)?;

        Ok(Self {
            template_dir: dir("TEMPLATE_DIR", defaults.template_dir),
            font_dir: dir("FONT_DIR", defaults.font_dir),
            emoji_dir: dir("EMOJI_DIR", defaults.emoji_dir),
            output_dir: dir("OUTPUT_DIR", defaults.output_dir),
            hue,
            naming,
            line_spacing,
            title_line_spacing,
        })
    }

    /// Get a compose configuration with overrides applied over this config
    pub fn get_compose_config(
        &self,
        template_dir: Option<PathBuf>,
        font_dir: Option<PathBuf>,
        emoji_dir: Option<PathBuf>,
        output_dir: Option<PathBuf>,
        hue: Option<u16>,
        naming: Option<NamingScheme>,
    ) -> ComposeConfig {
        ComposeConfig {
            template_dir: template_dir.unwrap_or_else(|| self.template_dir.clone()),
            font_dir: font_dir.unwrap_or_else(|| self.font_dir.clone()),
            emoji_dir: emoji_dir.unwrap_or_else(|| self.emoji_dir.clone()),
            output_dir: output_dir.unwrap_or_else(|| self.output_dir.clone()),
            hue: hue.or(self.hue),
            naming: naming.unwrap_or(self.naming),
            regular_font: DEFAULT_REGULAR_FONT.to_string(),
            bold_font: DEFAULT_BOLD_FONT.to_string(),
            style: TextStyle::default()
                .with_line_spacing(self.line_spacing)
                .with_title_line_spacing(self.title_line_spacing),
        }
    }
}
