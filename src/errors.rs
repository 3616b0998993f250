// ABOUTME: Error types for the slidecraft application
// ABOUTME: Provides structured error handling for each stage of slide rendering

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlideError {
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid slide deck JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Font error: {0}")]
    FontError(String),

    #[error("Template image not found: {0}")]
    TemplateNotFound(PathBuf),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Slide {index}: {message}")]
    InvalidSlide { index: usize, message: String },

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Watch error: {0}")]
    WatchError(String),

    #[error("Unknown error: {0}")]
    UnknownError(String),
}

// Implement conversion from anyhow::Error to our SlideError
impl From<anyhow::Error> for SlideError {
    fn from(err: anyhow::Error) -> Self {
        SlideError::UnknownError(err.to_string())
    }
}

// Filesystem watcher failures only ever surface from watch mode
impl From<notify::Error> for SlideError {
    fn from(err: notify::Error) -> Self {
        SlideError::WatchError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SlideError>;
