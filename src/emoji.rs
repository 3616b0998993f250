// ABOUTME: Emoji image lookup and placement
// ABOUTME: Maps emoji strings to code-point file names and pastes them onto slides

use image::{RgbaImage, imageops};
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Emoji placed when a slide does not name one.
pub const DEFAULT_EMOJI: &str = "😀";

/// File name of an emoji image: hyphen-joined lowercase hex code points.
///
/// `"😀"` maps to `"1f600.png"`, `"❤️"` to `"2764-fe0f.png"`.
pub fn emoji_filename(emoji: &str) -> String {
    let codepoints: Vec<String> = emoji.chars().map(|c| format!("{:x}", c as u32)).collect();
    format!("{}.png", codepoints.join("-"))
}

pub fn emoji_path(emoji_dir: &Path, emoji: &str) -> PathBuf {
    emoji_dir.join(emoji_filename(emoji))
}

/// Paste `emoji` as a `size`×`size` square with its top-left corner at (x, y).
///
/// A missing or unreadable image is skipped with a warning; returns whether
/// the emoji was placed.
pub fn paste_emoji(
    canvas: &mut RgbaImage,
    emoji: &str,
    x: i64,
    y: i64,
    size: u32,
    emoji_dir: &Path,
) -> bool {
    let path = emoji_path(emoji_dir, emoji);
    if !path.is_file() {
        warn!("Emoji '{}' not found ({:?}), skipping", emoji, path);
        return false;
    }

    let image = match image::open(&path) {
        Ok(image) => image.to_rgba8(),
        Err(e) => {
            warn!("Failed to load emoji {:?}: {}, skipping", path, e);
            return false;
        }
    };

    let resized = imageops::resize(&image, size, size, imageops::FilterType::Lanczos3);
    imageops::overlay(canvas, &resized, x, y);
    debug!("Placed emoji '{}' at ({}, {}) size {}", emoji, x, y, size);
    true
}
