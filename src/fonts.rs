// ABOUTME: Font loading, text measurement and glyph painting
// ABOUTME: Wraps fontdue faces and provides a built-in fallback face

use crate::errors::{Result, SlideError};
use crate::highlight::blend_pixel;
use fxhash::FxHashMap;
use image::{Rgba, RgbaImage};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Advance of every glyph in the fallback face, relative to the pixel size.
const FALLBACK_ADVANCE: f32 = 0.5;
/// Ascent of the fallback face, relative to the pixel size.
const FALLBACK_ASCENT: f32 = 0.8;

/// Width and height of a measured piece of text, in pixels.
///
/// The height is measured from the top of the font's ascent to the lowest
/// inked pixel, so "Aa" gives roughly the ascent of the face.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextSize {
    pub width: f32,
    pub height: f32,
}

#[derive(Clone)]
enum Face {
    Outline(Arc<fontdue::Font>),
    Fallback,
}

/// A font face at a fixed pixel size.
#[derive(Clone)]
pub struct Font {
    name: String,
    face: Face,
    size: f32,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("fallback", &self.is_fallback())
            .finish()
    }
}

impl Font {
    /// The built-in face used when a font file cannot be loaded.
    ///
    /// Every character advances by half the pixel size and is drawn as an
    /// outlined box, so metrics are predictable but do not match any real face.
    pub fn fallback(size: f32) -> Self {
        Self {
            name: "builtin".to_string(),
            face: Face::Fallback,
            size,
        }
    }

    /// Parse a TrueType/OpenType font from raw bytes.
    pub fn from_bytes(name: &str, bytes: &[u8], size: f32) -> Result<Self> {
        let parsed = parse_face(name, bytes)?;
        Ok(Self {
            name: name.to_string(),
            face: Face::Outline(Arc::new(parsed)),
            size,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.face, Face::Fallback)
    }

    /// Distance from the top of a line to the baseline.
    pub fn ascent(&self) -> f32 {
        match &self.face {
            Face::Outline(font) => font
                .horizontal_line_metrics(self.size)
                .map(|metrics| metrics.ascent)
                .unwrap_or(self.size * FALLBACK_ASCENT),
            Face::Fallback => self.size * FALLBACK_ASCENT,
        }
    }

    /// Measure a piece of text as it would be drawn on a single line.
    pub fn measure(&self, text: &str) -> TextSize {
        match &self.face {
            Face::Outline(font) => {
                let ascent = self.ascent();
                let mut width = 0.0;
                let mut height: f32 = 0.0;
                let mut previous: Option<char> = None;

                for ch in text.chars() {
                    if let Some(prev) = previous {
                        width += font.horizontal_kern(prev, ch, self.size).unwrap_or(0.0);
                    }
                    let metrics = font.metrics(ch, self.size);
                    width += metrics.advance_width;
                    if metrics.height > 0 {
                        height = height.max(ascent - metrics.ymin as f32);
                    }
                    previous = Some(ch);
                }

                TextSize { width, height }
            }
            Face::Fallback => {
                let count = text.chars().count() as f32;
                let height = if text.trim().is_empty() {
                    0.0
                } else {
                    self.size * FALLBACK_ASCENT
                };
                TextSize {
                    width: count * self.size * FALLBACK_ADVANCE,
                    height,
                }
            }
        }
    }

    /// Paint `text` with its line top at `top` and its left edge at `x`.
    pub fn draw(&self, canvas: &mut RgbaImage, x: f32, top: f32, text: &str, color: Rgba<u8>) {
        let baseline = top + self.ascent();
        match &self.face {
            Face::Outline(font) => {
                let mut pen = x;
                let mut previous: Option<char> = None;

                for ch in text.chars() {
                    if let Some(prev) = previous {
                        pen += font.horizontal_kern(prev, ch, self.size).unwrap_or(0.0);
                    }
                    let (metrics, coverage) = font.rasterize(ch, self.size);
                    let origin_x = (pen + metrics.xmin as f32).round() as i64;
                    let origin_y =
                        (baseline - metrics.ymin as f32 - metrics.height as f32).round() as i64;

                    for row in 0..metrics.height {
                        for col in 0..metrics.width {
                            let alpha = coverage[row * metrics.width + col];
                            if alpha == 0 {
                                continue;
                            }
                            blend_pixel(
                                canvas,
                                origin_x + col as i64,
                                origin_y + row as i64,
                                color,
                                alpha,
                            );
                        }
                    }

                    pen += metrics.advance_width;
                    previous = Some(ch);
                }
            }
            Face::Fallback => {
                let advance = self.size * FALLBACK_ADVANCE;
                let box_top = top.round() as i64;
                let box_bottom = (baseline.round() as i64 - 1).max(box_top);
                let mut pen = x;

                for ch in text.chars() {
                    if !ch.is_whitespace() {
                        let left = pen.round() as i64 + 1;
                        let right = ((pen + advance).round() as i64 - 2).max(left);
                        draw_box_outline(canvas, left, box_top, right, box_bottom, color);
                    }
                    pen += advance;
                }
            }
        }
    }
}

fn draw_box_outline(
    canvas: &mut RgbaImage,
    left: i64,
    top: i64,
    right: i64,
    bottom: i64,
    color: Rgba<u8>,
) {
    for x in left..=right {
        blend_pixel(canvas, x, top, color, 255);
        blend_pixel(canvas, x, bottom, color, 255);
    }
    for y in top..=bottom {
        blend_pixel(canvas, left, y, color, 255);
        blend_pixel(canvas, right, y, color, 255);
    }
}

fn parse_face(name: &str, bytes: &[u8]) -> Result<fontdue::Font> {
    fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
        .map_err(|e| SlideError::FontError(format!("Failed to parse font {}: {}", name, e)))
}

/// Loads fonts by file name from a directory and caches the parsed faces.
///
/// A face is parsed once and shared between every size requested from it.
/// Files that cannot be read or parsed are remembered as missing so the
/// fallback warning is only logged once per name.
pub struct FontLibrary {
    font_dir: PathBuf,
    faces: FxHashMap<String, Option<Arc<fontdue::Font>>>,
    reads: usize,
}

impl FontLibrary {
    pub fn new(font_dir: &Path) -> Self {
        Self {
            font_dir: font_dir.to_path_buf(),
            faces: FxHashMap::default(),
            reads: 0,
        }
    }

    /// Number of times a font file was read from disk.
    pub fn read_attempts(&self) -> usize {
        self.reads
    }

    /// Load `name` at `size` pixels, substituting the fallback face on failure.
    pub fn load(&mut self, name: &str, size: f32) -> Font {
        let face = match self.faces.get(name) {
            Some(cached) => cached.clone(),
            None => {
                let loaded = match self.read_face(name) {
                    Ok(face) => {
                        debug!("Loaded font {:?}", self.font_dir.join(name));
                        Some(Arc::new(face))
                    }
                    Err(e) => {
                        warn!("Font '{}' unavailable ({}), using the built-in font", name, e);
                        None
                    }
                };
                self.faces.insert(name.to_string(), loaded.clone());
                loaded
            }
        };

        match face {
            Some(face) => Font {
                name: name.to_string(),
                face: Face::Outline(face),
                size,
            },
            None => Font::fallback(size),
        }
    }

    fn read_face(&mut self, name: &str) -> Result<fontdue::Font> {
        self.reads += 1;
        let path = self.font_dir.join(name);
        if !path.is_file() {
            return Err(SlideError::PathNotFoundError(path));
        }
        let bytes = fs::read(&path)?;
        parse_face(name, &bytes)
    }
}
