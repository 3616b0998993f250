// ABOUTME: Per-layout measurement cache for regular and bold text
// ABOUTME: Avoids re-measuring the same words while lines are being packed

use crate::fonts::{Font, TextSize};
use fxhash::FxHashMap;

/// Which of the two fonts of a text field a piece of text is set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weight {
    Regular,
    Bold,
}

impl Weight {
    pub fn for_emphasis(emphasized: bool) -> Self {
        if emphasized {
            Weight::Bold
        } else {
            Weight::Regular
        }
    }
}

/// The regular/bold pair used to set one text field.
#[derive(Debug, Clone)]
pub struct FontPair {
    pub regular: Font,
    pub bold: Font,
}

impl FontPair {
    pub fn new(regular: Font, bold: Font) -> Self {
        Self { regular, bold }
    }

    /// Use the same face for plain and emphasized text.
    pub fn single(font: Font) -> Self {
        Self {
            regular: font.clone(),
            bold: font,
        }
    }

    pub fn get(&self, weight: Weight) -> &Font {
        match weight {
            Weight::Regular => &self.regular,
            Weight::Bold => &self.bold,
        }
    }
}

/// Measures text against a [`FontPair`], memoizing by (weight, text).
///
/// A cache lives for one layout call and is never shared between slides.
pub struct MetricsCache<'a> {
    fonts: &'a FontPair,
    sizes: FxHashMap<(Weight, String), TextSize>,
    misses: usize,
}

impl<'a> MetricsCache<'a> {
    pub fn new(fonts: &'a FontPair) -> Self {
        Self {
            fonts,
            sizes: FxHashMap::default(),
            misses: 0,
        }
    }

    pub fn measure(&mut self, text: &str, weight: Weight) -> TextSize {
        if let Some(size) = self.sizes.get(&(weight, text.to_string())) {
            return *size;
        }
        let size = self.fonts.get(weight).measure(text);
        self.misses += 1;
        self.sizes.insert((weight, text.to_string()), size);
        size
    }

    pub fn width(&mut self, text: &str, weight: Weight) -> f32 {
        self.measure(text, weight).width
    }

    pub fn space_width(&mut self, weight: Weight) -> f32 {
        self.width(" ", weight)
    }

    /// Number of measurements that actually reached the font backend.
    pub fn backend_calls(&self) -> usize {
        self.misses
    }
}
