// ABOUTME: Slide composer that turns validated slides into PNG files
// ABOUTME: Holds per-deck state: hue, font cache, output and chapter counters

use crate::background::{apply_background, random_hue};
use crate::emoji::paste_emoji;
use crate::errors::{Result, SlideError};
use crate::fonts::{Font, FontLibrary};
use crate::layout::{Placement, TextBlock, TextStyle, layout_text, paint_block};
use crate::metrics::FontPair;
use crate::slides::{Slide, TemplateKind};
use crate::templates::{FaceSpec, Field, FontFile, TemplateLayout, TextFieldSpec, layout_for};
use crate::utils;
use image::{DynamicImage, RgbaImage};
use log::{debug, error, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How rendered slides are named in the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingScheme {
    /// `{counter}_{template}.png`, counting slides rendered by this composer.
    Indexed,
    /// `{n}.png`, one past the highest number already in the directory.
    Sequential,
}

impl FromStr for NamingScheme {
    type Err = SlideError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "indexed" => Ok(NamingScheme::Indexed),
            "sequential" => Ok(NamingScheme::Sequential),
            other => Err(SlideError::ConfigError(format!(
                "Unknown naming scheme '{}', expected 'indexed' or 'sequential'",
                other
            ))),
        }
    }
}

impl fmt::Display for NamingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingScheme::Indexed => f.write_str("indexed"),
            NamingScheme::Sequential => f.write_str("sequential"),
        }
    }
}

/// Configuration for slide composition
#[derive(Debug, Clone)]
pub struct ComposeConfig {
    pub template_dir: PathBuf,
    pub font_dir: PathBuf,
    pub emoji_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Background hue for the whole deck; random when `None`.
    pub hue: Option<u16>,
    pub naming: NamingScheme,
    pub regular_font: String,
    pub bold_font: String,
    pub style: TextStyle,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        crate::config::Config::default().get_compose_config(None, None, None, None, None, None)
    }
}

/// Outcome of rendering a deck.
#[derive(Debug, Default)]
pub struct DeckReport {
    pub attempted: usize,
    pub rendered: usize,
    pub outputs: Vec<PathBuf>,
    /// 1-based slide index and the reason it was not rendered.
    pub failures: Vec<(usize, String)>,
}

impl DeckReport {
    pub fn is_complete(&self) -> bool {
        self.rendered == self.attempted
    }
}

/// A laid-out text field with the fonts and style it is painted with.
#[derive(Debug, Clone)]
pub struct PlacedField {
    pub field: Field,
    /// Resolved `y` the block was placed at, after flowing below earlier fields.
    pub origin_y: f32,
    pub block: TextBlock,
    pub fonts: FontPair,
    pub style: TextStyle,
}

impl PlacedField {
    /// Bottom edge of the last line, or the origin for an empty block.
    pub fn bottom(&self) -> f32 {
        self.block
            .lines
            .last()
            .map(|line| line.top + self.block.line_height)
            .unwrap_or(self.origin_y)
    }
}

/// Renders slides one after another, carrying the deck-wide state that the
/// output naming and chapter artwork depend on.
pub struct SlideComposer {
    config: ComposeConfig,
    hue: u16,
    fonts: FontLibrary,
    slide_counter: usize,
    chapter_count: usize,
}

impl SlideComposer {
    pub fn new(config: ComposeConfig) -> Self {
        let hue = config.hue.unwrap_or_else(random_hue);
        let fonts = FontLibrary::new(&config.font_dir);
        info!("Composer ready: hue {}, naming {}", hue, config.naming);
        Self {
            config,
            hue,
            fonts,
            slide_counter: 0,
            chapter_count: 0,
        }
    }

    pub fn hue(&self) -> u16 {
        self.hue
    }

    /// Template image for a slide. Each chapter slide takes the next
    /// `chapter_<k>.png` so consecutive chapters get distinct artwork.
    fn template_path(&mut self, template: &TemplateKind) -> PathBuf {
        match template {
            TemplateKind::Chapter => {
                self.chapter_count += 1;
                self.config
                    .template_dir
                    .join(format!("chapter_{}.png", self.chapter_count))
            }
            other => self.config.template_dir.join(format!("{}.png", other.name())),
        }
    }

    fn load_font(&mut self, face: FaceSpec) -> Font {
        let name = match face.file {
            FontFile::Regular => self.config.regular_font.clone(),
            FontFile::Bold => self.config.bold_font.clone(),
        };
        self.fonts.load(&name, face.size)
    }

    /// Build the finished slide image without writing it.
    pub fn compose(&mut self, slide: &Slide) -> Result<RgbaImage> {
        let template_path = self.template_path(&slide.template);
        if !template_path.is_file() {
            return Err(SlideError::TemplateNotFound(template_path));
        }
        let template = image::open(&template_path)?.to_rgba8();
        info!("Loaded template {:?}", template_path);

        let mut canvas = apply_background(&template, self.hue);

        match layout_for(&slide.template, slide.step_count()) {
            Some(layout) => self.draw_layout(&mut canvas, slide, &layout),
            None => warn!(
                "No field layout for template '{}', rendering background only",
                slide.template
            ),
        }

        Ok(canvas)
    }

    fn draw_layout(&mut self, canvas: &mut RgbaImage, slide: &Slide, layout: &TemplateLayout) {
        let (width, height) = canvas.dimensions();

        for spec in &layout.emoji {
            let Some(emoji) = slide.field_text(spec.field) else {
                continue;
            };
            let x = spec.x.resolve(width) as i64;
            let y = spec.y.resolve(height) as i64;
            paste_emoji(canvas, &emoji, x, y, spec.size, &self.config.emoji_dir);
        }

        for placed in self.layout_fields(slide, layout, width, height) {
            paint_block(canvas, &placed.block, &placed.fonts, &placed.style);
        }
    }

    /// Lay out every text field of a slide on a `width`×`height` canvas.
    ///
    /// Fields with a flow gap start no higher than that gap below the
    /// previous field's last line.
    pub fn layout_fields(
        &mut self,
        slide: &Slide,
        layout: &TemplateLayout,
        width: u32,
        height: u32,
    ) -> Vec<PlacedField> {
        let mut placed = Vec::with_capacity(layout.text.len());
        let mut previous_bottom: Option<f32> = None;

        for spec in &layout.text {
            let Some(text) = slide.field_text(spec.field) else {
                continue;
            };
            let field = self.layout_field(spec, &text, width, height, previous_bottom);
            previous_bottom = Some(field.bottom());
            placed.push(field);
        }
        placed
    }

    fn layout_field(
        &mut self,
        spec: &TextFieldSpec,
        text: &str,
        width: u32,
        height: u32,
        previous_bottom: Option<f32>,
    ) -> PlacedField {
        let fonts = FontPair::new(self.load_font(spec.regular), self.load_font(spec.bold));
        let style = self.config.style.for_spacing(spec.spacing);

        let mut y = spec.y.resolve(height);
        if let (Some(gap), Some(bottom)) = (spec.flow_gap, previous_bottom) {
            y = y.max(bottom + gap);
        }
        let placement = Placement {
            x: spec.x.resolve(width),
            y,
            max_width: spec.max_width.resolve(width),
            anchor: spec.anchor,
        };

        let block = layout_text(text, placement, &fonts, &style);
        debug!(
            "Field {:?}: {} line(s), height {:.1}",
            spec.field,
            block.lines.len(),
            block.total_height
        );

        PlacedField {
            field: spec.field,
            origin_y: y,
            block,
            fonts,
            style,
        }
    }

    /// Output path for the next slide; the indexed counter is not advanced here.
    fn output_path(&self, template: &TemplateKind) -> Result<PathBuf> {
        let dir = &self.config.output_dir;
        match self.config.naming {
            NamingScheme::Indexed => Ok(dir.join(format!(
                "{}_{}.png",
                self.slide_counter + 1,
                template.name()
            ))),
            NamingScheme::Sequential => utils::next_numbered_filename(dir),
        }
    }

    /// Compose a slide and save it as PNG, returning the written path.
    pub fn process_slide(&mut self, slide: &Slide) -> Result<PathBuf> {
        let canvas = self.compose(slide)?;

        utils::ensure_directory_exists(&self.config.output_dir)?;
        let output = self.output_path(&slide.template)?;
        DynamicImage::ImageRgba8(canvas).to_rgb8().save(&output)?;
        if self.config.naming == NamingScheme::Indexed {
            self.slide_counter += 1;
        }
        info!("Saved {:?}", output);
        Ok(output)
    }

    /// Render every slide of a deck, continuing past failed slides.
    pub fn render_deck(&mut self, slides: &[Result<Slide>]) -> DeckReport {
        let mut report = DeckReport {
            attempted: slides.len(),
            ..DeckReport::default()
        };

        for (i, entry) in slides.iter().enumerate() {
            let index = i + 1;
            info!("Processing slide {}/{}", index, slides.len());

            let result = match entry {
                Ok(slide) => self.process_slide(slide).map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };

            match result {
                Ok(path) => {
                    report.rendered += 1;
                    report.outputs.push(path);
                }
                Err(message) => {
                    error!("Slide {} skipped: {}", index, message);
                    report.failures.push((index, message));
                }
            }
        }

        info!(
            "Rendered {}/{} slide(s) into {:?}",
            report.rendered, report.attempted, self.config.output_dir
        );
        report
    }
}

/// Load a deck file and render it with a fresh composer.
pub fn render_deck_file(deck: &Path, config: ComposeConfig) -> Result<DeckReport> {
    utils::validate_file_exists(deck)?;
    let slides = crate::slides::load_deck(deck)?;
    let mut composer = SlideComposer::new(config);
    Ok(composer.render_deck(&slides))
}
