// ABOUTME: Text layout engine that positions wrapped markdown text on a slide
// ABOUTME: Resolves anchors into line and group geometry and paints it onto a canvas

use crate::highlight::{Rect, draw_highlight};
use crate::markdown::parse_markdown;
use crate::metrics::{FontPair, MetricsCache, Weight};
use crate::wrap::{break_lines, line_width};
use image::{Rgba, RgbaImage};
use log::debug;

/// Default multiplier applied to the measured line height.
pub const DEFAULT_LINE_SPACING: f32 = 1.3;
/// Default multiplier for title fields, which sit tighter than body text.
pub const DEFAULT_TITLE_LINE_SPACING: f32 = 1.2;

/// Which of the style's two line-spacing factors a field uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSpacing {
    Body,
    Title,
}

/// How a text block's origin maps onto drawn glyphs.
///
/// Horizontally the origin is either the left edge of every line or the
/// centre of every line (each line centred on its own width). Vertically the
/// origin is either the top of the first line or the middle of the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    LeftTop,
    MiddleTop,
    LeftMiddle,
    MiddleMiddle,
}

impl Anchor {
    pub fn centers_horizontally(self) -> bool {
        matches!(self, Anchor::MiddleTop | Anchor::MiddleMiddle)
    }

    pub fn centers_vertically(self) -> bool {
        matches!(self, Anchor::LeftMiddle | Anchor::MiddleMiddle)
    }
}

/// Background drawn behind emphasized text.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightStyle {
    pub fill: Rgba<u8>,
    pub corner_radius: u32,
    pub padding_x: f32,
    pub padding_top: f32,
    pub padding_bottom: f32,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            fill: Rgba([255, 255, 0, 200]),
            corner_radius: 8,
            padding_x: 8.0,
            padding_top: 4.0,
            padding_bottom: 4.0,
        }
    }
}

/// Styling shared by every text field of a slide.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub color: Rgba<u8>,
    pub line_spacing: f32,
    pub title_line_spacing: f32,
    pub highlight: HighlightStyle,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Rgba([0, 0, 0, 255]),
            line_spacing: DEFAULT_LINE_SPACING,
            title_line_spacing: DEFAULT_TITLE_LINE_SPACING,
            highlight: HighlightStyle::default(),
        }
    }
}

impl TextStyle {
    pub fn with_line_spacing(mut self, line_spacing: f32) -> Self {
        self.line_spacing = line_spacing;
        self
    }

    pub fn with_title_line_spacing(mut self, title_line_spacing: f32) -> Self {
        self.title_line_spacing = title_line_spacing;
        self
    }

    /// This style with `line_spacing` set to the factor for `spacing`.
    pub fn for_spacing(&self, spacing: LineSpacing) -> Self {
        let mut style = self.clone();
        if spacing == LineSpacing::Title {
            style.line_spacing = self.title_line_spacing;
        }
        style
    }
}

/// Where a text block goes and how wide it may grow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub max_width: f32,
    pub anchor: Anchor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedGroup {
    pub text: String,
    pub emphasized: bool,
    /// Left edge of the glyphs.
    pub x: f32,
    /// Top of the font's ascent for this group.
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub highlight: Option<Rect>,
}

impl PositionedGroup {
    pub fn weight(&self) -> Weight {
        Weight::for_emphasis(self.emphasized)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedLine {
    pub top: f32,
    pub baseline: f32,
    pub x: f32,
    pub width: f32,
    pub groups: Vec<PositionedGroup>,
}

/// Resolved geometry of one text field.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<PositionedLine>,
    pub line_height: f32,
    pub total_height: f32,
}

/// Compute line and group geometry for markdown `text` without drawing it.
pub fn layout_text(
    text: &str,
    placement: Placement,
    fonts: &FontPair,
    style: &TextStyle,
) -> TextBlock {
    let runs = parse_markdown(text);
    let mut metrics = MetricsCache::new(fonts);
    let lines = break_lines(&runs, &mut metrics, placement.max_width);

    let line_height = metrics
        .measure("Aa", Weight::Regular)
        .height
        .max(metrics.measure("Aa", Weight::Bold).height)
        * style.line_spacing;
    let total_height = lines.len() as f32 * line_height;

    let start_y = if placement.anchor.centers_vertically() {
        placement.y - total_height / 2.0
    } else {
        placement.y
    };
    let ascent = fonts.regular.ascent().max(fonts.bold.ascent());

    let mut positioned = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        let top = start_y + index as f32 * line_height;
        let baseline = top + ascent;
        let width = line_width(line, &mut metrics);
        let start_x = if placement.anchor.centers_horizontally() {
            placement.x - width / 2.0
        } else {
            placement.x
        };

        let mut groups = Vec::with_capacity(line.len());
        let mut cursor = start_x;
        for (group_index, group) in line.iter().enumerate() {
            let weight = group.weight();
            if group_index > 0 {
                cursor += metrics.space_width(weight);
            }
            let size = metrics.measure(&group.text, weight);
            let group_top = baseline - fonts.get(weight).ascent();
            let highlight = group.emphasized.then(|| {
                let pad = &style.highlight;
                Rect::new(
                    (cursor - pad.padding_x) as i64,
                    (group_top - pad.padding_top) as i64,
                    (cursor + size.width + pad.padding_x) as i64,
                    (group_top + size.height + pad.padding_bottom) as i64,
                )
            });

            groups.push(PositionedGroup {
                text: group.text.clone(),
                emphasized: group.emphasized,
                x: cursor,
                top: group_top,
                width: size.width,
                height: size.height,
                highlight,
            });
            cursor += size.width;
        }

        positioned.push(PositionedLine {
            top,
            baseline,
            x: start_x,
            width,
            groups,
        });
    }

    debug!(
        "Laid out {} line(s), line height {:.1}, {} measurement(s)",
        positioned.len(),
        line_height,
        metrics.backend_calls()
    );

    TextBlock {
        lines: positioned,
        line_height,
        total_height,
    }
}

/// Paint a laid-out block: each group's highlight first, then its glyphs.
pub fn paint_block(canvas: &mut RgbaImage, block: &TextBlock, fonts: &FontPair, style: &TextStyle) {
    for line in &block.lines {
        for group in &line.groups {
            if let Some(rect) = group.highlight {
                draw_highlight(
                    canvas,
                    rect,
                    style.highlight.fill,
                    style.highlight.corner_radius,
                );
            }
            fonts
                .get(group.weight())
                .draw(canvas, group.x, group.top, &group.text, style.color);
        }
    }
}

/// Lay out and draw markdown text, returning the block's total height so
/// callers can stack further content below it.
pub fn render_text(
    canvas: &mut RgbaImage,
    text: &str,
    placement: Placement,
    fonts: &FontPair,
    style: &TextStyle,
) -> f32 {
    let block = layout_text(text, placement, fonts, style);
    paint_block(canvas, &block, fonts, style);
    block.total_height
}
