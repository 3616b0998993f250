// ABOUTME: Field geometry for each slide template
// ABOUTME: Describes where text and emoji go as data consumed by the slide composer

use crate::layout::{Anchor, LineSpacing};
use crate::slides::TemplateKind;

/// A named slot on a slide that content is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Term,
    Definition,
    Emoji,
    LeftEmoji,
    LeftContent,
    RightEmoji,
    RightContent,
    StepNumber(usize),
    StepTitle(usize),
    StepContent(usize),
}

/// A coordinate relative to a canvas dimension: `frac * dimension + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub frac: f32,
    pub offset: f32,
}

impl Coord {
    pub const fn px(offset: f32) -> Self {
        Self { frac: 0.0, offset }
    }

    pub const fn frac(frac: f32) -> Self {
        Self { frac, offset: 0.0 }
    }

    pub const fn frac_plus(frac: f32, offset: f32) -> Self {
        Self { frac, offset }
    }

    pub fn resolve(&self, dimension: u32) -> f32 {
        self.frac * dimension as f32 + self.offset
    }
}

/// Which configured font file a field uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFile {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceSpec {
    pub file: FontFile,
    pub size: f32,
}

impl FaceSpec {
    pub const fn regular(size: f32) -> Self {
        Self {
            file: FontFile::Regular,
            size,
        }
    }

    pub const fn bold(size: f32) -> Self {
        Self {
            file: FontFile::Bold,
            size,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextFieldSpec {
    pub field: Field,
    pub x: Coord,
    pub y: Coord,
    pub max_width: Coord,
    /// Face for plain runs.
    pub regular: FaceSpec,
    /// Face for emphasized runs.
    pub bold: FaceSpec,
    pub anchor: Anchor,
    pub spacing: LineSpacing,
    /// Push the field down so it starts at least this far below the
    /// previous text field's last line.
    pub flow_gap: Option<f32>,
}

impl TextFieldSpec {
    fn new(field: Field, x: Coord, y: Coord, max_width: Coord, face: FaceSpec, anchor: Anchor) -> Self {
        Self {
            field,
            x,
            y,
            max_width,
            regular: face,
            bold: FaceSpec::bold(face.size),
            anchor,
            spacing: LineSpacing::Body,
            flow_gap: None,
        }
    }

    fn title_spacing(mut self) -> Self {
        self.spacing = LineSpacing::Title;
        self
    }

    fn flow(mut self, gap: f32) -> Self {
        self.flow_gap = Some(gap);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmojiFieldSpec {
    pub field: Field,
    pub x: Coord,
    pub y: Coord,
    pub size: u32,
}

/// Everything drawn on top of a template image.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TemplateLayout {
    pub text: Vec<TextFieldSpec>,
    pub emoji: Vec<EmojiFieldSpec>,
}

fn title_layout(spec: TextFieldSpec) -> TemplateLayout {
    TemplateLayout {
        text: vec![spec.title_spacing()],
        emoji: Vec::new(),
    }
}

fn steps_layout(step_count: usize) -> TemplateLayout {
    let n = step_count.max(1) as f32;
    let mut text = vec![TextFieldSpec::new(
        Field::Title,
        Coord::frac(0.5),
        Coord::px(150.0),
        Coord::frac_plus(1.0, -400.0),
        FaceSpec::bold(120.0),
        Anchor::MiddleTop,
    )
    .title_spacing()];

    // n equal columns between x = 200 and x = W - 200
    for i in 0..step_count {
        let start = i as f32 / n;
        let center = (i as f32 + 0.5) / n;
        let column_width = Coord::frac_plus(1.0 / n, -400.0 / n - 80.0);
        let left = Coord::frac_plus(start, 200.0 - 400.0 * start + 40.0);

        text.push(TextFieldSpec::new(
            Field::StepNumber(i),
            Coord::frac_plus(center, 200.0 - 400.0 * center),
            Coord::px(420.0),
            column_width,
            FaceSpec::bold(90.0),
            Anchor::MiddleTop,
        ));
        text.push(TextFieldSpec::new(
            Field::StepTitle(i),
            left,
            Coord::px(560.0),
            column_width,
            FaceSpec::bold(70.0),
            Anchor::LeftTop,
        ));
        text.push(
            TextFieldSpec::new(
                Field::StepContent(i),
                left,
                Coord::px(700.0),
                column_width,
                FaceSpec::regular(55.0),
                Anchor::LeftTop,
            )
            .flow(30.0),
        );
    }

    TemplateLayout {
        text,
        emoji: Vec::new(),
    }
}

/// Field layout for a template, `None` for templates without one.
///
/// `step_count` only matters for the steps template, which splits the slide
/// into one column per step.
pub fn layout_for(kind: &TemplateKind, step_count: usize) -> Option<TemplateLayout> {
    let layout = match kind {
        TemplateKind::Opening => title_layout(TextFieldSpec::new(
            Field::Title,
            Coord::frac(0.5),
            Coord::px(450.0),
            Coord::px(2000.0),
            FaceSpec::bold(150.0),
            Anchor::MiddleMiddle,
        )),
        TemplateKind::Chapter => title_layout(TextFieldSpec::new(
            Field::Title,
            Coord::frac(0.5 - 1.0 / 6.0),
            Coord::frac_plus(0.5, 50.0),
            Coord::px(1500.0),
            FaceSpec::bold(180.0),
            Anchor::LeftMiddle,
        )),
        TemplateKind::Quote => title_layout(TextFieldSpec::new(
            Field::Title,
            Coord::frac(0.25),
            Coord::px(390.0),
            Coord::px(1500.0),
            FaceSpec::regular(120.0),
            Anchor::LeftTop,
        )),
        TemplateKind::Question => title_layout(TextFieldSpec::new(
            Field::Title,
            Coord::frac(0.5),
            Coord::px(450.0),
            Coord::px(2000.0),
            FaceSpec::bold(150.0),
            Anchor::MiddleTop,
        )),
        TemplateKind::Definition => TemplateLayout {
            text: vec![
                TextFieldSpec::new(
                    Field::Term,
                    Coord::px(250.0),
                    Coord::px(300.0),
                    Coord::px(1600.0),
                    FaceSpec::bold(100.0),
                    Anchor::LeftTop,
                )
                .title_spacing(),
                TextFieldSpec::new(
                    Field::Definition,
                    Coord::px(250.0),
                    Coord::px(500.0),
                    Coord::px(1400.0),
                    FaceSpec::regular(60.0),
                    Anchor::LeftTop,
                )
                .flow(40.0),
            ],
            emoji: vec![EmojiFieldSpec {
                field: Field::Emoji,
                x: Coord::px(1900.0),
                y: Coord::frac_plus(0.5, -300.0),
                size: 300,
            }],
        },
        TemplateKind::SideBySide => TemplateLayout {
            text: vec![
                TextFieldSpec::new(
                    Field::LeftContent,
                    Coord::px(200.0),
                    Coord::px(800.0),
                    Coord::px(950.0),
                    FaceSpec::regular(70.0),
                    Anchor::LeftTop,
                ),
                TextFieldSpec::new(
                    Field::RightContent,
                    Coord::px(1400.0),
                    Coord::px(800.0),
                    Coord::px(950.0),
                    FaceSpec::regular(70.0),
                    Anchor::LeftTop,
                ),
            ],
            emoji: vec![
                EmojiFieldSpec {
                    field: Field::LeftEmoji,
                    x: Coord::px(200.0),
                    y: Coord::px(500.0),
                    size: 200,
                },
                EmojiFieldSpec {
                    field: Field::RightEmoji,
                    x: Coord::px(1400.0),
                    y: Coord::px(500.0),
                    size: 200,
                },
            ],
        },
        TemplateKind::Steps => steps_layout(step_count),
        TemplateKind::Blank => TemplateLayout::default(),
        TemplateKind::Custom(_) => return None,
    };
    Some(layout)
}
