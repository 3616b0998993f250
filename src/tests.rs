use super::*;
use crate::compose::NamingScheme;
use crate::highlight::composite_over;
use crate::markdown::strip_markdown;
use crate::metrics::Weight;
use crate::slides::{Definition, Step};
use crate::templates::{Coord, Field, layout_for};
use image::{Rgb, Rgba, RgbaImage};
use tempfile::TempDir;

// Fallback face at 20px: every character is 10px wide, ascent is 16px.
fn fallback_pair() -> FontPair {
    FontPair::new(Font::fallback(20.0), Font::fallback(20.0))
}

fn placement(x: f32, y: f32, max_width: f32, anchor: Anchor) -> Placement {
    Placement {
        x,
        y,
        max_width,
        anchor,
    }
}

fn line_texts(lines: &[Vec<RunGroup>]) -> Vec<Vec<(String, bool)>> {
    lines
        .iter()
        .map(|line| {
            line.iter()
                .map(|group| (group.text.clone(), group.emphasized))
                .collect()
        })
        .collect()
}

fn break_text(text: &str, max_width: f32) -> Vec<Vec<RunGroup>> {
    let fonts = fallback_pair();
    let mut metrics = MetricsCache::new(&fonts);
    break_lines(&parse_markdown(text), &mut metrics, max_width)
}

#[test]
fn test_parse_markdown_mixed_runs() {
    let runs = parse_markdown("Hello **World** foo");
    assert_eq!(
        runs,
        vec![Run::plain("Hello "), Run::emphasized("World"), Run::plain(" foo")]
    );
}

#[test]
fn test_parse_markdown_unmatched_marker_is_literal() {
    let runs = parse_markdown("price ** tax");
    assert_eq!(runs, vec![Run::plain("price ** tax")]);

    let runs = parse_markdown("**open **closed** tail");
    assert_eq!(
        runs,
        vec![Run::emphasized("open "), Run::plain("closed** tail")]
    );
}

#[test]
fn test_parse_markdown_adjacent_spans_stay_separate() {
    let runs = parse_markdown("**a****b**");
    assert_eq!(runs, vec![Run::emphasized("a"), Run::emphasized("b")]);
}

#[test]
fn test_parse_markdown_empty_input() {
    assert_eq!(parse_markdown(""), vec![Run::plain("")]);
    assert_eq!(parse_markdown("****"), vec![Run::plain("")]);
}

#[test]
fn test_parse_markdown_nested_markers_match_non_greedy() {
    let runs = parse_markdown("**a **b** c**");
    assert_eq!(
        runs,
        vec![Run::emphasized("a "), Run::plain("b"), Run::emphasized(" c")]
    );
}

#[test]
fn test_strip_markdown_removes_only_matched_pairs() {
    let cases = [
        ("plain text", "plain text"),
        ("Hello **World** foo", "Hello World foo"),
        ("**Vòng lặp for:** Use when **known,**", "Vòng lặp for: Use when known,"),
        ("a ** b", "a ** b"),
        ("**x** and **y", "x and **y"),
        ("", ""),
    ];
    for (input, expected) in cases {
        assert_eq!(strip_markdown(input), expected, "input: {:?}", input);
    }
}

#[test]
fn test_break_lines_single_line_scenario() {
    let lines = break_text("Hello **World** foo", 1000.0);
    assert_eq!(
        line_texts(&lines),
        vec![vec![
            ("Hello".to_string(), false),
            ("World".to_string(), true),
            ("foo".to_string(), false),
        ]]
    );
}

#[test]
fn test_break_lines_plain_greedy() {
    // one=30, two=30, three=50, space=10
    let lines = break_text("one two three", 100.0);
    assert_eq!(
        line_texts(&lines),
        vec![
            vec![("one two".to_string(), false)],
            vec![("three".to_string(), false)],
        ]
    );
}

#[test]
fn test_break_lines_respects_max_width() {
    let text = "The task is to build a CNN model to classify handwritten images into the digits";
    let fonts = fallback_pair();

    for max_width in (40..=400).step_by(15) {
        let max_width = max_width as f32;
        let mut metrics = MetricsCache::new(&fonts);
        let lines = break_lines(&parse_markdown(text), &mut metrics, max_width);
        assert!(!lines.is_empty());

        for line in &lines {
            let width = crate::wrap::line_width(line, &mut metrics);
            let single_unit = line.len() == 1 && !line[0].text.contains(' ');
            assert!(
                width <= max_width || single_unit,
                "line {:?} is {}px wide, max {}",
                line,
                width,
                max_width
            );
        }
    }
}

#[test]
fn test_break_lines_overwide_plain_word_gets_own_line() {
    let lines = break_text("a supercalifragilistic b", 60.0);
    assert_eq!(
        line_texts(&lines),
        vec![
            vec![("a".to_string(), false)],
            vec![("supercalifragilistic".to_string(), false)],
            vec![("b".to_string(), false)],
        ]
    );
}

#[test]
fn test_break_lines_keeps_emphasized_phrase_together() {
    // Word packing would give "aa bb" / "cc dd"; the phrase moves down whole.
    let lines = break_text("aa **bb cc** dd", 70.0);
    assert_eq!(
        line_texts(&lines),
        vec![
            vec![("aa".to_string(), false)],
            vec![("bb cc".to_string(), true)],
            vec![("dd".to_string(), false)],
        ]
    );
}

#[test]
fn test_break_lines_splits_phrase_wider_than_line() {
    let lines = break_text("**aaa bbb ccc**", 75.0);
    assert_eq!(
        line_texts(&lines),
        vec![
            vec![("aaa bbb".to_string(), true)],
            vec![("ccc".to_string(), true)],
        ]
    );
}

#[test]
fn test_break_lines_splits_single_overwide_emphasized_word() {
    let lines = break_text("**AAAAAAAAAA**", 45.0);
    assert_eq!(
        line_texts(&lines),
        vec![
            vec![("AAAA".to_string(), true)],
            vec![("AAAA".to_string(), true)],
            vec![("AA".to_string(), true)],
        ]
    );
}

#[test]
fn test_break_lines_empty_text_has_no_lines() {
    assert!(break_text("", 100.0).is_empty());
    assert!(break_text("   ", 100.0).is_empty());
}

#[test]
fn test_wrap_plain_matches_markdown_path() {
    let font = Font::fallback(20.0);
    let text = "Artificial Intelligence refers to the simulation of human intelligence";
    for max_width in [60.0, 80.0, 150.0, 333.0, 1000.0] {
        let plain = wrap_plain(text, &font, max_width);
        let markdown: Vec<String> = break_text(text, max_width)
            .into_iter()
            .map(|line| {
                line.into_iter()
                    .map(|group| group.text)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        assert_eq!(plain, markdown, "max width {}", max_width);
    }
}

#[test]
fn test_wrap_plain_measures_whole_candidate_lines() {
    let font = Font::fallback(20.0);
    assert_eq!(
        wrap_plain("a enormousword b c", &font, 60.0),
        vec!["a", "enormousword", "b c"]
    );
    assert!(wrap_plain("   ", &font, 60.0).is_empty());
}

#[test]
fn test_break_decisions_match_line_width() {
    let fonts = fallback_pair();
    let mut metrics = MetricsCache::new(&fonts);
    let runs = parse_markdown("Deep **neural networks** learn layered **features** from raw pixels and labels");
    let max_width = 200.0;
    let lines = wrap::break_units(&runs, &mut metrics, max_width);
    assert!(lines.len() > 1);

    for pair in lines.windows(2) {
        let width = wrap::line_width(&wrap::group_units(&pair[0]), &mut metrics);
        assert!(width <= max_width, "line {:?} is {}px", pair[0], width);

        // the first unit of the next line is exactly what did not fit
        let mut grown = pair[0].clone();
        grown.push(pair[1][0].clone());
        let grown_width = wrap::line_width(&wrap::group_units(&grown), &mut metrics);
        assert!(grown_width > max_width, "{:?} would have fit", pair[1][0]);
    }
}

#[test]
fn test_metrics_cache_measures_once() {
    let fonts = fallback_pair();
    let mut metrics = MetricsCache::new(&fonts);
    assert_eq!(metrics.width("word", Weight::Regular), 40.0);
    assert_eq!(metrics.width("word", Weight::Regular), 40.0);
    assert_eq!(metrics.backend_calls(), 1);
    metrics.width("word", Weight::Bold);
    assert_eq!(metrics.backend_calls(), 2);
}

#[test]
fn test_fallback_font_metrics() {
    let font = Font::fallback(20.0);
    assert!(font.is_fallback());
    assert_eq!(font.measure("Aa"), TextSize { width: 20.0, height: 16.0 });
    assert_eq!(font.measure(" ").height, 0.0);
    assert_eq!(font.ascent(), 16.0);
}

#[test]
fn test_font_library_falls_back_when_missing() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut library = FontLibrary::new(dir.path());
    let font = library.load("NotoSans-Bold.ttf", 42.0);
    assert!(font.is_fallback());
    assert_eq!(font.size(), 42.0);
}

#[test]
fn test_font_library_remembers_missing_fonts() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut library = FontLibrary::new(dir.path());

    for size in [20.0, 30.0, 40.0] {
        let font = library.load("Missing.ttf", size);
        assert!(font.is_fallback());
        assert_eq!(font.size(), size);
    }
    assert_eq!(library.read_attempts(), 1);

    library.load("Other.ttf", 20.0);
    assert_eq!(library.read_attempts(), 2);
}

#[test]
fn test_font_library_falls_back_on_garbage_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("broken.ttf"), b"not a font").expect("Failed to write font");
    let mut library = FontLibrary::new(dir.path());
    assert!(library.load("broken.ttf", 30.0).is_fallback());
}

#[test]
fn test_layout_highlight_rectangle_scenario() {
    let fonts = fallback_pair();
    let block = layout_text(
        "Hello **World** foo",
        placement(100.0, 200.0, 1000.0, Anchor::LeftTop),
        &fonts,
        &TextStyle::default(),
    );

    assert_eq!(block.lines.len(), 1);
    let groups = &block.lines[0].groups;
    assert_eq!(groups.len(), 3);
    assert!(groups[0].highlight.is_none());
    assert!(groups[2].highlight.is_none());

    let world = &groups[1];
    assert_eq!(world.text, "World");
    assert_eq!(world.x, 160.0);
    assert_eq!(world.highlight, Some(Rect::new(152, 196, 218, 220)));
    assert_eq!(groups[2].x, 220.0);
}

#[test]
fn test_layout_centered_line_start() {
    let fonts = fallback_pair();
    let text = "a".repeat(40);
    let block = layout_text(
        &text,
        placement(1000.0, 100.0, 2000.0, Anchor::MiddleTop),
        &fonts,
        &TextStyle::default(),
    );
    assert_eq!(block.lines[0].width, 400.0);
    assert_eq!(block.lines[0].x, 800.0);
    assert_eq!(block.lines[0].top, 100.0);
}

#[test]
fn test_layout_centers_each_line_independently() {
    let fonts = fallback_pair();
    let block = layout_text(
        "aaaaaaaa bb",
        placement(500.0, 0.0, 90.0, Anchor::MiddleTop),
        &fonts,
        &TextStyle::default(),
    );
    assert_eq!(block.lines.len(), 2);
    assert_eq!(block.lines[0].x, 460.0);
    assert_eq!(block.lines[1].x, 490.0);
}

#[test]
fn test_layout_vertical_centering_and_height() {
    let fonts = fallback_pair();
    let style = TextStyle::default();
    let block = layout_text(
        "aaaa bbbb",
        placement(0.0, 300.0, 50.0, Anchor::MiddleMiddle),
        &fonts,
        &style,
    );

    let line_height = 16.0 * style.line_spacing;
    assert_eq!(block.lines.len(), 2);
    assert!((block.line_height - line_height).abs() < 1e-4);
    assert!((block.total_height - 2.0 * line_height).abs() < 1e-4);
    assert!((block.lines[0].top - (300.0 - line_height)).abs() < 1e-4);
    assert!((block.lines[1].top - 300.0).abs() < 1e-4);
}

#[test]
fn test_layout_left_middle_anchor() {
    let fonts = fallback_pair();
    let style = TextStyle::default();
    let block = layout_text(
        "aaaa **bbbb**",
        placement(100.0, 300.0, 50.0, Anchor::LeftMiddle),
        &fonts,
        &style,
    );

    let line_height = 16.0 * style.line_spacing;
    assert_eq!(block.lines.len(), 2);
    assert!((block.lines[0].top - (300.0 - line_height)).abs() < 1e-4);
    assert!((block.lines[1].top - 300.0).abs() < 1e-4);
    for line in &block.lines {
        assert_eq!(line.x, 100.0);
        assert_eq!(line.groups[0].x, 100.0);
    }

    let rect = block.lines[1].groups[0].highlight.expect("bold group is highlighted");
    assert_eq!(rect, Rect::new(92, 296, 148, 320));
}

#[test]
fn test_layout_is_deterministic() {
    let fonts = fallback_pair();
    let text = "**Vòng lặp for:** Use when the number of repetitions is **known,**";
    let at = placement(200.0, 800.0, 300.0, Anchor::LeftTop);
    let first = layout_text(text, at, &fonts, &TextStyle::default());
    let second = layout_text(text, at, &fonts, &TextStyle::default());
    assert_eq!(first, second);
}

#[test]
fn test_render_text_returns_height_and_paints() {
    let fonts = fallback_pair();
    let mut canvas = RgbaImage::from_pixel(400, 200, Rgba([255, 255, 255, 255]));
    let height = render_text(
        &mut canvas,
        "hi **there**",
        placement(10.0, 10.0, 380.0, Anchor::LeftTop),
        &fonts,
        &TextStyle::default(),
    );
    assert!((height - 16.0 * 1.3).abs() < 1e-4);

    // highlight behind "there": x 40..90, y 10..26 padded
    let inside = canvas.get_pixel(60, 20);
    assert_ne!(*inside, Rgba([255, 255, 255, 255]));
    // untouched area
    assert_eq!(*canvas.get_pixel(300, 150), Rgba([255, 255, 255, 255]));
}

#[test]
fn test_render_empty_text_is_zero_height() {
    let fonts = fallback_pair();
    let mut canvas = RgbaImage::new(50, 50);
    let height = render_text(
        &mut canvas,
        "",
        placement(0.0, 0.0, 50.0, Anchor::LeftTop),
        &fonts,
        &TextStyle::default(),
    );
    assert_eq!(height, 0.0);
}

#[test]
fn test_draw_highlight_blends_with_background() {
    let mut canvas = RgbaImage::from_pixel(80, 60, Rgba([0, 0, 255, 255]));
    draw_highlight(&mut canvas, Rect::new(10, 10, 60, 40), Rgba([255, 255, 0, 200]), 8);

    assert_eq!(*canvas.get_pixel(35, 25), Rgba([200, 200, 55, 255]));
    // rounded corner leaves the extreme corner pixel alone
    assert_eq!(*canvas.get_pixel(10, 10), Rgba([0, 0, 255, 255]));
    // edge midpoints are covered
    assert_eq!(*canvas.get_pixel(35, 10), Rgba([200, 200, 55, 255]));
    assert_eq!(*canvas.get_pixel(10, 25), Rgba([200, 200, 55, 255]));
    // outside untouched
    assert_eq!(*canvas.get_pixel(70, 50), Rgba([0, 0, 255, 255]));
}

#[test]
fn test_draw_highlight_on_transparent_canvas_keeps_alpha() {
    let mut canvas = RgbaImage::new(40, 40);
    draw_highlight(&mut canvas, Rect::new(5, 5, 30, 30), Rgba([255, 255, 0, 200]), 4);
    assert_eq!(*canvas.get_pixel(15, 15), Rgba([255, 255, 0, 200]));
}

#[test]
fn test_overlapping_highlights_accumulate() {
    let mut canvas = RgbaImage::new(40, 40);
    let fill = Rgba([255, 255, 0, 100]);
    draw_highlight(&mut canvas, Rect::new(0, 0, 20, 20), fill, 0);
    let once = canvas.get_pixel(15, 15)[3];
    draw_highlight(&mut canvas, Rect::new(10, 10, 30, 30), fill, 0);
    let twice = canvas.get_pixel(15, 15)[3];
    assert!(twice > once);
    assert_eq!(canvas.get_pixel(25, 25)[3], once);
}

#[test]
fn test_composite_over_transparent_source_is_noop() {
    let dst = Rgba([10, 20, 30, 255]);
    assert_eq!(composite_over(dst, Rgba([255, 0, 0, 0])), dst);
}

#[test]
fn test_emoji_filenames() {
    assert_eq!(emoji_filename("😀"), "1f600.png");
    assert_eq!(emoji_filename("🧐"), "1f9d0.png");
    assert_eq!(emoji_filename("🔢"), "1f522.png");
    assert_eq!(emoji_filename("\u{2764}\u{fe0f}"), "2764-fe0f.png");
}

#[test]
fn test_paste_missing_emoji_is_skipped() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut canvas = RgbaImage::from_pixel(20, 20, Rgba([1, 2, 3, 255]));
    assert!(!paste_emoji(&mut canvas, "🤖", 0, 0, 10, dir.path()));
    assert_eq!(*canvas.get_pixel(5, 5), Rgba([1, 2, 3, 255]));
}

#[test]
fn test_hsl_to_rgb_background_colours() {
    assert_eq!(hsl_to_rgb(0.0, 100.0, 41.0), Rgb([209, 0, 0]));
    assert_eq!(hsl_to_rgb(120.0, 100.0, 41.0), Rgb([0, 209, 0]));
    assert_eq!(hsl_to_rgb(240.0, 100.0, 41.0), Rgb([0, 0, 209]));
    assert_eq!(hsl_to_rgb(42.0, 0.0, 50.0), Rgb([127, 127, 127]));
}

#[test]
fn test_apply_background_respects_template_alpha() {
    let mut template = RgbaImage::new(4, 4);
    template.put_pixel(1, 1, Rgba([255, 255, 255, 255]));
    let composed = apply_background(&template, 0);
    assert_eq!(*composed.get_pixel(0, 0), Rgba([209, 0, 0, 255]));
    assert_eq!(*composed.get_pixel(1, 1), Rgba([255, 255, 255, 255]));
}

#[test]
fn test_template_kind_from_name() {
    assert_eq!(TemplateKind::from_template_name("opening.png"), TemplateKind::Opening);
    assert_eq!(TemplateKind::from_template_name("side_by_side"), TemplateKind::SideBySide);
    assert_eq!(
        TemplateKind::from_template_name("templates/steps.png"),
        TemplateKind::Steps
    );
    assert_eq!(
        TemplateKind::from_template_name("timeline.png"),
        TemplateKind::Custom("timeline".to_string())
    );
}

#[test]
fn test_parse_deck_validates_each_slide() {
    let json = r#"[
        {"template": "opening.png", "data": {"title": "Computer Vision Overview"}},
        {"template": "quote.png", "data": {}},
        {"template": "definition.png", "data": {"term": "AI", "definition": "Machines that learn"}},
        {"data": {"title": "no template"}},
        {"template": "blank.png"}
    ]"#;
    let deck = parse_deck(json).expect("deck should parse");
    assert_eq!(deck.len(), 5);

    let opening = deck[0].as_ref().expect("opening is valid");
    assert_eq!(opening, &Slide::title(TemplateKind::Opening, "Computer Vision Overview"));

    match &deck[1] {
        Err(SlideError::InvalidSlide { index, message }) => {
            assert_eq!(*index, 2);
            assert!(message.contains("title"), "message: {}", message);
        }
        other => panic!("expected invalid slide, got {:?}", other),
    }

    let definition = deck[2].as_ref().expect("definition is valid");
    assert_eq!(definition.field_text(Field::Emoji).as_deref(), Some("😀"));

    assert!(matches!(deck[3], Err(SlideError::InvalidSlide { index: 4, .. })));
    assert_eq!(
        deck[4].as_ref().expect("blank is valid").content,
        SlideContent::Blank
    );
}

#[test]
fn test_parse_deck_rejects_non_array() {
    assert!(matches!(
        parse_deck(r#"{"template": "opening.png"}"#),
        Err(SlideError::JsonError(_))
    ));
}

#[test]
fn test_steps_slide_fields() {
    let json = r#"[{"template": "steps.png", "data": {
        "title": "How to train",
        "steps": [
            {"title": "Collect", "content": "Gather **labelled** images"},
            {"title": "Train", "content": "Fit the model"}
        ]}}, {"template": "steps.png", "data": {"steps": []}}]"#;
    let deck = parse_deck(json).expect("deck should parse");
    let slide = deck[0].as_ref().expect("steps slide is valid");

    assert_eq!(slide.step_count(), 2);
    assert_eq!(slide.field_text(Field::Title).as_deref(), Some("How to train"));
    assert_eq!(slide.field_text(Field::StepNumber(1)).as_deref(), Some("2"));
    assert_eq!(slide.field_text(Field::StepTitle(0)).as_deref(), Some("Collect"));
    assert_eq!(slide.field_text(Field::StepContent(2)), None);

    assert!(matches!(deck[1], Err(SlideError::InvalidSlide { index: 2, .. })));
}

#[test]
fn test_side_by_side_requires_both_columns() {
    let json = r#"[{"template": "side_by_side.png", "data": {
        "left": {"emoji": "🔢", "content": "**for** loop"}
    }}]"#;
    let deck = parse_deck(json).expect("deck should parse");
    assert!(deck[0].is_err());
}

#[test]
fn test_layout_table() {
    let steps = layout_for(&TemplateKind::Steps, 3).expect("steps has a layout");
    assert_eq!(steps.text.len(), 1 + 3 * 3);

    let definition = layout_for(&TemplateKind::Definition, 0).expect("definition has a layout");
    assert_eq!(definition.emoji.len(), 1);
    assert_eq!(definition.emoji[0].y.resolve(1440), 420.0);

    assert!(layout_for(&TemplateKind::Blank, 0)
        .expect("blank has a layout")
        .text
        .is_empty());
    assert!(layout_for(&TemplateKind::Custom("x".to_string()), 0).is_none());
}

#[test]
fn test_steps_columns_stay_inside_margins() {
    let layout = layout_for(&TemplateKind::Steps, 4).expect("steps has a layout");
    let width = 2560;
    for spec in &layout.text {
        if let Field::StepTitle(_) = spec.field {
            let left = spec.x.resolve(width);
            let right = left + spec.max_width.resolve(width);
            assert!(left >= 200.0 && right <= (width - 200) as f32);
        }
    }
}

#[test]
fn test_title_fields_use_title_spacing() {
    let style = TextStyle::default()
        .with_line_spacing(1.5)
        .with_title_line_spacing(1.1);
    assert_eq!(style.for_spacing(LineSpacing::Body).line_spacing, 1.5);
    assert_eq!(style.for_spacing(LineSpacing::Title).line_spacing, 1.1);

    let opening = layout_for(&TemplateKind::Opening, 0).expect("opening has a layout");
    assert_eq!(opening.text[0].spacing, LineSpacing::Title);
    let definition = layout_for(&TemplateKind::Definition, 0).expect("definition has a layout");
    assert_eq!(definition.text[0].spacing, LineSpacing::Title);
    assert_eq!(definition.text[1].spacing, LineSpacing::Body);
}

fn fallback_composer(dir: &TempDir) -> SlideComposer {
    let config = Config::new().get_compose_config(
        Some(dir.path().to_path_buf()),
        Some(dir.path().join("fonts")),
        Some(dir.path().to_path_buf()),
        Some(dir.path().join("out")),
        Some(0),
        None,
    );
    SlideComposer::new(config)
}

fn definition_slide(term: &str) -> Slide {
    Slide {
        template: TemplateKind::Definition,
        content: SlideContent::Definition(Definition {
            term: term.to_string(),
            definition: "Layers of learned **filters**".to_string(),
            emoji: "😀".to_string(),
        }),
    }
}

#[test]
fn test_definition_flows_below_multiline_term() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut composer = fallback_composer(&dir);
    let layout = layout_for(&TemplateKind::Definition, 0).expect("definition has a layout");

    // term at 100px: 80px ascent, 96px lines from y = 300
    let short = composer.layout_fields(&definition_slide("CNN"), &layout, 2560, 1440);
    assert_eq!(short.len(), 2);
    assert_eq!(short[0].field, Field::Term);
    assert!((short[0].bottom() - 396.0).abs() < 1e-3);
    assert!((short[1].origin_y - 500.0).abs() < 1e-3);

    let long = composer.layout_fields(
        &definition_slide("Convolutional neural network architecture"),
        &layout,
        2560,
        1440,
    );
    assert_eq!(long[0].block.lines.len(), 2);
    assert!((long[0].bottom() - 492.0).abs() < 1e-3);
    assert!((long[1].origin_y - 532.0).abs() < 1e-3);
    assert!((long[1].block.lines[0].top - 532.0).abs() < 1e-3);
}

#[test]
fn test_step_content_flows_below_step_title() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut composer = fallback_composer(&dir);
    let layout = layout_for(&TemplateKind::Steps, 1).expect("steps has a layout");
    let slide = Slide {
        template: TemplateKind::Steps,
        content: SlideContent::Steps {
            heading: None,
            steps: vec![Step {
                title: "Gather the data".to_string(),
                content: "Label every image".to_string(),
            }],
        },
    };

    // one 520px column at width 1000; title at 70px wraps after "Gather the"
    let placed = composer.layout_fields(&slide, &layout, 1000, 1000);
    let fields: Vec<Field> = placed.iter().map(|p| p.field).collect();
    assert_eq!(
        fields,
        vec![Field::StepNumber(0), Field::StepTitle(0), Field::StepContent(0)]
    );

    let title = &placed[1];
    assert_eq!(title.block.lines.len(), 2);
    assert!((title.origin_y - 560.0).abs() < 1e-3);
    let expected_bottom = 560.0 + 2.0 * 56.0 * 1.3;
    assert!((title.bottom() - expected_bottom).abs() < 1e-3);
    assert!((placed[2].origin_y - (expected_bottom + 30.0)).abs() < 1e-3);
}

#[test]
fn test_coord_resolve() {
    assert_eq!(Coord::px(250.0).resolve(2560), 250.0);
    assert_eq!(Coord::frac(0.5).resolve(2560), 1280.0);
    assert_eq!(Coord::frac_plus(0.5, 50.0).resolve(1440), 770.0);
}

#[test]
fn test_naming_scheme_from_str() {
    assert_eq!("indexed".parse::<NamingScheme>().ok(), Some(NamingScheme::Indexed));
    assert_eq!(" Sequential ".parse::<NamingScheme>().ok(), Some(NamingScheme::Sequential));
    assert!("random".parse::<NamingScheme>().is_err());
}

#[test]
fn test_parse_hue() {
    assert_eq!(config::parse_hue("0").ok(), Some(0));
    assert_eq!(config::parse_hue("360").ok(), Some(360));
    assert!(config::parse_hue("361").is_err());
    assert!(config::parse_hue("red").is_err());
}

#[test]
fn test_parse_spacing() {
    assert_eq!(config::parse_spacing(" 1.25 ").ok(), Some(1.25));
    assert!(config::parse_spacing("0").is_err());
    assert!(config::parse_spacing("-1").is_err());
    assert!(config::parse_spacing("wide").is_err());
}

#[test]
fn test_compose_config_overrides() {
    let app_config = Config::new();
    let compose = app_config.get_compose_config(
        None,
        None,
        None,
        Some("slides".into()),
        Some(90),
        Some(NamingScheme::Sequential),
    );
    assert_eq!(compose.template_dir, std::path::PathBuf::from("templates"));
    assert_eq!(compose.output_dir, std::path::PathBuf::from("slides"));
    assert_eq!(compose.hue, Some(90));
    assert_eq!(compose.naming, NamingScheme::Sequential);
    assert_eq!(compose.bold_font, "NotoSans-Bold.ttf");
}

#[test]
fn test_next_numbered_filename() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path();
    assert_eq!(
        utils::next_numbered_filename(&path.join("missing")).expect("missing dir is fine"),
        path.join("missing").join("1.png")
    );
    assert_eq!(
        utils::next_numbered_filename(path).expect("empty dir"),
        path.join("1.png")
    );

    for name in ["1.png", "3.png", "cover.png", "2_opening.png"] {
        std::fs::write(path.join(name), b"").expect("Failed to write file");
    }
    assert_eq!(
        utils::next_numbered_filename(path).expect("numbered dir"),
        path.join("4.png")
    );
}

#[test]
fn test_next_numbered_filename_with_glob_characters() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let deck_dir = dir.path().join("deck[1]");
    std::fs::create_dir(&deck_dir).expect("Failed to create directory");
    for name in ["1.png", "2.png"] {
        std::fs::write(deck_dir.join(name), b"").expect("Failed to write file");
    }

    assert_eq!(
        utils::next_numbered_filename(&deck_dir).expect("numbered dir"),
        deck_dir.join("3.png")
    );
    assert_eq!(utils::png_files(&deck_dir).expect("listing").len(), 2);
}
