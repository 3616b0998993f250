// ABOUTME: Slide background colouring and template overlay
// ABOUTME: Also colorizes a whole template directory with one shared hue

use crate::errors::{Result, SlideError};
use crate::utils;
use image::{Rgb, Rgba, RgbaImage, imageops};
use log::{error, info};
use rand::Rng;
use std::path::{Path, PathBuf};

/// Saturation of every slide background, in percent.
pub const BACKGROUND_SATURATION: f32 = 100.0;
/// Lightness of every slide background, in percent.
pub const BACKGROUND_LIGHTNESS: f32 = 41.0;

fn hue_channel(m1: f32, m2: f32, hue: f32) -> f32 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

/// Convert HSL (hue in degrees, saturation and lightness in percent) to RGB.
/// Channels are truncated after scaling to 0..=255.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Rgb<u8> {
    let h = hue / 360.0;
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let l = (lightness / 100.0).clamp(0.0, 1.0);

    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let m1 = 2.0 * l - m2;
        (
            hue_channel(m1, m2, h + 1.0 / 3.0),
            hue_channel(m1, m2, h),
            hue_channel(m1, m2, h - 1.0 / 3.0),
        )
    };

    let to_byte = |v: f32| (v * 255.0).clamp(0.0, 255.0) as u8;
    Rgb([to_byte(r), to_byte(g), to_byte(b)])
}

/// Background colour for a hue at the fixed slide saturation and lightness.
pub fn background_color(hue: u16) -> Rgb<u8> {
    hsl_to_rgb(hue as f32, BACKGROUND_SATURATION, BACKGROUND_LIGHTNESS)
}

/// Pick a random hue in 0..=360.
pub fn random_hue() -> u16 {
    rand::thread_rng().gen_range(0..=360)
}

/// Lay a (partly transparent) template over an opaque background of `hue`.
pub fn apply_background(template: &RgbaImage, hue: u16) -> RgbaImage {
    let Rgb([r, g, b]) = background_color(hue);
    let mut canvas = RgbaImage::from_pixel(template.width(), template.height(), Rgba([r, g, b, 255]));
    imageops::overlay(&mut canvas, template, 0, 0);
    canvas
}

/// Directory name used for colorized templates when none is given.
pub fn default_colorize_dir(hue: u16) -> PathBuf {
    PathBuf::from(format!("output_uniform_hue_{}", hue))
}

/// Colorize every PNG template in `template_dir` with the same hue.
///
/// Each `<name>.png` is written as `<name>_colorized.png` in `output_dir`.
/// Files that fail to load or save are logged and skipped.
pub fn colorize_templates(template_dir: &Path, output_dir: &Path, hue: u16) -> Result<Vec<PathBuf>> {
    utils::validate_directory_exists(template_dir)?;
    utils::ensure_directory_exists(output_dir)?;

    let Rgb([r, g, b]) = background_color(hue);
    info!(
        "Colorizing templates in {:?} with hue {} (RGB {}, {}, {})",
        template_dir, hue, r, g, b
    );

    let mut templates = utils::png_files(template_dir)?;
    templates.sort();

    let mut written = Vec::with_capacity(templates.len());
    for template_path in templates {
        match colorize_one(&template_path, output_dir, hue) {
            Ok(output) => {
                info!("Saved {:?}", output);
                written.push(output);
            }
            Err(e) => error!("Skipping template {:?}: {}", template_path, e),
        }
    }

    info!("Colorized {} template(s) into {:?}", written.len(), output_dir);
    Ok(written)
}

fn colorize_one(template_path: &Path, output_dir: &Path, hue: u16) -> Result<PathBuf> {
    let template = image::open(template_path)?.to_rgba8();
    let composed = apply_background(&template, hue);

    let stem = template_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .ok_or_else(|| SlideError::ValidationError(format!("No file name: {:?}", template_path)))?;
    let output = output_dir.join(format!("{}_colorized.png", stem));

    image::DynamicImage::ImageRgba8(composed).to_rgb8().save(&output)?;
    Ok(output)
}
