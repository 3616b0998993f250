// ABOUTME: Rounded highlight rectangles and pixel compositing helpers
// ABOUTME: Highlights are drawn on a transparent layer and alpha-composited onto the canvas

use image::{Rgba, RgbaImage};

/// Pixel rectangle with inclusive corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl Rect {
    pub fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> i64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i64 {
        self.y2 - self.y1
    }

    /// Clip to the pixel bounds of an image, `None` when nothing is left.
    fn clip(&self, width: u32, height: u32) -> Option<Rect> {
        let clipped = Rect {
            x1: self.x1.max(0),
            y1: self.y1.max(0),
            x2: self.x2.min(width as i64 - 1),
            y2: self.y2.min(height as i64 - 1),
        };
        (clipped.x1 <= clipped.x2 && clipped.y1 <= clipped.y2).then_some(clipped)
    }
}

/// Composite a single `src` pixel over `dst` ("over" operator, straight alpha).
pub fn composite_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    if sa <= 0.0 {
        return dst;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mut out = [0u8; 4];
    for channel in 0..3 {
        let value =
            (src[channel] as f32 * sa + dst[channel] as f32 * da * (1.0 - sa)) / out_a;
        out[channel] = value.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba(out)
}

/// Blend `color` scaled by `coverage` into the canvas, ignoring out-of-bounds pixels.
pub fn blend_pixel(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, coverage: u8) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let alpha = (color[3] as u32 * coverage as u32 / 255) as u8;
    let src = Rgba([color[0], color[1], color[2], alpha]);
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    *pixel = composite_over(*pixel, src);
}

/// Alpha-composite `layer` onto `target` inside `region`.
///
/// Both images must have the same dimensions; pixels of `layer` outside
/// `region` are expected to be fully transparent.
pub fn composite_layer(target: &mut RgbaImage, layer: &RgbaImage, region: Rect) {
    let Some(region) = region.clip(target.width(), target.height()) else {
        return;
    };
    for y in region.y1..=region.y2 {
        for x in region.x1..=region.x2 {
            let src = *layer.get_pixel(x as u32, y as u32);
            if src[3] == 0 {
                continue;
            }
            let dst = target.get_pixel_mut(x as u32, y as u32);
            *dst = composite_over(*dst, src);
        }
    }
}

fn fill_rect(layer: &mut RgbaImage, rect: Rect, fill: Rgba<u8>) {
    let Some(rect) = rect.clip(layer.width(), layer.height()) else {
        return;
    };
    for y in rect.y1..=rect.y2 {
        for x in rect.x1..=rect.x2 {
            layer.put_pixel(x as u32, y as u32, fill);
        }
    }
}

// Disc inscribed in the square starting at (left, top) with side 2 * radius.
fn fill_disc(layer: &mut RgbaImage, left: i64, top: i64, radius: i64, fill: Rgba<u8>) {
    let bounds = Rect::new(left, top, left + 2 * radius, top + 2 * radius);
    let Some(clipped) = bounds.clip(layer.width(), layer.height()) else {
        return;
    };
    let cx = left + radius;
    let cy = top + radius;
    let r2 = radius * radius;
    for y in clipped.y1..=clipped.y2 {
        for x in clipped.x1..=clipped.x2 {
            let dx = x - cx;
            let dy = y - cy;
            if dx * dx + dy * dy <= r2 {
                layer.put_pixel(x as u32, y as u32, fill);
            }
        }
    }
}

/// Fill a rounded rectangle directly on `layer` (no blending).
///
/// The shape is the union of two axis-aligned rectangles covering the middle
/// cross and one disc per corner. The radius is clamped to half the shorter side.
pub fn fill_rounded_rect(layer: &mut RgbaImage, rect: Rect, radius: u32, fill: Rgba<u8>) {
    if rect.width() < 0 || rect.height() < 0 {
        return;
    }
    let radius = (radius as i64).min(rect.width() / 2).min(rect.height() / 2);

    fill_rect(
        layer,
        Rect::new(rect.x1 + radius, rect.y1, rect.x2 - radius, rect.y2),
        fill,
    );
    fill_rect(
        layer,
        Rect::new(rect.x1, rect.y1 + radius, rect.x2, rect.y2 - radius),
        fill,
    );

    if radius > 0 {
        let diameter = 2 * radius;
        fill_disc(layer, rect.x1, rect.y1, radius, fill);
        fill_disc(layer, rect.x2 - diameter, rect.y1, radius, fill);
        fill_disc(layer, rect.x1, rect.y2 - diameter, radius, fill);
        fill_disc(layer, rect.x2 - diameter, rect.y2 - diameter, radius, fill);
    }
}

/// Paint a translucent rounded highlight behind text.
///
/// The shape is drawn on a fully transparent scratch layer the size of the
/// target and then alpha-composited, so overlapping highlights blend and
/// existing content shows through instead of being overwritten.
pub fn draw_highlight(target: &mut RgbaImage, rect: Rect, fill: Rgba<u8>, corner_radius: u32) {
    let mut layer = RgbaImage::from_pixel(target.width(), target.height(), Rgba([0, 0, 0, 0]));
    fill_rounded_rect(&mut layer, rect, corner_radius, fill);
    composite_layer(target, &layer, rect);
}
