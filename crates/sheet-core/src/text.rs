//! Text rendering on raster images

use crate::font::{FontData, FontLibrary, FontWeight};
use ab_glyph::{point, Font, GlyphId, ScaleFont};
use image::{Rgba, RgbaImage};

/// Horizontal text alignment relative to the anchor x
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Text drawing parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels (em square height)
    pub size: f32,
    pub weight: FontWeight,
    pub align: Align,
    pub color: Rgba<u8>,
}

impl TextStyle {
    pub fn new(size: f32) -> Self {
        Self {
            size,
            weight: FontWeight::Regular,
            align: Align::Left,
            color: Rgba([0, 0, 0, 255]),
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn color(mut self, color: Rgba<u8>) -> Self {
        self.color = color;
        self
    }

    /// Extra horizontal strokes used to embolden a regular face
    fn faux_bold_px(&self) -> u32 {
        ((self.size / 40.0).round() as u32).max(1)
    }
}

/// A run of characters drawn with one face
struct TextSegment<'a> {
    text: String,
    face: &'a FontData,
    faux_bold: bool,
}

/// Split text into runs by the first face in the chain that has each glyph
///
/// Characters no face covers are dropped.
fn segment_text<'a>(
    library: &'a FontLibrary,
    text: &str,
    weight: FontWeight,
) -> Vec<TextSegment<'a>> {
    let mut segments: Vec<TextSegment<'a>> = Vec::new();

    for c in text.chars() {
        let found = library.face_for_char(c, weight).or_else(|| {
            // Whitespace keeps its advance even when only .notdef covers it
            if c.is_whitespace() {
                library.primary(weight)
            } else {
                None
            }
        });
        let Some((face, faux_bold)) = found else {
            log::debug!("no font covers {c:?}, skipping");
            continue;
        };

        match segments.last_mut() {
            Some(last) if std::ptr::eq(last.face, face) => last.text.push(c),
            _ => segments.push(TextSegment {
                text: c.to_string(),
                face,
                faux_bold,
            }),
        }
    }

    segments
}

/// Advance width of a run at `style.size`
fn segment_width(segment: &TextSegment<'_>, style: &TextStyle) -> f32 {
    let scale = segment.face.scale_for_size(style.size);
    let scaled = segment.face.font().as_scaled(scale);
    let mut width = 0.0;
    let mut previous: Option<GlyphId> = None;
    for c in segment.text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }
    if segment.faux_bold {
        width += style.faux_bold_px() as f32;
    }
    width
}

/// Draw a single line of text
///
/// `y` is the vertical middle of the line (canvas `textBaseline = "middle"`).
/// `x` is interpreted according to `style.align`. Returns the advance width
/// of the drawn line; drawing with an empty library does nothing and returns 0.
pub fn draw_text(
    image: &mut RgbaImage,
    library: &FontLibrary,
    text: &str,
    x: f32,
    y: f32,
    style: &TextStyle,
) -> f32 {
    if text.is_empty() {
        return 0.0;
    }

    let Some((primary, _)) = library.primary(style.weight) else {
        log::warn!("no fonts loaded, skipping text {text:?}");
        return 0.0;
    };

    let segments = segment_text(library, text, style.weight);
    let total_width: f32 = segments.iter().map(|s| segment_width(s, style)).sum();

    let start_x = match style.align {
        Align::Left => x,
        Align::Center => x - total_width / 2.0,
        Align::Right => x - total_width,
    };

    let metrics = primary.font().as_scaled(primary.scale_for_size(style.size));
    let baseline = y + (metrics.ascent() + metrics.descent()) / 2.0;

    let mut pen_x = start_x;
    for segment in &segments {
        draw_segment(image, segment, pen_x, baseline, style);
        pen_x += segment_width(segment, style);
    }
    total_width
}

fn draw_segment(
    image: &mut RgbaImage,
    segment: &TextSegment<'_>,
    start_x: f32,
    baseline: f32,
    style: &TextStyle,
) {
    let font = segment.face.font();
    let scale = segment.face.scale_for_size(style.size);
    let scaled = font.as_scaled(scale);
    let strokes = if segment.faux_bold {
        style.faux_bold_px() + 1
    } else {
        1
    };

    let mut pen_x = start_x;
    let mut previous: Option<GlyphId> = None;
    for c in segment.text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            pen_x += scaled.kern(prev, id);
        }

        for offset in 0..strokes {
            let glyph = id.with_scale_and_position(scale, point(pen_x + offset as f32, baseline));
            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    let px = bounds.min.x as i64 + gx as i64;
                    let py = bounds.min.y as i64 + gy as i64;
                    blend_pixel(image, px, py, style.color, coverage);
                });
            }
        }

        pen_x += scaled.h_advance(id);
        previous = Some(id);
    }
}

/// Source-over blend of `color` at `coverage` onto one pixel
fn blend_pixel(image: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= image.width() as i64 || y >= image.height() as i64 {
        return;
    }
    let alpha = coverage.clamp(0.0, 1.0) * color[3] as f32 / 255.0;
    if alpha <= 0.0 {
        return;
    }

    let dst = image.get_pixel_mut(x as u32, y as u32);
    let dst_alpha = dst[3] as f32 / 255.0;
    let out_alpha = alpha + dst_alpha * (1.0 - alpha);
    for channel in 0..3 {
        let src = color[channel] as f32 * alpha;
        let under = dst[channel] as f32 * dst_alpha * (1.0 - alpha);
        dst[channel] = ((src + under) / out_alpha).round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_alpha * 255.0).round() as u8;
}
