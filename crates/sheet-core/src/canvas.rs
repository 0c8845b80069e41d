//! Raster page canvas

use crate::font::FontLibrary;
use crate::imaging::encode_png;
use crate::packer::Rect;
use crate::text::{draw_text, TextStyle};
use crate::Result;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Mutable RGBA drawing surface
///
/// Lines are one pixel wide and clipped to the canvas.
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// White canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba([255, 255, 255, 255]))
    }

    pub fn filled(width: u32, height: u32, color: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, color),
        }
    }

    /// Wrap an existing image
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Horizontal line from `x0` up to (excluding) `x1`
    pub fn hline(&mut self, x0: u32, x1: u32, y: u32, color: Rgba<u8>) {
        if y >= self.height() {
            return;
        }
        for x in x0..x1.min(self.width()) {
            self.image.put_pixel(x, y, color);
        }
    }

    /// Vertical line from `y0` up to (excluding) `y1`
    pub fn vline(&mut self, x: u32, y0: u32, y1: u32, color: Rgba<u8>) {
        if x >= self.width() {
            return;
        }
        for y in y0..y1.min(self.height()) {
            self.image.put_pixel(x, y, color);
        }
    }

    /// One-pixel outline on the outermost pixels of the rectangle
    pub fn stroke_rect(&mut self, rect: Rect, color: Rgba<u8>) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        let right = rect.right() - 1;
        let bottom = rect.bottom() - 1;
        self.hline(rect.x, rect.right(), rect.y, color);
        self.hline(rect.x, rect.right(), bottom, color);
        self.vline(rect.x, rect.y, rect.bottom(), color);
        self.vline(right, rect.y, rect.bottom(), color);
    }

    /// Draw `source` scaled to fill `target`
    ///
    /// When `rotated` is set, `target` is the on-page (already turned)
    /// footprint: the source is scaled to the un-turned size, then rotated 90°
    /// clockwise about the target's centre.
    pub fn draw_image(&mut self, source: &RgbaImage, target: Rect, rotated: bool) {
        if target.width == 0 || target.height == 0 || source.width() == 0 || source.height() == 0
        {
            return;
        }

        let placed = if rotated {
            let upright =
                imageops::resize(source, target.height, target.width, FilterType::Triangle);
            imageops::rotate90(&upright)
        } else {
            imageops::resize(source, target.width, target.height, FilterType::Triangle)
        };

        imageops::overlay(&mut self.image, &placed, target.x as i64, target.y as i64);
    }

    /// Draw one line of text, see [`draw_text`]
    pub fn draw_text(
        &mut self,
        library: &FontLibrary,
        text: &str,
        x: f32,
        y: f32,
        style: &TextStyle,
    ) -> f32 {
        draw_text(&mut self.image, library, text, x, y, style)
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.image)
    }
}
