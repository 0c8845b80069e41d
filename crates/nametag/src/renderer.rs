//! Per-person tag rendering

use crate::config::LayoutConfig;
use crate::Result;
use roster::PersonRecord;
use sheet_core::{decode_image, encode_png, Canvas, FontLibrary, RgbaImage};

/// Draws a person's text over a background template
pub struct TagRenderer<'a> {
    fonts: &'a FontLibrary,
    layouts: LayoutConfig,
}

impl<'a> TagRenderer<'a> {
    pub fn new(fonts: &'a FontLibrary) -> Self {
        Self::with_layouts(fonts, LayoutConfig::default())
    }

    pub fn with_layouts(fonts: &'a FontLibrary, layouts: LayoutConfig) -> Self {
        Self { fonts, layouts }
    }

    /// Render onto encoded background bytes and return PNG bytes
    ///
    /// The output has the background's resolution.
    pub fn render(
        &self,
        person: &PersonRecord,
        background: &[u8],
        small: bool,
    ) -> Result<Vec<u8>> {
        let image = decode_image(background)?.to_rgba8();
        let tag = self.render_image(person, &image, small);
        Ok(encode_png(&tag)?)
    }

    /// Render onto a decoded background
    pub fn render_image(
        &self,
        person: &PersonRecord,
        background: &RgbaImage,
        small: bool,
    ) -> RgbaImage {
        let mut canvas = Canvas::from_image(background.clone());
        let layout = self.layouts.for_size(small);

        for line in layout.plan(person, canvas.width(), canvas.height()) {
            canvas.draw_text(self.fonts, &line.text, line.x, line.y, &line.style);
        }

        log::debug!(
            "rendered {} tag for {} ({}x{})",
            person.category().suffix(),
            person.name(),
            canvas.width(),
            canvas.height()
        );
        canvas.into_image()
    }
}
