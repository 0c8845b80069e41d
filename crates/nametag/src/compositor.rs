//! A4 page composition
//!
//! A page is drawn in layers: white fill, the faint reference grid, then one
//! cut line, inner border and tag image per placement.

use crate::config::SheetConfig;
use crate::orchestrator::TemplatePool;
use crate::picker::TemplatePicker;
use crate::renderer::TagRenderer;
use crate::Result;
use roster::PersonRecord;
use sheet_core::{
    encode_png, Canvas, FontLibrary, Placement, Rect, Rgba, RgbaImage, SheetGeometry, Size,
};

/// What goes into one slot on the page
#[derive(Debug, Clone, Copy)]
pub enum TagContent<'p> {
    Person(&'p PersonRecord),
    /// Blank background for hand-written late registrations
    Spare,
}

pub struct PageCompositor<'a> {
    renderer: TagRenderer<'a>,
    geometry: SheetGeometry,
    grid: Rgba<u8>,
    cut: Rgba<u8>,
    border: Rgba<u8>,
}

impl<'a> PageCompositor<'a> {
    pub fn new(fonts: &'a FontLibrary, config: &SheetConfig) -> Self {
        Self {
            renderer: TagRenderer::with_layouts(fonts, config.layout),
            geometry: config.geometry(),
            grid: config.grid_rgba(),
            cut: config.cut_rgba(),
            border: config.border_rgba(),
        }
    }

    pub fn geometry(&self) -> &SheetGeometry {
        &self.geometry
    }

    /// Compose one page
    ///
    /// `placements` and `contents` are paired in order; extra contents stay
    /// for the next page. Every slot picks its own template.
    pub fn compose(
        &self,
        tag: Size,
        placements: &[Placement],
        contents: &[TagContent<'_>],
        pool: &mut TemplatePool,
        picker: &mut dyn TemplatePicker,
        small: bool,
    ) -> Result<RgbaImage> {
        let page = self.geometry.page;
        let mut canvas = Canvas::new(page.width, page.height);

        self.draw_grid(&mut canvas, tag);

        for (placement, content) in placements.iter().zip(contents) {
            let index = picker.pick(pool.len());
            let background = pool.background(index)?;
            let cut = self.on_page(placement.footprint());
            let interior = self.interior(cut);

            canvas.stroke_rect(cut, self.cut);
            if let Some(ring) = outset(interior) {
                canvas.stroke_rect(ring, self.border);
            }

            match content {
                TagContent::Person(person) => {
                    let art = self.renderer.render_image(person, background, small);
                    canvas.draw_image(&art, interior, placement.rotated);
                }
                TagContent::Spare => {
                    canvas.draw_image(background, interior, placement.rotated);
                }
            }
        }

        Ok(canvas.into_image())
    }

    pub fn encode(&self, page: &RgbaImage) -> Result<Vec<u8>> {
        Ok(encode_png(page)?)
    }

    /// Reference grid at the unrotated tag pitch
    fn draw_grid(&self, canvas: &mut Canvas, tag: Size) {
        let SheetGeometry {
            page,
            margin,
            spacing,
            ..
        } = self.geometry;
        let area = self.geometry.available();
        let pitch_x = tag.width.saturating_add(spacing);
        let pitch_y = tag.height.saturating_add(spacing);
        if pitch_x == 0 || pitch_y == 0 {
            return;
        }

        let right = page.width.saturating_sub(margin);
        let bottom = page.height.saturating_sub(margin);
        for row in 0..=area.height / pitch_y {
            canvas.hline(margin, right, margin.saturating_add(row * pitch_y), self.grid);
        }
        for col in 0..=area.width / pitch_x {
            canvas.vline(margin.saturating_add(col * pitch_x), margin, bottom, self.grid);
        }
    }

    fn on_page(&self, rect: Rect) -> Rect {
        let margin = self.geometry.margin;
        Rect::new(
            rect.x.saturating_add(margin),
            rect.y.saturating_add(margin),
            rect.width,
            rect.height,
        )
    }

    /// Cut footprint inset by the border thickness
    fn interior(&self, cut: Rect) -> Rect {
        let border = self.geometry.border;
        Rect::new(
            cut.x.saturating_add(border),
            cut.y.saturating_add(border),
            cut.width.saturating_sub(border.saturating_mul(2)),
            cut.height.saturating_sub(border.saturating_mul(2)),
        )
    }
}

/// The one-pixel ring just outside `rect`
fn outset(rect: Rect) -> Option<Rect> {
    if rect.x == 0 || rect.y == 0 {
        return None;
    }
    Some(Rect::new(
        rect.x - 1,
        rect.y - 1,
        rect.width.saturating_add(2),
        rect.height.saturating_add(2),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::SequencePicker;
    use pretty_assertions::assert_eq;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    /// 50 mm square page: 591 px, margin 59, spacing 24, border 12
    fn small_page() -> SheetConfig {
        SheetConfig {
            page_width_mm: 50.0,
            page_height_mm: 50.0,
            margin_mm: 5.0,
            ..SheetConfig::default()
        }
    }

    fn pool_of(image: RgbaImage) -> TemplatePool {
        TemplatePool::from_bytes(vec![encode_png(&image).unwrap()])
    }

    #[test]
    fn test_compose_layers() {
        let fonts = FontLibrary::empty();
        let config = small_page();
        let compositor = PageCompositor::new(&fonts, &config);
        let mut pool = pool_of(RgbaImage::from_pixel(40, 20, RED));
        let mut picker = SequencePicker::first();

        let tag = Size::new(200, 100);
        let placements = [Placement {
            x: 0,
            y: 0,
            width: 200,
            height: 100,
            rotated: false,
        }];
        let page = compositor
            .compose(
                tag,
                &placements,
                &[TagContent::Spare],
                &mut pool,
                &mut picker,
                true,
            )
            .unwrap();

        assert_eq!(page.dimensions(), (591, 591));
        assert_eq!(*page.get_pixel(5, 5), WHITE);
        // grid column 1 below the only tag
        assert_eq!(*page.get_pixel(59 + 224, 400), config.grid_rgba());
        // grid row 3
        assert_eq!(*page.get_pixel(400, 59 + 3 * 124), config.grid_rgba());
        assert_eq!(*page.get_pixel(59, 59 + 50), config.cut_rgba());
        assert_eq!(*page.get_pixel(59 + 11, 59 + 50), config.border_rgba());
        assert_eq!(*page.get_pixel(59 + 100, 59 + 50), RED);
        assert_eq!(*page.get_pixel(59 + 12, 59 + 12), RED);
    }

    #[test]
    fn test_rotated_art_turns_clockwise() {
        let fonts = FontLibrary::empty();
        let config = small_page();
        let compositor = PageCompositor::new(&fonts, &config);

        let mut template = RgbaImage::from_pixel(40, 20, BLUE);
        for y in 0..20 {
            for x in 0..20 {
                template.put_pixel(x, y, RED);
            }
        }
        let mut pool = pool_of(template);
        let mut picker = SequencePicker::first();

        let placements = [Placement {
            x: 0,
            y: 0,
            width: 100,
            height: 200,
            rotated: true,
        }];
        let page = compositor
            .compose(
                Size::new(200, 100),
                &placements,
                &[TagContent::Spare],
                &mut pool,
                &mut picker,
                true,
            )
            .unwrap();

        // left half of the template ends up on top
        assert_eq!(*page.get_pixel(59 + 50, 59 + 30), RED);
        assert_eq!(*page.get_pixel(59 + 50, 59 + 170), BLUE);
    }

    #[test]
    fn test_each_slot_picks_its_own_template() {
        let fonts = FontLibrary::empty();
        let config = small_page();
        let compositor = PageCompositor::new(&fonts, &config);
        let mut pool = TemplatePool::from_bytes(vec![
            encode_png(&RgbaImage::from_pixel(10, 10, RED)).unwrap(),
            encode_png(&RgbaImage::from_pixel(10, 10, BLUE)).unwrap(),
        ]);
        let mut picker = SequencePicker::new(vec![1, 0]);

        let person = PersonRecord::new("Kim", "", "Pastor", false).unwrap();
        let placements = [
            Placement {
                x: 0,
                y: 0,
                width: 100,
                height: 100,
                rotated: false,
            },
            Placement {
                x: 130,
                y: 0,
                width: 100,
                height: 100,
                rotated: false,
            },
        ];
        let contents = [
            TagContent::Person(&person),
            TagContent::Spare,
            TagContent::Spare,
        ];
        let page = compositor
            .compose(
                Size::new(100, 100),
                &placements,
                &contents,
                &mut pool,
                &mut picker,
                false,
            )
            .unwrap();

        assert_eq!(*page.get_pixel(59 + 50, 59 + 50), BLUE);
        assert_eq!(*page.get_pixel(59 + 180, 59 + 50), RED);
        // third content has no placement on this page
        assert_eq!(*page.get_pixel(59 + 300, 59 + 50), WHITE);
    }

    #[test]
    fn test_grid_with_page_sized_pitch() {
        let fonts = FontLibrary::empty();
        let config = small_page();
        let compositor = PageCompositor::new(&fonts, &config);
        let mut pool = pool_of(RgbaImage::from_pixel(4, 4, RED));

        let page = compositor
            .compose(
                Size::new(u32::MAX, u32::MAX),
                &[],
                &[],
                &mut pool,
                &mut SequencePicker::first(),
                false,
            )
            .unwrap();

        // only the grid's first row and column fit
        assert_eq!(*page.get_pixel(300, 59), config.grid_rgba());
        assert_eq!(*page.get_pixel(59, 300), config.grid_rgba());
        assert_eq!(*page.get_pixel(300, 300), WHITE);
    }

    #[test]
    fn test_offsets_saturate_at_the_edge() {
        let fonts = FontLibrary::empty();
        let config = small_page();
        let compositor = PageCompositor::new(&fonts, &config);
        let cut = compositor.on_page(Rect::new(u32::MAX - 10, 0, 5, 5));
        assert_eq!(cut.x, u32::MAX);
        assert_eq!(compositor.interior(cut).x, u32::MAX);
        assert_eq!(
            outset(Rect::new(1, 1, u32::MAX, 3)),
            Some(Rect::new(0, 0, u32::MAX, 5))
        );
    }

    #[test]
    fn test_outset_needs_room() {
        assert_eq!(outset(Rect::new(0, 5, 10, 10)), None);
        assert_eq!(outset(Rect::new(3, 5, 10, 10)), Some(Rect::new(2, 4, 12, 12)));
    }
}
