//! Integration tests for sheet-core
//!
//! These tests run the packer against real sheet geometry and draw the
//! result onto a canvas.

use base64::Engine as _;
use pretty_assertions::assert_eq;
use sheet_core::{
    decode_data_uri, decode_image, draw_text, encode_png, image_dimensions, mm_to_px, pack,
    pack_page, Align, Canvas, FontLibrary, Rect, Rgba, RgbaImage, SheetGeometry, Size, TextStyle,
};
use std::fs;

/// Solid template encoded as a PNG data URI
fn template_uri(width: u32, height: u32) -> String {
    let image = RgbaImage::from_pixel(width, height, Rgba([90, 160, 220, 255]));
    let png = encode_png(&image).unwrap();
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

#[test]
fn test_student_tags_on_a4() {
    let geometry = SheetGeometry::a4();
    let tag = Size::new(mm_to_px(85.0), 602);
    let placements = pack(tag, geometry.available(), 20, geometry.spacing);

    // two columns of five rows; nothing fits rotated in the leftover strips
    assert_eq!(placements.len(), 10);
    assert!(placements.iter().all(|p| !p.rotated));

    let area = geometry.available();
    for (i, a) in placements.iter().enumerate() {
        assert!(a.x + a.width <= area.width);
        assert!(a.y + a.height <= area.height);
        for b in &placements[i + 1..] {
            assert!(!a.padded(geometry.spacing).intersects(&b.padded(geometry.spacing)));
        }
    }
}

#[test]
fn test_oversized_tag_still_gets_a_page() {
    let geometry = SheetGeometry::a4();
    let tag = Size::new(4000, 4000);
    assert!(pack(tag, geometry.available(), 3, geometry.spacing).is_empty());

    let forced = pack_page(tag, geometry.available(), 3, geometry.spacing);
    assert_eq!(forced.len(), 1);
    assert_eq!((forced[0].x, forced[0].y, forced[0].rotated), (0, 0, false));
}

#[test]
fn test_draw_packed_templates() {
    let page = Size::new(800, 600);
    let margin = 20;
    let spacing = 8;
    let template = decode_image(&decode_data_uri(&template_uri(50, 30)).unwrap())
        .unwrap()
        .to_rgba8();

    let tag = Size::new(200, 120);
    let area = Size::new(page.width - 2 * margin, page.height - 2 * margin);
    let placements = pack(tag, area, 50, spacing);
    assert!(!placements.is_empty());

    let mut canvas = Canvas::new(page.width, page.height);
    for placement in &placements {
        let target = Rect::new(
            placement.x + margin,
            placement.y + margin,
            placement.width,
            placement.height,
        );
        canvas.draw_image(&template, target, placement.rotated);
        canvas.stroke_rect(target, Rgba([136, 136, 136, 255]));
    }

    let first = placements[0];
    let center = canvas
        .image()
        .get_pixel(first.x + margin + first.width / 2, first.y + margin + first.height / 2);
    assert_eq!(*center, Rgba([90, 160, 220, 255]));
    assert_eq!(*canvas.image().get_pixel(2, 2), Rgba([255, 255, 255, 255]));

    let png = canvas.encode_png().unwrap();
    assert_eq!(image_dimensions(&png).unwrap(), (800, 600));
}

#[test]
fn test_bare_base64_template() {
    let uri = template_uri(12, 7);
    let bare = uri.trim_start_matches("data:image/png;base64,");
    let bytes = decode_data_uri(bare).unwrap();
    assert_eq!(image_dimensions(&bytes).unwrap(), (12, 7));
}

/// A commonly installed Latin font, if this machine has one
fn system_font() -> Option<FontLibrary> {
    const CANDIDATES: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
    let data = CANDIDATES.iter().find_map(|path| fs::read(path).ok());
    if data.is_none() {
        eprintln!("no system font found, skipping");
    }
    data.map(|data| FontLibrary::with_bundled(&data).unwrap())
}

/// Draw on a white 600x300 canvas, returning the image and advance width
fn draw(fonts: &FontLibrary, text: &str, style: TextStyle) -> (RgbaImage, f32) {
    let mut image = RgbaImage::from_pixel(600, 300, Rgba([255, 255, 255, 255]));
    let width = draw_text(&mut image, fonts, text, 300.0, 150.0, &style);
    (image, width)
}

fn dark_pixels(image: &RgbaImage) -> Vec<(u32, u32)> {
    image
        .enumerate_pixels()
        .filter(|(_, _, p)| p[0] < 128)
        .map(|(x, y, _)| (x, y))
        .collect()
}

#[test]
fn test_centered_text_straddles_middle_line() {
    let Some(fonts) = system_font() else {
        return;
    };
    let (image, width) = draw(&fonts, "Hello", TextStyle::new(80.0).align(Align::Center));
    assert!(width > 0.0);

    let dark = dark_pixels(&image);
    assert!(!dark.is_empty());
    let top = dark.iter().map(|&(_, y)| y).min().unwrap();
    let bottom = dark.iter().map(|&(_, y)| y).max().unwrap();
    let left = dark.iter().map(|&(x, _)| x).min().unwrap() as f32;
    let right = dark.iter().map(|&(x, _)| x).max().unwrap() as f32;

    assert!(top < 150 && bottom > 150, "rows {top}..{bottom}");
    assert!(top >= 150 - 80 && bottom <= 150 + 80, "rows {top}..{bottom}");
    assert!(left >= 300.0 - width / 2.0 - 4.0, "left {left}, width {width}");
    assert!(right <= 300.0 + width / 2.0 + 4.0, "right {right}, width {width}");
}

#[test]
fn test_bold_without_bold_face_is_wider() {
    let Some(fonts) = system_font() else {
        return;
    };
    let (regular, regular_width) = draw(&fonts, "Name", TextStyle::new(80.0));
    let (bold, bold_width) = draw(&fonts, "Name", TextStyle::new(80.0).bold());

    // 80 px faux bold adds two extra strokes
    assert_eq!(bold_width, regular_width + 2.0);
    assert!(dark_pixels(&bold).len() > dark_pixels(&regular).len());
}

#[test]
fn test_uncovered_characters_are_dropped() {
    let Some(fonts) = system_font() else {
        return;
    };
    let style = TextStyle::new(40.0);
    let (_, plain) = draw(&fonts, "AB", style);
    let (_, with_gap) = draw(&fonts, "A\u{10FFFD}B", style);
    assert_eq!(with_gap, plain);
}
