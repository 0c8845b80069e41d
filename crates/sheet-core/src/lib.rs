//! Sheet Core - Low-level print sheet primitives
//!
//! This crate provides functionality for:
//! - Converting physical (mm) lengths to print pixels at 300 ppi
//! - Greedily packing equal-sized tags onto a page with 90° rotation
//! - Drawing guide lines, cut lines and scaled/rotated images on a raster page
//! - Loading fonts and drawing text with per-character font fallback
//! - Decoding data-URI images and encoding PNG output
//!
//! # Example
//!
//! ```ignore
//! use sheet_core::{pack_page, Canvas, Rect, Rgba, SheetGeometry, Size};
//!
//! let geometry = SheetGeometry::a4();
//! let tag = Size::new(1004, 602);
//! let placements = pack_page(tag, geometry.available(), 12, geometry.spacing);
//! let mut canvas = Canvas::new(geometry.page.width, geometry.page.height);
//! for p in &placements {
//!     let cut = Rect::new(geometry.margin + p.x, geometry.margin + p.y, p.width, p.height);
//!     canvas.stroke_rect(cut, Rgba([136, 136, 136, 255]));
//! }
//! let png = canvas.encode_png()?;
//! ```

mod canvas;
mod font;
mod imaging;
mod packer;
mod text;
mod units;

pub use ::image::{Rgba, RgbaImage};
pub use canvas::Canvas;
pub use font::{default_family_priority, FontData, FontFamily, FontLibrary, FontWeight};
pub use imaging::{decode_data_uri, decode_image, encode_png, image_dimensions, strip_data_uri};
pub use packer::{pack, pack_page, Placement, Rect, Size};
pub use text::{draw_text, Align, TextStyle};
pub use units::{mm_to_px, SheetGeometry, A4_HEIGHT_MM, A4_WIDTH_MM, DPI, MM_PER_INCH};

use thiserror::Error;

/// Errors that can occur while building sheets
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    #[error("Failed to encode image: {0}")]
    ImageEncode(String),

    #[error("Failed to decode data URI: {0}")]
    Decode(String),

    #[error("Failed to parse font: {0}")]
    FontParse(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for sheet operations
pub type Result<T> = std::result::Result<T, SheetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_default() {
        assert_eq!(Align::default(), Align::Left);
    }

    #[test]
    fn test_error_messages() {
        let err = SheetError::ImageDecode("bad header".to_string());
        assert_eq!(err.to_string(), "Failed to decode image: bad header");
    }
}
