//! Physical unit conversion
//!
//! All page geometry is specified in millimetres and converted here, so the
//! packer and the compositor always agree on pixel sizes.

use crate::packer::Size;

/// Print resolution in pixels per inch
pub const DPI: f64 = 300.0;

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// A4 paper width in mm
pub const A4_WIDTH_MM: f64 = 210.0;

/// A4 paper height in mm
pub const A4_HEIGHT_MM: f64 = 297.0;

/// Convert a millimetre length to whole pixels at [`DPI`]
///
/// Negative and non-finite inputs clamp to zero.
pub fn mm_to_px(mm: f64) -> u32 {
    let px = (mm * DPI / MM_PER_INCH).round();
    if px.is_finite() && px > 0.0 {
        px as u32
    } else {
        0
    }
}

/// Pixel geometry of one print sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetGeometry {
    /// Full page size
    pub page: Size,
    /// Margin on every side
    pub margin: u32,
    /// Minimum gap between tags
    pub spacing: u32,
    /// Inset of the inner border from the cut line
    pub border: u32,
}

impl SheetGeometry {
    /// Build geometry from millimetre measurements
    pub fn from_mm(
        page_width_mm: f64,
        page_height_mm: f64,
        margin_mm: f64,
        spacing_mm: f64,
        border_mm: f64,
    ) -> Self {
        Self {
            page: Size::new(mm_to_px(page_width_mm), mm_to_px(page_height_mm)),
            margin: mm_to_px(margin_mm),
            spacing: mm_to_px(spacing_mm),
            border: mm_to_px(border_mm),
        }
    }

    /// A4 with 10mm margins, 2mm spacing and a 1mm border
    pub fn a4() -> Self {
        Self::from_mm(A4_WIDTH_MM, A4_HEIGHT_MM, 10.0, 2.0, 1.0)
    }

    /// Area inside the margins
    pub fn available(&self) -> Size {
        Size::new(
            self.page.width.saturating_sub(2 * self.margin),
            self.page.height.saturating_sub(2 * self.margin),
        )
    }
}

impl Default for SheetGeometry {
    fn default() -> Self {
        Self::a4()
    }
}
