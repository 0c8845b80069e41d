//! Sheet configuration

use crate::layout::TagLayout;
use crate::{NametagError, Result};
use roster::Category;
use serde::{Deserialize, Serialize};
use sheet_core::{Rgba, SheetGeometry, A4_HEIGHT_MM, A4_WIDTH_MM};

/// Tag layouts per category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub small: TagLayout,
    pub big: TagLayout,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            small: TagLayout::SMALL,
            big: TagLayout::BIG,
        }
    }
}

impl LayoutConfig {
    pub fn for_size(&self, small: bool) -> &TagLayout {
        if small {
            &self.small
        } else {
            &self.big
        }
    }
}

/// Page geometry, spare counts and line colours
///
/// Every field has a default, so a partial JSON object overrides only what it
/// names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SheetConfig {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub margin_mm: f64,
    pub spacing_mm: f64,
    pub border_mm: f64,
    /// Blank tags appended to the student category
    pub student_spares: usize,
    /// Blank tags appended to the non-student category
    pub non_student_spares: usize,
    pub grid_color: String,
    pub cut_color: String,
    pub border_color: String,
    pub layout: LayoutConfig,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            page_width_mm: A4_WIDTH_MM,
            page_height_mm: A4_HEIGHT_MM,
            margin_mm: 10.0,
            spacing_mm: 2.0,
            border_mm: 1.0,
            student_spares: 10,
            non_student_spares: 0,
            grid_color: "#e0e0e0".to_string(),
            cut_color: "#888888".to_string(),
            border_color: "#000000".to_string(),
            layout: LayoutConfig::default(),
        }
    }
}

impl SheetConfig {
    /// Parse a (possibly partial) configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SheetConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject geometry that cannot produce a page
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("pageWidthMm", self.page_width_mm),
            ("pageHeightMm", self.page_height_mm),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(NametagError::InvalidRequest(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let non_negative = [
            ("marginMm", self.margin_mm),
            ("spacingMm", self.spacing_mm),
            ("borderMm", self.border_mm),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(NametagError::InvalidRequest(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        if self.geometry().available().is_empty() {
            return Err(NametagError::InvalidRequest(
                "margins leave no printable area".to_string(),
            ));
        }
        for color in [&self.grid_color, &self.cut_color, &self.border_color] {
            parse_color(color)?;
        }
        Ok(())
    }

    /// Pixel geometry derived from the mm settings
    pub fn geometry(&self) -> SheetGeometry {
        SheetGeometry::from_mm(
            self.page_width_mm,
            self.page_height_mm,
            self.margin_mm,
            self.spacing_mm,
            self.border_mm,
        )
    }

    pub fn spares(&self, category: Category) -> usize {
        match category {
            Category::Student => self.student_spares,
            Category::NonStudent => self.non_student_spares,
        }
    }

    pub fn grid_rgba(&self) -> Rgba<u8> {
        parse_color(&self.grid_color).unwrap_or(Rgba([224, 224, 224, 255]))
    }

    pub fn cut_rgba(&self) -> Rgba<u8> {
        parse_color(&self.cut_color).unwrap_or(Rgba([136, 136, 136, 255]))
    }

    pub fn border_rgba(&self) -> Rgba<u8> {
        parse_color(&self.border_color).unwrap_or(Rgba([0, 0, 0, 255]))
    }
}

/// Parse `#rrggbb` or `#rgb`
pub fn parse_color(value: &str) -> Result<Rgba<u8>> {
    let invalid = || NametagError::InvalidRequest(format!("invalid color: {value}"));
    let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    match hex.len() {
        6 => Ok(Rgba([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            255,
        ])),
        3 => {
            let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Ok(Rgba([short(0)?, short(1)?, short(2)?, 255]))
        }
        _ => Err(invalid()),
    }
}
