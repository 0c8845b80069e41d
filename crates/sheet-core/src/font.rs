//! Font loading and fallback chains
//!
//! A [`FontLibrary`] is built once, explicitly, and handed to whatever draws
//! text. It holds families in priority order; text drawing walks that order
//! per character, so a roster mixing scripts still renders as long as some
//! family covers each glyph.

use crate::{Result, SheetError};
use ab_glyph::{Font, FontVec, GlyphId, PxScale};
use std::path::{Path, PathBuf};

/// Family registered for the bundled font asset
pub const BUNDLED_FAMILY: &str = "Noto Sans KR";

/// System families tried for Korean text, in order
const KOREAN_FAMILIES: &[&str] = &[
    "Malgun Gothic",
    "맑은 고딕",
    "Apple SD Gothic Neo",
    "Noto Sans CJK KR",
    "Dotum",
    "돋움",
    "Gulim",
    "굴림",
    "Batang",
    "바탕",
];

/// Families standing in for the generic `sans-serif`
const SANS_SERIF_FAMILIES: &[&str] = &["DejaVu Sans", "Liberation Sans", "Noto Sans", "Helvetica"];

/// Extensions scanned during discovery
const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc", "otc"];

/// Prioritised family list
///
/// With the bundled font registered it leads the list and Arial is skipped.
pub fn default_family_priority(bundled_available: bool) -> Vec<&'static str> {
    let mut families = Vec::new();
    if bundled_available {
        families.push(BUNDLED_FAMILY);
    }
    families.extend_from_slice(KOREAN_FAMILIES);
    if !bundled_available {
        families.push("Arial");
    }
    families.extend_from_slice(SANS_SERIF_FAMILIES);
    families
}

/// Font weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// One parsed font face
pub struct FontData {
    /// Family name as reported by the font
    pub family: String,
    /// Whether the face declares itself bold
    pub bold: bool,
    font: FontVec,
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("family", &self.family)
            .field("bold", &self.bold)
            .finish()
    }
}

impl FontData {
    /// Parse face `index` of a font file
    pub fn from_bytes(data: Vec<u8>, index: u32) -> Result<Self> {
        let (family, bold) = {
            let face = ttf_parser::Face::parse(&data, index)
                .map_err(|e| SheetError::FontParse(format!("{e:?}")))?;
            let family = family_names(&face)
                .into_iter()
                .next()
                .unwrap_or_else(|| "Unknown".to_string());
            (family, face.is_bold())
        };

        let font = FontVec::try_from_vec_and_index(data, index)
            .map_err(|e| SheetError::FontParse(e.to_string()))?;

        Ok(Self { family, bold, font })
    }

    /// Parse every face of a font file or collection
    pub fn all_from_bytes(data: &[u8]) -> Result<Vec<Self>> {
        let count = ttf_parser::fonts_in_collection(data).unwrap_or(1);
        (0..count)
            .map(|index| Self::from_bytes(data.to_vec(), index))
            .collect()
    }

    /// Override the family name
    pub fn with_family(mut self, family: &str) -> Self {
        self.family = family.to_string();
        self
    }

    /// Glyph ID for a character (0 means missing)
    pub fn glyph_id(&self, c: char) -> GlyphId {
        self.font.glyph_id(c)
    }

    /// Check if font has a glyph for the given character
    pub fn has_glyph(&self, c: char) -> bool {
        self.glyph_id(c).0 != 0
    }

    /// Scale for a CSS-style font size (em square height in pixels)
    pub fn scale_for_size(&self, size_px: f32) -> PxScale {
        let units_per_em = self.font.units_per_em().unwrap_or(1000.0);
        PxScale::from(size_px * self.font.height_unscaled() / units_per_em)
    }

    /// Underlying ab_glyph font
    pub fn font(&self) -> &FontVec {
        &self.font
    }
}

/// Family with regular and bold variants
#[derive(Debug, Default)]
pub struct FontFamily {
    pub name: String,
    pub regular: Option<FontData>,
    pub bold: Option<FontData>,
}

impl FontFamily {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            regular: None,
            bold: None,
        }
    }

    /// Add a face, filing it under its weight; the first face per slot wins
    pub fn add(&mut self, face: FontData) {
        let slot = if face.bold {
            &mut self.bold
        } else {
            &mut self.regular
        };
        if slot.is_none() {
            *slot = Some(face);
        }
    }

    /// Get the face for the weight, falling back to whatever exists
    ///
    /// The flag is true when a bold face was requested but only regular exists,
    /// so callers can embolden it themselves.
    pub fn get_variant(&self, weight: FontWeight) -> Option<(&FontData, bool)> {
        match weight {
            FontWeight::Bold => match (&self.bold, &self.regular) {
                (Some(bold), _) => Some((bold, false)),
                (None, Some(regular)) => Some((regular, true)),
                (None, None) => None,
            },
            FontWeight::Regular => self
                .regular
                .as_ref()
                .or(self.bold.as_ref())
                .map(|face| (face, false)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.regular.is_none() && self.bold.is_none()
    }
}

/// Ordered font fallback chain
#[derive(Debug, Default)]
pub struct FontLibrary {
    families: Vec<FontFamily>,
    bundled_available: bool,
}

impl FontLibrary {
    /// Library with no fonts; text drawing becomes a no-op
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register the bundled font at the head of the chain
    pub fn with_bundled(data: &[u8]) -> Result<Self> {
        let mut library = Self::empty();
        let mut family = FontFamily::new(BUNDLED_FAMILY);
        for face in FontData::all_from_bytes(data)? {
            family.add(face.with_family(BUNDLED_FAMILY));
        }
        library.families.push(family);
        library.bundled_available = true;
        Ok(library)
    }

    /// Load the bundled font from disk, if present
    ///
    /// A missing or unreadable file yields an empty library rather than an error.
    pub fn from_bundled_path(path: &Path) -> Self {
        match std::fs::read(path) {
            Ok(data) => match Self::with_bundled(&data) {
                Ok(library) => library,
                Err(e) => {
                    log::warn!("bundled font {} unusable: {}", path.display(), e);
                    Self::empty()
                }
            },
            Err(_) => {
                log::debug!("bundled font {} not found", path.display());
                Self::empty()
            }
        }
    }

    /// Whether the bundled font was registered
    pub fn is_bundled_available(&self) -> bool {
        self.bundled_available
    }

    /// Families in fallback order
    pub fn families(&self) -> &[FontFamily] {
        &self.families
    }

    pub fn is_empty(&self) -> bool {
        self.families.iter().all(FontFamily::is_empty)
    }

    /// Register font bytes, merging faces into families by name
    pub fn add_font(&mut self, data: &[u8]) -> Result<()> {
        for face in FontData::all_from_bytes(data)? {
            self.insert(face);
        }
        Ok(())
    }

    fn insert(&mut self, face: FontData) {
        match self
            .families
            .iter_mut()
            .find(|f| f.name.eq_ignore_ascii_case(&face.family))
        {
            Some(family) => family.add(face),
            None => {
                let mut family = FontFamily::new(&face.family);
                family.add(face);
                self.families.push(family);
            }
        }
    }

    /// Append system fonts matching `priority`, in priority order
    ///
    /// When no listed family exists, the first usable font found stands in as
    /// the platform default. Returns the number of families added.
    pub fn discover(&mut self, priority: &[&str], dirs: &[PathBuf]) -> usize {
        let mut files = Vec::new();
        for dir in dirs {
            collect_font_files(dir, &mut files);
        }
        files.sort();

        let mut matched: Vec<(usize, FontData)> = Vec::new();
        let mut platform_default: Option<FontData> = None;

        for path in &files {
            let Ok(data) = std::fs::read(path) else {
                continue;
            };
            let count = ttf_parser::fonts_in_collection(&data).unwrap_or(1);
            for index in 0..count {
                let names = match ttf_parser::Face::parse(&data, index) {
                    Ok(face) => family_names(&face),
                    Err(_) => continue,
                };
                let rank = priority.iter().position(|wanted| {
                    names.iter().any(|name| name.eq_ignore_ascii_case(wanted))
                });

                let needs_default = platform_default.is_none() && matched.is_empty();
                if rank.is_none() && !needs_default {
                    continue;
                }

                let face = match FontData::from_bytes(data.clone(), index) {
                    Ok(face) => face,
                    Err(e) => {
                        log::debug!("skipping {}: {}", path.display(), e);
                        continue;
                    }
                };
                match rank {
                    Some(rank) => {
                        matched.push((rank, face.with_family(priority[rank])));
                    }
                    None => platform_default = Some(face),
                }
            }
        }

        let before = self.families.len();
        matched.sort_by_key(|(rank, _)| *rank);
        for (_, face) in matched {
            self.insert(face);
        }

        if self.families.len() == before {
            if let Some(face) = platform_default {
                log::warn!(
                    "no preferred font family found, using {} as default",
                    face.family
                );
                self.insert(face);
            } else {
                log::warn!("no usable system fonts found, text will not be drawn");
            }
        }

        self.families.len() - before
    }

    /// Default system font directories for the current platform
    pub fn system_font_dirs() -> Vec<PathBuf> {
        let mut dirs = vec![
            PathBuf::from("/usr/share/fonts"),
            PathBuf::from("/usr/local/share/fonts"),
            PathBuf::from("/System/Library/Fonts"),
            PathBuf::from("/Library/Fonts"),
            PathBuf::from("C:\\Windows\\Fonts"),
        ];
        if let Some(home) = std::env::var_os("HOME") {
            let home = PathBuf::from(home);
            dirs.push(home.join(".fonts"));
            dirs.push(home.join(".local/share/fonts"));
            dirs.push(home.join("Library/Fonts"));
        }
        dirs
    }

    /// Face used for a character, with the faux-bold flag
    pub fn face_for_char(&self, c: char, weight: FontWeight) -> Option<(&FontData, bool)> {
        self.families
            .iter()
            .filter_map(|family| family.get_variant(weight))
            .find(|(face, _)| face.has_glyph(c))
    }

    /// First face in the chain, used for line metrics
    pub fn primary(&self, weight: FontWeight) -> Option<(&FontData, bool)> {
        self.families
            .iter()
            .find_map(|family| family.get_variant(weight))
    }
}

/// Family names of a face (typographic family first)
fn family_names(face: &ttf_parser::Face<'_>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for wanted in [
        ttf_parser::name_id::TYPOGRAPHIC_FAMILY,
        ttf_parser::name_id::FAMILY,
    ] {
        for name in face.names() {
            if name.name_id != wanted {
                continue;
            }
            if let Some(value) = name.to_string() {
                if !names.contains(&value) {
                    names.push(value);
                }
            }
        }
    }
    names
}

fn collect_font_files(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_font_files(&path, files);
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| FONT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
        {
            files.push(path);
        }
    }
}
