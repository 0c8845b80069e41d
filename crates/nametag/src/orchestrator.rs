//! Batch generation
//!
//! Turns a validated request into either packed A4 pages or one image per
//! person and hands every file to an [`OutputSink`].

use crate::archive::{OutputSink, ZipSink};
use crate::compositor::{PageCompositor, TagContent};
use crate::config::SheetConfig;
use crate::picker::TemplatePicker;
use crate::renderer::TagRenderer;
use crate::schema::{GenerationRequest, TemplateFile};
use crate::{NametagError, Result};
use roster::{split_by_category, Category, PersonRecord};
use sheet_core::{
    decode_data_uri, decode_image, encode_png, image_dimensions, mm_to_px, pack_page, RgbaImage,
    SheetGeometry, Size,
};
use std::io::Cursor;

/// Decoded templates of one category
///
/// Bytes are decoded from their data URIs up front; pixels are decoded on
/// first use and cached.
#[derive(Debug, Default)]
pub struct TemplatePool {
    sources: Vec<Vec<u8>>,
    images: Vec<Option<RgbaImage>>,
}

impl TemplatePool {
    pub fn from_files(files: &[TemplateFile]) -> Result<Self> {
        let sources = files
            .iter()
            .map(|file| decode_data_uri(&file.data))
            .collect::<sheet_core::Result<Vec<_>>>()?;
        Ok(Self::from_bytes(sources))
    }

    /// Pool of already encoded images (PNG, JPEG, ...)
    pub fn from_bytes(sources: Vec<Vec<u8>>) -> Self {
        let images = sources.iter().map(|_| None).collect();
        Self { sources, images }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Pixel size of the first template, read from its header
    pub fn first_dimensions(&self) -> Result<Option<Size>> {
        match self.sources.first() {
            Some(bytes) => {
                let (width, height) = image_dimensions(bytes)?;
                Ok(Some(Size::new(width, height)))
            }
            None => Ok(None),
        }
    }

    pub fn background(&mut self, index: usize) -> Result<&RgbaImage> {
        let source = self.sources.get(index).ok_or_else(|| {
            NametagError::InvalidRequest(format!("template index {index} out of range"))
        })?;
        let image = match self.images[index].take() {
            Some(image) => image,
            None => decode_image(source)?.to_rgba8(),
        };
        Ok(self.images[index].insert(image))
    }
}

/// What a run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    /// A4 pages written (arranged mode)
    pub pages: usize,
    /// Individual tag files written
    pub files: usize,
    /// Student slots placed on pages, spares included
    pub placed_students: usize,
    pub placed_non_students: usize,
    /// People left out because their category had no templates
    pub skipped: usize,
    /// Entry names in write order
    pub entries: Vec<String>,
}

impl GenerationSummary {
    pub fn placed(&self, category: Category) -> usize {
        match category {
            Category::Student => self.placed_students,
            Category::NonStudent => self.placed_non_students,
        }
    }

    fn add_placed(&mut self, category: Category, count: usize) {
        match category {
            Category::Student => self.placed_students += count,
            Category::NonStudent => self.placed_non_students += count,
        }
    }
}

/// Drives a whole request
pub struct Generator<'a> {
    fonts: &'a sheet_core::FontLibrary,
    config: SheetConfig,
}

impl<'a> Generator<'a> {
    pub fn new(fonts: &'a sheet_core::FontLibrary) -> Self {
        Self::with_config(fonts, SheetConfig::default())
    }

    pub fn with_config(fonts: &'a sheet_core::FontLibrary, config: SheetConfig) -> Self {
        Self { fonts, config }
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn generate(
        &self,
        request: &GenerationRequest,
        sink: &mut dyn OutputSink,
        picker: &mut dyn TemplatePicker,
    ) -> Result<GenerationSummary> {
        let people = request.people()?;
        let mut small = TemplatePool::from_files(&request.small_nametag_files)?;
        let mut big = TemplatePool::from_files(&request.big_nametag_files)?;

        log::debug!(
            "generating for {} people ({} small, {} big templates, arranged: {})",
            people.len(),
            small.len(),
            big.len(),
            request.use_arranged_layout
        );

        let mut summary = GenerationSummary::default();
        if request.use_arranged_layout {
            let compositor = PageCompositor::new(self.fonts, &self.config);
            let geometry = *compositor.geometry();
            let (students, others) = split_by_category(&people);

            // Size both categories before the first page is written
            let groups = [
                (Category::Student, students, &mut small, request.student_width_mm),
                (Category::NonStudent, others, &mut big, request.non_student_width_mm),
            ];
            let mut planned = Vec::with_capacity(groups.len());
            for (category, members, pool, width_mm) in groups {
                if members.is_empty() {
                    continue;
                }
                let Some(template) = pool.first_dimensions()? else {
                    log::warn!(
                        "no {} templates, skipping {} people",
                        category.suffix(),
                        members.len()
                    );
                    summary.skipped += members.len();
                    continue;
                };
                let tag = tag_size(width_mm, template);
                check_fits_page(category, tag, &geometry)?;
                planned.push((category, members, pool, tag));
            }

            for (category, members, pool, tag) in planned {
                self.arrange_category(
                    &compositor,
                    category,
                    &members,
                    pool,
                    tag,
                    sink,
                    picker,
                    &mut summary,
                )?;
            }
        } else {
            let renderer = TagRenderer::with_layouts(self.fonts, self.config.layout);
            for person in &people {
                let pool = if person.is_student() { &mut small } else { &mut big };
                if pool.is_empty() {
                    log::warn!(
                        "no {} templates, skipping {}",
                        person.category().suffix(),
                        person.name()
                    );
                    summary.skipped += 1;
                    continue;
                }

                let index = picker.pick(pool.len());
                let background = pool.background(index)?;
                let tag = renderer.render_image(person, background, person.is_student());
                let name = sink.write_entry(&tag_file_name(person), &encode_png(&tag)?)?;
                summary.files += 1;
                summary.entries.push(name);
            }
        }

        log::debug!(
            "wrote {} pages and {} files, skipped {}",
            summary.pages,
            summary.files,
            summary.skipped
        );
        Ok(summary)
    }

    /// Run a whole request into an in-memory ZIP
    ///
    /// Archive bytes are only returned when every entry was written.
    pub fn generate_archive(
        &self,
        request: &GenerationRequest,
        picker: &mut dyn TemplatePicker,
    ) -> Result<(GenerationSummary, Vec<u8>)> {
        let mut sink = ZipSink::new(Cursor::new(Vec::new()));
        let summary = self.generate(request, &mut sink, picker)?;
        let bytes = sink.finish()?.into_inner();
        Ok((summary, bytes))
    }

    #[allow(clippy::too_many_arguments)]
    fn arrange_category(
        &self,
        compositor: &PageCompositor<'_>,
        category: Category,
        members: &[&PersonRecord],
        pool: &mut TemplatePool,
        tag: Size,
        sink: &mut dyn OutputSink,
        picker: &mut dyn TemplatePicker,
        summary: &mut GenerationSummary,
    ) -> Result<()> {
        let mut contents: Vec<TagContent<'_>> =
            members.iter().map(|p| TagContent::Person(*p)).collect();
        contents.extend((0..self.config.spares(category)).map(|_| TagContent::Spare));

        let geometry = *compositor.geometry();
        let area = geometry.available();
        let mut remaining = contents.as_slice();
        while !remaining.is_empty() {
            let placements = pack_page(tag, area, remaining.len(), geometry.spacing);
            let small = category.is_small();
            let page = compositor.compose(tag, &placements, remaining, pool, picker, small)?;
            let bytes = compositor.encode(&page)?;

            let page_number = summary.pages + 1;
            let name = sink.write_entry(&format!("A4_Page_{page_number}.png"), &bytes)?;
            let placed = placements.len().min(remaining.len());
            log::debug!(
                "page {page_number}: {placed} {} tags of {}x{}",
                category.suffix(),
                tag.width,
                tag.height
            );

            summary.pages += 1;
            summary.entries.push(name);
            summary.add_placed(category, placed);
            remaining = &remaining[placed..];
        }

        Ok(())
    }
}

/// A tag may overhang the margins but must fit on the paper in some orientation
fn check_fits_page(category: Category, tag: Size, geometry: &SheetGeometry) -> Result<()> {
    let page = geometry.page;
    let fits = |size: Size| size.width <= page.width && size.height <= page.height;
    if fits(tag) || fits(tag.transposed()) {
        return Ok(());
    }
    Err(NametagError::InvalidRequest(format!(
        "{} tag of {}x{} px does not fit on a {}x{} px page",
        category.suffix(),
        tag.width,
        tag.height,
        page.width,
        page.height
    )))
}

/// Tag pixel size for a physical width, keeping the template's aspect ratio
pub(crate) fn tag_size(width_mm: f64, template: Size) -> Size {
    let width = mm_to_px(width_mm);
    if template.width == 0 {
        return Size::new(width, 0);
    }
    let height = (width as f64 * template.height as f64 / template.width as f64).round() as u32;
    Size::new(width, height)
}

/// `<name>[_<group>]_<small|big>.png`
pub(crate) fn tag_file_name(person: &PersonRecord) -> String {
    let suffix = person.category().suffix();
    if person.has_group() {
        format!("{}_{}_{suffix}.png", person.name(), person.group())
    } else {
        format!("{}_{suffix}.png", person.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::MemorySink;
    use crate::picker::SequencePicker;
    use pretty_assertions::assert_eq;
    use sheet_core::{FontLibrary, Rgba, SheetError};

    fn template(width: u32, height: u32) -> Vec<u8> {
        encode_png(&RgbaImage::from_pixel(width, height, Rgba([200, 220, 255, 255]))).unwrap()
    }

    #[test]
    fn test_tag_size_keeps_aspect() {
        assert_eq!(tag_size(85.0, Size::new(1000, 600)), Size::new(1004, 602));
        assert_eq!(tag_size(100.0, Size::new(2000, 1000)), Size::new(1181, 591));
    }

    #[test]
    fn test_tag_must_fit_on_paper() {
        let a4 = SheetGeometry::a4();
        assert!(check_fits_page(Category::Student, Size::new(2400, 3500), &a4).is_ok());
        // wider than the page but fits turned
        assert!(check_fits_page(Category::Student, Size::new(3000, 2000), &a4).is_ok());

        let err = check_fits_page(Category::NonStudent, Size::new(u32::MAX, 20), &a4).unwrap_err();
        assert!(matches!(err, NametagError::InvalidRequest(_)));
        assert!(err.to_string().contains("big tag of"), "{err}");
    }

    #[test]
    fn test_tag_file_name() {
        let with_group = PersonRecord::new("홍길동", "은혜교회", "5학년", true).unwrap();
        let without = PersonRecord::new("Kim", " ", "Pastor", false).unwrap();
        assert_eq!(tag_file_name(&with_group), "홍길동_은혜교회_small.png");
        assert_eq!(tag_file_name(&without), "Kim_big.png");
    }

    #[test]
    fn test_pool_caches_and_reports_size() {
        let mut pool = TemplatePool::from_bytes(vec![template(30, 10), template(5, 5)]);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.first_dimensions().unwrap(), Some(Size::new(30, 10)));
        assert_eq!(pool.background(1).unwrap().dimensions(), (5, 5));
        assert_eq!(pool.background(1).unwrap().dimensions(), (5, 5));
        assert!(pool.background(2).is_err());
        assert_eq!(TemplatePool::default().first_dimensions().unwrap(), None);
    }

    #[test]
    fn test_pool_rejects_bad_data_uri() {
        let files = [TemplateFile::new("bad.png", "data:image/png;base64,@@@")];
        let err = TemplatePool::from_files(&files).unwrap_err();
        assert!(matches!(err, NametagError::Sheet(SheetError::Decode(_))));
    }

    #[test]
    fn test_individual_mode_skips_missing_category() {
        use base64::Engine as _;
        let data = format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(template(40, 20))
        );
        let request = GenerationRequest {
            person_data: vec![
                roster::RawRow::new("Lee", "", "3학년", "T"),
                roster::RawRow::new("Kim", "Grace", "Pastor", "F"),
            ],
            big_nametag_files: vec![TemplateFile::new("big.png", &data)],
            ..GenerationRequest::default()
        };

        let fonts = FontLibrary::empty();
        let mut sink = MemorySink::new();
        let summary = Generator::new(&fonts)
            .generate(&request, &mut sink, &mut SequencePicker::first())
            .unwrap();

        assert_eq!(sink.names(), vec!["Kim_Grace_big.png"]);
        assert_eq!(summary.files, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.pages, 0);
    }
}
