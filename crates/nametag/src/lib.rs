//! Nametag - name tag rendering and A4 sheet generation
//!
//! This crate provides:
//! - The generation request schema and sheet configuration
//! - Per-person tag rendering over a background template
//! - A4 page composition with packed, possibly rotated tags
//! - Batch orchestration into ZIP (or other) output sinks
//!
//! # Example
//!
//! ```ignore
//! use nametag::{GenerationRequest, Generator, RandomPicker};
//! use sheet_core::FontLibrary;
//!
//! let fonts = FontLibrary::from_bundled_path("public/fonts/NotoSansKR-Regular.ttf".as_ref());
//! let request = GenerationRequest::from_json(request_json)?;
//! let mut picker = RandomPicker::from_entropy();
//! let (summary, zip) = Generator::new(&fonts).generate_archive(&request, &mut picker)?;
//! std::fs::write("nametags.zip", zip)?;
//! ```

pub mod archive;
mod compositor;
mod config;
mod layout;
mod orchestrator;
mod picker;
mod renderer;
mod schema;

pub use archive::{DirectorySink, MemorySink, OutputSink, UniqueNames, ZipSink};
pub use compositor::{PageCompositor, TagContent};
pub use config::{parse_color, LayoutConfig, SheetConfig};
pub use layout::{LineKind, TagLayout, TextLine};
pub use orchestrator::{GenerationSummary, Generator, TemplatePool};
pub use picker::{RandomPicker, SequencePicker, TemplatePicker};
pub use renderer::TagRenderer;
pub use schema::{GenerationRequest, TemplateFile};

use thiserror::Error;

/// Errors that can occur during name tag generation
#[derive(Debug, Error)]
pub enum NametagError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Roster(#[from] roster::RosterError),

    #[error(transparent)]
    Sheet(#[from] sheet_core::SheetError),

    #[error("Failed to write output: {0}")]
    Stream(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for name tag operations
pub type Result<T> = std::result::Result<T, NametagError>;
