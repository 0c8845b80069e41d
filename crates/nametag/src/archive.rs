//! Output sinks
//!
//! Pages and tags are handed to a sink one at a time as soon as they are
//! encoded. Entry names are made unique per sink.

use crate::{NametagError, Result};
use std::collections::HashSet;
use std::fs;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

impl From<ZipError> for NametagError {
    fn from(err: ZipError) -> Self {
        NametagError::Stream(err.to_string())
    }
}

/// Receives generated files
pub trait OutputSink {
    /// Store one entry, returning the name it was stored under
    fn write_entry(&mut self, name: &str, data: &[u8]) -> Result<String>;
}

/// Sanitises entry names and resolves duplicates
///
/// Path separators become `_`. A repeated name gets `_2`, `_3`, ...
/// inserted before its extension.
#[derive(Debug, Default)]
pub struct UniqueNames {
    taken: HashSet<String>,
}

impl UniqueNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, name: &str) -> String {
        let clean = sanitize(name);
        if self.taken.insert(clean.clone()) {
            return clean;
        }

        let (stem, extension) = split_extension(&clean);
        let mut n = 2;
        loop {
            let candidate = format!("{stem}_{n}{extension}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

fn sanitize(name: &str) -> String {
    let clean: String = name
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    if clean.is_empty() {
        "_".to_string()
    } else {
        clean
    }
}

fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) if pos > 0 => name.split_at(pos),
        _ => (name, ""),
    }
}

/// Streams entries into a ZIP archive (Deflate, level 6)
pub struct ZipSink<W: Write + Seek> {
    writer: ZipWriter<W>,
    names: UniqueNames,
    options: SimpleFileOptions,
}

impl<W: Write + Seek> ZipSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: ZipWriter::new(inner),
            names: UniqueNames::new(),
            options: SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(6)),
        }
    }

    /// Write the central directory and return the underlying writer
    pub fn finish(self) -> Result<W> {
        Ok(self.writer.finish()?)
    }
}

impl<W: Write + Seek> OutputSink for ZipSink<W> {
    fn write_entry(&mut self, name: &str, data: &[u8]) -> Result<String> {
        let name = self.names.claim(name);
        self.writer.start_file(name.as_str(), self.options)?;
        self.writer
            .write_all(data)
            .map_err(|e| NametagError::Stream(format!("{name}: {e}")))?;
        log::debug!("zipped {name} ({} bytes)", data.len());
        Ok(name)
    }
}

/// Keeps entries in memory, in write order
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Vec<(String, Vec<u8>)>,
    names: UniqueNames,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[(String, Vec<u8>)] {
        &self.entries
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, data)| data.as_slice())
    }

    pub fn into_entries(self) -> Vec<(String, Vec<u8>)> {
        self.entries
    }
}

impl OutputSink for MemorySink {
    fn write_entry(&mut self, name: &str, data: &[u8]) -> Result<String> {
        let name = self.names.claim(name);
        self.entries.push((name.clone(), data.to_vec()));
        Ok(name)
    }
}

/// Writes each entry as a file under a directory
pub struct DirectorySink {
    root: PathBuf,
    names: UniqueNames,
}

impl DirectorySink {
    /// Create the directory if needed
    pub fn create(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            names: UniqueNames::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl OutputSink for DirectorySink {
    fn write_entry(&mut self, name: &str, data: &[u8]) -> Result<String> {
        let name = self.names.claim(name);
        let path = self.root.join(&name);
        fs::write(&path, data)
            .map_err(|e| NametagError::Stream(format!("{}: {e}", path.display())))?;
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Read};

    #[test]
    fn test_unique_names() {
        let mut names = UniqueNames::new();
        assert_eq!(names.claim("홍길동_small.png"), "홍길동_small.png");
        assert_eq!(names.claim("홍길동_small.png"), "홍길동_small_2.png");
        assert_eq!(names.claim("홍길동_small.png"), "홍길동_small_3.png");
        assert_eq!(names.claim("a/b\\c.png"), "a_b_c.png");
        assert_eq!(names.claim("README"), "README");
        assert_eq!(names.claim("README"), "README_2");
        assert_eq!(names.claim(".hidden"), ".hidden");
        assert_eq!(names.claim(".hidden"), ".hidden_2");
    }

    #[test]
    fn test_unique_names_skip_taken_suffix() {
        let mut names = UniqueNames::new();
        assert_eq!(names.claim("x_2.png"), "x_2.png");
        assert_eq!(names.claim("x.png"), "x.png");
        assert_eq!(names.claim("x.png"), "x_3.png");
    }

    #[test]
    fn test_memory_sink_keeps_order() {
        let mut sink = MemorySink::new();
        sink.write_entry("A4_Page_1.png", b"one").unwrap();
        sink.write_entry("A4_Page_2.png", b"two").unwrap();
        assert_eq!(sink.names(), vec!["A4_Page_1.png", "A4_Page_2.png"]);
        assert_eq!(sink.get("A4_Page_2.png"), Some(&b"two"[..]));
        assert_eq!(sink.get("missing"), None);
    }

    #[test]
    fn test_zip_sink_roundtrip() {
        let mut sink = ZipSink::new(Cursor::new(Vec::new()));
        assert_eq!(sink.write_entry("a.png", b"first").unwrap(), "a.png");
        assert_eq!(sink.write_entry("a.png", b"second").unwrap(), "a_2.png");
        let bytes = sink.finish().unwrap().into_inner();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        let mut content = String::new();
        archive
            .by_name("a_2.png")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "second");
    }

    #[test]
    fn test_directory_sink_writes_files() {
        let root = std::env::temp_dir().join(format!("nametag-sink-{}", std::process::id()));
        let mut sink = DirectorySink::create(&root).unwrap();
        let name = sink.write_entry("Kim/Lee_big.png", b"png").unwrap();
        assert_eq!(name, "Kim_Lee_big.png");
        assert_eq!(fs::read(root.join(&name)).unwrap(), b"png");
        fs::remove_dir_all(&root).unwrap();
    }
}
