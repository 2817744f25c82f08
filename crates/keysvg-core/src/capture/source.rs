// Keysvg Capture Layer - Sources
// Where row captures come from: files on disk or in-memory fixtures

use std::fs;
use std::path::{Path, PathBuf};

/// File name suffix of a row capture (`1.row.txt`, `2.row.txt`, ...)
pub const CAPTURE_SUFFIX: &str = ".row.txt";

/// A readable row capture.
///
/// The pipeline takes an explicit list of sources instead of iterating
/// over fixed file names, so tests and embedders can supply captures
/// from anywhere.
pub trait CaptureSource {
    /// Physical keyboard row this capture belongs to (1-based)
    fn row(&self) -> u8;

    /// Human readable origin, used in error messages
    fn describe(&self) -> String;

    /// Read the whole capture as text
    fn read(&self) -> std::io::Result<String>;
}

/// Capture stored as a file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    row: u8,
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(row: u8, path: P) -> Self {
        Self {
            row,
            path: path.into(),
        }
    }

    /// Source for `<dir>/<row>.row.txt`
    pub fn for_row<P: AsRef<Path>>(dir: P, row: u8) -> Self {
        Self::new(row, dir.as_ref().join(format!("{}{}", row, CAPTURE_SUFFIX)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CaptureSource for FileSource {
    fn row(&self) -> u8 {
        self.row
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> std::io::Result<String> {
        fs::read_to_string(&self.path)
    }
}

/// Capture held in memory
#[derive(Debug, Clone)]
pub struct MemorySource {
    row: u8,
    content: String,
}

impl MemorySource {
    pub fn new(row: u8, content: impl Into<String>) -> Self {
        Self {
            row,
            content: content.into(),
        }
    }
}

impl CaptureSource for MemorySource {
    fn row(&self) -> u8 {
        self.row
    }

    fn describe(&self) -> String {
        format!("<memory row {}>", self.row)
    }

    fn read(&self) -> std::io::Result<String> {
        Ok(self.content.clone())
    }
}

/// File sources for rows `1..=rows` inside `dir`
pub fn default_sources<P: AsRef<Path>>(dir: P, rows: u8) -> Vec<Box<dyn CaptureSource>> {
    (1..=rows)
        .map(|row| Box::new(FileSource::for_row(dir.as_ref(), row)) as Box<dyn CaptureSource>)
        .collect()
}
