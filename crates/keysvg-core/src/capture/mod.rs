// Keysvg Capture Layer
// Row capture sources and CSV event loading

mod loader;
mod source;

pub use loader::{load_row, load_rows, parse_capture, RawEvent, RowEvents};
pub use source::{default_sources, CaptureSource, FileSource, MemorySource, CAPTURE_SUFFIX};

/// Errors raised while reading or interpreting row captures
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("cannot read capture for row {row} from {origin}: {source}")]
    FileAccess {
        row: u8,
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("row {row} is captured by both {first} and {second}")]
    DuplicateRow { row: u8, first: String, second: String },

    #[error("malformed capture for row {row}, line {line}: {reason}")]
    Malformed { row: u8, line: usize, reason: String },
}
