// Keysvg Core Library
// Turns logic-analyzer key captures into a labelled keyboard diagram

pub mod capture;
pub mod config;
pub mod pairing;
pub mod pipeline;
pub mod render;
pub mod report;

pub use capture::{
    default_sources, load_row, load_rows, parse_capture, CaptureError, CaptureSource, FileSource,
    MemorySource, RawEvent, RowEvents,
};
pub use config::{Geometry, Layout, LayoutError, OffsetTable, TextStyle};
pub use pairing::{pair_events, pair_rows, KeyEvent, RowCapture};
pub use pipeline::{Pipeline, PipelineConfig, PipelineError, RowStats, RunSummary, DEFAULT_ROWS};
pub use render::{render_keyboard, write_svg, RenderError, RenderedSvg, DEFAULT_OUTPUT};
pub use report::{down_code_table, pairing_summary, CAPTURE_NOTE};
