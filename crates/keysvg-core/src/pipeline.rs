// Keysvg Pipeline
// Load -> pair -> render -> write, in one synchronous pass

use std::fmt;
use std::path::{Path, PathBuf};

use crate::capture::{default_sources, load_rows, CaptureError, CaptureSource, RowEvents};
use crate::config::Layout;
use crate::pairing::{pair_rows, RowCapture};
use crate::render::{render_keyboard, write_svg, RenderError, RenderedSvg, DEFAULT_OUTPUT};

/// Number of keyboard rows in a full capture session
pub const DEFAULT_ROWS: u8 = 6;

/// Any fatal error of a run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Inputs and output of a run
pub struct PipelineConfig {
    pub sources: Vec<Box<dyn CaptureSource>>,
    pub layout: Layout,
    pub output: PathBuf,
}

impl PipelineConfig {
    pub fn new(sources: Vec<Box<dyn CaptureSource>>, layout: Layout) -> Self {
        Self {
            sources,
            layout,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }

    /// `1.row.txt` .. `<rows>.row.txt` in `dir`, built-in layout, `keyboard.svg` in the working directory
    pub fn for_dir<P: AsRef<Path>>(dir: P, rows: u8) -> Self {
        Self::new(default_sources(dir, rows), Layout::default())
    }

    pub fn with_output<P: Into<PathBuf>>(mut self, output: P) -> Self {
        self.output = output.into();
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::for_dir(".", DEFAULT_ROWS)
    }
}

/// Per-row pairing result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowStats {
    pub row: u8,
    pub keys: usize,
    pub dropped_groups: usize,
}

/// Outcome of a complete run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub rows: Vec<RowStats>,
    pub text_elements: usize,
    /// Captured rows left out of the diagram
    pub skipped_rows: Vec<u8>,
    pub output: PathBuf,
}

impl RunSummary {
    pub fn dropped_groups(&self) -> usize {
        self.rows.iter().map(|r| r.dropped_groups).sum()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: usize = self.rows.iter().map(|r| r.keys).sum();
        write!(
            f,
            "{} rows, {} keys paired, {} incomplete groups dropped, {} labels written to {}",
            self.rows.len(),
            keys,
            self.dropped_groups(),
            self.text_elements,
            self.output.display()
        )?;
        if !self.skipped_rows.is_empty() {
            write!(f, " (rows not in layout: {:?})", self.skipped_rows)?;
        }
        Ok(())
    }
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn load(&self) -> Result<Vec<RowEvents>, CaptureError> {
        load_rows(&self.config.sources)
    }

    /// Load and pair every configured row
    pub fn capture(&self) -> Result<Vec<RowCapture>, CaptureError> {
        let rows = self.load()?;
        pair_rows(&rows)
    }

    pub fn render(&self, captures: &[RowCapture]) -> Result<RenderedSvg, RenderError> {
        render_keyboard(captures, &self.config.layout)
    }

    pub fn write(&self, svg: &RenderedSvg) -> Result<(), RenderError> {
        write_svg(&self.config.output, svg)
    }

    /// Run every stage and write the diagram
    pub fn run(&self) -> Result<RunSummary, PipelineError> {
        let captures = self.capture()?;
        let svg = self.render(&captures)?;
        self.write(&svg)?;
        Ok(summarize(&captures, &svg, &self.config.output))
    }
}

pub fn summarize(captures: &[RowCapture], svg: &RenderedSvg, output: &Path) -> RunSummary {
    RunSummary {
        rows: captures
            .iter()
            .map(|c| RowStats {
                row: c.row(),
                keys: c.len(),
                dropped_groups: c.dropped_groups(),
            })
            .collect(),
        text_elements: svg.text_elements(),
        skipped_rows: svg.skipped_rows().to_vec(),
        output: output.to_path_buf(),
    }
}
