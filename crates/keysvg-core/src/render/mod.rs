// Keysvg Renderer
// Places every captured down code on the layout grid as an SVG document

mod svg_builder;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Layout;
use crate::pairing::RowCapture;
use svg_builder::SvgBuilder;

/// Default output file name
pub const DEFAULT_OUTPUT: &str = "keyboard.svg";

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("layout has row {row} but no capture was loaded for it")]
    MissingRow { row: u8 },

    #[error("layout row {row} has a key at slot {slot} but only {captured} keys were captured")]
    MissingKey { row: u8, slot: usize, captured: usize },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A rendered diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSvg {
    document: String,
    text_elements: usize,
    /// Captured rows the layout has no entry for
    skipped_rows: Vec<u8>,
}

impl RenderedSvg {
    pub fn as_str(&self) -> &str {
        &self.document
    }

    /// Number of key labels in the document
    pub fn text_elements(&self) -> usize {
        self.text_elements
    }

    pub fn skipped_rows(&self) -> &[u8] {
        &self.skipped_rows
    }
}

/// Render captured rows onto the layout.
///
/// Rows are walked in the layout's order. For every slot the cursor moves
/// by `offset * offset_scale + key_pitch` before the label is placed, so
/// the first key of a row lands at `cursor_start + key_pitch` when its
/// offset is zero. A layout slot without a captured key is an error.
pub fn render_keyboard(captures: &[RowCapture], layout: &Layout) -> Result<RenderedSvg, RenderError> {
    let by_row: BTreeMap<u8, &RowCapture> = captures.iter().map(|c| (c.row(), c)).collect();
    let geometry = &layout.geometry;
    let mut svg = SvgBuilder::new(geometry.width, geometry.height);

    for (row, offsets) in layout.offsets.rows() {
        let capture = by_row.get(&row).ok_or(RenderError::MissingRow { row })?;
        let y = f64::from(row) * geometry.row_pitch;
        let mut x = geometry.cursor_start;

        for (slot, offset) in offsets.iter().enumerate() {
            x += offset * geometry.offset_scale + geometry.key_pitch;
            let key = capture.key(slot).ok_or(RenderError::MissingKey {
                row,
                slot,
                captured: capture.len(),
            })?;
            svg.text(x, y, key.down(), &layout.style);
        }

        if capture.len() > offsets.len() {
            log::debug!(
                "row {}: {} captured keys have no layout slot",
                row,
                capture.len() - offsets.len()
            );
        }
    }

    let skipped_rows: Vec<u8> = by_row
        .iter()
        .filter(|(row, _)| layout.offsets.row(**row).is_none())
        .map(|(row, capture)| {
            log::warn!(
                "row {}: layout has no entry for this row, {} captured keys not drawn",
                row,
                capture.len()
            );
            *row
        })
        .collect();

    let text_elements = svg.len();
    log::debug!("rendered {} key labels", text_elements);
    Ok(RenderedSvg {
        document: svg.build(),
        text_elements,
        skipped_rows,
    })
}

/// Write the document, replacing any existing file
pub fn write_svg<P: AsRef<Path>>(path: P, svg: &RenderedSvg) -> Result<(), RenderError> {
    let path = path.as_ref();
    fs::write(path, svg.as_str()).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("wrote {} ({} bytes)", path.display(), svg.as_str().len());
    Ok(())
}
