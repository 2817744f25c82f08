// Keysvg Capture Layer - Loader
// Splits a logic-analyzer CSV export into raw events

use std::collections::BTreeMap;

use super::{CaptureError, CaptureSource};

/// Field index holding the captured key code
const CODE_FIELD: usize = 1;

/// One data line of a capture, split on commas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// 1-based line number inside the capture
    line: usize,
    fields: Vec<String>,
}

impl RawEvent {
    pub fn new(line: usize, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    /// Parse a single CSV line
    pub fn parse(line: usize, text: &str) -> Self {
        let text = text.strip_suffix('\r').unwrap_or(text);
        Self::new(line, text.split(',').map(str::to_string).collect())
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// The captured code (field 1), if the line has one
    pub fn code(&self) -> Option<&str> {
        self.fields.get(CODE_FIELD).map(String::as_str)
    }
}

/// All raw events of one row capture, in file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowEvents {
    row: u8,
    events: Vec<RawEvent>,
}

impl RowEvents {
    pub fn new(row: u8, events: Vec<RawEvent>) -> Self {
        Self { row, events }
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn events(&self) -> &[RawEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Parse capture text into raw events.
///
/// The first line is the export header and the last line is whatever
/// follows the terminating newline; both are dropped.
pub fn parse_capture(row: u8, content: &str) -> RowEvents {
    let lines: Vec<&str> = content.split('\n').collect();
    if lines.len() < 2 {
        log::warn!("row {}: capture has no data lines", row);
        return RowEvents::new(row, Vec::new());
    }

    let trailer = lines[lines.len() - 1];
    if !trailer.trim_end_matches('\r').is_empty() {
        log::warn!(
            "row {}: capture does not end with a newline, dropping last line '{}'",
            row,
            trailer
        );
    }

    let events: Vec<RawEvent> = lines[1..lines.len() - 1]
        .iter()
        .enumerate()
        .map(|(idx, text)| RawEvent::parse(idx + 2, text))
        .collect();

    for event in &events {
        log::info!(
            target: "keysvg::capture",
            "row {} line {}: {}",
            row,
            event.line(),
            event.code().unwrap_or("")
        );
    }

    RowEvents::new(row, events)
}

/// Read and parse a single capture source
pub fn load_row(source: &dyn CaptureSource) -> Result<RowEvents, CaptureError> {
    let row = source.row();
    let content = source.read().map_err(|e| CaptureError::FileAccess {
        row,
        origin: source.describe(),
        source: e,
    })?;
    log::debug!("row {}: read {} bytes from {}", row, content.len(), source.describe());
    Ok(parse_capture(row, &content))
}

/// Load every source in order, stopping at the first unreadable one.
///
/// Each row may be captured once; a second source for the same row is
/// rejected before anything is read.
pub fn load_rows(sources: &[Box<dyn CaptureSource>]) -> Result<Vec<RowEvents>, CaptureError> {
    let mut seen: BTreeMap<u8, String> = BTreeMap::new();
    for source in sources {
        if let Some(first) = seen.insert(source.row(), source.describe()) {
            return Err(CaptureError::DuplicateRow {
                row: source.row(),
                first,
                second: source.describe(),
            });
        }
    }

    sources.iter().map(|source| load_row(source.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{FileSource, MemorySource};

    #[test]
    fn test_parse_drops_header_and_trailer() {
        let events = parse_capture(1, "idx,value\n1,10\n2,11\n3,12\n");
        assert_eq!(events.len(), 3);
        let codes: Vec<_> = events.events().iter().map(|e| e.code()).collect();
        assert_eq!(codes, vec![Some("10"), Some("11"), Some("12")]);
        assert_eq!(events.events()[0].line(), 2);
    }

    #[test]
    fn test_parse_drops_last_line_even_without_newline() {
        let events = parse_capture(1, "idx,value\n1,10\n2,11");
        assert_eq!(events.len(), 1);
        assert_eq!(events.events()[0].code(), Some("10"));
    }

    #[test]
    fn test_parse_short_content_has_no_events() {
        assert!(parse_capture(1, "").is_empty());
        assert!(parse_capture(1, "idx,value").is_empty());
        assert!(parse_capture(1, "idx,value\n").is_empty());
    }

    #[test]
    fn test_parse_strips_carriage_returns() {
        let events = parse_capture(2, "idx,value\r\n1,0x1C,x\r\n");
        assert_eq!(events.events()[0].fields(), &["1", "0x1C", "x"]);
    }

    #[test]
    fn test_raw_event_without_code_field() {
        let event = RawEvent::parse(4, "lonely");
        assert_eq!(event.code(), None);
        assert_eq!(event.line(), 4);
    }

    #[test]
    fn test_load_row_from_memory() {
        let source = MemorySource::new(5, "h\n1,a\n2,b\n3,c\n");
        let events = load_row(&source).unwrap();
        assert_eq!(events.row(), 5);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_load_rows_rejects_duplicate_rows() {
        let sources: Vec<Box<dyn CaptureSource>> = vec![
            Box::new(MemorySource::new(1, "h\n1,A\n2,a\n3,-\n")),
            Box::new(MemorySource::new(2, "h\n")),
            Box::new(MemorySource::new(1, "h\n1,B\n2,b\n3,-\n")),
        ];

        match load_rows(&sources) {
            Err(CaptureError::DuplicateRow { row, first, second }) => {
                assert_eq!(row, 1);
                assert_eq!(first, "<memory row 1>");
                assert_eq!(second, "<memory row 1>");
            }
            other => panic!("expected DuplicateRow error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_rows_fails_fast_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("1.row.txt"), "h\n1,a\n").unwrap();

        let sources: Vec<Box<dyn CaptureSource>> = vec![
            Box::new(FileSource::for_row(dir.path(), 1)),
            Box::new(FileSource::for_row(dir.path(), 2)),
            Box::new(MemorySource::new(3, "h\n")),
        ];

        match load_rows(&sources) {
            Err(CaptureError::FileAccess { row, origin, .. }) => {
                assert_eq!(row, 2);
                assert!(origin.ends_with("2.row.txt"));
            }
            other => panic!("expected FileAccess error, got {:?}", other),
        }
    }
}
