// Keysvg Event Pairing
// Groups raw capture events into down/up key records

use crate::capture::{CaptureError, RawEvent, RowEvents};

/// Down and up code of one physical key actuation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    down: String,
    up: String,
}

impl KeyEvent {
    pub fn new(down: impl Into<String>, up: impl Into<String>) -> Self {
        Self {
            down: down.into(),
            up: up.into(),
        }
    }

    pub fn down(&self) -> &str {
        &self.down
    }

    pub fn up(&self) -> &str {
        &self.up
    }
}

/// Paired keys of one keyboard row, in tap order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCapture {
    row: u8,
    keys: Vec<KeyEvent>,
    /// Incomplete trailing groups that could not become a key
    dropped_groups: usize,
}

impl RowCapture {
    pub fn new(row: u8, keys: Vec<KeyEvent>) -> Self {
        Self {
            row,
            keys,
            dropped_groups: 0,
        }
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn keys(&self) -> &[KeyEvent] {
        &self.keys
    }

    pub fn key(&self, slot: usize) -> Option<&KeyEvent> {
        self.keys.get(slot)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn dropped_groups(&self) -> usize {
        self.dropped_groups
    }
}

/// Position inside a down/up/spacer triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Down,
    Up,
    Spacer,
}

fn require_code<'a>(row: u8, event: &'a RawEvent, what: &str) -> Result<&'a str, CaptureError> {
    event.code().ok_or_else(|| CaptureError::Malformed {
        row,
        line: event.line(),
        reason: format!("{} event has no code field", what),
    })
}

/// Pair one row's events.
///
/// Every three events form a key: the first carries the down code, the
/// second the up code, the third is a spacer and is ignored. A partial
/// group at the end is dropped and counted, never flushed.
pub fn pair_events(events: &RowEvents) -> Result<RowCapture, CaptureError> {
    let row = events.row();
    let mut keys = Vec::with_capacity(events.len() / 3);
    let mut phase = Phase::Down;
    let mut down: Option<&str> = None;
    let mut up: Option<&str> = None;

    for event in events.events() {
        phase = match phase {
            Phase::Down => {
                down = Some(require_code(row, event, "down")?);
                Phase::Up
            }
            Phase::Up => {
                up = Some(require_code(row, event, "up")?);
                Phase::Spacer
            }
            Phase::Spacer => {
                if let (Some(d), Some(u)) = (down.take(), up.take()) {
                    keys.push(KeyEvent::new(d, u));
                }
                Phase::Down
            }
        };
    }

    let dropped_groups = usize::from(phase != Phase::Down);
    if dropped_groups > 0 {
        log::warn!(
            "row {}: {} events is not a multiple of 3, dropped the incomplete last key",
            row,
            events.len()
        );
    }
    log::debug!("row {}: paired {} keys", row, keys.len());

    Ok(RowCapture {
        row,
        keys,
        dropped_groups,
    })
}

/// Pair every row, stopping at the first malformed one
pub fn pair_rows(rows: &[RowEvents]) -> Result<Vec<RowCapture>, CaptureError> {
    rows.iter().map(pair_events).collect()
}
