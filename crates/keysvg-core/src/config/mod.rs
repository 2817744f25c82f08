// Keysvg Config API
// Diagram layout: per-row offsets, geometry and text style

pub mod layout;

pub use layout::{Geometry, Layout, LayoutError, OffsetTable, TextStyle, BUILTIN_OFFSETS};
