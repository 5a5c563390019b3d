/// Route module for the file-mirrored route table
///
/// Contains the segment tokenizer and the typed inventory entry.

pub mod entry;
pub mod pattern;

// Re-export commonly used types
pub use entry::{FileRole, RouteEntry};
pub use pattern::{classify_segment, is_group_identifier, Segment, SegmentKind};
