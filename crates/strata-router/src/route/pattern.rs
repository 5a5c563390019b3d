/// Segment tokenizer for route-table paths
///
/// Pure functional parsing of one path atom into a typed segment.
/// All functions are **pure**: same input → same output, no side effects.

use serde::Serialize;

/// Kind of a single path segment, derived from its text
///
/// # Examples
///
/// ```
/// use strata_router::route::pattern::{classify_segment, SegmentKind};
///
/// assert_eq!(classify_segment("about"), SegmentKind::Literal);
/// assert_eq!(classify_segment("(marketing)"), SegmentKind::Group("marketing".into()));
/// assert_eq!(classify_segment("[id]"), SegmentKind::Dynamic("id".into()));
/// assert_eq!(classify_segment("[...slug]"), SegmentKind::CatchAll("slug".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum SegmentKind {
    /// Plain text, matched verbatim
    Literal,
    /// `(name)`: present in the file tree, absent from the URL
    Group(String),
    /// `[name]`: captures exactly one URL segment
    Dynamic(String),
    /// `[...name]`: captures every remaining URL segment
    CatchAll(String),
}

/// One `/`-delimited atom of a path together with its kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Segment {
    pub text: String,
    pub kind: SegmentKind,
}

impl Segment {
    /// Tokenizes a single atom
    pub fn parse(text: &str) -> Self {
        Self {
            text: text.to_string(),
            kind: classify_segment(text),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, SegmentKind::Group(_))
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self.kind, SegmentKind::Dynamic(_))
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self.kind, SegmentKind::CatchAll(_))
    }

    /// Capture name for dynamic and catch-all segments
    pub fn capture_name(&self) -> Option<&str> {
        match &self.kind {
            SegmentKind::Dynamic(name) | SegmentKind::CatchAll(name) => Some(name),
            _ => None,
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Classifies a segment into its kind (pure function)
///
/// # Parsing Rules (evaluated in order)
///
/// 1. **Group**: `(name)` with a non-empty name
/// 2. **Catch-all**: `[...name]`
/// 3. **Dynamic**: `[name]`
/// 4. **Literal**: any other text, including malformed brackets like `[]` or `[...]`
pub fn classify_segment(segment: &str) -> SegmentKind {
    if let Some(name) = segment.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        if !name.is_empty() {
            return SegmentKind::Group(name.to_string());
        }
    }

    match segment.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        Some(inner) => match inner.strip_prefix("...") {
            Some(name) if is_capture_name(name) => SegmentKind::CatchAll(name.to_string()),
            Some(_) => SegmentKind::Literal,
            None if is_capture_name(inner) => SegmentKind::Dynamic(inner.to_string()),
            None => SegmentKind::Literal,
        },
        None => SegmentKind::Literal,
    }
}

fn is_capture_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['[', ']', '/'])
}

/// Checks whether a URL segment is shaped like a group identifier
pub fn is_group_identifier(segment: &str) -> bool {
    matches!(classify_segment(segment), SegmentKind::Group(_))
}
