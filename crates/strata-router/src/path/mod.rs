/// Path utilities for normalization and segment algebra
///
/// All functions are **pure**: given same input, always produce same output with no side effects.

use std::borrow::Cow;

use crate::route::pattern::Segment;

pub mod hierarchy;
pub use hierarchy::DirectoryWalk;

/// Validates if a path is already in canonical form
///
/// # Rules
///
/// - Segments are separated by a single `/`
/// - No leading or trailing `/`, no `\`
/// - No leading `.` segment
///
/// # Examples
///
/// ```
/// use strata_router::path::is_canonical;
///
/// assert!(is_canonical(""));
/// assert!(is_canonical("about"));
/// assert!(is_canonical("(app)/users/[id]/index.html"));
///
/// assert!(!is_canonical("/about"));
/// assert!(!is_canonical("./about"));
/// assert!(!is_canonical("about//page"));
/// assert!(!is_canonical("about\\page"));
/// ```
pub fn is_canonical(path: &str) -> bool {
    if path.is_empty() {
        return true;
    }

    !(path.starts_with('/')
        || path.ends_with('/')
        || path.contains("//")
        || path.contains('\\')
        || path == "."
        || path.starts_with("./"))
}

/// Normalize a path to canonical string form
///
/// Returns `Cow::Borrowed` when input is already canonical.
///
/// # Handles
///
/// - Backslashes: `src\app\about` → `src/app/about`
/// - Leading `./`: `./src/app` → `src/app`
/// - Empty segments: `/path///to/` → `path/to`
///
/// Bracket and parenthesis syntax is left intact.
///
/// # Examples
///
/// ```
/// use strata_router::path::normalize_str;
///
/// assert_eq!(normalize_str("./src\\app//(site)/about/"), "src/app/(site)/about");
/// assert_eq!(normalize_str("/"), "");
/// ```
pub fn normalize_str(path: &str) -> Cow<'_, str> {
    if is_canonical(path) {
        return Cow::Borrowed(path);
    }

    Cow::Owned(atoms(path).collect::<Vec<_>>().join("/"))
}

/// Splits any path into canonical atoms
///
/// Unifies separators, drops empty atoms and skips every leading `.` atom.
fn atoms(path: &str) -> impl Iterator<Item = &str> {
    path.split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .skip_while(|s| *s == ".")
}

/// Normalize a path into typed segments
///
/// Idempotent: `normalize(&join(&normalize(p))) == normalize(p)`.
///
/// # Examples
///
/// ```
/// use strata_router::path::normalize;
///
/// let segments = normalize("./(shop)\\items//[id]/");
/// let texts: Vec<&str> = segments.iter().map(|s| s.as_str()).collect();
/// assert_eq!(texts, vec!["(shop)", "items", "[id]"]);
/// assert!(segments[0].is_group());
/// assert!(segments[2].is_dynamic());
/// ```
pub fn normalize(path: &str) -> Vec<Segment> {
    atoms(path).map(Segment::parse).collect()
}

/// Joins segments back into canonical string form
pub fn join(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(Segment::as_str)
        .collect::<Vec<_>>()
        .join("/")
}

/// Removes every group segment, leaving the logical (URL-visible) path
pub fn strip_groups(segments: &[Segment]) -> Vec<Segment> {
    segments.iter().filter(|s| !s.is_group()).cloned().collect()
}

/// Compares segment texts against URL atoms
pub fn texts_eq(segments: &[Segment], url: &[Segment]) -> bool {
    segments.len() == url.len() && segments.iter().zip(url).all(|(a, b)| a.text == b.text)
}
