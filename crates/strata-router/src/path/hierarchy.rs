use crate::route::pattern::Segment;

/// Lazy iterator over the directory prefixes of a path, root first
///
/// For directory `a/b/c`, yields: `` → `a` → `a/b` → `a/b/c`
///
/// Used to discover layout files from the application root down to the
/// deepest directory of a resolved route.
///
/// # Performance
///
/// - **Allocations**: Zero (yields borrowed slices of the input)
/// - **Complexity**: O(depth)
///
/// # Examples
///
/// ```
/// use strata_router::path::{normalize, DirectoryWalk};
///
/// let dir = normalize("a/b");
/// let depths: Vec<usize> = DirectoryWalk::new(&dir).map(|p| p.len()).collect();
/// assert_eq!(depths, vec![0, 1, 2]);
/// ```
#[derive(Clone)]
pub struct DirectoryWalk<'a> {
    segments: &'a [Segment],
    next_len: Option<usize>,
}

impl<'a> DirectoryWalk<'a> {
    pub fn new(segments: &'a [Segment]) -> Self {
        Self {
            segments,
            next_len: Some(0),
        }
    }
}

impl<'a> Iterator for DirectoryWalk<'a> {
    type Item = &'a [Segment];

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.next_len?;
        self.next_len = (len < self.segments.len()).then_some(len + 1);
        Some(&self.segments[..len])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next_len
            .map_or(0, |len| self.segments.len() - len + 1);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DirectoryWalk<'_> {}
