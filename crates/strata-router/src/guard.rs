//! Private route gating
//!
//! Directories whose name starts with the private marker (`_` by default)
//! hold fragments meant to be fetched by the application's own pages, not
//! navigated to directly. The check runs before any filesystem matching.

use tracing::debug;

use crate::path::normalize;

/// Value of the `Sec-Fetch-Site` header for same-origin requests
pub const SAME_ORIGIN: &str = "same-origin";

/// Blocks direct navigation into private path segments
#[derive(Debug, Clone)]
pub struct PrivateRouteGuard {
    marker: String,
}

impl Default for PrivateRouteGuard {
    fn default() -> Self {
        Self::new("_")
    }
}

impl PrivateRouteGuard {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// Whether any segment of the path is private
    pub fn is_private(&self, uri: &str) -> bool {
        !self.marker.is_empty()
            && normalize(uri)
                .iter()
                .any(|segment| segment.as_str().starts_with(self.marker.as_str()))
    }

    /// Whether the request must be answered with an empty result
    ///
    /// `fetch_site` is the request's declared fetch site; only
    /// `same-origin` unlocks private segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_router::PrivateRouteGuard;
    ///
    /// let guard = PrivateRouteGuard::default();
    /// assert!(guard.is_blocked("/todos/_list", None));
    /// assert!(guard.is_blocked("/todos/_list", Some("cross-site")));
    /// assert!(!guard.is_blocked("/todos/_list", Some("same-origin")));
    /// assert!(!guard.is_blocked("/todos/list", None));
    /// ```
    pub fn is_blocked(&self, uri: &str, fetch_site: Option<&str>) -> bool {
        if !self.is_private(uri) {
            return false;
        }

        let blocked = fetch_site.map(str::trim) != Some(SAME_ORIGIN);
        if blocked {
            debug!("Blocked direct access to private route {:?}", uri);
        }
        blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("_partials", true)]
    #[case("/blog/_draft/edit", true)]
    #[case("\\blog\\_draft", true)]
    #[case("/blog/my_post", false)]
    #[case("/blog", false)]
    #[case("", false)]
    fn test_is_private(#[case] uri: &str, #[case] private: bool) {
        assert_eq!(PrivateRouteGuard::default().is_private(uri), private);
    }

    #[test]
    fn test_same_origin_unlocks() {
        let guard = PrivateRouteGuard::default();
        assert!(!guard.is_blocked("/_fragments/list", Some("same-origin")));
        assert!(guard.is_blocked("/_fragments/list", Some("same-site")));
        assert!(guard.is_blocked("/_fragments/list", Some("none")));
        assert!(guard.is_blocked("/_fragments/list", None));
    }

    #[test]
    fn test_custom_marker() {
        let guard = PrivateRouteGuard::new("~");
        assert!(guard.is_blocked("/~internal", None));
        assert!(!guard.is_blocked("/_public", None));
    }

    #[test]
    fn test_empty_marker_disables_guard() {
        let guard = PrivateRouteGuard::new("");
        assert!(!guard.is_blocked("/_anything", None));
    }
}
