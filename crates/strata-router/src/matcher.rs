//! Segment matchers for dynamic and catch-all templates
//!
//! Both matchers compare URL segments against a route entry's directory,
//! usually the logical one with group folders stripped. They are pure: a
//! mismatch is `None`, never an error.

use std::collections::HashMap;

use serde::Serialize;

use crate::route::{Segment, SegmentKind};

/// Value bound to a capture name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Bound by a `[name]` segment
    One(String),
    /// Bound by a `[...name]` segment, in URL order
    Many(Vec<String>),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::One(value) => Some(value),
            ParamValue::Many(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ParamValue::Many(values) => Some(values),
            ParamValue::One(_) => None,
        }
    }

    /// Flattened textual form; catch-all values are joined with `/`
    pub fn to_path(&self) -> String {
        match self {
            ParamValue::One(value) => value.clone(),
            ParamValue::Many(values) => values.join("/"),
        }
    }
}

/// Route parameter bindings: capture name → value
pub type Params = HashMap<String, ParamValue>;

/// Matches URL segments against a template holding exactly one `[name]`
///
/// Segment counts must be equal. Literal template segments must equal the
/// URL segment exactly (case-sensitive); the bracketed segment matches any
/// URL segment and binds its value.
///
/// # Examples
///
/// ```
/// use strata_router::{matcher::match_single, path::normalize};
///
/// let bound = match_single(&normalize("posts/42"), &normalize("posts/[id]"));
/// assert_eq!(bound, Some(("id".to_string(), "42".to_string())));
///
/// assert!(match_single(&normalize("posts/42/extra"), &normalize("posts/[id]")).is_none());
/// ```
pub fn match_single(url: &[Segment], template: &[Segment]) -> Option<(String, String)> {
    if url.len() != template.len() {
        return None;
    }

    let mut bound = None;
    for (url_seg, tpl_seg) in url.iter().zip(template) {
        match &tpl_seg.kind {
            SegmentKind::Dynamic(name) => {
                if bound.is_some() {
                    return None;
                }
                bound = Some((name.clone(), url_seg.text.clone()));
            }
            SegmentKind::CatchAll(_) => return None,
            _ if tpl_seg.text != url_seg.text => return None,
            _ => {}
        }
    }

    bound
}

/// Matches URL segments against a template containing `[...name]`
///
/// Every template segment before the catch-all must equal the URL segment
/// at the same position. The remaining URL segments, at least one, become
/// the ordered values bound to `name`.
///
/// # Examples
///
/// ```
/// use strata_router::{matcher::match_catch_all, path::normalize};
///
/// let (name, values) =
///     match_catch_all(&normalize("docs/a/b/c"), &normalize("docs/[...slug]")).unwrap();
/// assert_eq!(name, "slug");
/// assert_eq!(values, vec!["a", "b", "c"]);
/// ```
pub fn match_catch_all(url: &[Segment], template: &[Segment]) -> Option<(String, Vec<String>)> {
    let (boundary, name) = template
        .iter()
        .enumerate()
        .find_map(|(i, seg)| match &seg.kind {
            SegmentKind::CatchAll(name) => Some((i, name)),
            _ => None,
        })?;

    if url.len() <= boundary {
        return None;
    }

    let prefix_matches = template[..boundary]
        .iter()
        .zip(url)
        .all(|(tpl_seg, url_seg)| tpl_seg.text == url_seg.text);

    if !prefix_matches {
        return None;
    }

    let values = url[boundary..].iter().map(|s| s.text.clone()).collect();
    Some((name.clone(), values))
}
