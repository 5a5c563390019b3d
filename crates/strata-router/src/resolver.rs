//! Route resolution: one URL to at most one route entry
//!
//! Resolution is a single pass through a fixed precedence order:
//!
//! ```text
//! UNRESOLVED → GROUP_CHECK → DYNAMIC_CHECK → CATCHALL_CHECK → RESOLVED | NOT_FOUND
//! ```
//!
//! The first category that yields a result wins. Literal and group routes
//! always outrank dynamic ones, and dynamic routes outrank catch-alls.

use std::borrow::Cow;
use std::cmp::Reverse;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, trace};

use crate::group::find_group;
use crate::inventory::Inventory;
use crate::matcher::{match_catch_all, match_single, ParamValue, Params};
use crate::path::normalize;
use crate::route::{FileRole, RouteEntry, Segment};

/// States of the resolution pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveState {
    Unresolved,
    GroupCheck,
    DynamicCheck,
    CatchAllCheck,
    Resolved,
    NotFound,
}

/// Category that produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchKind {
    /// Empty URL: the application root's default document
    RootIndex,
    /// Literal path, possibly through group folders
    Static,
    /// Single `[name]` template
    Dynamic,
    /// `[...name]` template
    CatchAll,
}

/// Result of resolving a URL against the inventory
#[derive(Debug, Clone, Serialize)]
pub struct RouteMatch {
    /// The matched route entry
    pub entry: RouteEntry,
    /// Extracted parameters from the URL
    pub params: Params,
    pub kind: MatchKind,
}

impl RouteMatch {
    fn new(entry: &RouteEntry, kind: MatchKind) -> Self {
        Self {
            entry: entry.clone(),
            params: Params::new(),
            kind,
        }
    }

    fn with_param(mut self, name: String, value: ParamValue) -> Self {
        self.params.insert(name, value);
        self
    }

    /// Resolved physical file
    pub fn file(&self) -> &Path {
        &self.entry.raw
    }

    /// Whether the match is a routing entry point (raw payload, no layouts)
    pub fn is_route_entry(&self) -> bool {
        self.entry.role == FileRole::Route
    }

    /// Directory that seeds layout discovery
    ///
    /// This is the matched entry's physical directory, so group folders on
    /// the way contribute their own layout files.
    pub fn layout_directory(&self) -> &[Segment] {
        self.entry.directory()
    }

    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }
}

/// Resolves URLs against an inventory snapshot
pub struct RouteResolver<'a> {
    inventory: &'a Inventory,
    dynamic: Vec<&'a RouteEntry>,
    catch_all: Vec<&'a RouteEntry>,
}

impl<'a> RouteResolver<'a> {
    /// Prepares candidate lists in deterministic specificity order
    ///
    /// - Dynamic candidates: addressable entries with exactly one `[name]`
    ///   and no catch-all; shallower first, `route` before `index`.
    /// - Catch-all candidates: `route` entries with a `[...name]`; fewer
    ///   dynamic segments first, longer literal prefix first.
    ///
    /// Remaining ties fall back to the canonical path, never to
    /// filesystem enumeration order.
    pub fn new(inventory: &'a Inventory) -> Self {
        let mut dynamic: Vec<&RouteEntry> = inventory
            .iter()
            .filter(|e| e.role.is_addressable() && !e.has_catch_all() && e.dynamic_count() == 1)
            .collect();
        dynamic.sort_by(|a, b| {
            (a.depth(), role_rank(a.role), &a.path).cmp(&(b.depth(), role_rank(b.role), &b.path))
        });

        let mut catch_all: Vec<&RouteEntry> = inventory
            .iter()
            .filter(|e| e.role == FileRole::Route && e.has_catch_all())
            .collect();
        catch_all.sort_by(|a, b| {
            (a.dynamic_count(), Reverse(catch_all_boundary(a)), &a.path).cmp(&(
                b.dynamic_count(),
                Reverse(catch_all_boundary(b)),
                &b.path,
            ))
        });

        Self {
            inventory,
            dynamic,
            catch_all,
        }
    }

    /// Resolves a URL path; `None` means not found
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_router::{Inventory, RouteResolver};
    ///
    /// let inventory = Inventory::from_paths("app", ["posts/[id]/index.html"]);
    /// let resolver = RouteResolver::new(&inventory);
    ///
    /// let m = resolver.resolve("/posts/42").unwrap();
    /// assert_eq!(m.param("id").and_then(|v| v.as_str()), Some("42"));
    /// assert!(resolver.resolve("/posts/42/extra").is_none());
    /// ```
    pub fn resolve(&self, uri: &str) -> Option<RouteMatch> {
        let url = normalize(uri);
        let mut state = ResolveState::Unresolved;
        let mut found = None;

        while !matches!(state, ResolveState::Resolved | ResolveState::NotFound) {
            trace!("Resolving {:?}: {:?}", uri, state);
            let (next, hit) = match state {
                ResolveState::Unresolved if url.is_empty() => {
                    let hit = self.root_index();
                    (terminal(&hit), hit)
                }
                ResolveState::Unresolved => (ResolveState::GroupCheck, None),
                ResolveState::GroupCheck => match self.static_match(&url) {
                    Some(hit) => (ResolveState::Resolved, Some(hit)),
                    None => (ResolveState::DynamicCheck, None),
                },
                ResolveState::DynamicCheck => match self.dynamic_match(&url) {
                    Some(hit) => (ResolveState::Resolved, Some(hit)),
                    None => (ResolveState::CatchAllCheck, None),
                },
                ResolveState::CatchAllCheck => {
                    let hit = self.catch_all_match(&url);
                    (terminal(&hit), hit)
                }
                ResolveState::Resolved | ResolveState::NotFound => unreachable!(),
            };
            state = next;
            found = hit;
        }

        match &found {
            Some(m) => debug!("Resolved {:?} -> {} ({:?})", uri, m.entry.path, m.kind),
            None => debug!("No route for {:?}", uri),
        }
        found
    }

    fn root_index(&self) -> Option<RouteMatch> {
        self.inventory
            .iter()
            .find(|e| e.role == FileRole::Index && e.directory().is_empty())
            .map(|e| RouteMatch::new(e, MatchKind::RootIndex))
    }

    fn static_match(&self, url: &[Segment]) -> Option<RouteMatch> {
        find_group(url, self.inventory).map(|e| RouteMatch::new(e, MatchKind::Static))
    }

    fn dynamic_match(&self, url: &[Segment]) -> Option<RouteMatch> {
        self.dynamic.iter().find_map(|entry| {
            let (name, value) = match_single(url, &template_for(entry, url))?;
            Some(RouteMatch::new(entry, MatchKind::Dynamic).with_param(name, ParamValue::One(value)))
        })
    }

    fn catch_all_match(&self, url: &[Segment]) -> Option<RouteMatch> {
        self.catch_all.iter().find_map(|entry| {
            let (name, values) = match_catch_all(url, &template_for(entry, url))?;
            Some(
                RouteMatch::new(entry, MatchKind::CatchAll)
                    .with_param(name, ParamValue::Many(values)),
            )
        })
    }
}

/// Directory a URL is matched against
///
/// A URL that names a group folder addresses the physical directory, as in
/// static resolution; otherwise group folders are stripped.
fn template_for<'e>(entry: &'e RouteEntry, url: &[Segment]) -> Cow<'e, [Segment]> {
    if url.iter().any(Segment::is_group) {
        Cow::Borrowed(entry.directory())
    } else {
        Cow::Owned(entry.logical_directory())
    }
}

fn terminal(hit: &Option<RouteMatch>) -> ResolveState {
    if hit.is_some() {
        ResolveState::Resolved
    } else {
        ResolveState::NotFound
    }
}

fn role_rank(role: FileRole) -> u8 {
    match role {
        FileRole::Route => 0,
        _ => 1,
    }
}

/// Number of logical segments before the catch-all marker
fn catch_all_boundary(entry: &RouteEntry) -> usize {
    entry
        .logical_directory()
        .iter()
        .position(Segment::is_catch_all)
        .unwrap_or(0)
}
