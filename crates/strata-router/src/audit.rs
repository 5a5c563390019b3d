//! Duplicate-route detection
//!
//! Two physical files that collapse to the same logical route once group
//! folders are stripped make routing ambiguous. Detection is pure; deciding
//! to abort rendering is left to the caller.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::inventory::Inventory;
use crate::path;
use crate::route::{FileRole, RouteEntry};

/// Several originals sharing one normalized route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    /// Group-stripped directory and file stem every original collapses to
    pub normalized: String,
    /// Colliding files, in inventory order
    pub originals: Vec<String>,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duplicate route found after normalization: {}", self.normalized)?;
        for original in &self.originals {
            write!(f, "\n- Grouped original route: {}", original)?;
        }
        Ok(())
    }
}

/// Reports every logical route claimed by more than one routing entry point
/// or default document
///
/// # Examples
///
/// ```
/// use strata_router::{audit::audit, Inventory};
///
/// let inventory = Inventory::from_paths("app", ["(a)/blog/route.json", "(b)/blog/route.json"]);
/// let conflicts = audit(&inventory);
/// assert_eq!(conflicts.len(), 1);
/// assert_eq!(conflicts[0].originals, vec!["(a)/blog/route.json", "(b)/blog/route.json"]);
/// ```
pub fn audit(inventory: &Inventory) -> Vec<Conflict> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<String>> = HashMap::new();

    for entry in inventory.iter().filter(|e| e.role.is_addressable()) {
        let normalized = route_key(entry);
        let originals = groups.entry(normalized.clone()).or_insert_with(|| {
            order.push(normalized);
            Vec::new()
        });
        originals.push(entry.path.clone());
    }

    let conflicts: Vec<Conflict> = order
        .into_iter()
        .filter_map(|normalized| {
            let originals = groups.remove(&normalized)?;
            (originals.len() > 1).then_some(Conflict {
                normalized,
                originals,
            })
        })
        .collect();

    for conflict in &conflicts {
        warn!("{}", conflict);
    }
    conflicts
}

/// Logical directory plus file stem, so `route.json` and `route.html` in
/// the same logical directory also collide
fn route_key(entry: &RouteEntry) -> String {
    let stem = match entry.role {
        FileRole::Route => "route",
        _ => "index",
    };
    let dir = path::join(&entry.logical_directory());
    if dir.is_empty() {
        stem.to_string()
    } else {
        format!("{}/{}", dir, stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_grouped_duplicates() {
        let inventory = Inventory::from_paths(
            "app",
            ["(a)/blog/route.json", "(b)/blog/route.json", "about/index.html"],
        );
        let conflicts = audit(&inventory);
        assert_eq!(
            conflicts,
            vec![Conflict {
                normalized: "blog/route".into(),
                originals: vec!["(a)/blog/route.json".into(), "(b)/blog/route.json".into()],
            }]
        );
    }

    #[test]
    fn test_layouts_and_assets_never_conflict() {
        let inventory = Inventory::from_paths(
            "app",
            [
                "(a)/layout.html",
                "(b)/layout.html",
                "(a)/logo.png",
                "(b)/logo.png",
            ],
        );
        assert!(audit(&inventory).is_empty());
    }

    #[test]
    fn test_route_and_index_are_distinct() {
        let inventory =
            Inventory::from_paths("app", ["(a)/about/route.json", "(b)/about/index.html"]);
        assert!(audit(&inventory).is_empty());
    }

    #[test]
    fn test_root_level_duplicates() {
        let inventory = Inventory::from_paths("app", ["index.html", "(home)/index.html"]);
        let conflicts = audit(&inventory);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].normalized, "index");
    }

    #[test]
    fn test_extensions_do_not_disambiguate() {
        let inventory = Inventory::from_paths("app", ["blog/route.json", "(x)/blog/route.html"]);
        let conflicts = audit(&inventory);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].normalized, "blog/route");
    }

    #[test]
    fn test_display_lists_originals() {
        let conflict = Conflict {
            normalized: "blog/route".into(),
            originals: vec!["(a)/blog/route.json".into(), "(b)/blog/route.json".into()],
        };
        let text = conflict.to_string();
        assert!(text.starts_with("Duplicate route found after normalization: blog/route"));
        assert!(text.contains("- Grouped original route: (b)/blog/route.json"));
    }
}
