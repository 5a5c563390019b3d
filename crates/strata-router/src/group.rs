//! Static resolution through route-group folders
//!
//! A group folder `(name)` organizes files (for example to share a layout)
//! without contributing a URL segment. `about` may therefore live at
//! `(marketing)/about/route.json` or `(app)/about/index.html`.

use tracing::trace;

use crate::inventory::Inventory;
use crate::path::texts_eq;
use crate::route::{FileRole, RouteEntry, Segment};

/// Finds the entry that statically owns a URL, looking through group folders
///
/// 1. If the URL itself names a group segment, the URL addresses a physical
///    directory: only an exact (unstripped) `route` or `index` entry matches.
/// 2. Otherwise every entry's directory is compared with groups stripped.
///
/// In both cases a `route` entry strictly outranks an `index` entry, and
/// inventory order breaks remaining ties.
///
/// # Examples
///
/// ```
/// use strata_router::{group::find_group, path::normalize, Inventory};
///
/// let inventory = Inventory::from_paths("app", [
///     "(app)/about/index.html",
///     "(marketing)/about/route.json",
/// ]);
/// let hit = find_group(&normalize("about"), &inventory).unwrap();
/// assert_eq!(hit.path, "(marketing)/about/route.json");
/// ```
pub fn find_group<'a>(url: &[Segment], inventory: &'a Inventory) -> Option<&'a RouteEntry> {
    let explicit = url.iter().any(Segment::is_group);

    let owns = |entry: &RouteEntry| {
        if explicit {
            texts_eq(entry.directory(), url)
        } else {
            texts_eq(&entry.logical_directory(), url)
        }
    };

    let mut index_hit = None;
    for entry in inventory.iter().filter(|e| e.role.is_addressable()) {
        if !owns(entry) {
            continue;
        }
        match entry.role {
            FileRole::Route => {
                trace!("Group route hit: {}", entry.path);
                return Some(entry);
            }
            _ => {
                index_hit.get_or_insert(entry);
            }
        }
    }

    if let Some(entry) = index_hit {
        trace!("Group index hit: {}", entry.path);
    }
    index_hit
}
