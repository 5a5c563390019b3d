//! Route inventory: the flat list of every file under the routes root
//!
//! The inventory is rebuilt on every resolution cycle and threaded through
//! the resolver and auditor as an explicit value. The on-disk cache file is
//! advisory only; the in-memory list is always authoritative.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::route::{FileRole, RouteEntry};

/// Failure to persist the inventory cache
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("failed to write inventory cache `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize inventory")]
    Serialize(#[from] serde_json::Error),
}

/// Snapshot of the route table
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    root: PathBuf,
    entries: Vec<RouteEntry>,
}

impl Inventory {
    /// Recursively lists every file under `root`
    ///
    /// Never fails: unreadable directories are skipped with a warning and a
    /// missing root yields an empty inventory. Entries are ordered by file
    /// name at each level so the snapshot is stable across platforms.
    pub fn scan(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();

        let entries: Vec<RouteEntry> = WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable route path: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| RouteEntry::new(entry.into_path(), root))
            .collect();

        debug!("Scanned {} route files under {:?}", entries.len(), root);

        Self {
            root: root.to_path_buf(),
            entries,
        }
    }

    /// Scans `root` and writes the listing to `cache_file`, best-effort
    pub fn scan_and_persist(root: impl AsRef<Path>, cache_file: impl AsRef<Path>) -> Self {
        let inventory = Self::scan(root);
        if let Err(e) = inventory.persist(cache_file.as_ref()) {
            warn!("Route inventory cache not written: {}", e);
        }
        inventory
    }

    /// Builds an inventory from paths relative to the routes root, in order
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_router::Inventory;
    ///
    /// let inventory = Inventory::from_paths("src/app", ["about/index.html", "layout.html"]);
    /// assert_eq!(inventory.len(), 2);
    /// assert!(inventory.root_layout().is_some());
    /// ```
    pub fn from_paths<I, S>(root: impl AsRef<Path>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let root = root.as_ref();
        let entries = paths
            .into_iter()
            .map(|relative| {
                let relative = relative.as_ref();
                RouteEntry::from_relative(root.join(relative), relative)
            })
            .collect();

        Self {
            root: root.to_path_buf(),
            entries,
        }
    }

    /// Writes the listing as a JSON array of discovered paths
    ///
    /// The file is written to a sibling temporary file and renamed into
    /// place, so readers never observe a half-written cache.
    pub fn persist(&self, cache_file: &Path) -> Result<(), InventoryError> {
        let listing: Vec<&Path> = self.entries.iter().map(|e| e.raw.as_path()).collect();
        let json = serde_json::to_string_pretty(&listing)?;

        let io_err = |source| InventoryError::Io {
            path: cache_file.to_path_buf(),
            source,
        };

        let parent = match cache_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(io_err)?;
                parent
            }
            None => Path::new("."),
        };

        // Each write gets its own temporary file, so concurrent renders never
        // share a half-written cache
        let mut tmp = NamedTempFile::new_in(parent).map_err(io_err)?;
        tmp.write_all(json.as_bytes()).map_err(io_err)?;
        tmp.persist(cache_file).map_err(|e| io_err(e.error))?;

        debug!("Wrote route inventory cache {:?}", cache_file);
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RouteEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by its canonical relative path
    pub fn get(&self, relative: &str) -> Option<&RouteEntry> {
        let relative = crate::path::normalize_str(relative);
        self.entries.iter().find(|e| e.path == relative)
    }

    /// The application root's layout file
    pub fn root_layout(&self) -> Option<&RouteEntry> {
        self.entries
            .iter()
            .find(|e| e.role == FileRole::Layout && e.directory().is_empty())
    }

    /// The application root's not-found document
    pub fn not_found_document(&self) -> Option<&RouteEntry> {
        self.entries
            .iter()
            .find(|e| e.role == FileRole::NotFound && e.directory().is_empty())
    }
}

impl<'a> IntoIterator for &'a Inventory {
    type Item = &'a RouteEntry;
    type IntoIter = std::slice::Iter<'a, RouteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn test_scan_lists_files_in_stable_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "layout.html");
        write(dir.path(), "index.html");
        write(dir.path(), "(site)/about/index.html");
        write(dir.path(), "blog/[id]/index.html");

        let inventory = Inventory::scan(dir.path());
        let paths: Vec<&str> = inventory.iter().map(|e| e.path.as_str()).collect();

        assert_eq!(
            paths,
            vec![
                "(site)/about/index.html",
                "blog/[id]/index.html",
                "index.html",
                "layout.html",
            ]
        );
    }

    #[test]
    fn test_scan_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let inventory = Inventory::scan(dir.path().join("does-not-exist"));
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_persist_writes_json_listing() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app/index.html");
        let cache = dir.path().join("settings/files-list.json");

        let inventory = Inventory::scan_and_persist(dir.path().join("app"), &cache);
        assert_eq!(inventory.len(), 1);

        let listing: Vec<String> =
            serde_json::from_str(&fs::read_to_string(&cache).unwrap()).unwrap();
        assert_eq!(listing.len(), 1);
        assert!(listing[0].ends_with("index.html"));
    }

    #[test]
    fn test_persist_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app/index.html");
        // A directory where the cache file should go makes the rename fail
        let cache = dir.path().join("blocked");
        fs::create_dir_all(cache.join("inner")).unwrap();

        let inventory = Inventory::scan_and_persist(dir.path().join("app"), &cache);
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn test_concurrent_persist_never_fails_or_tears() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..20 {
            write(dir.path(), &format!("app/page{i}/index.html"));
        }
        let inventory = Inventory::scan(dir.path().join("app"));
        let cache = dir.path().join("settings/files-list.json");
        inventory.persist(&cache).unwrap();
        let (inventory, cache) = (&inventory, cache.as_path());

        std::thread::scope(|scope| {
            let writers: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(move || {
                        (0..40)
                            .filter(|_| inventory.persist(cache).is_err())
                            .count()
                    })
                })
                .collect();

            for _ in 0..200 {
                let listing: Vec<String> =
                    serde_json::from_str(&fs::read_to_string(cache).unwrap()).unwrap();
                assert_eq!(listing.len(), 20);
            }

            let failures: usize = writers.into_iter().map(|w| w.join().unwrap()).sum();
            assert_eq!(failures, 0);
        });

        let leftovers = fs::read_dir(dir.path().join("settings")).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_lookup_helpers() {
        let inventory = Inventory::from_paths(
            "app",
            ["layout.html", "not-found.html", "blog/layout.html"],
        );
        assert_eq!(inventory.root_layout().unwrap().path, "layout.html");
        assert_eq!(inventory.not_found_document().unwrap().path, "not-found.html");
        assert!(inventory.get("/blog/layout.html").is_some());
    }
}
