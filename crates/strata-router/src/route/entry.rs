use std::path::{Path, PathBuf};

use serde::Serialize;

use super::pattern::Segment;
use crate::path::{self, strip_groups};

/// Role a file plays in the route table, derived from its stem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileRole {
    /// `route.*`: routing entry point, answered with a raw payload
    Route,
    /// `index.*`: default document of a directory
    Index,
    /// `layout.*`: wrapper template for a directory and its descendants
    Layout,
    /// `not-found.*`: rendered when resolution misses
    NotFound,
    /// Anything else (assets, partials, private helpers)
    Other,
}

impl FileRole {
    pub fn from_stem(stem: &str) -> Self {
        match stem {
            "route" => FileRole::Route,
            "index" => FileRole::Index,
            "layout" => FileRole::Layout,
            "not-found" => FileRole::NotFound,
            _ => FileRole::Other,
        }
    }

    /// Whether a URL can resolve to a file of this role
    pub fn is_addressable(self) -> bool {
        matches!(self, FileRole::Route | FileRole::Index)
    }
}

/// One physical candidate file discovered under the routes root
///
/// Immutable once scanned. `path` is relative to the routes root with
/// separators unified; `segments` is its tokenized form, the file name last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    /// Path as discovered on disk
    pub raw: PathBuf,
    /// Canonical path relative to the routes root
    pub path: String,
    #[serde(skip)]
    segments: Vec<Segment>,
    pub role: FileRole,
}

impl RouteEntry {
    /// Creates an entry for a file discovered under `root`
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_router::{FileRole, RouteEntry};
    ///
    /// let entry = RouteEntry::new("./src/app/(site)/about/index.html", "src/app");
    /// assert_eq!(entry.path, "(site)/about/index.html");
    /// assert_eq!(entry.role, FileRole::Index);
    /// assert_eq!(entry.logical_path(), "about/index.html");
    /// ```
    pub fn new(raw: impl Into<PathBuf>, root: impl AsRef<Path>) -> Self {
        let raw = raw.into();
        let full = path::normalize_str(&raw.to_string_lossy()).into_owned();
        let root = path::normalize_str(&root.as_ref().to_string_lossy()).into_owned();

        let relative = if root.is_empty() {
            full.as_str()
        } else {
            full.strip_prefix(root.as_str())
                .filter(|rest| rest.is_empty() || rest.starts_with('/'))
                .unwrap_or(full.as_str())
        };

        Self::from_relative(raw.clone(), relative)
    }

    /// Creates an entry from a path already relative to the routes root
    pub fn from_relative(raw: impl Into<PathBuf>, relative: &str) -> Self {
        let segments = path::normalize(relative);
        let role = segments
            .last()
            .map(|file| FileRole::from_stem(file_stem(file.as_str())))
            .unwrap_or(FileRole::Other);

        Self {
            raw: raw.into(),
            path: path::join(&segments),
            segments,
            role,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// File name, the last segment
    pub fn file_name(&self) -> &str {
        self.segments.last().map(Segment::as_str).unwrap_or("")
    }

    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        let stem = file_stem(name);
        (stem.len() < name.len()).then(|| &name[stem.len() + 1..])
    }

    /// Physical directory segments, groups included
    pub fn directory(&self) -> &[Segment] {
        match self.segments.split_last() {
            Some((_, dir)) => dir,
            None => &[],
        }
    }

    /// Directory segments as seen from a URL (groups removed)
    pub fn logical_directory(&self) -> Vec<Segment> {
        strip_groups(self.directory())
    }

    /// Path with every group segment removed
    pub fn logical_path(&self) -> String {
        path::join(&strip_groups(&self.segments))
    }

    /// Number of single dynamic segments in the directory
    pub fn dynamic_count(&self) -> usize {
        self.directory().iter().filter(|s| s.is_dynamic()).count()
    }

    pub fn has_catch_all(&self) -> bool {
        self.directory().iter().any(Segment::is_catch_all)
    }

    /// URL-visible depth of the entry's directory
    pub fn depth(&self) -> usize {
        self.directory().iter().filter(|s| !s.is_group()).count()
    }
}

fn file_stem(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}
