// File: src/layout.rs
// Purpose: Discovers and validates the layout chain for a resolved directory

use std::path::{Path, PathBuf};

use strata_router::{DirectoryWalk, FileRole, Inventory, RouteEntry, Segment};
use tracing::debug;

use crate::config::LayoutConfig;
use crate::content::read_source;
use crate::error::RenderError;

/// One loaded layout file
#[derive(Debug, Clone)]
pub struct LayoutFile {
    pub path: PathBuf,
    pub source: String,
}

/// Layouts from the application root down to the deepest directory that
/// has one; the root layout is always first
#[derive(Debug, Clone)]
pub struct LayoutChain {
    layouts: Vec<LayoutFile>,
}

impl LayoutChain {
    pub fn root(&self) -> &LayoutFile {
        &self.layouts[0]
    }

    /// Layouts below the root, outermost first
    pub fn nested(&self) -> &[LayoutFile] {
        &self.layouts[1..]
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Always false: a built chain holds at least the root layout
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.layouts.iter().map(|l| l.path.as_path())
    }
}

/// Builds layout chains from an inventory snapshot
pub struct LayoutChainBuilder<'a> {
    inventory: &'a Inventory,
    extension: &'a str,
    placeholders: &'a LayoutConfig,
}

impl<'a> LayoutChainBuilder<'a> {
    pub fn new(inventory: &'a Inventory, extension: &'a str, placeholders: &'a LayoutConfig) -> Self {
        Self {
            inventory,
            extension,
            placeholders,
        }
    }

    /// Layout entries for `directory`, root first, without loading them
    pub fn discover(&self, directory: &[Segment]) -> Vec<&'a RouteEntry> {
        DirectoryWalk::new(directory)
            .filter_map(|prefix| self.layout_in(prefix))
            .collect()
    }

    /// Loads and validates the chain for `directory`
    ///
    /// The root layout must carry the content placeholder and every nested
    /// layout the child placeholder. A missing root layout is reported as a
    /// violation of the root's contract.
    pub fn build(&self, directory: &[Segment]) -> Result<LayoutChain, RenderError> {
        let entries = self.discover(directory);

        let root_is_first = entries.first().map_or(false, |e| e.directory().is_empty());
        if !root_is_first {
            return Err(RenderError::CompositionContractViolation {
                layout: self
                    .inventory
                    .root()
                    .join(format!("layout.{}", self.extension)),
                placeholder: self.placeholders.content_placeholder.clone(),
            });
        }

        let mut layouts = Vec::with_capacity(entries.len());
        for (depth, entry) in entries.into_iter().enumerate() {
            let source = read_source(entry).map_err(|e| RenderError::runtime(&e))?;
            let placeholder = if depth == 0 {
                &self.placeholders.content_placeholder
            } else {
                &self.placeholders.child_placeholder
            };

            if !source.contains(placeholder.as_str()) {
                return Err(RenderError::CompositionContractViolation {
                    layout: entry.raw.clone(),
                    placeholder: placeholder.clone(),
                });
            }

            layouts.push(LayoutFile {
                path: entry.raw.clone(),
                source,
            });
        }

        debug!("Layout chain for {:?}: {} layout(s)", directory, layouts.len());
        Ok(LayoutChain { layouts })
    }

    fn layout_in(&self, directory: &[Segment]) -> Option<&'a RouteEntry> {
        self.inventory.iter().find(|e| {
            e.role == FileRole::Layout
                && e.extension() == Some(self.extension)
                && e.directory() == directory
        })
    }
}
