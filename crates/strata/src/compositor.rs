// File: src/compositor.rs
// Purpose: Folds rendered leaf content through a layout chain

use tracing::trace;

use crate::config::LayoutConfig;
use crate::layout::LayoutChain;
use crate::renderer::Renderer;

/// Wraps leaf content in its layouts, innermost first, root last
pub struct Compositor<'a> {
    renderer: &'a Renderer,
    placeholders: &'a LayoutConfig,
}

impl<'a> Compositor<'a> {
    pub fn new(renderer: &'a Renderer, placeholders: &'a LayoutConfig) -> Self {
        Self {
            renderer,
            placeholders,
        }
    }

    /// Composes an already-rendered leaf into a full document
    ///
    /// Placeholder contracts are checked when the chain is built; a chain
    /// that reaches this point always composes.
    pub fn compose(&self, chain: &LayoutChain, leaf: &str) -> String {
        let child = chain.nested().iter().rev().fold(leaf.to_string(), |child, layout| {
            trace!("Applying layout {:?}", layout.path);
            self.renderer.render_with_child(
                &layout.source,
                &self.placeholders.child_placeholder,
                &child,
            )
        });

        trace!("Applying root layout {:?}", chain.root().path);
        self.renderer.render_with_child(
            &chain.root().source,
            &self.placeholders.content_placeholder,
            &child,
        )
    }
}
