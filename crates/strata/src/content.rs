// File: src/content.rs
// Purpose: Produces the source text of route entries, from disk or from handlers

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use strata_router::{normalize_str, RouteEntry};
use tracing::debug;

use crate::request_context::RenderContext;

/// Code that produces a file's content instead of reading it
pub type Handler = Arc<dyn Fn(&RenderContext) -> Result<String> + Send + Sync>;

/// Reads entry sources, preferring a registered handler for the same path
#[derive(Clone, Default)]
pub struct ContentLoader {
    handlers: HashMap<String, Handler>,
}

impl fmt::Debug for ContentLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentLoader")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ContentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for the file at `path`, relative to the routes root
    ///
    /// The file itself must still exist: handlers replace content, they do
    /// not create routes.
    ///
    /// ```
    /// use strata::ContentLoader;
    ///
    /// let mut loader = ContentLoader::new();
    /// loader.register("api/time/route.json", |_ctx| Ok("{\"now\": 0}".to_string()));
    /// assert!(loader.has_handler("/api/time/route.json"));
    /// ```
    pub fn register<F>(&mut self, path: &str, handler: F)
    where
        F: Fn(&RenderContext) -> Result<String> + Send + Sync + 'static,
    {
        self.handlers
            .insert(normalize_str(path).into_owned(), Arc::new(handler));
    }

    pub fn has_handler(&self, path: &str) -> bool {
        self.handlers.contains_key(normalize_str(path).as_ref())
    }

    /// Source text of `entry`
    pub fn load(&self, entry: &RouteEntry, context: &RenderContext) -> Result<String> {
        if let Some(handler) = self.handlers.get(&entry.path) {
            debug!("Running handler for {}", entry.path);
            return handler(context).with_context(|| format!("handler for `{}` failed", entry.path));
        }

        read_source(entry)
    }
}

/// Reads a file's text with the path in the error
pub fn read_source(entry: &RouteEntry) -> Result<String> {
    fs::read_to_string(&entry.raw)
        .with_context(|| format!("failed to read `{}`", entry.raw.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;
    use crate::request_context::RequestContext;

    fn context() -> RenderContext {
        RenderContext::new(RequestContext::new(Method::GET, "/"), "")
    }

    #[test]
    fn test_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<h1>Home</h1>").unwrap();
        let entry = RouteEntry::new(dir.path().join("index.html"), dir.path());

        let source = ContentLoader::new().load(&entry, &context()).unwrap();
        assert_eq!(source, "<h1>Home</h1>");
    }

    #[test]
    fn test_missing_file_names_path() {
        let entry = RouteEntry::from_relative("/nowhere/index.html", "index.html");
        let err = ContentLoader::new().load(&entry, &context()).unwrap_err();
        assert!(format!("{:#}", err).contains("/nowhere/index.html"));
    }

    #[test]
    fn test_handler_wins_over_file() {
        let mut loader = ContentLoader::new();
        loader.register("./posts/[id]/index.html", |ctx| Ok(format!("uri={}", ctx.uri)));
        let entry = RouteEntry::from_relative("/nowhere/posts/[id]/index.html", "posts/[id]/index.html");

        let mut ctx = context();
        ctx.uri = "posts/1".into();
        assert_eq!(loader.load(&entry, &ctx).unwrap(), "uri=posts/1");
    }

    #[test]
    fn test_handler_error_is_wrapped() {
        let mut loader = ContentLoader::new();
        loader.register("index.html", |_| anyhow::bail!("database down"));
        let entry = RouteEntry::from_relative("/x/index.html", "index.html");

        let err = loader.load(&entry, &context()).unwrap_err();
        assert_eq!(format!("{:#}", err), "handler for `index.html` failed: database down");
    }
}
