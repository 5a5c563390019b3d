// File: src/engine.rs
// Purpose: The per-request pipeline from request path to response

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use axum::http::{Method, StatusCode};
use maud::html;
use serde::Serialize;
use strata_router::{audit, path, Inventory, PrivateRouteGuard, RouteEntry, RouteMatch, RouteResolver};
use tracing::{debug, error, info};

use crate::compositor::Compositor;
use crate::config::Config;
use crate::content::{read_source, ContentLoader};
use crate::diagnostics::{error_document, DiagnosticBuffer};
use crate::error::RenderError;
use crate::layout::LayoutChainBuilder;
use crate::renderer::{Escape, Renderer};
use crate::request_context::{RenderContext, RequestContext};
use crate::response::{content_type_for, Response};

/// Renders requests against the routes root
///
/// Holds no route state between requests: every call rescans the routes
/// root, so files added or removed on disk are picked up immediately.
#[derive(Debug, Clone)]
pub struct Engine {
    config: Config,
    app_dir: PathBuf,
    cache_file: PathBuf,
    guard: PrivateRouteGuard,
    loader: ContentLoader,
}

/// What a URI resolves to, for inspection tools
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub uri: String,
    pub blocked_without_same_origin: bool,
    pub route: Option<RouteMatch>,
    pub layouts: Vec<PathBuf>,
}

impl Engine {
    /// Engine with paths taken as written in the config
    pub fn new(config: Config) -> Self {
        Self::with_project_root(config, "")
    }

    /// Engine whose relative config paths are resolved against `root`
    pub fn with_project_root(config: Config, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let app_dir = root.join(&config.routing.app_dir);
        let cache_file = root.join(&config.routing.cache_file);
        let guard = PrivateRouteGuard::new(config.routing.private_marker.clone());

        Self {
            config,
            app_dir,
            cache_file,
            guard,
            loader: ContentLoader::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    /// Registers a content handler for a file under the routes root
    pub fn handler<F>(mut self, path: &str, handler: F) -> Self
    where
        F: Fn(&RenderContext) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        self.loader.register(path, handler);
        self
    }

    /// Fresh inventory, with the advisory cache written best-effort
    pub fn scan(&self) -> Inventory {
        Inventory::scan_and_persist(&self.app_dir, &self.cache_file)
    }

    /// Renders one request; never panics
    pub fn render(&self, request: &RequestContext) -> Response {
        match catch_unwind(AssertUnwindSafe(|| self.render_request(request))) {
            Ok(response) => response,
            Err(panic) => {
                let err = RenderError::UnrecoverableFault {
                    message: panic_message(&*panic),
                };
                let inventory = Inventory::scan(&self.app_dir);
                self.fatal(&inventory, DiagnosticBuffer::new(), err)
            }
        }
    }

    /// Resolution result and layout chain for `uri`, without rendering
    pub fn inspect(&self, uri: &str) -> Inspection {
        let inventory = Inventory::scan(&self.app_dir);
        let uri = RequestContext::new(Method::GET, uri).uri(self.config.routing.base_path.as_deref());
        let route = RouteResolver::new(&inventory).resolve(&uri);
        let directory = match &route {
            Some(m) => m.layout_directory().to_vec(),
            None => path::normalize(&uri),
        };
        let layouts = self
            .layouts(&inventory)
            .discover(&directory)
            .into_iter()
            .map(|e| e.raw.clone())
            .collect();

        Inspection {
            blocked_without_same_origin: self.guard.is_blocked(&uri, None),
            uri,
            route,
            layouts,
        }
    }

    fn render_request(&self, request: &RequestContext) -> Response {
        let uri = request.uri(self.config.routing.base_path.as_deref());

        if self.guard.is_blocked(&uri, request.fetch_site()) {
            return Response::Blocked;
        }

        let inventory = self.scan();
        let mut diagnostics = DiagnosticBuffer::new();

        let conflicts = audit::audit(&inventory);
        if !conflicts.is_empty() {
            return self.fatal(&inventory, diagnostics, RenderError::RoutingAmbiguity(conflicts));
        }

        let resolved = RouteResolver::new(&inventory).resolve(&uri);

        let mut context = RenderContext::new(request.clone(), uri.as_str());
        context.metadata = self.config.metadata_for(&uri);
        context.base_url = self.config.routing.base_url.clone();

        let (status, source, directory) = match resolved {
            Some(m) if m.is_route_entry() => {
                context.params = m.params.clone();
                return self.payload(&inventory, &m.entry, &context);
            }
            Some(m) => {
                info!("{} /{} -> {}", request.method, uri, m.entry.path);
                context.params = m.params.clone();
                let source = self.load_leaf(&m.entry, &context, &mut diagnostics);
                (StatusCode::OK, source, m.layout_directory().to_vec())
            }
            None => {
                info!("{} /{} -> not found", request.method, uri);
                let source = self.not_found_source(&inventory, &context, &mut diagnostics);
                (StatusCode::NOT_FOUND, source, path::normalize(&uri))
            }
        };

        let renderer = Renderer::with_variables(context.variables(), Escape::Html);
        let mut leaf = renderer.render(&source);

        let chain = match self.layouts(&inventory).build(&directory) {
            Ok(chain) => chain,
            Err(err) => return self.fatal(&inventory, diagnostics, err),
        };

        let status = if diagnostics.is_empty() {
            status
        } else {
            leaf.push_str(&diagnostics.render());
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let html = Compositor::new(&renderer, &self.config.layout).compose(&chain, &leaf);
        Response::Document { status, html }
    }

    fn payload(&self, inventory: &Inventory, entry: &RouteEntry, context: &RenderContext) -> Response {
        match self.loader.load(entry, context) {
            Ok(source) => {
                debug!("Serving routing entry point {}", entry.path);
                let escape = Escape::for_extension(entry.extension());
                let renderer = Renderer::with_variables(context.variables(), escape);
                Response::Payload {
                    content_type: content_type_for(entry.extension()),
                    body: renderer.render(&source),
                }
            }
            Err(err) => self.fatal(inventory, DiagnosticBuffer::new(), RenderError::runtime(&err)),
        }
    }

    fn load_leaf(
        &self,
        entry: &RouteEntry,
        context: &RenderContext,
        diagnostics: &mut DiagnosticBuffer,
    ) -> String {
        self.loader.load(entry, context).unwrap_or_else(|err| {
            diagnostics.push(&RenderError::runtime(&err));
            String::new()
        })
    }

    fn not_found_source(
        &self,
        inventory: &Inventory,
        context: &RenderContext,
        diagnostics: &mut DiagnosticBuffer,
    ) -> String {
        let document = inventory
            .not_found_document()
            .filter(|e| e.extension() == Some(self.config.routing.template_extension.as_str()));

        match document {
            Some(entry) => self.load_leaf(entry, context, diagnostics),
            None => html! {
                div.not-found {
                    h1 { "404" }
                    p { "This page could not be found." }
                }
            }
            .into_string(),
        }
    }

    fn fatal(&self, inventory: &Inventory, mut diagnostics: DiagnosticBuffer, err: RenderError) -> Response {
        diagnostics.push(&err);

        let root_layout = self
            .layouts(inventory)
            .discover(&[])
            .into_iter()
            .next()
            .and_then(|entry| match read_source(entry) {
                Ok(source) => Some(source),
                Err(e) => {
                    error!("Root layout unreadable while reporting an error: {:#}", e);
                    None
                }
            });

        Response::Document {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            html: error_document(root_layout.as_deref(), &diagnostics.render()),
        }
    }

    fn layouts<'a>(&'a self, inventory: &'a Inventory) -> LayoutChainBuilder<'a> {
        LayoutChainBuilder::new(
            inventory,
            &self.config.routing.template_extension,
            &self.config.layout,
        )
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic with a non-string payload".to_string())
}
