// Strata - file-routed pages composed through nested layouts
// Resolves a request path against the routes root and renders the result

pub mod value;

// Framework modules
pub mod compositor;
pub mod config;
pub mod content;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod layout;
pub mod renderer;
pub mod request_context;
pub mod response;

// Re-export Maud for built-in documents
pub use maud::{html as maud, Markup, PreEscaped, DOCTYPE};

// Re-export framework types
pub use compositor::Compositor;
pub use config::{Config, LayoutConfig, PageMetadata, RoutingConfig};
pub use content::{ContentLoader, Handler};
pub use diagnostics::{error_document, DiagnosticBuffer};
pub use engine::{Engine, Inspection};
pub use error::RenderError;
pub use layout::{LayoutChain, LayoutChainBuilder, LayoutFile};
pub use renderer::{Escape, Renderer};
pub use request_context::{FormData, QueryParams, RenderContext, RequestContext};
pub use response::Response;
pub use value::Value;

// Re-export the router and commonly used types from dependencies
pub use axum;
pub use axum::http::StatusCode;
pub use strata_router as router;
