//! # Strata Router
//!
//! File-mirrored route resolution. A routes root such as `src/app` maps to
//! URLs by directory structure:
//!
//! - Literal directories (`about/index.html` → `/about`)
//! - Route groups, invisible in the URL (`(marketing)/about/route.json` → `/about`)
//! - Single dynamic segments (`posts/[id]/index.html` → `/posts/42`)
//! - Catch-all segments (`docs/[...slug]/route.json` → `/docs/a/b/c`)
//!
//! ## File roles
//!
//! | Stem        | Role                                               |
//! |-------------|----------------------------------------------------|
//! | `route`     | Routing entry point: raw payload, no layouts       |
//! | `index`     | Default document of a directory                    |
//! | `layout`    | Wrapper for the directory and its descendants      |
//! | `not-found` | Rendered when resolution misses                    |
//!
//! ## Resolution cycle
//!
//! Every cycle rescans the routes root into an [`Inventory`], audits it for
//! duplicate logical routes, then resolves the URL with [`RouteResolver`].
//! The inventory is always passed explicitly; there is no global route table.
//!
//! ## Example
//!
//! ```
//! use strata_router::{audit, Inventory, RouteResolver};
//!
//! let inventory = Inventory::from_paths("src/app", [
//!     "layout.html",
//!     "(marketing)/about/route.json",
//!     "posts/[id]/index.html",
//!     "docs/[...slug]/route.json",
//! ]);
//! assert!(audit::audit(&inventory).is_empty());
//!
//! let resolver = RouteResolver::new(&inventory);
//! let m = resolver.resolve("/docs/guide/intro").unwrap();
//! assert_eq!(m.entry.path, "docs/[...slug]/route.json");
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod audit;
pub mod group;
pub mod guard;
pub mod inventory;
pub mod matcher;
pub mod path;
pub mod resolver;
pub mod route;

// ============================================================================
// Re-exports
// ============================================================================

pub use audit::Conflict;
pub use guard::{PrivateRouteGuard, SAME_ORIGIN};
pub use inventory::{Inventory, InventoryError};
pub use matcher::{ParamValue, Params};
pub use path::{normalize, normalize_str, DirectoryWalk};
pub use resolver::{MatchKind, ResolveState, RouteMatch, RouteResolver};
pub use route::{FileRole, RouteEntry, Segment, SegmentKind};
