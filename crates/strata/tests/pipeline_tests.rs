//! Integration tests for the strata render pipeline
//!
//! Each test lays out a routes tree in a temporary project and renders
//! requests through [`Engine`], covering:
//! - Layout composition and placeholder contracts
//! - Duplicate-route halting
//! - Private route gating
//! - Routing entry point payloads
//! - Not-found documents, metadata and template variables
//! - Handler faults

use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use strata::*;
use tempfile::TempDir;

const ROOT_LAYOUT: &str = "<html><body>{content}</body></html>";

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (relative, body) in files {
        write(&dir.path().join("src/app"), relative, body);
    }
    dir
}

fn write(root: &Path, relative: &str, body: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn engine(dir: &TempDir) -> Engine {
    Engine::with_project_root(Config::default_with_metadata(), dir.path())
}

fn get(engine: &Engine, path: &str) -> Response {
    engine.render(&RequestContext::new(Method::GET, path))
}

// ============================================================================
// Composition
// ============================================================================

#[test]
fn test_leaf_nested_inside_both_layouts() {
    let dir = project(&[
        ("layout.html", ROOT_LAYOUT),
        ("blog/layout.html", "<main>{child_content}</main>"),
        ("blog/index.html", "X"),
    ]);
    let response = get(&engine(&dir), "/blog");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body(), "<html><body><main>X</main></body></html>");
}

#[test]
fn test_group_layouts_wrap_group_routes() {
    let dir = project(&[
        ("layout.html", ROOT_LAYOUT),
        ("(marketing)/layout.html", "<div class=\"mk\">{child_content}</div>"),
        ("(marketing)/pricing/index.html", "Plans"),
    ]);
    let response = get(&engine(&dir), "/pricing");
    assert_eq!(
        response.body(),
        "<html><body><div class=\"mk\">Plans</div></body></html>"
    );
}

#[test]
fn test_missing_child_placeholder_is_fatal() {
    let dir = project(&[
        ("layout.html", ROOT_LAYOUT),
        ("blog/layout.html", "<main></main>"),
        ("blog/index.html", "X"),
    ]);
    let response = get(&engine(&dir), "/blog");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.body().contains("<body class=\"fatal-error\">"));
    assert!(response.body().contains("{child_content}"));
    assert!(!response.body().contains("<main>"));
}

#[test]
fn test_missing_content_placeholder_is_fatal() {
    let dir = project(&[
        ("layout.html", "<html><body>static</body></html>"),
        ("index.html", "home"),
    ]);
    let response = get(&engine(&dir), "/");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.body().starts_with("<html><body class=\"fatal-error\">"));
    assert!(response.body().contains("Layout error"));
}

#[test]
fn test_missing_root_layout_is_fatal() {
    let dir = project(&[("index.html", "home")]);
    let response = get(&engine(&dir), "/");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.body().starts_with("<!DOCTYPE html>"));
}

// ============================================================================
// Duplicate routes
// ============================================================================

#[test]
fn test_duplicate_routes_halt_rendering() {
    let dir = project(&[
        ("layout.html", ROOT_LAYOUT),
        ("index.html", "home"),
        ("(a)/blog/route.json", "{}"),
        ("(b)/blog/route.json", "{}"),
    ]);
    let response = get(&engine(&dir), "/");
    let body = response.body();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Duplicate route found after normalization: blog/route"));
    assert!(body.contains("(a)/blog/route.json"));
    assert!(body.contains("(b)/blog/route.json"));
    assert!(!body.contains("home"));
}

// ============================================================================
// Private routes
// ============================================================================

#[test]
fn test_private_route_needs_same_origin() {
    let dir = project(&[
        ("layout.html", ROOT_LAYOUT),
        ("todos/_list/index.html", "items"),
    ]);
    let engine = engine(&dir);

    assert!(get(&engine, "/todos/_list").is_blocked());

    let mut headers = HeaderMap::new();
    headers.insert("sec-fetch-site", HeaderValue::from_static("same-origin"));
    let request = RequestContext::new(Method::GET, "/todos/_list").with_headers(headers);
    let response = engine.render(&request);

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.body().contains("items"));
}

#[test]
fn test_blocked_request_does_not_scan() {
    let dir = project(&[("_private/index.html", "secret")]);
    let response = get(&engine(&dir), "/_private");

    assert!(response.is_blocked());
    assert_eq!(response.body(), "");
    assert!(!dir.path().join("settings/files-list.json").exists());
}

// ============================================================================
// Routing entry points
// ============================================================================

#[test]
fn test_route_entry_bypasses_layouts() {
    let dir = project(&[
        ("layout.html", ROOT_LAYOUT),
        ("api/users/[id]/route.json", "{\"id\": \"{params.id}\"}"),
    ]);
    let response = get(&engine(&dir), "/api/users/7");

    assert_eq!(
        response,
        Response::Payload {
            content_type: "application/json",
            body: "{\"id\": \"7\"}".to_string(),
        }
    );
}

#[test]
fn test_catch_all_route_entry() {
    let dir = project(&[
        ("layout.html", ROOT_LAYOUT),
        ("docs/[...slug]/route.txt", "slug={params.slug}"),
    ]);
    let response = get(&engine(&dir), "/docs/guide/intro");
    assert_eq!(response.body(), "slug=guide/intro");
}

#[test]
fn test_html_route_entry_escapes_request_values() {
    let dir = project(&[("hello/route.html", "<p>Hi {query.name}</p>")]);
    let response = get(&engine(&dir), "/hello?name=%3Cscript%3Ealert(1)%3C%2Fscript%3E");

    assert_eq!(
        response,
        Response::Payload {
            content_type: "text/html; charset=utf-8",
            body: "<p>Hi &lt;script&gt;alert(1)&lt;/script&gt;</p>".to_string(),
        }
    );
}

#[test]
fn test_json_route_entry_stays_valid_json() {
    let dir = project(&[("api/users/[id]/route.json", "{\"id\": \"{params.id}\"}")]);
    let response = get(&engine(&dir), "/api/users/a%22b");

    let parsed: serde_json::Value = serde_json::from_str(response.body()).unwrap();
    assert_eq!(parsed["id"], "a\"b");
}

// ============================================================================
// Not found
// ============================================================================

#[test]
fn test_not_found_document() {
    let dir = project(&[
        ("layout.html", ROOT_LAYOUT),
        ("not-found.html", "Missing {pathname}"),
    ]);
    let response = get(&engine(&dir), "/nope");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.body(), "<html><body>Missing /nope</body></html>");
}

#[test]
fn test_builtin_not_found_document() {
    let dir = project(&[("layout.html", ROOT_LAYOUT)]);
    let response = get(&engine(&dir), "/nope");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.body().contains("This page could not be found."));
}

#[test]
fn test_missing_routes_root_reports_missing_layout() {
    let dir = tempfile::tempdir().unwrap();
    let response = get(&engine(&dir), "/anything");
    // No root layout either, so the miss is reported through the fallback document
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.body().contains("fatal-error"));
}

// ============================================================================
// Metadata and variables
// ============================================================================

#[test]
fn test_metadata_and_variables() {
    let dir = project(&[
        ("layout.html", "<title>{metadata.title}</title>{content}"),
        ("posts/[id]/index.html", "{request.method} {params.id} {query.q}"),
    ]);
    let mut config = Config::default_with_metadata();
    config.metadata.insert(
        "posts/42".to_string(),
        PageMetadata {
            title: "Post 42".to_string(),
            description: String::new(),
        },
    );
    let engine = Engine::with_project_root(config, dir.path());

    let response = get(&engine, "/posts/42?q=<b>");
    assert_eq!(response.body(), "<title>Post 42</title>GET 42 &lt;b&gt;");

    let response = get(&engine, "/posts/7");
    assert_eq!(response.body(), "<title>strata-app</title>GET 7 {query.q}");
}

#[test]
fn test_base_path_is_stripped() {
    let dir = project(&[("layout.html", ROOT_LAYOUT), ("about/index.html", "About")]);
    let mut config = Config::default_with_metadata();
    config.routing.base_path = Some("/site".to_string());
    let engine = Engine::with_project_root(config, dir.path());

    assert_eq!(get(&engine, "/site/about/").body(), "<html><body>About</body></html>");
}

#[test]
fn test_inventory_cache_is_written() {
    let dir = project(&[("layout.html", ROOT_LAYOUT), ("index.html", "home")]);
    get(&engine(&dir), "/");

    let listing = fs::read_to_string(dir.path().join("settings/files-list.json")).unwrap();
    let listing: Vec<String> = serde_json::from_str(&listing).unwrap();
    assert_eq!(listing.len(), 2);
}

#[test]
fn test_inspect_matches_what_render_serves() {
    let dir = project(&[("layout.html", ROOT_LAYOUT), ("about us/index.html", "About")]);
    let mut config = Config::default_with_metadata();
    config.routing.base_path = Some("/site".to_string());
    let engine = Engine::with_project_root(config, dir.path());

    let inspection = engine.inspect("/site/about%20us");
    assert_eq!(inspection.uri, "about us");
    assert_eq!(inspection.route.unwrap().entry.path, "about us/index.html");
    assert_eq!(get(&engine, "/site/about%20us").body(), "<html><body>About</body></html>");
}

// ============================================================================
// Handlers and faults
// ============================================================================

#[test]
fn test_handler_replaces_content() {
    let dir = project(&[("layout.html", ROOT_LAYOUT), ("index.html", "static")]);
    let engine = engine(&dir).handler("index.html", |ctx| Ok(format!("dynamic {}", ctx.pathname())));

    assert_eq!(get(&engine, "/").body(), "<html><body>dynamic /</body></html>");
}

#[test]
fn test_handler_error_renders_inline() {
    let dir = project(&[("layout.html", ROOT_LAYOUT), ("index.html", "static")]);
    let engine = engine(&dir).handler("index.html", |_| anyhow::bail!("database down"));
    let response = get(&engine, "/");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.body().starts_with("<html><body><div class=\"error\">"));
    assert!(response.body().contains("database down"));
    assert!(!response.body().contains("fatal-error"));
}

#[test]
fn test_handler_panic_is_unrecoverable() {
    let dir = project(&[("layout.html", ROOT_LAYOUT), ("index.html", "static")]);
    let engine = engine(&dir).handler("index.html", |_| panic!("corrupted state"));
    let response = get(&engine, "/");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.body().contains("<body class=\"fatal-error\">"));
    assert!(response.body().contains("corrupted state"));
}

#[test]
fn test_files_added_between_requests_are_seen() {
    let dir = project(&[("layout.html", ROOT_LAYOUT)]);
    let engine = engine(&dir);
    assert_eq!(get(&engine, "/late").status(), StatusCode::NOT_FOUND);

    write(&dir.path().join("src/app"), "late/index.html", "here");
    assert_eq!(get(&engine, "/late").status(), StatusCode::OK);
}
