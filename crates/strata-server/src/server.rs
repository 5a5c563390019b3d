use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::any,
    Router,
};
use colored::Colorize;
use serde_json::Value as JsonValue;
use strata::{error_document, Engine, FormData, RequestContext};
use tower_http::trace::TraceLayer;
use tracing::error;

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    engine: Arc<Engine>,
}

pub async fn serve(engine: Engine, host: Option<String>, port: Option<u16>) -> Result<()> {
    let server = &engine.config().server;
    let addr = format!(
        "{}:{}",
        host.unwrap_or_else(|| server.host.clone()),
        port.unwrap_or(server.port)
    );

    println!("{}", "Strata starting...".green().bold());
    println!("  Routes root: {}", engine.app_dir().display());

    let app = app(Arc::new(engine));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    println!("Server running at {}", format!("http://{}", addr).cyan());
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Every path and method goes through the render pipeline
pub fn app(engine: Arc<Engine>) -> Router {
    let state = AppState { engine };

    Router::new()
        .route("/", any(page_handler))
        .route("/*path", any(page_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn page_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = create_request_context(method, &uri, headers, body);
    let engine = state.engine.clone();

    // Rendering touches the filesystem on every request
    match tokio::task::spawn_blocking(move || engine.render(&request)).await {
        Ok(response) => response.into_response(),
        Err(e) => {
            error!("Render task failed: {}", e);
            let html = error_document(None, "<div class=\"error\">Internal server error</div>");
            (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response()
        }
    }
}

fn create_request_context(method: Method, uri: &Uri, headers: HeaderMap, body: Bytes) -> RequestContext {
    let form = if method == Method::POST || method == Method::PUT || method == Method::PATCH {
        parse_form(&headers, &body)
    } else {
        FormData::default()
    };

    RequestContext::from_parts(method, uri, headers).with_form(form)
}

fn parse_form(headers: &HeaderMap, body: &Bytes) -> FormData {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or("");

    if content_type.contains("application/json") {
        serde_json::from_slice::<JsonValue>(body)
            .map(FormData::from_json)
            .unwrap_or_default()
    } else if content_type.contains("application/x-www-form-urlencoded") {
        FormData::from_urlencoded(&String::from_utf8_lossy(body))
    } else {
        FormData::default()
    }
}
