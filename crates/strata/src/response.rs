// File: src/response.rs
// Purpose: What the pipeline hands back to the HTTP boundary

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse},
};

/// Outcome of rendering one request
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Composed page, not-found page, or diagnostic document
    Document { status: StatusCode, html: String },
    /// Routing entry point output, sent without layouts
    Payload {
        content_type: &'static str,
        body: String,
    },
    /// Private route reached from outside the application
    Blocked,
}

impl Response {
    pub fn status(&self) -> StatusCode {
        match self {
            Response::Document { status, .. } => *status,
            Response::Payload { .. } => StatusCode::OK,
            Response::Blocked => StatusCode::NOT_FOUND,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Response::Document { html, .. } => html,
            Response::Payload { body, .. } => body,
            Response::Blocked => "",
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Response::Blocked)
    }
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        match self {
            Response::Document { status, html } => (status, Html(html)).into_response(),
            Response::Payload { content_type, body } => {
                ([(header::CONTENT_TYPE, content_type)], body).into_response()
            }
            Response::Blocked => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

/// Content type of a routing entry point, from its file extension
pub fn content_type_for(extension: Option<&str>) -> &'static str {
    match extension.map(str::to_ascii_lowercase).as_deref() {
        Some("json") => "application/json",
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("xml") => "application/xml",
        Some("txt") => "text/plain; charset=utf-8",
        Some("csv") => "text/csv",
        Some("js") => "text/javascript",
        _ => "application/octet-stream",
    }
}
