// File: src/diagnostics.rs
// Purpose: Error regions and the fatal-error document

use maud::{html, Markup, PreEscaped, DOCTYPE};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{error, warn};

use crate::error::RenderError;

static BODY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<body.*?>.*?</body>").unwrap());

/// Error regions collected while a request renders
#[derive(Debug, Default)]
pub struct DiagnosticBuffer {
    regions: Vec<String>,
}

impl DiagnosticBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs `err` and records its error region
    pub fn push(&mut self, err: &RenderError) {
        if err.is_fatal() {
            error!("{}", err);
        } else {
            warn!("{}", err);
        }
        self.regions.push(error_region(err).into_string());
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// All regions, in the order they were recorded
    pub fn render(&self) -> String {
        self.regions.concat()
    }
}

/// `<div class="error">` describing one failure
pub fn error_region(err: &RenderError) -> Markup {
    let label = match err {
        RenderError::RoutingAmbiguity(_) => "Routing error",
        RenderError::CompositionContractViolation { .. } => "Layout error",
        RenderError::RuntimeFault { .. } => "Error",
        RenderError::UnrecoverableFault { .. } => "Fatal error",
    };

    html! {
        div.error {
            strong { (label) } ": " (err.to_string())
            @for line in err.details() {
                @for part in line.lines() {
                    br;
                    (part)
                }
            }
        }
    }
}

/// Document shown in place of the page after a fatal error
///
/// The root layout's `<body …>…</body>` is replaced by a
/// `<body class="fatal-error">` holding `body`. Without a root layout, or
/// one with no body element, a standalone document is produced instead.
pub fn error_document(root_layout: Option<&str>, body: &str) -> String {
    let replacement = format!("<body class=\"fatal-error\">{}</body>", body);

    if let Some(layout) = root_layout.filter(|l| BODY_REGEX.is_match(l)) {
        return BODY_REGEX
            .replace(layout, regex::NoExpand(&replacement))
            .into_owned();
    }

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Error" }
            }
            body.fatal-error { (PreEscaped(body)) }
        }
    }
    .into_string()
}
