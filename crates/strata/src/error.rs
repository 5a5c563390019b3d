// File: src/error.rs
// Purpose: Failure kinds surfaced while rendering a request

use std::path::PathBuf;

use strata_router::Conflict;
use thiserror::Error;

/// Everything that can stop or degrade a render
///
/// A resolution miss is not an error; it renders the not-found document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Two or more files own the same logical route
    #[error("{} duplicate route(s) found", .0.len())]
    RoutingAmbiguity(Vec<Conflict>),

    /// A layout is missing the placeholder it must carry
    #[error("layout `{}` is missing the `{placeholder}` placeholder", .layout.display())]
    CompositionContractViolation { layout: PathBuf, placeholder: String },

    /// A recoverable failure while producing content
    #[error("{message}")]
    RuntimeFault { message: String },

    /// A panic-class failure
    #[error("unrecoverable error: {message}")]
    UnrecoverableFault { message: String },
}

impl RenderError {
    pub fn runtime(err: &anyhow::Error) -> Self {
        RenderError::RuntimeFault {
            message: format!("{:#}", err),
        }
    }

    /// Whether the error aborts the pipeline
    ///
    /// Runtime faults are rendered inline; every other kind replaces the
    /// whole body.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RenderError::RuntimeFault { .. })
    }

    /// Detail lines shown under the message in diagnostics
    pub fn details(&self) -> Vec<String> {
        match self {
            RenderError::RoutingAmbiguity(conflicts) => {
                conflicts.iter().map(ToString::to_string).collect()
            }
            _ => Vec::new(),
        }
    }
}
