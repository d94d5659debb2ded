//! Error types for Animflow operations.
//!
//! [`AnimflowError`] covers the pipeline from source text to a playable
//! timeline. Renderer and narration engine failures have their own types;
//! the playback controller logs them and skips the affected effect.

use std::io;

use thiserror::Error;

use animflow_parser::error::{FailureKind, ParseError};

/// The main error type for Animflow operations.
///
/// The `Parse` variant keeps the source next to the diagnostics so callers
/// can render labelled spans.
#[derive(Debug, Error)]
pub enum AnimflowError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl AnimflowError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }

    /// Syntax or semantic, for parse failures.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Parse { err, .. } => Some(err.kind()),
            _ => None,
        }
    }
}

/// Failure reported by a narration engine.
#[derive(Debug, Error)]
pub enum NarrationError {
    #[error("narration engine unavailable")]
    Unavailable,

    #[error("speech failed: {0}")]
    Failed(String),
}

/// Failure reported by a renderer.
#[derive(Debug, Error)]
#[error("render failed: {0}")]
pub struct RenderError(pub String);
