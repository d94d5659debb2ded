//! Severity levels for diagnostics.

use std::fmt;

/// How serious a diagnostic is.
///
/// Animflow documents are parsed permissively, so most findings are
/// warnings: the offending content is skipped and playback proceeds with
/// whatever remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Nothing playable could be produced from the document.
    Error,

    /// Content was skipped or a default was substituted.
    Warning,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}
