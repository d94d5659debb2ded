//! The ParseError type for wrapping fatal parsing diagnostics.

use std::fmt;

use crate::error::{Diagnostic, FailureKind};

/// Error type returned when a document cannot be turned into a diagram.
///
/// Wraps every diagnostic collected up to the failure, warnings included,
/// so a caller can show the full picture.
#[derive(Debug)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    /// Create a new parse error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether the failure is a syntax or a semantic one.
    ///
    /// Taken from the first error diagnostic that carries a code; uncoded
    /// errors count as syntax failures.
    pub fn kind(&self) -> FailureKind {
        self.diagnostics
            .iter()
            .filter(|d| d.severity().is_error())
            .find_map(Diagnostic::code)
            .map_or(FailureKind::Syntax, |code| code.kind())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut errors = self.diagnostics.iter().filter(|d| d.severity().is_error());
        if let Some(first) = errors.next() {
            write!(f, "{}", first)?;
            let rest = errors.count();
            if rest > 0 {
                write!(f, " (+{} more)", rest)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_error_from_diagnostic() {
        let err: ParseError = Diagnostic::error("empty document")
            .with_code(ErrorCode::E101)
            .into();

        assert_eq!(err.diagnostics().len(), 1);
        assert_eq!(err.kind(), FailureKind::Syntax);
    }

    #[test]
    fn test_parse_error_kind_skips_warnings() {
        let err: ParseError = vec![
            Diagnostic::warning("unrecognized line").with_code(ErrorCode::E100),
            Diagnostic::error("no nodes").with_code(ErrorCode::E200),
        ]
        .into();

        assert_eq!(err.kind(), FailureKind::Semantic);
    }

    #[test]
    fn test_parse_error_display_counts_errors_only() {
        let err: ParseError = vec![
            Diagnostic::warning("skipped"),
            Diagnostic::error("first error"),
            Diagnostic::error("second error"),
        ]
        .into();

        assert_eq!(err.to_string(), "error: first error (+1 more)");
    }
}
