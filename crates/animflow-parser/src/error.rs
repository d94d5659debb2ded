//! Error and diagnostic system for the Animflow parser.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled spans for rich error context
//! - Severity levels, where warnings never abort parsing
//! - Diagnostic collector for accumulating findings across all blocks
//!
//! # Overview
//!
//! Almost every problem in an Animflow document is recoverable: the offending
//! line or reference is skipped and reported as a [`Severity::Warning`]. Only
//! a document with nothing to animate fails, with a [`ParseError`] whose
//! [`ParseError::kind`] tells syntax and semantic failures apart.
//!
//! # Example
//!
//! ```
//! # use animflow_parser::error::{Diagnostic, ErrorCode};
//! # use animflow_parser::Span;
//!
//! let span = Span::new(40..52);
//! let first = Span::new(10..22);
//!
//! let diag = Diagnostic::warning("node `api` is declared more than once")
//!     .with_code(ErrorCode::E201)
//!     .with_label(span, "ignored declaration")
//!     .with_secondary_label(first, "first declared here")
//!     .with_help("the first declaration wins; remove or rename this one");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::{ErrorCode, FailureKind};
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
