//! Error codes for the Animflow diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Sectioning (`@block … @end` markers)
//! - `E1xx` - Syntax (lines that match no grammar rule)
//! - `E2xx` - Semantic (references, duplicates, values)

use std::fmt;

/// The two failure classes a caller can tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The text does not follow the grammar.
    Syntax,
    /// The text parses but does not describe a usable diagram.
    Semantic,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Syntax => write!(f, "syntax"),
            FailureKind::Semantic => write!(f, "semantic"),
        }
    }
}

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Sectioning (E0xx)
    // =========================================================================
    /// Unterminated block.
    ///
    /// A `@name` marker was never closed by `@end`. The block is ignored.
    E001,

    /// Duplicate block.
    ///
    /// A block name appears more than once. Only the first one is used.
    E002,

    /// Unknown block marker.
    ///
    /// A line starts with `@` but names no known block.
    E003,

    // =========================================================================
    // Syntax (E1xx)
    // =========================================================================
    /// Unrecognized line.
    ///
    /// The line is neither a node, an edge, a step, nor a property.
    E100,

    /// Empty document.
    ///
    /// The source contains nothing but whitespace.
    E101,

    /// Malformed step header.
    ///
    /// A line starting with `step` does not read `step <N>: <action> <targets>`.
    E102,

    /// Unknown animation action.
    E103,

    /// Property outside of an entry.
    ///
    /// An indented `key: value` line appears before any entry header.
    E104,

    /// Invalid flowchart header.
    ///
    /// The header is missing or names an unknown direction.
    E105,

    // =========================================================================
    // Semantic (E2xx)
    // =========================================================================
    /// Diagram has no nodes.
    E200,

    /// Duplicate node declaration.
    E201,

    /// Invalid color value.
    E202,

    /// Style for an unknown node.
    E203,

    /// Invalid config value.
    E204,

    /// Unknown animation target.
    ///
    /// A step names an entity the diagram does not declare. The target is
    /// skipped.
    E205,

    /// Invalid property value.
    ///
    /// A step property could not be read as the type it requires.
    E206,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
            ErrorCode::E206 => "E206",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated block",
            ErrorCode::E002 => "duplicate block",
            ErrorCode::E003 => "unknown block marker",
            ErrorCode::E100 => "unrecognized line",
            ErrorCode::E101 => "empty document",
            ErrorCode::E102 => "malformed step header",
            ErrorCode::E103 => "unknown animation action",
            ErrorCode::E104 => "property outside of an entry",
            ErrorCode::E105 => "invalid flowchart header",
            ErrorCode::E200 => "diagram has no nodes",
            ErrorCode::E201 => "duplicate node",
            ErrorCode::E202 => "invalid color",
            ErrorCode::E203 => "style for unknown node",
            ErrorCode::E204 => "invalid config value",
            ErrorCode::E205 => "unknown animation target",
            ErrorCode::E206 => "invalid property value",
        }
    }

    /// Sectioning and syntax codes are syntax failures; the rest are semantic.
    pub fn kind(&self) -> FailureKind {
        match self {
            ErrorCode::E001
            | ErrorCode::E002
            | ErrorCode::E003
            | ErrorCode::E100
            | ErrorCode::E101
            | ErrorCode::E102
            | ErrorCode::E103
            | ErrorCode::E104
            | ErrorCode::E105 => FailureKind::Syntax,
            ErrorCode::E200
            | ErrorCode::E201
            | ErrorCode::E202
            | ErrorCode::E203
            | ErrorCode::E204
            | ErrorCode::E205
            | ErrorCode::E206 => FailureKind::Semantic,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::E205.to_string(), "E205");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E001.description(), "unterminated block");
        assert_eq!(ErrorCode::E201.description(), "duplicate node");
    }

    #[test]
    fn test_error_code_kind() {
        assert_eq!(ErrorCode::E002.kind(), FailureKind::Syntax);
        assert_eq!(ErrorCode::E101.kind(), FailureKind::Syntax);
        assert_eq!(ErrorCode::E200.kind(), FailureKind::Semantic);
        assert_eq!(FailureKind::Semantic.to_string(), "semantic");
    }
}
