//! Line-level view of the source text.

use crate::span::Span;

/// One line of the source together with its byte offset.
///
/// Parsers work line by line; keeping the offset lets every diagnostic point
/// back at the exact bytes in the original document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SourceLine<'a> {
    text: &'a str,
    offset: usize,
}

impl<'a> SourceLine<'a> {
    pub fn new(text: &'a str, offset: usize) -> Self {
        Self { text, offset }
    }

    /// The raw line without its terminator.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// The line with surrounding whitespace removed.
    pub fn trimmed(&self) -> &'a str {
        self.text().trim()
    }

    /// Byte offset of the first non-whitespace character.
    pub fn trimmed_offset(&self) -> usize {
        self.offset + (self.text.len() - self.text.trim_start().len())
    }

    /// Span of the trimmed content.
    pub fn span(&self) -> Span {
        let start = self.trimmed_offset();
        Span::new(start..start + self.trimmed().len())
    }

    /// Span of a sub-range of the trimmed content.
    pub fn sub_span(&self, range: std::ops::Range<usize>) -> Span {
        let start = self.trimmed_offset();
        Span::new(start + range.start..start + range.end)
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }

    pub fn is_indented(&self) -> bool {
        self.text().starts_with([' ', '\t'])
    }

    /// `%%` starts a comment line.
    pub fn is_comment(&self) -> bool {
        self.trimmed().starts_with("%%")
    }
}

/// Splits `source` into lines, dropping `\n` and `\r\n` terminators.
pub(crate) fn lines(source: &str) -> Vec<SourceLine<'_>> {
    let mut offset = 0;
    source
        .split('\n')
        .map(|raw| {
            let line = SourceLine::new(raw.strip_suffix('\r').unwrap_or(raw), offset);
            offset += raw.len() + 1;
            line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_keep_offsets() {
        let source = "flowchart LR\r\n  A[x]\nB[y]";
        let lines = lines(source);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text(), "flowchart LR");
        assert_eq!(lines[1].trimmed(), "A[x]");
        assert!(lines[1].is_indented());
        assert_eq!(lines[1].span(), Span::new(16..20));
        assert_eq!(&source[lines[2].span().start()..lines[2].span().end()], "B[y]");
    }

    #[test]
    fn test_sub_span() {
        let line = SourceLine::new("   A --> B", 10);
        assert_eq!(line.sub_span(0..1), Span::new(13..14));
        assert!(!line.is_comment());
        assert!(SourceLine::new("%% note", 0).is_comment());
    }
}
