//! Splits a document into the diagram body and its `@name … @end` blocks.
//!
//! ```text
//! flowchart LR          ┐
//! A[Client]             │ diagram body
//! A --> B               ┘
//! @animation            ┐
//! step 1: show A        │ animation block
//! @end                  ┘
//! @narration … @end       narration block
//! ```
//!
//! Markers must sit on their own line. Content between a marker and its
//! `@end` is taken verbatim; nested markers are not recognised.

use std::fmt;

use log::debug;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    source::{self, SourceLine},
    span::Span,
};

/// The named blocks a document may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Animation,
    Style,
    Narration,
    Config,
}

impl BlockKind {
    const ALL: [BlockKind; 4] = [Self::Animation, Self::Style, Self::Narration, Self::Config];

    fn from_marker(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Animation => "animation",
            Self::Style => "style",
            Self::Narration => "narration",
            Self::Config => "config",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Animation => 0,
            Self::Style => 1,
            Self::Narration => 2,
            Self::Config => 3,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.as_str())
    }
}

#[derive(Debug)]
struct Block<'a> {
    marker: Span,
    lines: Vec<SourceLine<'a>>,
}

/// The diagram body and the first block of each kind.
#[derive(Debug, Default)]
pub(crate) struct Sections<'a> {
    diagram: Vec<SourceLine<'a>>,
    blocks: [Option<Block<'a>>; 4],
}

impl<'a> Sections<'a> {
    /// Lines outside every block.
    pub fn diagram(&self) -> &[SourceLine<'a>] {
        &self.diagram
    }

    /// Lines of the block, or an empty slice when the block is absent.
    pub fn block(&self, kind: BlockKind) -> &[SourceLine<'a>] {
        self.blocks[kind.index()]
            .as_ref()
            .map(|block| block.lines.as_slice())
            .unwrap_or_default()
    }

    pub fn has(&self, kind: BlockKind) -> bool {
        self.blocks[kind.index()].is_some()
    }
}

/// Marker name of a line, e.g. `animation` for `@animation`.
fn marker_name<'a>(line: &SourceLine<'a>) -> Option<&'a str> {
    line.trimmed()
        .strip_prefix('@')
        .map(|rest| rest.split_whitespace().next().unwrap_or(""))
}

/// Splits `source` into sections.
///
/// Problems are reported as warnings:
/// - a block without `@end` is dropped entirely (E001)
/// - a repeated block is dropped in favour of the first one (E002)
/// - an unknown `@marker` line is dropped (E003)
pub(crate) fn split<'a>(source: &'a str, diagnostics: &mut DiagnosticCollector) -> Sections<'a> {
    let mut sections = Sections::default();
    let mut open: Option<(BlockKind, Block<'a>)> = None;

    for line in source::lines(source) {
        let marker = marker_name(&line);

        if let Some((kind, mut block)) = open.take() {
            if marker == Some("end") {
                store(&mut sections, kind, block, diagnostics);
            } else {
                block.lines.push(line);
                open = Some((kind, block));
            }
            continue;
        }

        match marker {
            None => sections.diagram.push(line),
            Some(name) => match BlockKind::from_marker(name) {
                Some(kind) => {
                    let block = Block {
                        marker: line.span(),
                        lines: Vec::new(),
                    };
                    open = Some((kind, block));
                }
                None if name == "end" => diagnostics.emit(
                    Diagnostic::warning("`@end` without an open block")
                        .with_code(ErrorCode::E003)
                        .with_label(line.span(), "line ignored"),
                ),
                None => diagnostics.emit(
                    Diagnostic::warning(format!("unknown block marker `@{name}`"))
                        .with_code(ErrorCode::E003)
                        .with_label(line.span(), "line ignored")
                        .with_help(
                            "known blocks are @animation, @style, @narration and @config, each closed by @end",
                        ),
                ),
            },
        }
    }

    if let Some((kind, block)) = open {
        diagnostics.emit(
            Diagnostic::warning(format!("{kind} block is never closed"))
                .with_code(ErrorCode::E001)
                .with_label(block.marker, "opened here")
                .with_help("add `@end` after the last line of the block; it is ignored until then"),
        );
    }

    sections
}

fn store<'a>(
    sections: &mut Sections<'a>,
    kind: BlockKind,
    block: Block<'a>,
    diagnostics: &mut DiagnosticCollector,
) {
    match &sections.blocks[kind.index()] {
        Some(first) => diagnostics.emit(
            Diagnostic::warning(format!("duplicate {kind} block"))
                .with_code(ErrorCode::E002)
                .with_label(block.marker, "ignored block")
                .with_secondary_label(first.marker, "first block used")
                .with_help("merge the two blocks into one"),
        ),
        None => {
            debug!(block = kind.as_str(), lines = block.lines.len(); "Block extracted");
            sections.blocks[kind.index()] = Some(block);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Severity;

    fn split_ok(source: &str) -> (Sections<'_>, Vec<crate::error::Diagnostic>) {
        let mut collector = DiagnosticCollector::new();
        let sections = split(source, &mut collector);
        (sections, collector.finish().unwrap())
    }

    fn texts<'a>(lines: &[SourceLine<'a>]) -> Vec<&'a str> {
        lines.iter().map(SourceLine::trimmed).collect()
    }

    #[test]
    fn test_blocks_are_removed_from_diagram() {
        let source = "flowchart LR\nA[x]\n@animation\nstep 1: show A\n@end\nB[y]\n@config\n  loop: true\n@end\n";
        let (sections, warnings) = split_ok(source);

        assert!(warnings.is_empty());
        assert_eq!(texts(sections.diagram()), vec!["flowchart LR", "A[x]", "B[y]", ""]);
        assert_eq!(texts(sections.block(BlockKind::Animation)), vec!["step 1: show A"]);
        assert_eq!(texts(sections.block(BlockKind::Config)), vec!["loop: true"]);
        assert!(!sections.has(BlockKind::Style));
        assert!(sections.block(BlockKind::Narration).is_empty());
    }

    #[test]
    fn test_unterminated_block_is_absent() {
        let source = "flowchart LR\nA[x]\n@animation\nstep 1: show A\n";
        let (sections, warnings) = split_ok(source);

        assert!(!sections.has(BlockKind::Animation));
        assert_eq!(texts(sections.diagram()), vec!["flowchart LR", "A[x]"]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code(), Some(ErrorCode::E001));
        assert_eq!(warnings[0].severity(), Severity::Warning);
    }

    #[test]
    fn test_first_duplicate_block_wins() {
        let source = "@style\nA:\n  fill: red\n@end\n@style\nA:\n  fill: blue\n@end";
        let (sections, warnings) = split_ok(source);

        assert_eq!(texts(sections.block(BlockKind::Style)), vec!["A:", "fill: red"]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code(), Some(ErrorCode::E002));
        assert_eq!(warnings[0].labels().len(), 2);
    }

    #[test]
    fn test_unknown_marker_and_stray_end() {
        let source = "@legend\nA[x]\n@end";
        let (sections, warnings) = split_ok(source);

        assert_eq!(texts(sections.diagram()), vec!["A[x]"]);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.code() == Some(ErrorCode::E003)));
    }

    #[test]
    fn test_nested_marker_is_content() {
        let source = "@animation\n@style\n@end\n@end";
        let (sections, warnings) = split_ok(source);

        assert_eq!(texts(sections.block(BlockKind::Animation)), vec!["@style"]);
        // The trailing `@end` has no open block.
        assert_eq!(warnings.len(), 1);
    }
}
