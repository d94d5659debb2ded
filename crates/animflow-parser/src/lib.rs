//! # Animflow Parser
//!
//! Parser for the Animflow animated diagram language. A document is a
//! flowchart body followed by optional `@animation`, `@style`, `@narration`
//! and `@config` blocks:
//!
//! ```text
//! flowchart LR
//! client[Client] --> api[API]
//!
//! @animation
//! step 1: show client, api
//! step 2: connect client->api
//! @end
//! ```
//!
//! Parsing is permissive. Lines that match no rule, references to unknown
//! nodes and malformed blocks are reported as warnings next to the parsed
//! diagram; only an empty document or a diagram without nodes fails.
//!
//! ## Usage
//!
//! ```
//! # use animflow_parser::{parse, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = "flowchart LR\nA[Start] --> B[End]\n@animation\nstep 1: show A\n@end";
//!
//!     let parsed = parse(source)?;
//!     assert_eq!(parsed.diagram().nodes().len(), 2);
//!     assert!(parsed.warnings().is_empty());
//!     Ok(())
//! }
//! ```

mod animation;
mod config;
pub mod error;
mod flowchart;
mod narration;
mod properties;
mod sections;
mod source;
mod span;
mod style;

pub use error::{Diagnostic, ErrorCode, FailureKind, ParseError};
pub use properties::coerce;
pub use sections::BlockKind;
pub use span::Span;

use log::{debug, info};

use animflow_core::{
    identifier::Id,
    semantic::{AnimationStep, Diagram, Target},
};

use error::DiagnosticCollector;

/// Target keywords accepted by `hide` in place of entity ids.
const TARGET_KEYWORDS: [&str; 3] = ["all", "nodes", "edges"];

/// A successfully parsed document and the warnings found along the way.
#[derive(Debug, Clone)]
pub struct Parsed {
    diagram: Diagram,
    warnings: Vec<Diagnostic>,
}

impl Parsed {
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn into_parts(self) -> (Diagram, Vec<Diagnostic>) {
        (self.diagram, self.warnings)
    }
}

/// Parse source text into a diagram.
///
/// The pipeline is:
///
/// 1. **Sectioning** - split the document into the diagram body and blocks
/// 2. **Structure** - parse nodes and edges from the body
/// 3. **Blocks** - parse animation steps, styles, narration and config
/// 4. **Validation** - attach styles and check step targets
///
/// # Errors
///
/// Returns a [`ParseError`] when the document is empty
/// ([`ErrorCode::E101`]) or declares no nodes ([`ErrorCode::E200`]). The
/// error carries every diagnostic found, warnings included.
pub fn parse(source: &str) -> Result<Parsed, ParseError> {
    if source.trim().is_empty() {
        return Err(Diagnostic::error("the document is empty")
            .with_code(ErrorCode::E101)
            .with_help("start with a header such as `flowchart LR`")
            .into());
    }

    let mut diagnostics = DiagnosticCollector::new();

    // Step 1: Sectioning
    let sections = sections::split(source, &mut diagnostics);
    debug!(
        animation = sections.has(BlockKind::Animation),
        style = sections.has(BlockKind::Style),
        narration = sections.has(BlockKind::Narration),
        config = sections.has(BlockKind::Config);
        "Sectioned document"
    );

    // Step 2: Structure
    let flowchart = flowchart::parse(sections.diagram(), &mut diagnostics);
    if flowchart.nodes.is_empty() {
        diagnostics.emit(
            Diagnostic::error("the diagram declares no nodes")
                .with_code(ErrorCode::E200)
                .with_help("declare a node such as `A[Start]`"),
        );
    }

    // Step 3: Blocks
    let steps = animation::parse(sections.block(BlockKind::Animation), &mut diagnostics);
    let styles = style::parse(sections.block(BlockKind::Style), &mut diagnostics);
    let narration = narration::parse(sections.block(BlockKind::Narration), &mut diagnostics);
    let config = config::parse(sections.block(BlockKind::Config), &mut diagnostics);

    // Step 4: Validation
    let mut nodes = flowchart.nodes;
    for (id, (style, span)) in &styles {
        match nodes.iter_mut().find(|node| node.id() == *id) {
            Some(node) => *node = node.clone().with_style(style),
            None => diagnostics.emit(
                Diagnostic::warning(format!("style for unknown node `{id}`"))
                    .with_code(ErrorCode::E203)
                    .with_label(*span, "style ignored")
                    .with_help("style headers name node ids from the diagram body"),
            ),
        }
    }

    let diagram = Diagram::new(flowchart.direction, nodes, flowchart.edges)
        .with_narration(narration)
        .with_config(config);

    for step in &steps {
        check_targets(&diagram, &step.step, step.span, &mut diagnostics);
    }
    let diagram = diagram.with_steps(steps.into_iter().map(|s| s.step).collect());

    let warnings = diagnostics.finish()?;
    info!(
        nodes = diagram.nodes().len(),
        edges = diagram.edges().len(),
        steps = diagram.steps().len(),
        warnings = warnings.len();
        "Parsed document"
    );

    Ok(Parsed { diagram, warnings })
}

/// Reports targets that reference nothing in the diagram. The steps are kept
/// as written; the compiler skips what it cannot resolve.
fn check_targets(diagram: &Diagram, step: &AnimationStep, span: Span, diagnostics: &mut DiagnosticCollector) {
    let known = |id: Id| diagram.contains(id) || TARGET_KEYWORDS.iter().any(|k| id == *k);

    for target in step.targets() {
        let missing = match *target {
            Target::Entity(id) => (!known(id)).then(|| format!("`{id}`")),
            Target::Pair { from, to } => (!diagram.edges().iter().any(|e| e.connects(from, to)))
                .then(|| format!("edge `{from}->{to}`")),
        };
        if let Some(what) = missing {
            diagnostics.emit(
                Diagnostic::warning(format!("step {} targets unknown {what}", step.number()))
                    .with_code(ErrorCode::E205)
                    .with_label(span, "target skipped")
                    .with_help("declare it in the diagram or fix the spelling"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use animflow_core::semantic::{Action, NodeShape};

    use super::*;

    #[test]
    fn test_full_document() {
        let source = "\
flowchart TD
client([Client]) -->|request| api[API<br/>v2]
api -.-> db[(Users)]

@style
api:
  fill: #e3f2fd
@end

@animation
step 1: show client, api
  stagger: 0.3
step 2: connect client->api
step 3: highlight db
  color: red
@end

@narration
step 1:
  title: Intro
  text: \"Meet the client.\"
@end

@config
loop: true
@end
";
        let parsed = parse(source).unwrap();
        let diagram = parsed.diagram();

        assert!(parsed.warnings().is_empty(), "{:?}", parsed.warnings());
        assert_eq!(diagram.nodes().len(), 3);
        assert_eq!(diagram.edges().len(), 2);
        assert_eq!(diagram.node(Id::new("client")).unwrap().shape(), NodeShape::Terminator);
        assert_eq!(diagram.node(Id::new("api")).unwrap().subtitle(), Some("v2"));
        assert!(diagram.node(Id::new("api")).unwrap().style().fill.is_some());
        assert_eq!(diagram.steps().len(), 3);
        assert_eq!(diagram.steps()[1].action(), Action::Connect);
        assert_eq!(diagram.narration_for(1).unwrap().text(), "Meet the client.");
        assert_eq!(diagram.config().looping(), Some(true));
    }

    #[test]
    fn test_empty_document_is_syntax_failure() {
        let err = parse("  \n\n").unwrap_err();
        assert_eq!(err.kind(), FailureKind::Syntax);
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E101));
    }

    #[test]
    fn test_no_nodes_is_semantic_failure() {
        let err = parse("flowchart LR\n@animation\nstep 1: show A\n@end").unwrap_err();
        assert_eq!(err.kind(), FailureKind::Semantic);
    }

    #[test]
    fn test_unknown_targets_are_warnings() {
        let parsed = parse(
            "flowchart LR\nA[a] --> B[b]\n@animation\nstep 1: show A, ghost\nstep 2: connect B->A\nstep 3: hide all\n@end",
        )
        .unwrap();

        let codes: Vec<_> = parsed.warnings().iter().filter_map(Diagnostic::code).collect();
        assert_eq!(codes, vec![ErrorCode::E205, ErrorCode::E205]);
        assert_eq!(parsed.diagram().steps().len(), 3);
    }

    #[test]
    fn test_style_for_unknown_node() {
        let parsed = parse("flowchart LR\nA[a]\n@style\nB:\n  fill: red\n@end").unwrap();
        assert_eq!(parsed.warnings()[0].code(), Some(ErrorCode::E203));
    }
}
