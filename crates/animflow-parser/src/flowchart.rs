//! Structural parser for the diagram body.
//!
//! Each line is one of:
//!
//! ```text
//! flowchart LR                header (also `graph TD`)
//! api[API Gateway]            node: id + shape brackets
//! db[(Users<br/>Postgres)]    `<br/>` splits label and subtitle
//! api -->|query| db           edge: id + connector + optional |label| + id
//! %% a comment
//! ```
//!
//! Edge endpoints may carry an inline shape (`A[Start] --> B{Ok?}`), which
//! declares the node on the spot. Endpoints that are never declared become
//! rectangle nodes labelled with their id.

use std::ops::Range;

use indexmap::IndexMap;
use log::{debug, trace};
use winnow::{
    ModalResult, Parser as _,
    ascii::{space0, space1},
    combinator::{alt, delimited, eof, opt, preceded, terminated},
    stream::LocatingSlice,
    token::{literal, take_till, take_until, take_while},
};

use animflow_core::{
    identifier::Id,
    semantic::{ArrowKind, Direction, Edge, EdgeStyle, Node, NodeShape},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    properties::strip_quotes,
    source::SourceLine,
    span::Span,
};

type Input<'a> = LocatingSlice<&'a str>;

/// Nodes and edges of the diagram body.
#[derive(Debug, Default)]
pub(crate) struct Flowchart {
    pub direction: Direction,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Declaration span of every node, implicit ones included.
    pub node_spans: IndexMap<Id, Span>,
}

/// `id` plus an optional shape, as written in the source.
#[derive(Debug)]
struct EndpointSyntax<'a> {
    id: &'a str,
    shape: Option<(NodeShape, &'a str)>,
    range: Range<usize>,
}

#[derive(Debug)]
struct EdgeSyntax<'a> {
    from: EndpointSyntax<'a>,
    to: EndpointSyntax<'a>,
    style: EdgeStyle,
    arrow: ArrowKind,
    label: Option<&'a str>,
}

/// Node identifiers: letters, digits, `_` and `.`
fn identifier<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_' || c == '.').parse_next(input)
}

/// Shape brackets with their label. Multi-character openers come first so
/// that `[(x)]` is a database rather than a rectangle labelled `(x)`.
fn shape<'a>(input: &mut Input<'a>) -> ModalResult<(NodeShape, &'a str)> {
    alt((
        delimited("([", take_until(1.., "])"), "])").map(|l| (NodeShape::Terminator, l)),
        delimited("[(", take_until(1.., ")]"), ")]").map(|l| (NodeShape::Database, l)),
        delimited("[[", take_until(1.., "]]"), "]]").map(|l| (NodeShape::Document, l)),
        delimited("[/", take_until(1.., "/]"), "/]").map(|l| (NodeShape::Parallelogram, l)),
        delimited('[', take_till(1.., ']'), ']').map(|l| (NodeShape::Rectangle, l)),
        delimited('{', take_till(1.., '}'), '}').map(|l| (NodeShape::Diamond, l)),
    ))
    .parse_next(input)
}

/// Optional trailing `;` and whitespace up to the end of the line.
fn line_end(input: &mut Input<'_>) -> ModalResult<()> {
    (space0, opt(';'), space0, eof).void().parse_next(input)
}

/// `flowchart <DIR>` / `graph <DIR>`; the direction word is optional.
fn header<'a>(input: &mut Input<'a>) -> ModalResult<Option<&'a str>> {
    terminated(
        preceded(
            alt((literal("flowchart"), literal("graph"))),
            opt(preceded(space1, take_while(1.., |c: char| c.is_ascii_alphanumeric()))),
        ),
        line_end,
    )
    .parse_next(input)
}

fn endpoint<'a>(input: &mut Input<'a>) -> ModalResult<EndpointSyntax<'a>> {
    (identifier, opt(shape))
        .with_span()
        .map(|((id, shape), range)| EndpointSyntax { id, shape, range })
        .parse_next(input)
}

fn node_line<'a>(input: &mut Input<'a>) -> ModalResult<EndpointSyntax<'a>> {
    terminated((identifier, shape).with_span(), line_end)
        .map(|((id, shape), range)| EndpointSyntax {
            id,
            shape: Some(shape),
            range,
        })
        .parse_next(input)
}

/// Connector tokens; `-.->` is tried before `-->` and `---`.
fn connector(input: &mut Input<'_>) -> ModalResult<(EdgeStyle, ArrowKind)> {
    alt((
        literal("-.->").value((EdgeStyle::Dashed, ArrowKind::Directed)),
        literal("==>").value((EdgeStyle::Thick, ArrowKind::Directed)),
        literal("-->").value((EdgeStyle::Solid, ArrowKind::Directed)),
        literal("---").value((EdgeStyle::Solid, ArrowKind::Undirected)),
    ))
    .parse_next(input)
}

fn edge_label<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    delimited('|', take_till(0.., '|'), '|').parse_next(input)
}

fn edge_line<'a>(input: &mut Input<'a>) -> ModalResult<EdgeSyntax<'a>> {
    let from = terminated(endpoint, space0).parse_next(input)?;
    let (style, arrow) = terminated(connector, space0).parse_next(input)?;
    let label = opt(terminated(edge_label, space0)).parse_next(input)?;
    let to = terminated(endpoint, line_end).parse_next(input)?;
    Ok(EdgeSyntax {
        from,
        to,
        style,
        arrow,
        label,
    })
}

/// Splits a label at `<br/>` into the label and an optional subtitle.
fn split_label(raw: &str) -> (String, Option<String>) {
    let raw = strip_quotes(raw.trim());
    let mut parts = raw
        .split("<br/>")
        .flat_map(|part| part.split("<br>"))
        .map(str::trim);
    let label = parts.next().unwrap_or_default().to_string();
    let subtitle = parts.collect::<Vec<_>>().join("\n");
    (label, (!subtitle.is_empty()).then_some(subtitle))
}

#[derive(Debug, Default)]
struct Builder {
    flowchart: Flowchart,
    header_seen: bool,
    /// Endpoints referenced without a declaration, in first-use order.
    implicit: IndexMap<Id, Span>,
    /// Number of edges seen per (from, to) pair.
    edge_counts: IndexMap<(Id, Id), usize>,
}

impl Builder {
    fn declare(
        &mut self,
        endpoint: &EndpointSyntax<'_>,
        line: &SourceLine<'_>,
        diagnostics: &mut DiagnosticCollector,
    ) -> Id {
        let id = Id::new(endpoint.id);
        let span = line.sub_span(endpoint.range.clone());

        let Some((shape, raw_label)) = endpoint.shape else {
            if !self.flowchart.node_spans.contains_key(&id) {
                self.implicit.entry(id).or_insert(span);
            }
            return id;
        };

        if let Some(first) = self.flowchart.node_spans.get(&id) {
            diagnostics.emit(
                Diagnostic::warning(format!("node `{id}` is declared more than once"))
                    .with_code(ErrorCode::E201)
                    .with_label(span, "ignored declaration")
                    .with_secondary_label(*first, "first declared here")
                    .with_help("the first declaration wins; remove or rename this one"),
            );
            return id;
        }

        let (label, subtitle) = split_label(raw_label);
        trace!(id = endpoint.id, shape = shape.as_str(); "Declared node");
        self.flowchart
            .nodes
            .push(Node::new(id, shape, label, subtitle));
        self.flowchart.node_spans.insert(id, span);
        self.implicit.shift_remove(&id);
        id
    }

    fn edge(&mut self, edge: EdgeSyntax<'_>, line: &SourceLine<'_>, diagnostics: &mut DiagnosticCollector) {
        let from = self.declare(&edge.from, line, diagnostics);
        let to = self.declare(&edge.to, line, diagnostics);

        let count = self.edge_counts.entry((from, to)).or_insert(0);
        let id = Id::edge(from, to, *count);
        *count += 1;

        let label = edge
            .label
            .map(|l| strip_quotes(l.trim()).to_string())
            .filter(|l| !l.is_empty());
        self.flowchart
            .edges
            .push(Edge::new(id, from, to, label, edge.style, edge.arrow));
    }

    fn header(&mut self, direction: Option<&str>, line: &SourceLine<'_>, diagnostics: &mut DiagnosticCollector) {
        self.header_seen = true;
        let parsed = direction.map(str::parse::<Direction>);
        match parsed {
            Some(Ok(direction)) => self.flowchart.direction = direction,
            Some(Err(_)) | None => {
                let found = direction.unwrap_or("nothing");
                diagnostics.emit(
                    Diagnostic::warning(format!("invalid flowchart direction: found {found}"))
                        .with_code(ErrorCode::E105)
                        .with_label(line.span(), "falling back to LR")
                        .with_help("use one of LR, RL, TD or BT"),
                );
                self.flowchart.direction = Direction::LR;
            }
        }
    }

    fn finish(mut self, diagnostics: &mut DiagnosticCollector) -> Flowchart {
        if !self.header_seen && !self.flowchart.nodes.is_empty() {
            diagnostics.emit(
                Diagnostic::warning("missing flowchart header")
                    .with_code(ErrorCode::E105)
                    .with_help("start the document with `flowchart LR`; LR is assumed"),
            );
        }

        for (id, span) in self.implicit {
            debug!(id = id.to_string(); "Declaring node implicitly from edge endpoint");
            let label = id.to_string();
            self.flowchart
                .nodes
                .push(Node::new(id, NodeShape::Rectangle, label, None));
            self.flowchart.node_spans.insert(id, span);
        }

        self.flowchart
    }
}

/// Parses the diagram body.
pub(crate) fn parse(lines: &[SourceLine<'_>], diagnostics: &mut DiagnosticCollector) -> Flowchart {
    let mut builder = Builder::default();

    for line in lines {
        if line.is_blank() || line.is_comment() {
            continue;
        }
        let text = line.trimmed();

        if let Ok(direction) = header.parse_next(&mut LocatingSlice::new(text)) {
            builder.header(direction, line, diagnostics);
        } else if let Ok(node) = node_line.parse_next(&mut LocatingSlice::new(text)) {
            builder.declare(&node, line, diagnostics);
        } else if let Ok(edge) = edge_line.parse_next(&mut LocatingSlice::new(text)) {
            builder.edge(edge, line, diagnostics);
        } else {
            diagnostics.emit(
                Diagnostic::warning("unrecognized diagram line")
                    .with_code(ErrorCode::E100)
                    .with_label(line.span(), "line skipped")
                    .with_help("expected a node such as `A[Label]` or an edge such as `A --> B`"),
            );
        }
    }

    builder.finish(diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source;

    fn parse_body(text: &str) -> (Flowchart, Vec<Diagnostic>) {
        let mut collector = DiagnosticCollector::new();
        let lines = source::lines(text);
        let flowchart = parse(&lines, &mut collector);
        (flowchart, collector.finish().unwrap())
    }

    fn shapes(flowchart: &Flowchart) -> Vec<(String, NodeShape, String)> {
        flowchart
            .nodes
            .iter()
            .map(|n| (n.id().to_string(), n.shape(), n.label().to_string()))
            .collect()
    }

    #[test]
    fn test_all_shapes() {
        let (flowchart, warnings) = parse_body(
            "flowchart TD\na([Start])\nb[Step]\nc{Ok?}\nd[/Input/]\ne[(Users)]\nf[[Report]]",
        );

        assert!(warnings.is_empty());
        assert_eq!(flowchart.direction, Direction::TD);
        assert_eq!(
            shapes(&flowchart),
            vec![
                ("a".to_string(), NodeShape::Terminator, "Start".to_string()),
                ("b".to_string(), NodeShape::Rectangle, "Step".to_string()),
                ("c".to_string(), NodeShape::Diamond, "Ok?".to_string()),
                ("d".to_string(), NodeShape::Parallelogram, "Input".to_string()),
                ("e".to_string(), NodeShape::Database, "Users".to_string()),
                ("f".to_string(), NodeShape::Document, "Report".to_string()),
            ]
        );
    }

    #[test]
    fn test_subtitle_split() {
        let (flowchart, _) = parse_body("flowchart LR\napi[API Gateway<br/>Kong]");
        let node = &flowchart.nodes[0];
        assert_eq!(node.label(), "API Gateway");
        assert_eq!(node.subtitle(), Some("Kong"));
    }

    #[test]
    fn test_connectors() {
        let (flowchart, warnings) =
            parse_body("flowchart LR\nA[a]\nB[b]\nA --> B\nA -.-> B\nA ==> B\nA --- B");

        assert!(warnings.is_empty());
        let styles: Vec<_> = flowchart.edges.iter().map(|e| (e.style(), e.arrow())).collect();
        assert_eq!(
            styles,
            vec![
                (EdgeStyle::Solid, ArrowKind::Directed),
                (EdgeStyle::Dashed, ArrowKind::Directed),
                (EdgeStyle::Thick, ArrowKind::Directed),
                (EdgeStyle::Solid, ArrowKind::Undirected),
            ]
        );
        let ids: Vec<_> = flowchart.edges.iter().map(|e| e.id().to_string()).collect();
        assert_eq!(ids, vec!["A_to_B", "A_to_B_1", "A_to_B_2", "A_to_B_3"]);
    }

    #[test]
    fn test_edge_label_and_tight_connector() {
        let (flowchart, warnings) = parse_body("flowchart LR\nA[a]\nB[b]\nA-->|HTTP GET| B");

        assert!(warnings.is_empty());
        assert_eq!(flowchart.edges[0].label(), Some("HTTP GET"));
    }

    #[test]
    fn test_inline_and_implicit_nodes() {
        let (flowchart, warnings) = parse_body("flowchart LR\nA[Start] --> B\nB --> C{Done?}");

        assert!(warnings.is_empty());
        assert_eq!(
            shapes(&flowchart),
            vec![
                ("A".to_string(), NodeShape::Rectangle, "Start".to_string()),
                ("C".to_string(), NodeShape::Diamond, "Done?".to_string()),
                ("B".to_string(), NodeShape::Rectangle, "B".to_string()),
            ]
        );
    }

    #[test]
    fn test_later_declaration_replaces_implicit_node() {
        let (flowchart, _) = parse_body("flowchart LR\nA --> B\nB[(Store)]");
        let b = flowchart.nodes.iter().find(|n| n.id() == "B").unwrap();
        assert_eq!(b.shape(), NodeShape::Database);
        assert_eq!(flowchart.nodes.len(), 2);
    }

    #[test]
    fn test_duplicate_node_first_wins() {
        let (flowchart, warnings) = parse_body("flowchart LR\nA[first]\nA[second]");

        assert_eq!(flowchart.nodes.len(), 1);
        assert_eq!(flowchart.nodes[0].label(), "first");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code(), Some(ErrorCode::E201));
    }

    #[test]
    fn test_unknown_direction_falls_back() {
        let (flowchart, warnings) = parse_body("flowchart XY\nA[a]");
        assert_eq!(flowchart.direction, Direction::LR);
        assert_eq!(warnings[0].code(), Some(ErrorCode::E105));

        let (flowchart, warnings) = parse_body("graph BT\nA[a]");
        assert_eq!(flowchart.direction, Direction::BT);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unrecognized_lines_are_skipped() {
        let (flowchart, warnings) =
            parse_body("flowchart LR\n%% comment\nA[a]\nclassDef foo fill:#f9f\nA --> B --> C");

        assert_eq!(flowchart.nodes.len(), 1);
        assert!(flowchart.edges.is_empty());
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.code() == Some(ErrorCode::E100)));
    }

    #[test]
    fn test_node_spans_point_at_declaration() {
        let text = "flowchart LR\n  api[API]";
        let (flowchart, _) = parse_body(text);
        let span = flowchart.node_spans[&Id::new("api")];
        assert_eq!(&text[span.start()..span.end()], "api[API]");
    }
}
