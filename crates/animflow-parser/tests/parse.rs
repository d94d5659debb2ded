use animflow_core::identifier::Id;
use animflow_core::semantic::{Action, ArrowKind, Direction, EdgeStyle, Target};
use animflow_parser::{BlockKind, Diagnostic, ErrorCode, FailureKind, parse};
use proptest::prelude::*;

#[test]
fn test_duplicate_edges_get_ordinal_ids() {
    let parsed = parse("flowchart LR\nA[x]\nB[y]\nA-->B\nA-->B").expect("Failed to parse");

    let ids: Vec<_> = parsed.diagram().edges().iter().map(|e| e.id()).collect();
    assert_eq!(ids, vec![Id::new("A_to_B"), Id::new("A_to_B_1")]);
}

#[test]
fn test_connector_kinds() {
    let parsed = parse("graph BT\nA --> B\nB -.-> C\nC ==> D\nD --- A").expect("Failed to parse");
    let diagram = parsed.diagram();

    assert_eq!(diagram.direction(), Direction::BT);
    let kinds: Vec<_> = diagram.edges().iter().map(|e| (e.style(), e.arrow())).collect();
    assert_eq!(
        kinds,
        vec![
            (EdgeStyle::Solid, ArrowKind::Directed),
            (EdgeStyle::Dashed, ArrowKind::Directed),
            (EdgeStyle::Thick, ArrowKind::Directed),
            (EdgeStyle::Solid, ArrowKind::Undirected),
        ]
    );
    // Implicit nodes are rectangles labelled with their id.
    assert_eq!(diagram.node(Id::new("D")).unwrap().label(), "D");
}

#[test]
fn test_steps_keep_text_order() {
    let source = "\
flowchart LR
A[x]
B[y]
A-->B
@animation
step 1: show A
  duration: 1s
step 1: show B
  duration: 1s
step 2: connect A->B
  speed: 2s
@end";
    let parsed = parse(source).expect("Failed to parse");
    let steps = parsed.diagram().steps();

    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0].number(), 1);
    assert_eq!(steps[1].number(), 1);
    assert_eq!(steps[2].action(), Action::Connect);
    assert_eq!(
        steps[2].targets(),
        &[Target::Pair {
            from: Id::new("A"),
            to: Id::new("B")
        }]
    );
    assert_eq!(steps[2].properties().speed(), 2.0);
}

#[test]
fn test_unterminated_block_is_absent() {
    let parsed = parse("flowchart LR\nA[x]\n@animation\nstep 1: show A").expect("Failed to parse");

    assert!(parsed.diagram().steps().is_empty());
    assert_eq!(parsed.diagram().nodes().len(), 1);
    let codes: Vec<_> = parsed.warnings().iter().filter_map(Diagnostic::code).collect();
    assert_eq!(codes, vec![ErrorCode::E001]);
}

#[test]
fn test_skipped_lines_are_visible_as_warnings() {
    let parsed = parse("flowchart LR\nA[x]\nthis is not a node\nA -> B").expect("Failed to parse");

    assert_eq!(parsed.diagram().nodes().len(), 1);
    assert_eq!(parsed.warnings().len(), 2);
    assert!(parsed.warnings().iter().all(|w| w.code() == Some(ErrorCode::E100)));
    assert!(parsed.warnings()[0].labels()[0].span().start() > 0);
}

#[test]
fn test_failure_kinds() {
    assert_eq!(parse("").unwrap_err().kind(), FailureKind::Syntax);
    assert_eq!(
        parse("flowchart LR\n%% nothing here").unwrap_err().kind(),
        FailureKind::Semantic
    );
}

#[test]
fn test_block_kind_display() {
    assert_eq!(BlockKind::Narration.to_string(), "@narration");
}

fn document() -> impl Strategy<Value = String> {
    let line = prop_oneof![
        "[A-D]\\[[a-z ]{1,8}\\]",
        "[A-D] (-->|---|-\\.->|==>) [A-D]",
        "step [1-3]: (show|hide|highlight) [A-D](, [A-D])?",
        "  (duration|delay|stagger): [0-9](ms|s)?",
        "[a-z%@ ]{0,12}",
    ];
    prop::collection::vec(line, 0..16).prop_map(|lines| format!("flowchart LR\n{}", lines.join("\n")))
}

proptest! {
    #[test]
    fn parsing_is_deterministic(source in document()) {
        let first = parse(&source);
        let second = parse(&source);

        match (first, second) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.diagram(), b.diagram());
                prop_assert_eq!(a.warnings().len(), b.warnings().len());
            }
            (Err(a), Err(b)) => prop_assert_eq!(a.diagnostics().len(), b.diagnostics().len()),
            _ => prop_assert!(false, "parse results differ"),
        }
    }
}
