//! Compiled timeline behaviour observable through the public API.

use float_cmp::approx_eq;
use proptest::prelude::*;

use animflow::{
    DiagramBuilder,
    identifier::Id,
    semantic::Diagram,
    timeline::{CompileOptions, CompiledTimeline, compile},
};

fn build(source: &str) -> (Diagram, CompiledTimeline) {
    let builder = DiagramBuilder::default();
    let parsed = builder.parse(source).expect("Failed to parse");
    let (diagram, _) = builder.layout(parsed.diagram()).expect("Failed to lay out");
    let timeline = builder.compile(&diagram).expect("Failed to compile");
    (diagram, timeline)
}

#[test]
fn test_scenario_overlapping_shows_then_connect() {
    let source = "flowchart LR\nA[x]\nB[y]\nA-->B\n@animation\nstep 1: show A\n  duration: 1s\nstep 1: show B\n  duration: 1s\nstep 2: connect A->B\n  speed: 2s\n@end";
    let (_, timeline) = build(source);

    let boundaries = timeline.boundaries();
    assert_eq!(boundaries.len(), 2);
    assert_eq!((boundaries[0].step(), boundaries[0].start(), boundaries[0].end()), (1, 0.0, 1.0));
    assert_eq!((boundaries[1].step(), boundaries[1].start(), boundaries[1].end()), (2, 1.0, 3.0));
    assert_eq!(timeline.duration(), 3.0);
}

#[test]
fn test_hide_all_without_show() {
    let (_, timeline) = build("flowchart LR\nA[x] --> B[y]\n@animation\nstep 1: hide all\n@end");
    assert_eq!(timeline.boundaries().len(), 1);

    let end = timeline.sample(timeline.duration());
    for id in ["A", "B", "A_to_B"] {
        assert_eq!(end.state(Id::new(id)).unwrap().opacity, 0.0, "{id}");
    }
}

#[test]
fn test_initial_visibility() {
    let (_, timeline) = build(
        "flowchart LR\nA[x] --> B[y]\nC[z]\n@animation\nstep 1: show A\nstep 2: highlight C\n@end",
    );
    let frame = timeline.initial_frame();
    assert_eq!(frame.state(Id::new("A")).unwrap().opacity, 0.0);
    assert_eq!(frame.state(Id::new("B")).unwrap().opacity, 1.0);
    assert_eq!(frame.state(Id::new("C")).unwrap().opacity, 1.0);
    assert_eq!(frame.state(Id::new("A_to_B")).unwrap().opacity, 0.0);
}

#[test]
fn test_unhighlight_restores_exact_color() {
    let source = "flowchart LR\nA[x]\n@animation\nstep 1: highlight A\n  color: #336699\nstep 2: unhighlight A\n@end\n@style\nA:\n  fill: #336699\n@end";
    let (diagram, timeline) = build(source);
    let original = diagram.node(Id::new("A")).unwrap().style().fill.unwrap();

    assert_eq!(timeline.original_color(Id::new("A")), Some(original));
    let end = timeline.sample(timeline.duration());
    assert_eq!(end.state(Id::new("A")).unwrap().fill, Some(original));
}

#[test]
fn test_seek_exact_start_reports_step() {
    let (_, timeline) = build("flowchart LR\nA[x] --> B[y]\n@animation\nstep 1: show A\nstep 2: show B\nstep 3: connect A->B\n@end");

    let second = timeline.boundaries()[1];
    assert_eq!(timeline.boundary_at(second.start()), Some(1));
    assert_eq!(timeline.boundary_at(second.start() - 1e-6), Some(0));
    assert_eq!(timeline.boundary_at(timeline.duration()), Some(2));
}

#[test]
fn test_steps_play_in_text_order() {
    let (_, timeline) = build("flowchart LR\nA[x]\nB[y]\n@animation\nstep 3: show A\nstep 1: show B\n@end");
    let steps: Vec<u32> = timeline.boundaries().iter().map(|b| b.step()).collect();
    assert_eq!(steps, vec![3, 1]);
}

#[test]
fn test_frame_midway_through_entrance() {
    let (_, timeline) = build("flowchart LR\nA[x]\n@animation\nstep 1: show A\n  duration: 2s\n  easing: linear\n@end");
    let state = timeline.sample(1.0).state(Id::new("A")).cloned().unwrap();
    assert!(approx_eq!(f32, state.opacity, 0.5, epsilon = 1e-6));
    assert!(state.motion.is_some());
}

fn document() -> impl Strategy<Value = String> {
    let step = (1u32..6, prop::sample::select(vec!["show", "hide", "highlight", "connect"]), 0u32..4, 0u32..3);
    prop::collection::vec(step, 0..12).prop_map(|steps| {
        let mut source = String::from("flowchart LR\nA[a] --> B[b]\nB --> C[c]\n@animation\n");
        for (number, action, duration, delay) in steps {
            let target = if action == "connect" { "A->B" } else { "A, C" };
            source.push_str(&format!(
                "step {number}: {action} {target}\n  duration: {duration}s\n  delay: {delay}s\n"
            ));
        }
        source.push_str("@end\n");
        source
    })
}

proptest! {
    #[test]
    fn boundaries_are_contiguous(source in document()) {
        let diagram = animflow_parser::parse(&source).unwrap().into_parts().0;
        let timeline = compile(&diagram, &CompileOptions::default());
        let boundaries = timeline.boundaries();

        let mut distinct: Vec<u32> = diagram.steps().iter().map(|s| s.number()).collect();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(boundaries.len(), distinct.len());

        let mut cursor = 0.0;
        for boundary in boundaries {
            prop_assert_eq!(boundary.start(), cursor);
            prop_assert!(boundary.end() >= boundary.start());
            cursor = boundary.end();
        }
        prop_assert_eq!(timeline.duration(), cursor);
        for op in timeline.ops() {
            prop_assert!(op.end() <= timeline.duration());
        }
    }
}
