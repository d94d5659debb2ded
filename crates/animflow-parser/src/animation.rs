//! Parser for the `@animation` block.
//!
//! ```text
//! step 1: show client, server
//!   effect: slideInLeft
//!   stagger: 0.2s
//! step 2: connect client->server
//!   speed: 1.5s
//! ```
//!
//! Steps are returned in textual order. The same step number may appear on
//! several headers; grouping is left to the timeline compiler.

use log::debug;
use winnow::{
    ModalResult, Parser as _,
    ascii::{digit1, space0},
    combinator::{preceded, terminated},
    stream::LocatingSlice,
    token::{literal, rest, take_while},
};

use animflow_core::{
    color::Color,
    identifier::Id,
    semantic::{Action, AnimationStep, Properties, PropertyValue, Target},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    properties::{coerce, split_property},
    source::SourceLine,
    span::Span,
};

type Input<'a> = LocatingSlice<&'a str>;

/// Camera modes that may lead the target list, as in `camera focus api`.
const CAMERA_MODES: [&str; 5] = ["fitAll", "fitNodes", "focus", "zoom", "pan"];

/// Property keys holding a time value.
const TIME_KEYS: [&str; 4] = ["duration", "delay", "stagger", "speed"];

/// A parsed step with the span of its header line.
#[derive(Debug, Clone)]
pub(crate) struct SpannedStep {
    pub step: AnimationStep,
    pub span: Span,
}

#[derive(Debug)]
struct HeaderSyntax<'a> {
    number: u32,
    action: &'a str,
    targets: &'a str,
}

/// `step <N>:` prefix shared by the animation and narration blocks.
pub(crate) fn step_label(input: &mut Input<'_>) -> ModalResult<u32> {
    terminated(
        preceded((literal("step"), space0), digit1.parse_to::<u32>()),
        (space0, ':'),
    )
    .parse_next(input)
}

fn step_header<'a>(input: &mut Input<'a>) -> ModalResult<HeaderSyntax<'a>> {
    let number = step_label(input)?;
    let action = preceded(space0, take_while(1.., |c: char| c.is_ascii_alphabetic())).parse_next(input)?;
    let targets = rest.parse_next(input)?;
    Ok(HeaderSyntax {
        number,
        action,
        targets: targets.trim(),
    })
}

/// Returns true for lines that try to be a step header.
pub(crate) fn looks_like_step(text: &str) -> bool {
    text.strip_prefix("step")
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_whitespace() || c.is_ascii_digit()))
}

fn parse_target(text: &str) -> Option<Target> {
    match text.split_once("->") {
        Some((from, to)) => {
            let (from, to) = (from.trim(), to.trim());
            (!from.is_empty() && !to.is_empty()).then(|| Target::Pair {
                from: Id::new(from),
                to: Id::new(to),
            })
        }
        None => Some(Target::Entity(Id::new(text))),
    }
}

fn parse_targets(text: &str) -> Vec<Target> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .filter_map(parse_target)
        .collect()
}

#[derive(Debug)]
enum State {
    Idle,
    /// The last header was rejected; its property lines are dropped quietly.
    Skipping,
    Step(SpannedStep),
}

/// Parses the animation block into steps.
pub(crate) fn parse(lines: &[SourceLine<'_>], diagnostics: &mut DiagnosticCollector) -> Vec<SpannedStep> {
    let mut steps = Vec::new();
    let mut state = State::Idle;

    for line in lines {
        if line.is_blank() || line.is_comment() {
            continue;
        }
        let text = line.trimmed();

        if looks_like_step(text) {
            if let State::Step(step) = std::mem::replace(&mut state, State::Idle) {
                steps.push(finish_step(step, diagnostics));
            }
            state = start_step(line, diagnostics);
            continue;
        }

        match (&mut state, split_property(text)) {
            (State::Step(step), Some((key, value))) if line.is_indented() => {
                step.step.properties_mut().insert(key, coerce(value));
            }
            (State::Skipping, Some(_)) if line.is_indented() => {}
            (State::Idle, Some(_)) if line.is_indented() => diagnostics.emit(
                Diagnostic::warning("property line before any step")
                    .with_code(ErrorCode::E104)
                    .with_label(line.span(), "line skipped")
                    .with_help("properties belong under a `step N: action targets` header"),
            ),
            _ => diagnostics.emit(
                Diagnostic::warning("unrecognized animation line")
                    .with_code(ErrorCode::E100)
                    .with_label(line.span(), "line skipped")
                    .with_help("expected `step N: action targets` or an indented `key: value`"),
            ),
        }
    }

    if let State::Step(step) = state {
        steps.push(finish_step(step, diagnostics));
    }

    debug!(steps = steps.len(); "Parsed animation block");
    steps
}

fn start_step(line: &SourceLine<'_>, diagnostics: &mut DiagnosticCollector) -> State {
    let Ok(header) = step_header(&mut LocatingSlice::new(line.trimmed())) else {
        diagnostics.emit(
            Diagnostic::warning("malformed step header")
                .with_code(ErrorCode::E102)
                .with_label(line.span(), "step skipped")
                .with_help("write steps as `step 1: show A, B`"),
        );
        return State::Skipping;
    };

    let Ok(action) = header.action.parse::<Action>() else {
        diagnostics.emit(
            Diagnostic::warning(format!("unknown animation action `{}`", header.action))
                .with_code(ErrorCode::E103)
                .with_label(line.span(), "step skipped")
                .with_help(
                    "use show, hide, highlight, unhighlight, connect, move, transform, camera or annotate",
                ),
        );
        return State::Skipping;
    };

    let mut properties = Properties::default();
    let mut targets = header.targets;
    if action == Action::Camera {
        let (first, remainder) = targets.split_once(char::is_whitespace).unwrap_or((targets, ""));
        if CAMERA_MODES.contains(&first) {
            properties.insert("cameraAction", PropertyValue::Str(first.to_string()));
            targets = remainder.trim();
        }
    }

    State::Step(SpannedStep {
        step: AnimationStep::new(header.number, action, parse_targets(targets), properties),
        span: line.span(),
    })
}

/// Reports property values that cannot be read; the step is kept and the
/// defaults apply.
fn finish_step(step: SpannedStep, diagnostics: &mut DiagnosticCollector) -> SpannedStep {
    let properties = step.step.properties();

    for key in TIME_KEYS {
        if properties.get(key).is_some() && properties.seconds(key).is_none() {
            diagnostics.emit(
                Diagnostic::warning(format!("`{key}` is not a time value"))
                    .with_code(ErrorCode::E206)
                    .with_label(step.span, "default used for this step")
                    .with_help("write times as `1.5`, `1.5s` or `1500ms`"),
            );
        }
    }

    if let Some(color) = properties.get("color") {
        let text = color.to_string();
        if Color::new(&text).is_err() {
            diagnostics.emit(
                Diagnostic::warning(format!("invalid color `{text}`"))
                    .with_code(ErrorCode::E202)
                    .with_label(step.span, "default highlight color used")
                    .with_help("use a CSS color such as `#FFD700` or `gold`"),
            );
        }
    }

    step
}
