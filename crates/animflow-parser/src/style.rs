//! Parser for the `@style` block.
//!
//! ```text
//! api, worker:
//!   fill: #e3f2fd
//!   stroke-width: 2px
//! ```
//!
//! A header names one or more node ids; the indented lines below it apply to
//! all of them. Keys may be kebab-case or camelCase.

use indexmap::IndexMap;
use log::debug;

use animflow_core::{color::Color, identifier::Id, semantic::NodeStyle};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    properties::{camel_case, leading_number, split_property, strip_quotes},
    source::SourceLine,
    span::Span,
};

/// Styles by node id, in first-mention order, with the span of the header
/// that first named each id.
pub(crate) type Styles = IndexMap<Id, (NodeStyle, Span)>;

fn parse_color(value: &str, line: &SourceLine<'_>, diagnostics: &mut DiagnosticCollector) -> Option<Color> {
    match Color::new(value) {
        Ok(color) => Some(color),
        Err(err) => {
            diagnostics.emit(
                Diagnostic::warning(format!("invalid color `{value}`"))
                    .with_code(ErrorCode::E202)
                    .with_label(line.span(), err)
                    .with_help("use a CSS color such as `#e3f2fd` or `steelblue`"),
            );
            None
        }
    }
}

fn apply(style: &mut NodeStyle, key: &str, value: &str, line: &SourceLine<'_>, diagnostics: &mut DiagnosticCollector) {
    let value = strip_quotes(value);
    match camel_case(key).as_str() {
        "fill" => style.fill = parse_color(value, line, diagnostics).or(style.fill),
        "stroke" => style.stroke = parse_color(value, line, diagnostics).or(style.stroke),
        "color" => style.text_color = parse_color(value, line, diagnostics).or(style.text_color),
        "strokeWidth" => style.stroke_width = leading_number(value).or(style.stroke_width),
        "fontSize" => style.font_size = leading_number(value).or(style.font_size),
        "borderRadius" => style.border_radius = leading_number(value).or(style.border_radius),
        "fontWeight" => style.font_weight = Some(value.to_string()),
        "shadow" => style.shadow = Some(value.to_string()),
        other => debug!(key = other; "Ignoring unknown style key"),
    }
}

/// Parses the style block.
///
/// Class selectors (`.name:`) are accepted and skipped.
pub(crate) fn parse(lines: &[SourceLine<'_>], diagnostics: &mut DiagnosticCollector) -> Styles {
    let mut styles = Styles::new();
    let mut current: Vec<Id> = Vec::new();

    for line in lines {
        if line.is_blank() || line.is_comment() {
            continue;
        }
        let text = line.trimmed();

        let selector = (!line.is_indented()).then(|| text.strip_suffix(':')).flatten();
        if let Some(selector) = selector {
            current.clear();
            for name in selector.split(',').map(str::trim).filter(|n| !n.is_empty()) {
                if name.starts_with('.') {
                    debug!(class = name; "Ignoring class selector");
                    continue;
                }
                let id = Id::new(name);
                styles.entry(id).or_insert_with(|| (NodeStyle::default(), line.span()));
                current.push(id);
            }
            continue;
        }

        match split_property(text) {
            Some((key, value)) if line.is_indented() => {
                for id in &current {
                    if let Some((style, _)) = styles.get_mut(id) {
                        apply(style, key, value, line, diagnostics);
                    }
                }
            }
            _ => diagnostics.emit(
                Diagnostic::warning("unrecognized style line")
                    .with_code(ErrorCode::E100)
                    .with_label(line.span(), "line skipped")
                    .with_help("expected `node_id:` or an indented `key: value`"),
            ),
        }
    }

    styles
}
