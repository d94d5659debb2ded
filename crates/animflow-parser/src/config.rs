//! Parser for the `@config` block: one `key: value` per line.

use animflow_core::semantic::DiagramConfig;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    properties::{coerce, split_property},
    source::SourceLine,
};

pub(crate) fn parse(lines: &[SourceLine<'_>], diagnostics: &mut DiagnosticCollector) -> DiagramConfig {
    let mut config = DiagramConfig::default();

    for line in lines {
        if line.is_blank() || line.is_comment() {
            continue;
        }
        let Some((key, value)) = split_property(line.trimmed()) else {
            diagnostics.emit(
                Diagnostic::warning("unrecognized config line")
                    .with_code(ErrorCode::E100)
                    .with_label(line.span(), "line skipped")
                    .with_help("expected `key: value`"),
            );
            continue;
        };

        if let Err(reason) = config.apply(key, coerce(value)) {
            diagnostics.emit(
                Diagnostic::warning(format!("invalid value for `{key}`"))
                    .with_code(ErrorCode::E204)
                    .with_label(line.span(), reason)
                    .with_help("the option keeps its default"),
            );
        }
    }

    config
}
