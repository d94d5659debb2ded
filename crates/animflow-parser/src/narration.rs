//! Parser for the `@narration` block.
//!
//! ```text
//! step 1:
//!   title: "Request"
//!   text: "The client sends a request."
//! ```

use log::debug;
use winnow::stream::LocatingSlice;

use animflow_core::semantic::NarrationItem;

use crate::{
    animation::{looks_like_step, step_label},
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    properties::{split_property, strip_quotes},
    source::SourceLine,
};

#[derive(Debug)]
struct Entry {
    step: u32,
    title: String,
    text: String,
}

impl From<Entry> for NarrationItem {
    fn from(entry: Entry) -> Self {
        NarrationItem::new(entry.step, entry.title, entry.text)
    }
}

/// Parses the narration block into items in textual order.
pub(crate) fn parse(lines: &[SourceLine<'_>], diagnostics: &mut DiagnosticCollector) -> Vec<NarrationItem> {
    let mut items = Vec::new();
    let mut current: Option<Entry> = None;

    for line in lines {
        if line.is_blank() || line.is_comment() {
            continue;
        }
        let text = line.trimmed();

        if looks_like_step(text) {
            items.extend(current.take().map(NarrationItem::from));
            // `step 1: Intro` is tolerated; anything after the colon is ignored.
            match step_label(&mut LocatingSlice::new(text)) {
                Ok(step) => {
                    current = Some(Entry {
                        step,
                        title: String::new(),
                        text: String::new(),
                    });
                }
                Err(_) => diagnostics.emit(
                    Diagnostic::warning("malformed narration header")
                        .with_code(ErrorCode::E102)
                        .with_label(line.span(), "entry skipped")
                        .with_help("write entries as `step 1:`"),
                ),
            }
            continue;
        }

        match (current.as_mut(), split_property(text)) {
            (Some(entry), Some((key, value))) => match key {
                "title" => entry.title = strip_quotes(value).to_string(),
                "text" => entry.text = strip_quotes(value).to_string(),
                other => debug!(key = other, step = entry.step; "Ignoring narration key"),
            },
            (None, Some(_)) => diagnostics.emit(
                Diagnostic::warning("narration property before any entry")
                    .with_code(ErrorCode::E104)
                    .with_label(line.span(), "line skipped")
                    .with_help("start an entry with `step N:`"),
            ),
            (_, None) => diagnostics.emit(
                Diagnostic::warning("unrecognized narration line")
                    .with_code(ErrorCode::E100)
                    .with_label(line.span(), "line skipped")
                    .with_help("expected `step N:` or an indented `title:` / `text:`"),
            ),
        }
    }

    items.extend(current.map(NarrationItem::from));
    items
}
