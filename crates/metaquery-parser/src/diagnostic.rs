//! Human-readable filter errors
//!
//! Renders an `ariadne` report over the filter string, underlining the segment
//! the error refers to:
//!
//! ```text
//! Error: unknown operator 'eqq'
//!    ╭─[<unknown>:1:6]
//!    │
//!  1 │ name:eqq:Foo
//!    │      ─┬─
//!    │       ╰─── unknown operator 'eqq'
//! ```

use std::ops::Range;

use ariadne::{Config, Label, Report, ReportKind, Source};

use crate::error::{FilterPart, QueryParserError};

/// Char range of one filter segment; the whole filter when the segment is absent
fn span_of(filter: &str, part: FilterPart) -> Range<usize> {
    let total = filter.chars().count();
    let mut segments = filter.splitn(3, ':');
    let path = segments.next().map(|s| s.chars().count()).unwrap_or(0);
    let operator = segments.next().map(|s| s.chars().count());
    let value = segments.next().map(|s| s.chars().count());

    match (part, operator, value) {
        (FilterPart::Path, _, _) if path > 0 => 0..path,
        (FilterPart::Operator, Some(op), _) if op > 0 => path + 1..path + 1 + op,
        (FilterPart::Value, Some(op), Some(v)) if v > 0 => path + op + 2..path + op + 2 + v,
        _ => 0..total,
    }
}

/// Render `error` against the filter that produced it
pub fn render_diagnostic(filter: &str, error: &QueryParserError) -> String {
    let span = span_of(filter, error.part());
    let message = error.to_string();
    let mut buf = Vec::new();

    let written = Report::build(ReportKind::Error, (), span.start)
        .with_config(Config::default().with_color(false))
        .with_message(&message)
        .with_label(Label::new(span).with_message(&message))
        .finish()
        .write(Source::from(filter.to_string()), &mut buf);

    match written {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) => message,
    }
}
