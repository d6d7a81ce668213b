//! Pretty error reporting via `ariadne`.
//!
//! `LexError` already carries a byte-accurate [`crate::token::Span`]; `ParseError`
//! and `CodegenError` only carry a line number ("source-location reporting
//! beyond line numbers" is explicitly out of scope), so for those this module
//! recovers a span covering the whole offending line and lets `ariadne` render
//! it the same way. Every path falls back to a plain `eprintln!` if the
//! pretty-printer itself fails to write to stderr.

use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::CompileError;

fn print_range_report(
    filename: &str,
    source: &str,
    span: Range<usize>,
    message: &str,
) -> std::io::Result<()> {
    Report::build(ReportKind::Error, (filename, span.clone()))
        .with_message(message)
        .with_label(
            Label::new((filename, span))
                .with_message(message)
                .with_color(Color::Red),
        )
        .finish()
        .eprint((filename, Source::from(source)))
}

/// Byte range covering line `line` (1-indexed) of `source`, for errors that
/// only recorded a line number rather than a byte-accurate span.
fn line_span(source: &str, line: usize) -> Range<usize> {
    let mut offset = 0;
    for (i, text) in source.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            let trimmed = text.trim_end_matches(['\n', '\r']).len();
            return offset..offset + trimmed.max(1);
        }
        offset += text.len();
    }
    let end = source.len().max(1);
    end - 1..end
}

/// Renders `error` against `filename`/`source` and prints it to stderr,
/// matching the "delimited banner including the message and the current
/// source line" (first-failure-fatal; there is no batching).
pub fn report_error(filename: &str, source: &str, error: &CompileError) {
    match error {
        CompileError::Lex(e) => {
            if print_range_report(filename, source, e.span.start..e.span.end.max(e.span.start + 1), &e.message)
                .is_err()
            {
                eprintln!("{filename}:{}: {}", e.span.line, e.message);
            }
        }
        CompileError::Parse(e) => {
            let span = line_span(source, e.line);
            if print_range_report(filename, source, span, &e.message).is_err() {
                eprintln!("{filename}:{}: {}", e.line, e.message);
            }
        }
        CompileError::Codegen(e) => {
            if e.line == 0 {
                eprintln!("{filename}: {e}");
            } else {
                let span = line_span(source, e.line);
                if print_range_report(filename, source, span, &e.message).is_err() {
                    eprintln!("{filename}:{}: {}", e.line, e.message);
                }
            }
        }
        CompileError::InputRead { .. } | CompileError::OutputWrite { .. } => {
            eprintln!("{error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_span_first_line() {
        let src = "abc\ndef\n";
        assert_eq!(line_span(src, 1), 0..3);
    }

    #[test]
    fn line_span_second_line() {
        let src = "abc\ndef\n";
        assert_eq!(line_span(src, 2), 4..7);
    }

    #[test]
    fn line_span_past_end_clamps_to_source_end() {
        let src = "abc\n";
        let span = line_span(src, 5);
        assert!(span.end <= src.len().max(1));
    }
}
