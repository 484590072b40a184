//! Statement normalization.
//!
//! Scripts spread long statements over several physical lines and interleave
//! comment lines. Recognizers want one statement per item, so this pass trims
//! every line, drops blanks and comments, and joins continuation lines with a
//! single space until one of them ends with the `;` terminator.
//!
//! No case folding happens here; keyword matching is case-insensitive later on.

use crate::LogicalStatement;

const TERMINATOR: char = ';';

/// Reassemble raw `lines` into logical statements.
///
/// A statement still open when the input runs out is emitted as-is.
/// Comment and blank lines inside a continuation are skipped.
pub fn normalize_lines<I, S>(lines: I, comment_marker: &str) -> Vec<LogicalStatement>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut statements = Vec::new();
    let mut pending: Option<String> = None;

    for raw in lines {
        let line = raw.as_ref().trim();
        if line.is_empty() || is_comment(line, comment_marker) {
            continue;
        }

        let buffer = pending.get_or_insert_with(String::new);
        if !buffer.is_empty() {
            buffer.push(' ');
        }
        buffer.push_str(line);

        if line.ends_with(TERMINATOR) {
            if let Some(text) = pending.take() {
                statements.push(LogicalStatement { position: statements.len(), text });
            }
        }
    }

    if let Some(text) = pending {
        tracing::debug!(statement = %text, "unterminated statement at end of input");
        statements.push(LogicalStatement { position: statements.len(), text });
    }

    statements
}

fn is_comment(line: &str, marker: &str) -> bool {
    !marker.is_empty() && line.starts_with(marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(statements: &[LogicalStatement]) -> Vec<&str> {
        statements.iter().map(|s| s.as_str()).collect()
    }

    #[test]
    fn joins_continuation_lines() {
        let lines = ["ta . 'REACT' = PROG 0. 1845.9", "   3691.8 5537.7;", "MESS 'x=' x;"];
        let out = normalize_lines(lines, "*");

        assert_eq!(texts(&out), vec!["ta . 'REACT' = PROG 0. 1845.9 3691.8 5537.7;", "MESS 'x=' x;"]);
        assert_eq!(out[1].position, 1);
    }

    #[test]
    fn drops_comments_and_blank_lines() {
        let lines = ["* header comment", "", "  OPTI DIME 2;  ", "*OPTI SORT 'x.csv';"];
        let out = normalize_lines(lines, "*");
        assert_eq!(texts(&out), vec!["OPTI DIME 2;"]);
    }

    #[test]
    fn comment_marker_is_configurable() {
        let lines = ["# comment", "* not a comment here;"];
        let out = normalize_lines(lines, "#");
        assert_eq!(texts(&out), vec!["* not a comment here;"]);
    }

    #[test]
    fn unterminated_tail_is_kept() {
        let lines = ["a = 1;", "b = PROG 1. 2.", "3."];
        let out = normalize_lines(lines, "*");
        assert_eq!(texts(&out), vec!["a = 1;", "b = PROG 1. 2. 3."]);
    }

    #[test]
    fn comments_inside_continuation_are_skipped() {
        let lines = ["a = PROG 1.", "* second half", "2.;"];
        let out = normalize_lines(lines, "*");
        assert_eq!(texts(&out), vec!["a = PROG 1. 2.;"]);
    }

    #[test]
    fn empty_marker_never_matches() {
        let out = normalize_lines(["x = 1;"], "");
        assert_eq!(out.len(), 1);
    }
}
