//! `OPTI SORT` export declarations.
//!
//! ```text
//! OPTI SORT 'ta_res.csv';      <- output file for the next SORT
//! SORT 'EXCE' ta;              <- ta is a table, exported with one column per entry
//!
//! OPTI SORT 'val.txt';
//! SORT 'CHAI' val;             <- val is written as text
//! ```
//!
//! The `SORT` may also follow the `OPTI SORT` on the same physical line, in
//! which case both end up in one logical statement.

use super::columns;
use crate::OutputDescriptor;
use crate::engine::{Keywords, PatternId, Recognized, Recognizer, ScanContext};

/// Filename suffix that makes a text export readable as a table.
const CSV_SUFFIX: &str = ".csv";

/// One `OPTI SORT 'file'` + `SORT '<kind>' var` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SortDeclaration<'a> {
    pub variable: &'a str,
    pub filename: &'a str,
    /// Position of the `OPTI SORT` statement.
    pub position: usize,
}

/// Pairs every `OPTI SORT` with the `SORT` statement matched by `kind`.
pub(crate) fn declarations<'a>(ctx: &ScanContext<'a>, kind: PatternId) -> Vec<SortDeclaration<'a>> {
    let opti = PatternId::OptiSort.regex();
    let sort = kind.regex();
    let mut found = Vec::new();

    for statement in ctx.with_keywords(Keywords::OPTI) {
        let text = statement.as_str();
        let Some(caps) = opti.captures(text) else { continue };
        let (Some(whole), Some(filename)) = (caps.get(0), caps.get(1)) else { continue };

        let inline = text[whole.end()..].trim_start();
        let follower = if inline.is_empty() {
            ctx.statement(statement.position + 1).map(|s| s.as_str())
        } else {
            Some(inline)
        };

        let Some(variable) = follower.and_then(|f| sort.captures(f)).and_then(|c| c.get(1)) else { continue };
        found.push(SortDeclaration {
            variable: variable.as_str(),
            filename: filename.as_str(),
            position: statement.position,
        });
    }

    found
}

/// `SORT 'CHAI' var` → `var` read from a text file.
pub(crate) fn text_recognizer() -> Recognizer {
    Recognizer { name: "sort text", triggers: Keywords::OPTI, run: recognize_text_exports }
}

/// `SORT 'EXCE' var` → the columns of table `var` read from a delimited file.
pub(crate) fn table_recognizer() -> Recognizer {
    Recognizer { name: "sort table", triggers: Keywords::OPTI, run: recognize_table_exports }
}

fn recognize_text_exports(ctx: &ScanContext<'_>, out: &mut Recognized) {
    for decl in declarations(ctx, PatternId::SortText) {
        let filename = decl.filename.to_string();
        let descriptor = if has_csv_suffix(decl.filename) {
            OutputDescriptor::FileSeries(filename)
        } else {
            OutputDescriptor::FileScalar(filename)
        };
        out.bind("sort text", decl.variable, descriptor);
    }
}

fn recognize_table_exports(ctx: &ScanContext<'_>, out: &mut Recognized) {
    for decl in declarations(ctx, PatternId::SortTable) {
        let Some((source, names)) = columns::find_columns(ctx, decl.variable) else {
            out.warn(format!(
                "unable to find variable definition for `{}` exported to '{}'",
                decl.variable, decl.filename
            ));
            continue;
        };
        for name in names {
            out.bind(source, name, OutputDescriptor::FileSeries(decl.filename.to_string()));
        }
    }
}

fn has_csv_suffix(filename: &str) -> bool {
    filename.len() >= CSV_SUFFIX.len()
        && filename.get(filename.len() - CSV_SUFFIX.len()..).is_some_and(|s| s.eq_ignore_ascii_case(CSV_SUFFIX))
}
