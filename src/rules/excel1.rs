//! `@EXCEL1` procedure calls.
//!
//! ```text
//! @EXCEL1 tab 'res';                        -> res.csv
//! @EXCEL1 tab 'res.csv';                    -> res.csv
//! @EXCEL1 tab (CHAI 'res_' RUN '.csv');     -> res_<value of RUN>.csv
//! ```

use crate::OutputDescriptor;
use crate::engine::{Keywords, PatternId, Recognized, Recognizer, ScanContext};

pub(crate) fn recognizer() -> Recognizer {
    Recognizer { name: "excel1", triggers: Keywords::EXCEL1, run: recognize_calls }
}

fn recognize_calls(ctx: &ScanContext<'_>, out: &mut Recognized) {
    let simple = PatternId::Excel1Simple.regex();
    let chain = PatternId::Excel1Chain.regex();

    for statement in ctx.with_keywords(Keywords::EXCEL1) {
        let text = statement.as_str();
        if let Some(caps) = simple.captures(text) {
            out.bind("excel1", &caps[1], OutputDescriptor::FileSeries(format!("{}.csv", &caps[2])));
        } else if let Some(caps) = chain.captures(text) {
            let filename = concatenate(ctx, &caps[2], out);
            out.bind("excel1", &caps[1], OutputDescriptor::FileSeries(filename));
        }
    }
}

/// Joins `CHAI` tokens into a filename. Quoted tokens and numbers are taken
/// literally, identifiers are replaced by their assigned value.
fn concatenate(ctx: &ScanContext<'_>, tokens: &str, out: &mut Recognized) -> String {
    let mut filename = String::new();

    for caps in PatternId::ChainToken.regex().captures_iter(tokens) {
        if let Some(literal) = caps.get(1) {
            filename.push_str(literal.as_str());
            continue;
        }
        let Some(bare) = caps.get(2).map(|m| m.as_str()) else { continue };

        if PatternId::Number.regex().is_match(bare) {
            filename.push_str(bare);
        } else if let Some(value) = ctx.value_of(bare) {
            filename.push_str(&value);
        } else {
            out.warn(format!("unresolved token `{bare}` in @EXCEL1 filename, left empty"));
        }
    }

    filename
}
