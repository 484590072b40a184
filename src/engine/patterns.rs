//! Compiled pattern table.
//!
//! Every statement shape the recognizers care about is listed here once, keyed
//! by [`PatternId`]. All patterns are compiled lazily through the `regex!` macro,
//! which prepends `(?i)`, so keyword case-insensitivity and quoting rules stay
//! identical across recognizers.
//!
//! Patterns are anchored on the statement start where the shape requires the
//! keyword to lead the statement. Patterns that capture a variable name capture
//! *any* identifier; recognizers compare the capture against the variable they
//! are looking for, which keeps the table free of per-variable regexes.

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum PatternId {
    /// `MESS 'name=' ...` → (name)
    Message,
    /// `OPTI SORT 'file';` → (file)
    OptiSort,
    /// `SORT 'EXCE' var;` / `SORT 'EXCEL' var;` → (var)
    SortTable,
    /// `SORT 'CHAI' var;` / `SORT 'CHAINE' var;` → (var)
    SortText,
    /// `var = TABLE;` → (var)
    TableDeclaration,
    /// `var . 'col' = ...` → (var, col)
    TableEntry,
    /// `var = EVOL MANU 'col1' x 'col2' y;` → (var, col1, col2)
    EvolManu,
    /// `var = EXTR ... ;` → (var, tail)
    Extraction,
    /// `@EXCEL1 var 'file'` or `@EXCEL1 var 'file.csv'` → (var, file)
    Excel1Simple,
    /// `@EXCEL1 var (CHAI[NE] tokens)` → (var, tokens)
    Excel1Chain,
    /// One token of a `CHAI` concatenation → (quoted) | (bare)
    ChainToken,
    /// Any quoted literal → (content)
    QuotedLiteral,
    /// `name = value;` → (name, value)
    Assignment,
    /// `name=number` inside console report text → (name, number)
    ConsoleAssignment,
    /// A complete numeric literal.
    Number,
}

impl PatternId {
    #[cfg(test)]
    pub(crate) const ALL: [PatternId; 15] = [
        PatternId::Message,
        PatternId::OptiSort,
        PatternId::SortTable,
        PatternId::SortText,
        PatternId::TableDeclaration,
        PatternId::TableEntry,
        PatternId::EvolManu,
        PatternId::Extraction,
        PatternId::Excel1Simple,
        PatternId::Excel1Chain,
        PatternId::ChainToken,
        PatternId::QuotedLiteral,
        PatternId::Assignment,
        PatternId::ConsoleAssignment,
        PatternId::Number,
    ];

    pub(crate) fn regex(self) -> &'static Regex {
        match self {
            PatternId::Message => regex!(r"^mess\s+'(\w+)\s*=\s*'"),
            PatternId::OptiSort => regex!(r"^opti\s+sort\s+'([\w.\-]+)'\s*;"),
            PatternId::SortTable => regex!(r"^sort\s+'excel?'\s+(\w+)\s*;"),
            PatternId::SortText => regex!(r"^sort\s+'chai(?:ne)?'\s+(\w+)\s*;"),
            PatternId::TableDeclaration => regex!(r"^(\w+)\s*=\s*table\s*;"),
            PatternId::TableEntry => regex!(r"^(\w+)\s*\.\s*'(\w*)\s*'\s*="),
            PatternId::EvolManu => {
                regex!(r"^(\w+)\s*=\s*evol\s+manu\s+'([^']*)'\s+[^';]+?\s+'([^']*)'\s+[^';]+?\s*;")
            }
            PatternId::Extraction => regex!(r"^(\w+)\s*=\s*extr\s+([^;]*);"),
            PatternId::Excel1Simple => regex!(r"^@excel1\s+(\w+)\s+'([^']+?)(?:\.csv)?'"),
            PatternId::Excel1Chain => regex!(r"^@excel1\s+(\w+)\s+\(\s*chai(?:ne)?\s+(.+)\)"),
            PatternId::ChainToken => regex!(r"'([^']*)'|([^\s']+)"),
            PatternId::QuotedLiteral => regex!(r"'([^']*)'"),
            PatternId::Assignment => regex!(r"^(\w+)\s*=\s*([^;]*)"),
            PatternId::ConsoleAssignment => {
                regex!(r"(\w+)=\s*([+\-]?(?:\d+\.?\d*|\.\d+)(?:e[+\-]?\d+)?)")
            }
            PatternId::Number => regex!(r"^[+\-]?(?:\d+\.?\d*|\.\d+)(?:e[+\-]?\d+)?$"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_pattern_compiles() {
        for id in PatternId::ALL {
            let _ = id.regex();
        }
    }

    #[test]
    fn keywords_match_in_any_case() {
        assert!(PatternId::Message.regex().is_match("mess 'var=' var;"));
        assert!(PatternId::Message.regex().is_match("MeSs 'var=' var;"));
        assert!(PatternId::SortTable.regex().is_match("sort 'exce' ta;"));
        assert!(PatternId::SortTable.regex().is_match("SORT 'EXCEL' ta;"));
        assert!(PatternId::SortText.regex().is_match("Sort 'Chaine' v;"));
    }

    #[test]
    fn evol_manu_captures_both_columns() {
        let caps = PatternId::EvolManu.regex().captures("ev = EVOL MANU 'TEMPS' lt 'DX' ldx;").unwrap();
        assert_eq!(&caps[1], "ev");
        assert_eq!(&caps[2], "TEMPS");
        assert_eq!(&caps[3], "DX");
    }

    #[test]
    fn excel1_simple_strips_csv_suffix() {
        let caps = PatternId::Excel1Simple.regex().captures("@EXCEL1 tab 'res.csv';").unwrap();
        assert_eq!(&caps[2], "res");
        let caps = PatternId::Excel1Simple.regex().captures("@EXCEL1 tab 'res';").unwrap();
        assert_eq!(&caps[2], "res");
        let caps = PatternId::Excel1Simple.regex().captures("@EXCEL1 tab 'res.v2.csv';").unwrap();
        assert_eq!(&caps[2], "res.v2");
    }

    #[test]
    fn number_accepts_sign_and_exponent() {
        let re = PatternId::Number.regex();
        for ok in ["2.3", "+2.322", "+2.32E2", "-5.14286E-02", "1.8459E+003", "0.", ".5", "10"] {
            assert!(re.is_match(ok), "{ok}");
        }
        for bad in ["", "TEMPS", "NaN", "inf", "1.2.3", "E5", "+"] {
            assert!(!re.is_match(bad), "{bad}");
        }
    }
}
