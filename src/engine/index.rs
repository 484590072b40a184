//! Statement indexing (scan pre-classification).
//!
//! Several recognizers need "every statement that assigns to `var`" or "every
//! statement starting with `OPTI`". Rescanning the whole statement list for each
//! candidate variable is quadratic, so this pass looks at each statement once
//! and records:
//!
//! - **Keywords** (`Keywords`): coarse flags derived from the leading token and
//!   a few cheap substring checks. Recognizers declare which flags they need
//!   and the scanner skips them when no statement carries any of those flags.
//! - **Targets**: statements grouped by the variable they assign to (either
//!   `var = ...` or `var . 'col' = ...`), keyed by the ASCII-lowercased name.
//!
//! This is a heuristic pass. False positives are fine because recognizers still
//! match their full pattern against each candidate statement.

use crate::LogicalStatement;
use std::collections::HashMap;

bitflags::bitflags! {
    /// Coarse per-statement features.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Keywords: u16 {
        const MESS   = 1 << 0;
        const OPTI   = 1 << 1;
        const SORT   = 1 << 2;
        const TABLE  = 1 << 3;
        const EVOL   = 1 << 4;
        const EXTR   = 1 << 5;
        const EXCEL1 = 1 << 6;
        /// `name = ...` or `name . 'col' = ...`
        const ASSIGN = 1 << 7;
    }
}

/// Keyword flags and assignment targets for one file's statements.
#[derive(Debug, Clone, Default)]
pub struct StatementIndex {
    keywords: Vec<Keywords>,
    present: Keywords,
    by_target: HashMap<String, Vec<usize>>,
}

impl StatementIndex {
    pub fn scan(statements: &[LogicalStatement]) -> Self {
        let mut keywords = Vec::with_capacity(statements.len());
        let mut present = Keywords::empty();
        let mut by_target: HashMap<String, Vec<usize>> = HashMap::new();

        for statement in statements {
            let (flags, target) = classify(statement.as_str());
            if let Some(target) = target {
                by_target.entry(target).or_default().push(statement.position);
            }
            present |= flags;
            keywords.push(flags);
        }

        StatementIndex { keywords, present, by_target }
    }

    /// Union of the flags of every statement.
    pub fn present(&self) -> Keywords {
        self.present
    }

    /// Positions of statements carrying any of `wanted`, in statement order.
    pub fn positions(&self, wanted: Keywords) -> impl Iterator<Item = usize> + '_ {
        self.keywords.iter().enumerate().filter(move |(_, k)| k.intersects(wanted)).map(|(pos, _)| pos)
    }

    /// Positions of statements assigning to `name` (case-insensitive), in order.
    pub fn targeting(&self, name: &str) -> &[usize] {
        self.by_target.get(&name.to_ascii_lowercase()).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn classify(text: &str) -> (Keywords, Option<String>) {
    let lower = text.to_ascii_lowercase();
    let mut flags = Keywords::empty();

    let leading = lower.split(|c: char| c.is_whitespace() || c == '(').next().unwrap_or("");
    match leading {
        "mess" => flags |= Keywords::MESS,
        "opti" => flags |= Keywords::OPTI,
        "sort" => flags |= Keywords::SORT,
        "@excel1" => flags |= Keywords::EXCEL1,
        _ => {}
    }

    let target = assignment_target(&lower);
    if target.is_some() {
        flags |= Keywords::ASSIGN;
        if lower.contains("table") {
            flags |= Keywords::TABLE;
        }
        if lower.contains("evol") {
            flags |= Keywords::EVOL;
        }
        if lower.contains("extr") {
            flags |= Keywords::EXTR;
        }
    }

    (flags, target)
}

/// Leading identifier of `name = ...` / `name . '...' = ...` statements.
fn assignment_target(lower: &str) -> Option<String> {
    let name_len = lower.find(|c: char| !(c.is_alphanumeric() || c == '_')).unwrap_or(lower.len());
    if name_len == 0 {
        return None;
    }

    let (name, rest) = lower.split_at(name_len);
    let rest = rest.trim_start();
    if (rest.starts_with('=') && !rest.starts_with("==")) || rest.starts_with('.') {
        Some(name.to_string())
    } else {
        None
    }
}
