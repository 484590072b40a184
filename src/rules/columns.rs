//! Column discovery for exported tables.
//!
//! Once a table variable is known to be exported (`SORT 'EXCE' var`), the names
//! of its columns are looked up across the whole file. Three shapes are tried
//! in order and the first one yielding any name wins:
//!
//! 1. `var = TABLE;` followed by entries `var . 'col' = ...;`
//! 2. `var = EVOL MANU 'col1' x 'col2' y;`
//! 3. `var = EXTR ... 'col' ...;` (a single extracted column is named `var`)

use crate::engine::{Keywords, PatternId, ScanContext};

type Finder = for<'a> fn(&ScanContext<'a>, &'a str) -> Vec<&'a str>;

/// Name, keywords some statement of the file must carry, and finder.
static FINDERS: [(&str, Keywords, Finder); 3] = [
    ("table entries", Keywords::ASSIGN.union(Keywords::TABLE), table_entries),
    ("evol manu", Keywords::ASSIGN.union(Keywords::EVOL), evol_manu),
    ("extr", Keywords::ASSIGN.union(Keywords::EXTR), extraction),
];

/// Column names of `variable`, with the name of the shape that produced them.
pub(crate) fn find_columns<'a>(ctx: &ScanContext<'a>, variable: &'a str) -> Option<(&'static str, Vec<&'a str>)> {
    applicable(ctx.index().present()).find_map(|&(source, _, finder)| {
        let names = finder(ctx, variable);
        (!names.is_empty()).then_some((source, names))
    })
}

fn applicable(present: Keywords) -> impl Iterator<Item = &'static (&'static str, Keywords, Finder)> {
    FINDERS.iter().filter(move |(_, needs, _)| present.contains(*needs))
}

fn table_entries<'a>(ctx: &ScanContext<'a>, variable: &'a str) -> Vec<&'a str> {
    if ctx.captures_for(variable, PatternId::TableDeclaration).next().is_none() {
        return Vec::new();
    }

    let mut names = Vec::new();
    for caps in ctx.captures_for(variable, PatternId::TableEntry) {
        if let Some(name) = caps.get(2) {
            push_unique(&mut names, name.as_str());
        }
    }
    names
}

fn evol_manu<'a>(ctx: &ScanContext<'a>, variable: &'a str) -> Vec<&'a str> {
    let mut names = Vec::new();
    if let Some(caps) = ctx.captures_for(variable, PatternId::EvolManu).next() {
        for name in [caps.get(2), caps.get(3)].into_iter().flatten() {
            push_unique(&mut names, name.as_str());
        }
    }
    names
}

fn extraction<'a>(ctx: &ScanContext<'a>, variable: &'a str) -> Vec<&'a str> {
    let Some(tail) = ctx.captures_for(variable, PatternId::Extraction).next().and_then(|caps| caps.get(2)) else {
        return Vec::new();
    };

    let mut names = Vec::new();
    for caps in PatternId::QuotedLiteral.regex().captures_iter(tail.as_str()) {
        if let Some(name) = caps.get(1) {
            push_unique(&mut names, name.as_str());
        }
    }

    if names.len() == 1 { vec![variable] } else { names }
}

fn push_unique<'a>(names: &mut Vec<&'a str>, name: &'a str) {
    let name = name.trim();
    if !name.is_empty() && !names.contains(&name) {
        names.push(name);
    }
}
