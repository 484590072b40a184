//! Recognizer driver.
//!
//! A [`Recognizer`] is a named function that inspects a whole file's statements
//! (through a [`ScanContext`]) and records bindings into a [`Recognized`]
//! buffer. The [`Scanner`] runs its recognizers in the order given and merges
//! every binding into the registry, so a later recognizer overrides an earlier
//! one for the same variable name.
//!
//! ```text
//! statements ─▶ StatementIndex::scan ─▶ for each recognizer:
//!                                          gate on Keywords
//!                                          run(ctx, &mut recognized)
//!                                       ─▶ registry.put(...) in order
//! ```
//!
//! Recognizers share no state besides the context they read and the buffer
//! they append to.

use super::index::{Keywords, StatementIndex};
use super::metrics::ScanMetrics;
use super::normalize::normalize_lines;
use super::patterns::PatternId;
use super::registry::OutputRegistry;
use crate::{Binding, LogicalStatement, OutputDescriptor};
use regex::Captures;

/// Read-only view of one file's statements.
#[derive(Debug)]
pub(crate) struct ScanContext<'a> {
    statements: &'a [LogicalStatement],
    index: StatementIndex,
}

impl<'a> ScanContext<'a> {
    pub fn new(statements: &'a [LogicalStatement]) -> Self {
        ScanContext { statements, index: StatementIndex::scan(statements) }
    }

    pub fn index(&self) -> &StatementIndex {
        &self.index
    }

    pub fn statement(&self, position: usize) -> Option<&'a LogicalStatement> {
        self.statements.get(position)
    }

    /// Statements carrying any of `wanted`, in order.
    pub fn with_keywords(&self, wanted: Keywords) -> impl Iterator<Item = &'a LogicalStatement> + '_ {
        self.index.positions(wanted).filter_map(|pos| self.statements.get(pos))
    }

    /// Statements assigning to `name`, in order.
    pub fn assigning_to(&self, name: &str) -> impl Iterator<Item = &'a LogicalStatement> + '_ {
        self.index.targeting(name).iter().filter_map(|&pos| self.statements.get(pos))
    }

    /// Match `pattern` against each statement assigning to `variable`, keeping
    /// only matches whose first capture names that same variable.
    pub fn captures_for(
        &self,
        variable: &'a str,
        pattern: PatternId,
    ) -> impl Iterator<Item = Captures<'a>> + '_ {
        let re = pattern.regex();
        self.assigning_to(variable).filter_map(move |s| {
            let caps = re.captures(s.as_str())?;
            caps.get(1).is_some_and(|m| m.as_str().eq_ignore_ascii_case(variable)).then_some(caps)
        })
    }

    /// Right-hand side of the first `name = value;` statement, quotes removed.
    pub fn value_of(&self, name: &str) -> Option<String> {
        let re = PatternId::Assignment.regex();
        self.assigning_to(name).find_map(|s| {
            let caps = re.captures(s.as_str())?;
            if !caps[1].eq_ignore_ascii_case(name) {
                return None;
            }
            let value = caps[2].trim();
            let value = value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')).unwrap_or(value);
            Some(value.to_string())
        })
    }
}

/// Output buffer shared by the recognizers of one file.
#[derive(Debug, Default)]
pub(crate) struct Recognized {
    pub bindings: Vec<Binding>,
    pub warnings: Vec<String>,
}

impl Recognized {
    pub fn bind(&mut self, recognizer: &'static str, name: impl Into<String>, descriptor: OutputDescriptor) {
        let name = name.into();
        tracing::debug!(recognizer, name = %name, ?descriptor, "binding");
        self.bindings.push(Binding { name, descriptor, recognizer });
    }

    pub fn warn(&mut self, message: String) {
        tracing::warn!("{message}");
        self.warnings.push(message);
    }
}

/// A named statement-shape recognizer.
pub(crate) struct Recognizer {
    pub name: &'static str,
    /// The recognizer runs only if some statement carries one of these flags.
    pub triggers: Keywords,
    pub run: fn(&ScanContext<'_>, &mut Recognized),
}

impl std::fmt::Debug for Recognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recognizer")
            .field("name", &self.name)
            .field("triggers", &self.triggers)
            .field("run", &"<function>")
            .finish()
    }
}

/// Runs a fixed, ordered list of recognizers over script text.
#[derive(Debug)]
pub(crate) struct Scanner<'r> {
    recognizers: &'r [Recognizer],
    comment_marker: &'r str,
}

impl<'r> Scanner<'r> {
    pub fn new(recognizers: &'r [Recognizer], comment_marker: &'r str) -> Self {
        Scanner { recognizers, comment_marker }
    }

    /// Normalize `source` and merge its bindings into `registry`.
    pub fn scan_source(&self, source: &str, registry: &mut OutputRegistry, metrics: &mut ScanMetrics) {
        let statements = normalize_lines(source.lines(), self.comment_marker);
        self.scan_statements(&statements, registry, metrics);
    }

    pub fn scan_statements(
        &self,
        statements: &[LogicalStatement],
        registry: &mut OutputRegistry,
        metrics: &mut ScanMetrics,
    ) {
        metrics.statements += statements.len();
        let ctx = ScanContext::new(statements);
        let present = ctx.index().present();

        for recognizer in self.recognizers {
            if !present.intersects(recognizer.triggers) {
                continue;
            }

            let mut recognized = Recognized::default();
            (recognizer.run)(&ctx, &mut recognized);

            for binding in recognized.bindings {
                *metrics.bindings.entry(binding.recognizer).or_default() += 1;
                registry.put(binding.name, binding.descriptor);
            }
            metrics.warnings.extend(recognized.warnings);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<LogicalStatement> {
        normalize_lines(["RUN = 'case_1';", "ta = TABLE;", "ta . 'TEMPS' = PROG 0.;", "N = 3;"], "*")
    }

    #[test]
    fn value_of_strips_quotes() {
        let statements = sample();
        let ctx = ScanContext::new(&statements);

        assert_eq!(ctx.value_of("RUN").as_deref(), Some("case_1"));
        assert_eq!(ctx.value_of("n").as_deref(), Some("3"));
        assert_eq!(ctx.value_of("missing"), None);
    }

    #[test]
    fn captures_for_checks_variable_name() {
        let statements = sample();
        let ctx = ScanContext::new(&statements);

        assert_eq!(ctx.captures_for("ta", PatternId::TableDeclaration).count(), 1);
        assert_eq!(ctx.captures_for("TA", PatternId::TableEntry).count(), 1);
        assert_eq!(ctx.captures_for("RUN", PatternId::TableDeclaration).count(), 0);
    }

    #[test]
    fn later_recognizer_wins_and_untriggered_ones_are_skipped() {
        fn console(_: &ScanContext<'_>, out: &mut Recognized) {
            out.bind("first", "x", OutputDescriptor::ConsoleScalar);
        }
        fn file(_: &ScanContext<'_>, out: &mut Recognized) {
            out.bind("second", "x", OutputDescriptor::FileScalar("x.txt".into()));
        }
        fn never(_: &ScanContext<'_>, out: &mut Recognized) {
            out.bind("never", "y", OutputDescriptor::ConsoleScalar);
        }

        let recognizers = [
            Recognizer { name: "first", triggers: Keywords::ASSIGN, run: console },
            Recognizer { name: "second", triggers: Keywords::ASSIGN, run: file },
            Recognizer { name: "never", triggers: Keywords::EXCEL1, run: never },
        ];
        let mut registry = OutputRegistry::new();
        let mut metrics = ScanMetrics::default();
        Scanner::new(&recognizers, "*").scan_source("x = 1;", &mut registry, &mut metrics);

        assert_eq!(registry.get("x"), Some(&OutputDescriptor::FileScalar("x.txt".into())));
        assert_eq!(registry.get("y"), None);
        assert_eq!(metrics.statements, 1);
        assert_eq!(metrics.bindings.get("first"), Some(&1));
        assert_eq!(metrics.bindings.get("never"), None);
    }
}
