//! Output resolution.
//!
//! Once the solver has run, the registry is replayed against its result
//! directory:
//!
//! ```text
//! ConsoleScalar ──▶ console report ── find_scalar_assignment ──▶ Scalar
//! FileScalar    ──▶ side file      ── parse_number            ──▶ Scalar
//! FileSeries    ──▶ table ── classify_table ─┬─ HeaderAbsent  ──▶ Matrix (whole table)
//!                                            └─ HeaderPresent ──▶ Series (matching column)
//! ```
//!
//! Every failure becomes an `Absent` value for the variable it concerns; one
//! bad artifact never stops the others from being read. The result directory is
//! only read, so resolving twice against the same files yields the same output.

use super::artifact::{Column, Table, TableLayout, classify_table, find_scalar_assignment_with, parse_number};
use super::artifact::{read_delimited_table, read_text};
use super::registry::OutputRegistry;
use crate::{AbsentReason, ResolveOptions, ResolvedValue, ResultShape};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Resolved value per registered variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedOutputs {
    values: BTreeMap<String, ResolvedValue>,
}

impl ResolvedOutputs {
    pub fn get(&self, name: &str) -> Option<&ResolvedValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Observed shape of every variable that resolved to a value.
    pub fn shapes(&self) -> BTreeMap<String, ResultShape> {
        self.values.iter().filter_map(|(k, v)| Some((k.clone(), v.shape()?))).collect()
    }

    fn insert(&mut self, name: &str, value: ResolvedValue) {
        match &value {
            ResolvedValue::Absent(reason) if reason.is_corrupt() => tracing::warn!(name, %reason, "absent"),
            ResolvedValue::Absent(reason) => tracing::debug!(name, %reason, "absent"),
            _ => {}
        }
        self.values.insert(name.to_string(), value);
    }
}

pub(crate) fn resolve_outputs(registry: &OutputRegistry, dir: &Path, options: &ResolveOptions) -> ResolvedOutputs {
    let partition = registry.partition();
    let mut outputs = ResolvedOutputs::default();

    if !partition.console.is_empty() {
        resolve_console(&partition.console, dir, options, &mut outputs);
    }

    for (name, file) in &partition.file_scalars {
        outputs.insert(name, resolve_file_scalar(dir, file));
    }

    for (file, names) in partition.series_by_file() {
        resolve_table(dir, file, &names, &mut outputs);
    }

    outputs
}

fn resolve_console(names: &[String], dir: &Path, options: &ResolveOptions, outputs: &mut ResolvedOutputs) {
    let report = options.console_report.as_str();
    match read_text(&dir.join(report)) {
        Ok(content) => {
            let lines: Vec<&str> = content.lines().collect();
            for name in names {
                let value = match find_scalar_assignment_with(&lines, name, &options.skip_marker) {
                    Some(v) => ResolvedValue::Scalar(v),
                    None => ResolvedValue::Absent(AbsentReason::unparsable(
                        report,
                        format!("no value for variable '{name}'"),
                    )),
                };
                outputs.insert(name, value);
            }
        }
        Err(reason) => {
            for name in names {
                outputs.insert(name, ResolvedValue::Absent(reason.clone()));
            }
        }
    }
}

fn resolve_file_scalar(dir: &Path, file: &str) -> ResolvedValue {
    match read_text(&dir.join(file)) {
        Ok(content) => match parse_number(&content) {
            Some(v) => ResolvedValue::Scalar(v),
            None => ResolvedValue::Absent(AbsentReason::unparsable(file, format!("content '{}'", content.trim()))),
        },
        Err(reason) => ResolvedValue::Absent(reason),
    }
}

fn resolve_table(dir: &Path, file: &str, names: &[&str], outputs: &mut ResolvedOutputs) {
    let table = match read_delimited_table(&dir.join(file)) {
        Ok(table) => table,
        Err(reason) => {
            for name in names {
                outputs.insert(name, ResolvedValue::Absent(reason.clone()));
            }
            return;
        }
    };

    match classify_table(&table) {
        TableLayout::HeaderAbsent => {
            let value = table_matrix(&table, file);
            for name in names {
                outputs.insert(name, value.clone());
            }
        }
        TableLayout::HeaderPresent => {
            let table = table.with_header();
            for name in names {
                let value = match find_column(&table, name) {
                    Some(column) => column_series(column, file),
                    None => ResolvedValue::Absent(AbsentReason::UnmatchedColumn {
                        file: file.to_string(),
                        variable: name.to_string(),
                    }),
                };
                outputs.insert(name, value);
            }
        }
    }
}

/// First column whose header contains `name`, or that `name` starts with.
fn find_column<'t>(table: &'t Table, name: &str) -> Option<&'t Column> {
    table.columns().iter().find(|column| match column.header.as_deref() {
        Some(header) if !header.is_empty() => header.contains(name) || name.starts_with(header),
        _ => false,
    })
}

/// Column data as numbers. Trailing empty cells (a shorter column) are dropped.
fn column_series(column: &Column, file: &str) -> ResolvedValue {
    let len = column.cells.iter().rposition(|c| !c.is_empty()).map_or(0, |last| last + 1);
    let mut values = Vec::with_capacity(len);
    for cell in &column.cells[..len] {
        match parse_number(cell) {
            Some(v) => values.push(v),
            None => return ResolvedValue::Absent(AbsentReason::unparsable(file, format!("cell '{cell}'"))),
        }
    }
    ResolvedValue::Series(values)
}

/// Whole header-less table as rows × columns.
fn table_matrix(table: &Table, file: &str) -> ResolvedValue {
    let mut rows = Vec::with_capacity(table.row_count());
    for row in 0..table.row_count() {
        let mut values = Vec::with_capacity(table.column_count());
        for column in table.columns() {
            let cell = column.cells[row].as_str();
            match parse_number(cell) {
                Some(v) => values.push(v),
                None => return ResolvedValue::Absent(AbsentReason::unparsable(file, format!("cell '{cell}'"))),
            }
        }
        rows.push(values);
    }
    ResolvedValue::Matrix(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutputDescriptor;
    use std::fs;

    fn registry(entries: &[(&str, OutputDescriptor)]) -> OutputRegistry {
        let mut registry = OutputRegistry::new();
        for (name, descriptor) in entries {
            registry.put(*name, descriptor.clone());
        }
        registry
    }

    #[test]
    fn console_scalars_from_report() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("out.txt"), "$ dep=1.0\n dep= -5.14286E-02\n").unwrap();

        let reg = registry(&[("dep", OutputDescriptor::ConsoleScalar), ("other", OutputDescriptor::ConsoleScalar)]);
        let out = resolve_outputs(&reg, dir.path(), &ResolveOptions::default());

        assert_eq!(out.get("dep"), Some(&ResolvedValue::Scalar(-0.0514286)));
        assert!(matches!(out.get("other"), Some(ResolvedValue::Absent(AbsentReason::UnparsableScalar { .. }))));
    }

    #[test]
    fn missing_console_report_marks_every_variable() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(&[("a", OutputDescriptor::ConsoleScalar), ("b", OutputDescriptor::ConsoleScalar)]);
        let out = resolve_outputs(&reg, dir.path(), &ResolveOptions::default());

        let missing = ResolvedValue::Absent(AbsentReason::MissingArtifact { file: "out.txt".into() });
        assert_eq!(out.get("a"), Some(&missing));
        assert_eq!(out.get("b"), Some(&missing));
    }

    #[test]
    fn file_scalars() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ok.txt"), "  4.25E1\n").unwrap();
        fs::write(dir.path().join("bad.txt"), "not a number").unwrap();

        let reg = registry(&[
            ("ok", OutputDescriptor::FileScalar("ok.txt".into())),
            ("bad", OutputDescriptor::FileScalar("bad.txt".into())),
            ("gone", OutputDescriptor::FileScalar("gone.txt".into())),
        ]);
        let out = resolve_outputs(&reg, dir.path(), &ResolveOptions::default());

        assert_eq!(out.get("ok"), Some(&ResolvedValue::Scalar(42.5)));
        assert_eq!(
            out.get("bad"),
            Some(&ResolvedValue::Absent(AbsentReason::UnparsableScalar {
                file: "bad.txt".into(),
                detail: "content 'not a number'".into()
            }))
        );
        let missing = ResolvedValue::Absent(AbsentReason::MissingArtifact { file: "gone.txt".into() });
        assert_eq!(out.get("gone"), Some(&missing));
    }

    #[test]
    fn header_table_columns_by_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("t.csv"), "TEMPS;DX1;REACT_Z;\n0.0;1.0;5.0;\n0.1;2.0;6.0;\n0.2;;7.0;\n").unwrap();

        let series = |f: &str| OutputDescriptor::FileSeries(f.into());
        let reg = registry(&[
            ("TEMPS", series("t.csv")),
            ("REACT", series("t.csv")),
            ("DX1", series("t.csv")),
            ("VX", series("t.csv")),
        ]);
        let out = resolve_outputs(&reg, dir.path(), &ResolveOptions::default());

        assert_eq!(out.get("TEMPS").and_then(|v| v.as_series()), Some(&[0.0, 0.1, 0.2][..]));
        assert_eq!(out.get("REACT").and_then(|v| v.as_series()), Some(&[5.0, 6.0, 7.0][..]));
        assert_eq!(out.get("DX1").and_then(|v| v.as_series()), Some(&[1.0, 2.0][..]));
        assert!(matches!(out.get("VX"), Some(ResolvedValue::Absent(AbsentReason::UnmatchedColumn { .. }))));
    }

    #[test]
    fn variable_may_extend_header() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("t.csv"), "DX;VX\n1;2\n").unwrap();

        let reg = registry(&[("DX_P2", OutputDescriptor::FileSeries("t.csv".into()))]);
        let out = resolve_outputs(&reg, dir.path(), &ResolveOptions::default());
        assert_eq!(out.get("DX_P2").and_then(|v| v.as_series()), Some(&[1.0][..]));
    }

    #[test]
    fn headerless_table_is_a_matrix_for_every_variable() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("m.csv"), "1;2;3\n4;5;6\n").unwrap();

        let reg = registry(&[
            ("a", OutputDescriptor::FileSeries("m.csv".into())),
            ("b", OutputDescriptor::FileSeries("m.csv".into())),
        ]);
        let out = resolve_outputs(&reg, dir.path(), &ResolveOptions::default());

        let expected = ResolvedValue::Matrix(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!(out.get("a"), Some(&expected));
        assert_eq!(out.get("b"), Some(&expected));
        assert_eq!(out.shapes().get("a"), Some(&ResultShape::NumericMatrix));
    }

    #[test]
    fn bad_cell_is_unparsable_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("t.csv"), "A;B\n1;x\n2;3\n").unwrap();

        let reg = registry(&[
            ("A", OutputDescriptor::FileSeries("t.csv".into())),
            ("B", OutputDescriptor::FileSeries("t.csv".into())),
        ]);
        let out = resolve_outputs(&reg, dir.path(), &ResolveOptions::default());

        assert_eq!(out.get("A").and_then(|v| v.as_series()), Some(&[1.0, 2.0][..]));
        assert!(matches!(out.get("B"), Some(ResolvedValue::Absent(AbsentReason::UnparsableScalar { .. }))));
    }

    #[test]
    fn blank_table_is_malformed_for_every_variable() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("t.csv"), ";;\n;;\n").unwrap();

        let reg = registry(&[
            ("A", OutputDescriptor::FileSeries("t.csv".into())),
            ("B", OutputDescriptor::FileSeries("t.csv".into())),
        ]);
        let out = resolve_outputs(&reg, dir.path(), &ResolveOptions::default());

        let malformed = ResolvedValue::Absent(AbsentReason::malformed("t.csv", "no non-empty column"));
        assert_eq!(out.get("A"), Some(&malformed));
        assert_eq!(out.get("B"), Some(&malformed));
    }

    #[test]
    fn resolving_twice_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("out.txt"), "x=1.5\n").unwrap();
        fs::write(dir.path().join("t.csv"), "T;Y\n0;1\n1;2\n").unwrap();

        let reg = registry(&[
            ("x", OutputDescriptor::ConsoleScalar),
            ("Y", OutputDescriptor::FileSeries("t.csv".into())),
            ("z", OutputDescriptor::FileScalar("z.txt".into())),
        ]);
        let first = resolve_outputs(&reg, dir.path(), &ResolveOptions::default());
        let second = resolve_outputs(&reg, dir.path(), &ResolveOptions::default());
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }
}
