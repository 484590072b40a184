//! Artifact reading.
//!
//! Stateless helpers for the three kinds of files the solver leaves behind:
//!
//! - the console report, searched line by line for `name=number`;
//! - side files holding one number;
//! - semicolon-delimited tables, with or without a header row.
//!
//! Failures are returned as [`AbsentReason`] values so the resolver can attach
//! them to the variables concerned and carry on.

use super::patterns::PatternId;
use crate::AbsentReason;
use crate::api::DEFAULT_SKIP_MARKER;
use std::io::ErrorKind;
use std::path::Path;

const CELL_DELIMITER: u8 = b';';

/// One table column: optional header label plus its cells, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: Option<String>,
    pub cells: Vec<String>,
}

/// A delimited table, column-major. All columns have the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<Column>,
}

/// Whether a table's first row is a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableLayout {
    HeaderPresent,
    HeaderAbsent,
}

impl Table {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of cells per column.
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.cells.len())
    }

    /// Move each column's first cell into its header label.
    pub fn with_header(self) -> Table {
        let columns = self
            .columns
            .into_iter()
            .map(|mut column| {
                let header = (!column.cells.is_empty()).then(|| column.cells.remove(0));
                Column { header, cells: column.cells }
            })
            .collect();
        Table { columns }
    }

    fn first_cell(&self) -> Option<&str> {
        self.columns.first()?.cells.first().map(String::as_str)
    }
}

/// Read a whole text artifact.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected; solver
/// output is frequently Latin-1.
pub fn read_text(path: &Path) -> Result<String, AbsentReason> {
    let file = display_name(path);
    match std::fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) if err.kind() == ErrorKind::NotFound => Err(AbsentReason::missing(file)),
        Err(err) => Err(AbsentReason::malformed(file, err.to_string())),
    }
}

/// Parse a complete numeric literal: optional sign, digits, optional decimal
/// point, optional exponent. Textual forms such as `NaN` or `inf` are refused.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if !PatternId::Number.regex().is_match(text) {
        return None;
    }
    text.parse::<f64>().ok()
}

/// [`find_scalar_assignment_with`] using the default skip marker (`$`).
pub fn find_scalar_assignment<S: AsRef<str>>(lines: &[S], name: &str) -> Option<f64> {
    find_scalar_assignment_with(lines, name, DEFAULT_SKIP_MARKER)
}

/// Value of the first `name=number` assignment found scanning top to bottom.
///
/// Lines starting with `skip_marker` are ignored and only the part of a line
/// before its first `;` is considered. The name must be the whole identifier
/// before `=`, so looking for `var` does not match `myvar=1`.
pub fn find_scalar_assignment_with<S: AsRef<str>>(lines: &[S], name: &str, skip_marker: &str) -> Option<f64> {
    let re = PatternId::ConsoleAssignment.regex();
    lines
        .iter()
        .map(|line| line.as_ref())
        .filter(|line| skip_marker.is_empty() || !line.starts_with(skip_marker))
        .map(|line| line.split(';').next().unwrap_or(""))
        .find_map(|code| {
            re.captures_iter(code)
                .filter(|caps| caps[1].eq_ignore_ascii_case(name))
                .find_map(|caps| caps[2].parse::<f64>().ok())
        })
}

/// Read a semicolon-delimited table from disk.
pub fn read_delimited_table(path: &Path) -> Result<Table, AbsentReason> {
    let content = read_text(path)?;
    parse_delimited_table(&content, &display_name(path))
}

/// Parse semicolon-delimited `content` into a column-major table.
///
/// Cells may be double-quoted, in which case they can hold the delimiter. The
/// first row fixes the column count. Shorter rows are padded with empty cells;
/// extra trailing cells are dropped. Blank lines are skipped and every cell is
/// trimmed. Columns whose cells are all empty are removed at the end; a table
/// left with no column at all is malformed.
pub fn parse_delimited_table(content: &str, file: &str) -> Result<Table, AbsentReason> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(CELL_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| AbsentReason::malformed(file, err.to_string()))?;
        if record.len() <= 1 && record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(record);
    }

    let mut rows = rows.into_iter();
    let Some(first) = rows.next() else {
        return Err(AbsentReason::malformed(file, "empty table"));
    };

    let mut columns: Vec<Column> =
        first.iter().map(|cell| Column { header: None, cells: vec![clean_cell(cell)] }).collect();
    let width = columns.len();

    for (row_index, row) in rows.enumerate() {
        for (i, column) in columns.iter_mut().enumerate() {
            column.cells.push(row.get(i).map(clean_cell).unwrap_or_default());
        }
        let extra = row.iter().skip(width).filter(|c| !c.is_empty()).count();
        if extra > 0 {
            tracing::warn!(file, row = row_index + 1, extra, width, "row longer than the first row");
        }
    }

    columns.retain(|column| column.cells.iter().any(|cell| !cell.is_empty()));
    if columns.is_empty() {
        return Err(AbsentReason::malformed(file, "no non-empty column"));
    }
    Ok(Table { columns })
}

/// A table whose first cell parses as a number is pure data; otherwise the
/// first row holds header labels.
pub fn classify_table(table: &Table) -> TableLayout {
    match table.first_cell().and_then(parse_number) {
        Some(_) => TableLayout::HeaderAbsent,
        None => TableLayout::HeaderPresent,
    }
}

/// A quoted cell preceded by padding (` "DX"`) is not unquoted by the reader;
/// strip one enclosing pair here.
fn clean_cell(cell: &str) -> String {
    let cell = cell.trim();
    let cell = cell.strip_prefix('"').and_then(|c| c.strip_suffix('"')).unwrap_or(cell);
    cell.trim().to_string()
}

fn display_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| path.display().to_string())
}
