//! Output-declaration scanning for Cast3m-style solver scripts.
//!
//! A script written in the solver's line-oriented dialect says, in a handful of
//! recognizable statement shapes, which of its variables are results and where
//! they end up once the solver has run: the console report, a side text file,
//! or a semicolon-delimited table. This crate recognizes those shapes, builds an
//! [`OutputRegistry`] from them, and later resolves the registry against a result
//! directory into numeric values.
//!
//! ```text
//! script files ── scan ──▶ OutputRegistry ── resolve(dir) ──▶ ResolvedOutputs
//! ```

use serde::Serialize;

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod rules;

pub use api::{
    DEFAULT_COMMENT_MARKER, DEFAULT_CONSOLE_REPORT, DEFAULT_SCRIPT_EXTENSION, DEFAULT_SKIP_MARKER, ResolveOptions,
    ScanOptions, is_script_file, resolve, resolve_with, scan, scan_source, scan_verbose_with, scan_with,
    suggest_shapes,
};
pub use engine::{
    Column, OutputRegistry, RegistryPartition, ResolvedOutputs, ScanMetrics, ScanReport, Table, TableLayout,
    classify_table, find_scalar_assignment, find_scalar_assignment_with, normalize_lines, parse_delimited_table,
    parse_number, read_delimited_table, read_text,
};
pub use error::{AbsentReason, Result, ScanError};

// --- Shared types -------------------------------------------------------------

/// A trimmed, comment-free, `;`-terminated unit of script text.
///
/// `position` is the statement's index among all statements of its file;
/// recognizers that look ahead or behind rely on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalStatement {
    pub position: usize,
    pub text: String,
}

impl LogicalStatement {
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Where a bound variable's value will be found after the solver has run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "file", rename_all = "snake_case")]
pub enum OutputDescriptor {
    /// A `name=value` assignment inside the console report.
    ConsoleScalar,
    /// The whole content of a side file is one number.
    FileScalar(String),
    /// One column (or, header-less, the whole matrix) of a delimited table.
    FileSeries(String),
}

impl OutputDescriptor {
    /// Name of the artifact the value lives in, for file-bound descriptors.
    pub fn filename(&self) -> Option<&str> {
        match self {
            OutputDescriptor::ConsoleScalar => None,
            OutputDescriptor::FileScalar(file) | OutputDescriptor::FileSeries(file) => Some(file),
        }
    }

    /// Shape the caller should expect before anything has been resolved.
    pub fn expected_shape(&self) -> ResultShape {
        match self {
            OutputDescriptor::ConsoleScalar | OutputDescriptor::FileScalar(_) => ResultShape::Scalar,
            OutputDescriptor::FileSeries(_) => ResultShape::NumericArray,
        }
    }
}

/// Value of one variable after resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResolvedValue {
    Scalar(f64),
    Series(Vec<f64>),
    /// Rows × columns of a header-less table.
    Matrix(Vec<Vec<f64>>),
    Absent(AbsentReason),
}

impl ResolvedValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, ResolvedValue::Absent(_))
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            ResolvedValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_series(&self) -> Option<&[f64]> {
        match self {
            ResolvedValue::Series(v) => Some(v),
            _ => None,
        }
    }

    /// Observed shape; `None` for absent values.
    pub fn shape(&self) -> Option<ResultShape> {
        match self {
            ResolvedValue::Scalar(_) => Some(ResultShape::Scalar),
            ResolvedValue::Series(_) => Some(ResultShape::NumericArray),
            ResolvedValue::Matrix(_) => Some(ResultShape::NumericMatrix),
            ResolvedValue::Absent(_) => None,
        }
    }
}

/// Result shape classification handed to result-reporting collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultShape {
    Scalar,
    NumericArray,
    NumericMatrix,
}

/// A single variable → descriptor binding emitted by a recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Binding {
    pub name: String,
    pub descriptor: OutputDescriptor,
    /// Name of the recognizer that produced the binding.
    pub recognizer: &'static str,
}
