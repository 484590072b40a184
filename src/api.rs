use crate::engine::{self, OutputRegistry, Recognizer, ResolvedOutputs, ScanMetrics, ScanReport, Scanner};
use crate::{Result, ResultShape, ScanError};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

static DEFAULT_RECOGNIZERS: Lazy<Vec<Recognizer>> = Lazy::new(crate::rules::all);

/// Comment marker used by current script conventions.
pub const DEFAULT_COMMENT_MARKER: &str = "*";
/// Extension of script files worth scanning.
pub const DEFAULT_SCRIPT_EXTENSION: &str = "dgibi";
/// File the solver writes its console report to.
pub const DEFAULT_CONSOLE_REPORT: &str = "out.txt";
/// Console report lines starting with this are internal and never searched.
pub const DEFAULT_SKIP_MARKER: &str = "$";

/// Options that affect scanning.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Lines starting with this marker are comments (`*` or `#` depending on deployment).
    pub comment_marker: String,
    /// Only files whose name ends with this extension are scanned; `None` scans every file.
    pub script_extension: Option<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            comment_marker: DEFAULT_COMMENT_MARKER.to_string(),
            script_extension: Some(DEFAULT_SCRIPT_EXTENSION.to_string()),
        }
    }
}

impl ScanOptions {
    pub fn with_comment_marker(comment_marker: &str) -> Self {
        Self { comment_marker: comment_marker.to_string(), ..Self::default() }
    }

    fn accepts(&self, path: &Path) -> bool {
        match &self.script_extension {
            Some(ext) => path.file_name().is_some_and(|name| name.to_string_lossy().ends_with(ext.as_str())),
            None => true,
        }
    }
}

/// Options that affect resolution.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Name of the console report inside the result directory.
    pub console_report: String,
    /// Console report lines starting with this marker are ignored.
    pub skip_marker: String,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { console_report: DEFAULT_CONSOLE_REPORT.to_string(), skip_marker: DEFAULT_SKIP_MARKER.to_string() }
    }
}

/// Scan `files` with the given comment marker and default options otherwise.
///
/// # Example
/// ```no_run
/// use gibiscan::{OutputDescriptor, scan};
///
/// let registry = scan(&["poutre.dgibi"], "*").unwrap();
/// assert_eq!(registry.get("dep_P2"), Some(&OutputDescriptor::ConsoleScalar));
/// ```
pub fn scan<P: AsRef<Path>>(files: &[P], comment_marker: &str) -> Result<OutputRegistry> {
    scan_with(files, &ScanOptions::with_comment_marker(comment_marker))
}

/// Scan `files` into a fresh registry.
///
/// Files are scanned in the order given; a binding from a later file replaces
/// one from an earlier file. Files rejected by the extension filter are skipped.
pub fn scan_with<P: AsRef<Path>>(files: &[P], options: &ScanOptions) -> Result<OutputRegistry> {
    Ok(scan_verbose_with(files, options)?.registry)
}

/// Like [`scan_with`], also returning scan metrics and warnings.
pub fn scan_verbose_with<P: AsRef<Path>>(files: &[P], options: &ScanOptions) -> Result<ScanReport> {
    let started = Instant::now();
    let scanner = Scanner::new(&DEFAULT_RECOGNIZERS, &options.comment_marker);
    let mut registry = OutputRegistry::new();
    let mut metrics = ScanMetrics::default();

    for path in files.iter().map(|p| p.as_ref()) {
        if !options.accepts(path) {
            tracing::debug!(path = %path.display(), "skipped, not a script file");
            continue;
        }
        let source = read_script(path)?;
        tracing::debug!(path = %path.display(), "scanning");
        scanner.scan_source(&source, &mut registry, &mut metrics);
        metrics.files += 1;
    }

    metrics.elapsed = started.elapsed();
    Ok(ScanReport { registry, metrics })
}

/// Scan in-memory script text as a single file.
pub fn scan_source(source: &str, options: &ScanOptions) -> OutputRegistry {
    let scanner = Scanner::new(&DEFAULT_RECOGNIZERS, &options.comment_marker);
    let mut registry = OutputRegistry::new();
    let mut metrics = ScanMetrics::default();
    scanner.scan_source(source, &mut registry, &mut metrics);
    registry
}

/// Resolve `registry` against `result_dir` with default options.
pub fn resolve(registry: &OutputRegistry, result_dir: &Path) -> ResolvedOutputs {
    resolve_with(registry, result_dir, &ResolveOptions::default())
}

/// Resolve `registry` against `result_dir`.
///
/// Never fails as a whole: a variable whose artifact is missing or unreadable
/// resolves to [`crate::ResolvedValue::Absent`].
pub fn resolve_with(registry: &OutputRegistry, result_dir: &Path, options: &ResolveOptions) -> ResolvedOutputs {
    engine::resolve_outputs(registry, result_dir, options)
}

/// Expected result shape per registered variable.
pub fn suggest_shapes(registry: &OutputRegistry) -> BTreeMap<String, ResultShape> {
    registry.shapes()
}

/// True when `path` is an existing file the scanner would accept.
pub fn is_script_file(path: &Path, options: &ScanOptions) -> bool {
    path.is_file() && options.accepts(path)
}

fn read_script(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| ScanError::Io { path: PathBuf::from(path), source })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OutputDescriptor, ResolvedValue};
    use std::fs;

    #[test]
    fn scan_then_resolve_round() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("case.dgibi");
        fs::write(
            &script,
            "* case\nMESS 'dep=' dep;\nOPTI SORT 'val.txt';\nSORT 'CHAI' val;\nOPTI SORT 'ta_res.csv';\n\
             SORT 'EXCE' ta;\nta = TABLE;\nta . 'TEMPS' = PROG 0. 1.;\nta . 'DX' = PROG 2. 3.;\n",
        )
        .unwrap();

        let registry = scan(&[&script], "*").unwrap();
        assert_eq!(registry.len(), 4);

        let results = dir.path().join("results");
        fs::create_dir(&results).unwrap();
        fs::write(results.join("out.txt"), " dep=-1.5\n").unwrap();
        fs::write(results.join("val.txt"), "12.0\n").unwrap();
        fs::write(results.join("ta_res.csv"), "TEMPS;DX\n0.;2.\n1.;3.\n").unwrap();

        let out = resolve(&registry, &results);
        assert_eq!(out.get("dep"), Some(&ResolvedValue::Scalar(-1.5)));
        assert_eq!(out.get("val"), Some(&ResolvedValue::Scalar(12.0)));
        assert_eq!(out.get("DX").and_then(|v| v.as_series()), Some(&[2.0, 3.0][..]));
    }

    #[test]
    fn non_script_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("a.dgibi");
        let other = dir.path().join("notes.txt");
        fs::write(&script, "MESS 'a=' a;\n").unwrap();
        fs::write(&other, "MESS 'b=' b;\n").unwrap();

        let report = scan_verbose_with(&[&script, &other], &ScanOptions::default()).unwrap();
        assert_eq!(report.metrics.files, 1);
        assert!(report.registry.contains("a"));
        assert!(!report.registry.contains("b"));

        let all = ScanOptions { script_extension: None, ..ScanOptions::default() };
        assert_eq!(scan_with(&[&script, &other], &all).unwrap().len(), 2);
    }

    #[test]
    fn missing_script_is_a_hard_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan(&[dir.path().join("absent.dgibi")], "*").unwrap_err();
        assert!(matches!(err, ScanError::Io { .. }));
    }

    #[test]
    fn later_file_overrides_earlier() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("1.dgibi");
        let second = dir.path().join("2.dgibi");
        fs::write(&first, "MESS 'x=' x;\n").unwrap();
        fs::write(&second, "OPTI SORT 'x.txt';\nSORT 'CHAI' x;\n").unwrap();

        let registry = scan(&[&first, &second], "*").unwrap();
        assert_eq!(registry.get("x"), Some(&OutputDescriptor::FileScalar("x.txt".into())));
    }

    #[test]
    fn each_scan_starts_fresh() {
        let options = ScanOptions::default();
        let first = scan_source("MESS 'a=' a;", &options);
        let second = scan_source("MESS 'b=' b;", &options);
        assert!(first.contains("a"));
        assert!(!second.contains("a"));
    }

    #[test]
    fn shapes_follow_descriptors() {
        let source = "MESS 'a=' a;\nOPTI SORT 'f.csv';\nSORT 'EXCE' t;\nt = EXTR ev 'DX';\n";
        let registry = scan_source(source, &ScanOptions::default());
        let shapes = suggest_shapes(&registry);
        assert_eq!(shapes.get("a"), Some(&ResultShape::Scalar));
        assert_eq!(shapes.get("t"), Some(&ResultShape::NumericArray));
    }

    #[test]
    fn is_script_file_checks_extension_and_existence() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("a.dgibi");
        fs::write(&script, "").unwrap();
        let options = ScanOptions::default();

        assert!(is_script_file(&script, &options));
        assert!(!is_script_file(&dir.path().join("b.dgibi"), &options));
        assert!(!is_script_file(dir.path(), &options));
    }
}
