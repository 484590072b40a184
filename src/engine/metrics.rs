//! Scan metrics.
//!
//! Counters collected while scanning, returned by `scan_verbose_with` and
//! printed by the CLI. Collecting them is cheap so the plain `scan` path
//! gathers them too and simply drops them.

use super::registry::OutputRegistry;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct ScanMetrics {
    /// Script files actually scanned (after extension filtering).
    pub files: usize,
    /// Logical statements produced by the normalizer, all files together.
    pub statements: usize,
    /// Bindings emitted per recognizer, before last-writer-wins merging.
    pub bindings: BTreeMap<&'static str, usize>,
    /// Non-fatal findings, in the order they were raised.
    pub warnings: Vec<String>,
    pub elapsed: Duration,
}

/// Registry bundled with the metrics of the scan that built it.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub registry: OutputRegistry,
    pub metrics: ScanMetrics,
}
