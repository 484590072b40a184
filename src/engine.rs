//! Scanning and resolution engine.
//!
//! The engine is split into focused submodules under `src/engine/`; the
//! recognizers themselves live in `src/rules/`.
//!
//! ## How the parts work together
//!
//! ```text
//! raw lines ── normalize_lines ──▶ Vec<LogicalStatement>     (normalize.rs)
//!                                        │
//!                      StatementIndex::scan                   (index.rs)
//!                        - leading keyword per statement
//!                        - statements grouped by target variable
//!                                        │
//!                                        v
//!                      Scanner::scan_statements               (scanner.rs)
//!                        - gate recognizers on keywords
//!                        - run them in fixed order
//!                        - last binding for a name wins
//!                                        │
//!                                        v
//!                                 OutputRegistry              (registry.rs)
//!                                        │
//! result dir ── resolve_outputs ─────────┤                    (resolve.rs)
//!                 - read_text / find_scalar_assignment        (artifact.rs)
//!                 - read_delimited_table / classify_table
//!                                        v
//!                                 ResolvedOutputs
//! ```
//!
//! ## Responsibilities by module
//!
//! - `normalize.rs`: reassembles multi-line statements and drops comments.
//! - `patterns.rs`: the single table of compiled, case-insensitive patterns
//!   used by every recognizer and by the artifact reader.
//! - `index.rs`: a cheap pre-pass over statements so recognizers query by
//!   keyword or by assigned variable instead of rescanning everything.
//! - `scanner.rs`: runs the recognizer list and merges bindings.
//! - `registry.rs`: the variable → descriptor map and its partition.
//! - `artifact.rs`: stateless readers for text and delimited tables.
//! - `resolve.rs`: turns a registry plus a result directory into values.
//! - `metrics.rs`: per-scan counters and warnings.

#[path = "engine/artifact.rs"]
mod artifact;
#[path = "engine/index.rs"]
mod index;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/normalize.rs"]
mod normalize;
#[path = "engine/patterns.rs"]
mod patterns;
#[path = "engine/registry.rs"]
mod registry;
#[path = "engine/resolve.rs"]
mod resolve;
#[path = "engine/scanner.rs"]
mod scanner;

pub use artifact::{
    Column, Table, TableLayout, classify_table, find_scalar_assignment, find_scalar_assignment_with,
    parse_delimited_table, parse_number, read_delimited_table, read_text,
};
pub(crate) use index::Keywords;
pub use metrics::{ScanMetrics, ScanReport};
pub use normalize::normalize_lines;
pub(crate) use patterns::PatternId;
pub use registry::{OutputRegistry, RegistryPartition};
pub(crate) use resolve::resolve_outputs;
pub use resolve::ResolvedOutputs;
pub(crate) use scanner::{Recognized, Recognizer, ScanContext, Scanner};
