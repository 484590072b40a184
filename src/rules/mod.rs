//! Output-declaration recognizers.
//!
//! Each recognizer matches one statement shape known to produce an output
//! binding. The order of [`all`] matters: bindings are merged last-writer-wins,
//! so the console recognizer runs first and the file-bound recognizers after it.
//!
//! | recognizer        | statement shape                               | descriptor            |
//! |-------------------|-----------------------------------------------|-----------------------|
//! | `mess`            | `MESS 'name=' ...;`                           | `ConsoleScalar`       |
//! | `sort text`       | `OPTI SORT 'f';` + `SORT 'CHAI' v;`           | `FileScalar(f)`       |
//! | `sort table`      | `OPTI SORT 'f';` + `SORT 'EXCE' v;` + columns | `FileSeries(f)`       |
//! | `excel1`          | `@EXCEL1 v 'f';` / `@EXCEL1 v (CHAI ...);`    | `FileSeries(f.csv)`   |
//!
//! The columns of a `SORT 'EXCE'` table come from the first of `TABLE`
//! entries, `EVOL MANU` or `EXTR` that yields anything (see `columns.rs`).

use crate::engine::Recognizer;

pub(crate) mod columns;
pub(crate) mod console;
pub(crate) mod excel1;
pub(crate) mod sort;


/// Every recognizer, in evaluation order.
pub(crate) fn all() -> Vec<Recognizer> {
    vec![console::recognizer(), sort::text_recognizer(), sort::table_recognizer(), excel1::recognizer()]
}
