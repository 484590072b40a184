use gibiscan::{OutputDescriptor, ResolvedOutputs, ResolvedValue, ScanReport};
use std::path::PathBuf;
use std::time::Duration;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const RED: &str = "\x1b[31m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

/// Series longer than this are abbreviated.
const PREVIEW: usize = 6;

pub fn print_run(
    scripts: &[PathBuf],
    report: &ScanReport,
    resolved: Option<&ResolvedOutputs>,
    resolve_time: Duration,
    color: bool,
) {
    let palette = ansi::Palette::new(color);
    let names: Vec<String> = scripts.iter().map(|p| p.display().to_string()).collect();
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Scanning: {}", names.join(", ")), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Scan ━━━", ansi::GRAY));
    print_scan(report, &palette);

    println!("\n{}", palette.paint("━━━ Outputs ━━━", ansi::GRAY));
    if report.registry.is_empty() {
        println!("{}", palette.dim("  No output declared"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • No MESS, OPTI SORT or @EXCEL1 statement in the scripts");
        println!("  • Comment marker does not match the scripts (see --comment)");
        println!("\n{}", palette.dim("  Tip: Set RUST_LOG=debug to see recognizer hits"));
    } else {
        print_outputs(report, &palette);
    }

    if let Some(resolved) = resolved {
        println!("\n{}", palette.paint("━━━ Values ━━━", ansi::GRAY));
        print_values(resolved, &palette);
    }

    if !report.metrics.warnings.is_empty() {
        println!("\n{}", palette.paint("━━━ Warnings ━━━", ansi::GRAY));
        for warning in &report.metrics.warnings {
            println!("  {} {}", palette.paint("!", ansi::YELLOW), warning);
        }
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Scan: {}  │  Resolve: {}",
        palette.paint(format!("{:?}", report.metrics.elapsed), ansi::GREEN),
        palette.dim(format!("{:?}", resolve_time)),
    );
    println!();
}

fn print_scan(report: &ScanReport, palette: &ansi::Palette) {
    let metrics = &report.metrics;
    println!(
        "  {} {}  {} {}",
        palette.dim("files:"),
        palette.paint(metrics.files.to_string(), ansi::BLUE),
        palette.dim("statements:"),
        palette.paint(metrics.statements.to_string(), ansi::BLUE),
    );
    for (recognizer, count) in &metrics.bindings {
        println!(
            "  {} {}",
            palette.paint(format!("{recognizer}:"), ansi::CYAN),
            palette.paint(format!("✓ {count}"), ansi::GREEN)
        );
    }
}

fn print_outputs(report: &ScanReport, palette: &ansi::Palette) {
    for (name, descriptor) in report.registry.iter() {
        let kind = match descriptor {
            OutputDescriptor::ConsoleScalar => "console",
            OutputDescriptor::FileScalar(_) => "file scalar",
            OutputDescriptor::FileSeries(_) => "file series",
        };
        println!(
            "  {} {} {}{}",
            palette.bold(palette.paint(name, ansi::GREEN)),
            palette.dim("│"),
            palette.paint(kind, ansi::BLUE),
            descriptor.filename().map(|f| format!(" {}", palette.paint(f, ansi::YELLOW))).unwrap_or_default(),
        );
    }
}

fn print_values(resolved: &ResolvedOutputs, palette: &ansi::Palette) {
    for (name, value) in resolved.iter() {
        let shown = match value {
            ResolvedValue::Scalar(v) => palette.paint(v.to_string(), ansi::GREEN),
            ResolvedValue::Series(values) => palette.paint(fmt_series(values), ansi::GREEN),
            ResolvedValue::Matrix(rows) => {
                let cols = rows.first().map_or(0, Vec::len);
                palette.paint(format!("matrix {}×{}", rows.len(), cols), ansi::GREEN)
            }
            ResolvedValue::Absent(reason) => palette.paint(format!("absent: {reason}"), ansi::RED),
        };
        println!("  {} {} {}", palette.bold(name), palette.dim("="), shown);
    }
}

fn fmt_series(values: &[f64]) -> String {
    let head: Vec<String> = values.iter().take(PREVIEW).map(f64::to_string).collect();
    if values.len() > PREVIEW {
        format!("[{}, … +{} more]", head.join(", "), values.len() - PREVIEW)
    } else {
        format!("[{}]", head.join(", "))
    }
}
