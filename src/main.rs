mod debug_report;

use gibiscan::{
    DEFAULT_COMMENT_MARKER, DEFAULT_CONSOLE_REPORT, ResolveOptions, ScanOptions, resolve_with, scan_verbose_with,
};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(io::stderr).init();

    let scan_options = ScanOptions { comment_marker: config.comment_marker.clone(), script_extension: None };
    let report = match scan_verbose_with(config.scripts.as_slice(), &scan_options) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let resolve_options = ResolveOptions { console_report: config.console_report.clone(), ..ResolveOptions::default() };
    let started = Instant::now();
    let resolved = config.results.as_deref().map(|dir| resolve_with(&report.registry, dir, &resolve_options));
    let resolve_time = started.elapsed();

    if config.json {
        let document = serde_json::json!({
            "outputs": &report.registry,
            "shapes": report.registry.shapes(),
            "values": &resolved,
            "warnings": &report.metrics.warnings,
        });
        match serde_json::to_string_pretty(&document) {
            Ok(text) => println!("{text}"),
            Err(err) => {
                eprintln!("error: failed to encode JSON: {err}");
                std::process::exit(1);
            }
        }
        return;
    }

    debug_report::print_run(&config.scripts, &report, resolved.as_ref(), resolve_time, config.color);
}

struct CliConfig {
    scripts: Vec<PathBuf>,
    results: Option<PathBuf>,
    comment_marker: String,
    console_report: String,
    json: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut scripts = Vec::new();
    let mut results: Option<PathBuf> = None;
    let mut comment_marker = DEFAULT_COMMENT_MARKER.to_string();
    let mut console_report = DEFAULT_CONSOLE_REPORT.to_string();
    let mut json = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("gibiscan {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--json" => json = true,
            "--results" | "-r" => {
                let value = args.next().ok_or_else(|| "error: --results expects a directory".to_string())?;
                if results.is_some() {
                    return Err("error: --results provided multiple times".to_string());
                }
                results = Some(PathBuf::from(value));
            }
            "--comment" => {
                comment_marker = args.next().ok_or_else(|| "error: --comment expects a marker".to_string())?;
            }
            "--report" => {
                console_report = args.next().ok_or_else(|| "error: --report expects a file name".to_string())?;
            }
            "--" => {
                scripts.extend(args.by_ref().map(PathBuf::from));
                break;
            }
            _ if arg.starts_with("--results=") => {
                if results.is_some() {
                    return Err("error: --results provided multiple times".to_string());
                }
                results = Some(PathBuf::from(arg.trim_start_matches("--results=")));
            }
            _ if arg.starts_with("--comment=") => {
                comment_marker = arg.trim_start_matches("--comment=").to_string();
            }
            _ if arg.starts_with("--report=") => {
                console_report = arg.trim_start_matches("--report=").to_string();
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => scripts.push(PathBuf::from(arg)),
        }
    }

    if scripts.is_empty() {
        return Err(format!("error: no script provided\n\n{}", help_text()));
    }
    if comment_marker.is_empty() {
        return Err("error: --comment must not be empty".to_string());
    }
    if let Some(dir) = results.as_ref().filter(|dir| !dir.is_dir()) {
        return Err(format!("error: result directory '{}' does not exist", dir.display()));
    }

    Ok(CliConfig { scripts, results, comment_marker, console_report, json, color })
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "gibiscan {version}

Find the result variables declared by Cast3m scripts and read their values back.

Usage:
  gibiscan [OPTIONS] [--] <script...>

Options:
  -r, --results <dir>        Resolve the declared outputs against this result
                             directory.
  --comment <marker>         Comment line marker. Default: {comment}
  --report <file>            Console report name inside the result directory.
                             Default: {report}
  --json                     Print outputs, shapes and values as JSON.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Every script given is scanned, whatever its extension.
Set RUST_LOG=debug to trace recognizer hits.

Exit codes:
  0  Success.
  1  A script could not be read.
  2  Invalid arguments.
",
        version = env!("CARGO_PKG_VERSION"),
        comment = DEFAULT_COMMENT_MARKER,
        report = DEFAULT_CONSOLE_REPORT,
    )
}
