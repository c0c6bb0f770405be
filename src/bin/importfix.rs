#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use importfix::cli::args::CliArgs;
use importfix::cli::{driver, reporter::Reporter};

/// Unresolved imports are advisory; the process only fails on fatal
/// conditions (missing entry file, unusable project root).
const EXIT_SUCCESS: i32 = 0;

fn main() -> Result<()> {
    // Initialize tracing if IMPORTFIX_LOG or RUST_LOG is set (zero cost
    // otherwise). Supports IMPORTFIX_LOG_FORMAT=tree|json|text.
    importfix::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;

    let summary = driver::run(&args, &cwd)?;

    let reporter = Reporter::new(std::io::stderr().is_terminal());
    for diagnostic in &summary.diagnostics {
        eprintln!("{}", reporter.render_diagnostic(&cwd, diagnostic));
    }

    let orphans = reporter.render_orphans(&cwd, &summary.orphans);
    if !orphans.is_empty() {
        print!("{orphans}");
    }
    let excluded = reporter.render_excluded(&cwd, &summary.excluded);
    if !excluded.is_empty() {
        print!("{excluded}");
    }
    println!("{}", reporter.render_tally(&summary.tally));

    if args.list_files {
        for file in &summary.visited {
            println!("{}", file.display());
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
