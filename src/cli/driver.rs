//! Run orchestration for the importfix binary.
//!
//! Data flow per invocation: validate the entry file, compile the ignore
//! patterns, enumerate the project's module files, build the symbol index
//! (once, eagerly), walk the import graph from the entry, then derive the
//! orphan and excluded lists from the full project listing.

use anyhow::{Result, bail};
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::args::CliArgs;
use crate::cli::fs::{IgnoreSpec, discover_module_files};
use crate::graph::{RunDiagnostic, RunTally, Traversal};
use crate::resolver::canonicalize_or_owned;
use crate::symbol_index::SymbolIndex;

/// Everything a caller needs to render the final report.
#[derive(Debug)]
pub struct RunSummary {
    pub tally: RunTally,
    pub diagnostics: Vec<RunDiagnostic>,
    pub visited: Vec<PathBuf>,
    pub orphans: Vec<PathBuf>,
    pub excluded: Vec<PathBuf>,
}

/// Execute one full run rooted at `cwd`.
///
/// The only fatal error after argument parsing is a missing entry file;
/// unresolved imports and unreadable files are diagnostics, not `Err`s.
pub fn run(args: &CliArgs, cwd: &Path) -> Result<RunSummary> {
    let entry = cwd.join(&args.entry);
    if !entry.is_file() {
        bail!("entry file {} does not exist", entry.display());
    }
    let entry = canonicalize_or_owned(&entry);

    let ignore = IgnoreSpec::new(&args.exclude)?;
    let listing = discover_module_files(cwd, &ignore)?;
    debug!(
        files = listing.files.len(),
        default_filtered = listing.default_filtered.len(),
        "project files discovered"
    );

    let (index, skipped) = SymbolIndex::build(&listing.files);
    let mut diagnostics: Vec<RunDiagnostic> = skipped
        .into_iter()
        .map(|(file, error)| RunDiagnostic::Unreadable { file, error })
        .collect();

    let mut traversal = Traversal::new(&index, &listing.files, args.fix_imports);
    traversal.run(&entry);

    let tally = traversal.tally;
    diagnostics.extend(traversal.diagnostics);

    let orphans: Vec<PathBuf> = listing
        .files
        .iter()
        .filter(|file| !traversal.visited.contains(*file))
        .cloned()
        .collect();

    let full_set: FxHashSet<&PathBuf> = listing.files.iter().collect();
    let excluded: Vec<PathBuf> = listing
        .default_filtered
        .iter()
        .filter(|file| !full_set.contains(*file) && **file != entry)
        .cloned()
        .collect();

    let mut visited: Vec<PathBuf> = traversal.visited.into_iter().collect();
    visited.sort();

    Ok(RunSummary {
        tally,
        diagnostics,
        visited,
        orphans,
        excluded,
    })
}
