//! Import Graph Traversal
//!
//! Drives extraction and resolution from the entry file outward with an
//! explicit worklist, so stack depth is bounded regardless of how deep the
//! project's import chains go. The visited-set guard makes re-entry a no-op,
//! which is what keeps diamond dependencies and import cycles from looping.
//!
//! All run state (visited set, tally, diagnostics) lives in a
//! [`Traversal`] value constructed fresh per invocation. Nothing here is
//! process-global, so the traversal is callable as a library and testable
//! in isolation.

use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

use crate::comments::CommentMask;
use crate::extractor::extract_imports;
use crate::resolver::{Edit, FixEngine, Resolution, ResolutionFailure};
use crate::symbol_index::SymbolIndex;

/// Import counters for the final summary. Monotonic; read at report time.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunTally {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
}

/// Everything the run wants to tell the operator, in occurrence order.
#[derive(Debug)]
pub enum RunDiagnostic {
    /// A rewrite was applied (or would be; writes can still fail).
    Fixed {
        file: PathBuf,
        old: String,
        new: String,
    },
    /// An import could not be resolved; counted, non-fatal.
    Unresolved {
        file: PathBuf,
        failure: ResolutionFailure,
    },
    /// A file could not be read; skipped, non-fatal.
    Unreadable { file: PathBuf, error: String },
    /// Persisting a fixed file failed; in-memory results stand.
    WriteFailed { file: PathBuf, error: String },
}

/// One run's traversal state.
pub struct Traversal<'a> {
    engine: FixEngine<'a>,
    pub visited: FxHashSet<PathBuf>,
    pub tally: RunTally,
    pub diagnostics: Vec<RunDiagnostic>,
}

impl<'a> Traversal<'a> {
    pub fn new(index: &'a SymbolIndex, project_files: &'a [PathBuf], fix: bool) -> Self {
        Traversal {
            engine: FixEngine::new(index, project_files, fix),
            visited: FxHashSet::default(),
            tally: RunTally::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Walk the import graph from `entry` until the worklist drains.
    ///
    /// The caller has already verified the entry exists; an entry that
    /// vanishes between that check and the first read surfaces as an
    /// `Unreadable` diagnostic like any other file.
    pub fn run(&mut self, entry: &Path) {
        let mut pending = VecDeque::new();
        pending.push_back(entry.to_path_buf());

        while let Some(path) = pending.pop_front() {
            if !self.visited.insert(path.clone()) {
                continue;
            }
            self.visit(&path, &mut pending);
        }
        debug!(
            visited = self.visited.len(),
            imports = self.tally.total,
            errors = self.tally.errors,
            "traversal complete"
        );
    }

    fn visit(&mut self, path: &Path, pending: &mut VecDeque<PathBuf>) {
        trace!(path = %path.display(), "visiting");
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                warn!(path = %path.display(), %err, "skipping unreadable file");
                self.diagnostics.push(RunDiagnostic::Unreadable {
                    file: path.to_path_buf(),
                    error: err.to_string(),
                });
                return;
            }
        };

        let mask = CommentMask::scan(&text);
        let records = extract_imports(&text, &mask);
        let mut edits: Vec<Edit> = Vec::new();

        for record in &records {
            self.tally.total += 1;
            match self.engine.resolve(record, path) {
                Resolution::Ok { schedule } => {
                    self.tally.ok += 1;
                    if let Some(target) = schedule {
                        pending.push_back(target);
                    }
                }
                Resolution::Fixed {
                    schedule,
                    edit,
                    old,
                    new,
                } => {
                    self.tally.ok += 1;
                    edits.push(edit);
                    self.diagnostics.push(RunDiagnostic::Fixed {
                        file: path.to_path_buf(),
                        old,
                        new,
                    });
                    pending.push_back(schedule);
                }
                Resolution::Failed(failure) => {
                    self.tally.errors += 1;
                    self.diagnostics.push(RunDiagnostic::Unresolved {
                        file: path.to_path_buf(),
                        failure,
                    });
                }
            }
        }

        // Persist at most once per file, after every record was decided.
        if !edits.is_empty() {
            let fixed = apply_edits(&text, edits);
            if let Err(err) = std::fs::write(path, fixed) {
                warn!(path = %path.display(), %err, "failed to persist fixes");
                self.diagnostics.push(RunDiagnostic::WriteFailed {
                    file: path.to_path_buf(),
                    error: err.to_string(),
                });
            }
        }
    }
}

/// Apply span edits to the original text.
///
/// Offsets refer to the unmodified text, so edits are applied back to
/// front; spans never overlap because each edit covers a distinct
/// specifier.
fn apply_edits(text: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by(|a, b| b.start.cmp(&a.start));
    let mut out = text.to_string();
    for edit in edits {
        out.replace_range(edit.start..edit.end, &edit.text);
    }
    out
}
