//! Console rendering for run diagnostics and the final report.
//!
//! The reporter only builds strings; the binary decides where they go
//! (diagnostics to stderr, report lists and the tally to stdout).

use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::graph::{RunDiagnostic, RunTally};

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render_diagnostic(&self, root: &Path, diagnostic: &RunDiagnostic) -> String {
        match diagnostic {
            RunDiagnostic::Fixed { file, old, new } => {
                let line = format!(
                    "fixed {}: '{}' -> '{}'",
                    self.display(root, file),
                    old,
                    new
                );
                if self.color {
                    line.green().to_string()
                } else {
                    line
                }
            }
            RunDiagnostic::Unresolved { file, failure } => {
                let mut line = format!(
                    "{}: {}: {}",
                    self.label_error(),
                    self.display(root, file),
                    failure.message()
                );
                if let Some(candidates) = failure.candidates() {
                    for candidate in candidates {
                        line.push_str(&format!("\n    candidate: {}", self.display(root, candidate)));
                    }
                }
                line
            }
            RunDiagnostic::Unreadable { file, error } => format!(
                "{}: could not read {}: {}",
                self.label_warning(),
                self.display(root, file),
                error
            ),
            RunDiagnostic::WriteFailed { file, error } => format!(
                "{}: could not write fixes to {}: {}",
                self.label_warning(),
                self.display(root, file),
                error
            ),
        }
    }

    /// One line per orphan: a project file never reached from the entry.
    pub fn render_orphans(&self, root: &Path, orphans: &[PathBuf]) -> String {
        let mut out = String::new();
        for file in orphans {
            let line = format!("orphan file: {}", self.display(root, file));
            if self.color {
                out.push_str(&line.yellow().to_string());
            } else {
                out.push_str(&line);
            }
            out.push('\n');
        }
        out
    }

    /// One line per file deliberately excluded by a user-supplied pattern.
    pub fn render_excluded(&self, root: &Path, excluded: &[PathBuf]) -> String {
        let mut out = String::new();
        for file in excluded {
            out.push_str(&format!("excluded file: {}\n", self.display(root, file)));
        }
        out
    }

    pub fn render_tally(&self, tally: &RunTally) -> String {
        let line = format!(
            "{} errors, {} OK, {} imports total.",
            tally.errors, tally.ok, tally.total
        );
        if !self.color {
            return line;
        }
        if tally.errors > 0 {
            line.red().bold().to_string()
        } else {
            line.green().bold().to_string()
        }
    }

    fn label_error(&self) -> String {
        if self.color {
            "error".red().bold().to_string()
        } else {
            "error".to_string()
        }
    }

    fn label_warning(&self) -> String {
        if self.color {
            "warning".yellow().bold().to_string()
        } else {
            "warning".to_string()
        }
    }

    /// Paths print relative to the project root when possible.
    fn display(&self, root: &Path, path: &Path) -> String {
        path.strip_prefix(root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
