//! Import Resolution and Auto-Fix
//!
//! For each import statement the engine decides whether the specifier
//! resolves and, when fixing is enabled, attempts to repair a broken
//! relative import with two heuristics, in order:
//!
//! 1. **Filename search**: find project files whose base name matches the
//!    missing target's base name. Exactly one match wins.
//! 2. **Symbol fallback** (named imports only): intersect the symbol
//!    index's candidate sets for every imported name. An intersection of
//!    exactly one file wins.
//!
//! A fix is only ever applied on an unambiguous single candidate; anything
//! else is reported with the candidate list and left untouched.
//!
//! Rewrites are expressed as byte-exact [`Edit`]s over the specifier span
//! inside the statement span, never a whole-file text substitution, so a
//! second occurrence of the same literal elsewhere in the file cannot be
//! corrupted.

use std::path::{Component, Path, PathBuf};
use tracing::debug;

use crate::extractor::{ImportKind, ImportRecord};
use crate::symbol_index::SymbolIndex;

/// Classification of an import specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Starts with `./` or `../`; resolves against the importer's directory.
    Relative,
    /// No leading dot but contains a `/`: a local import missing the
    /// required relative prefix (style violation).
    DotlessLocal,
    /// Everything else; satisfied by the package manager, always OK.
    External,
}

/// Categorize a specifier. Exactly one class applies.
pub fn classify(specifier: &str) -> PathClass {
    if specifier.starts_with("./") || specifier.starts_with("../") {
        PathClass::Relative
    } else if !specifier.starts_with('.') && specifier.contains('/') {
        PathClass::DotlessLocal
    } else {
        PathClass::External
    }
}

/// Why an import could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionFailure {
    /// Target does not exist and no repair heuristic produced a candidate.
    NotFound { specifier: String },
    /// Filename search or symbol intersection produced more than one
    /// candidate; never auto-resolved.
    Ambiguous {
        specifier: String,
        candidates: Vec<PathBuf>,
    },
    /// A named import's symbol was never declared anywhere in the project.
    SymbolNotIndexed { specifier: String, symbol: String },
    /// Local import written without the `./` prefix while fixing is
    /// disabled; the target itself exists.
    StyleViolation { specifier: String },
}

impl ResolutionFailure {
    /// One-line operator-facing message.
    pub fn message(&self) -> String {
        match self {
            ResolutionFailure::NotFound { specifier } => {
                format!("cannot resolve import '{specifier}'")
            }
            ResolutionFailure::Ambiguous {
                specifier,
                candidates,
            } => {
                format!(
                    "import '{}' is ambiguous ({} candidates)",
                    specifier,
                    candidates.len()
                )
            }
            ResolutionFailure::SymbolNotIndexed { specifier, symbol } => {
                format!("cannot resolve import '{specifier}': symbol '{symbol}' is not declared anywhere")
            }
            ResolutionFailure::StyleViolation { specifier } => {
                format!("local import '{specifier}' is missing its './' prefix")
            }
        }
    }

    /// Candidate list for ambiguity triage, when one exists.
    pub fn candidates(&self) -> Option<&[PathBuf]> {
        match self {
            ResolutionFailure::Ambiguous { candidates, .. } => Some(candidates),
            _ => None,
        }
    }
}

/// A byte-exact replacement of the specifier span within the file text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Outcome of resolving one import record.
#[derive(Debug)]
pub enum Resolution {
    /// Import is fine as written. `schedule` carries the target file when
    /// the import points into the project.
    Ok { schedule: Option<PathBuf> },
    /// A repair was found; the caller applies `edit` and schedules the
    /// target.
    Fixed {
        schedule: PathBuf,
        edit: Edit,
        old: String,
        new: String,
    },
    /// Counted error; traversal does not descend.
    Failed(ResolutionFailure),
}

/// Resolution engine for one run: borrows the symbol index and the
/// IgnoreSpec-filtered project file list, both immutable for the run's
/// lifetime.
pub struct FixEngine<'a> {
    index: &'a SymbolIndex,
    project_files: &'a [PathBuf],
    fix: bool,
}

impl<'a> FixEngine<'a> {
    pub fn new(index: &'a SymbolIndex, project_files: &'a [PathBuf], fix: bool) -> Self {
        FixEngine {
            index,
            project_files,
            fix,
        }
    }

    /// Run the resolution state machine for one import record.
    pub fn resolve(&self, record: &ImportRecord, importer: &Path) -> Resolution {
        let importer_dir = importer.parent().unwrap_or(Path::new("."));

        match classify(&record.specifier) {
            PathClass::External => Resolution::Ok { schedule: None },
            PathClass::Relative => {
                let target = normalize_join(importer_dir, &record.specifier);
                if target.is_file() {
                    return Resolution::Ok {
                        schedule: Some(canonicalize_or_owned(&target)),
                    };
                }
                if !self.fix {
                    return Resolution::Failed(ResolutionFailure::NotFound {
                        specifier: record.specifier.clone(),
                    });
                }
                self.repair(record, importer_dir, &target)
            }
            PathClass::DotlessLocal => {
                let target = normalize_join(importer_dir, &record.specifier);
                if !target.is_file() {
                    return Resolution::Failed(ResolutionFailure::NotFound {
                        specifier: record.specifier.clone(),
                    });
                }
                if !self.fix {
                    return Resolution::Failed(ResolutionFailure::StyleViolation {
                        specifier: record.specifier.clone(),
                    });
                }
                let new = format!("./{}", record.specifier);
                Resolution::Fixed {
                    schedule: canonicalize_or_owned(&target),
                    edit: specifier_edit(record, &new),
                    old: record.specifier.clone(),
                    new,
                }
            }
        }
    }

    /// Repair a broken relative import: filename search first, then the
    /// symbol fallback for named imports.
    fn repair(&self, record: &ImportRecord, importer_dir: &Path, target: &Path) -> Resolution {
        let Some(base) = target.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            return Resolution::Failed(ResolutionFailure::NotFound {
                specifier: record.specifier.clone(),
            });
        };

        let matches: Vec<&PathBuf> = self
            .project_files
            .iter()
            .filter(|file| base_name_matches(file, &base))
            .collect();
        debug!(
            specifier = %record.specifier,
            %base,
            matches = matches.len(),
            "filename search"
        );

        match (matches.len(), record.kind) {
            (1, _) => self.make_fix(record, importer_dir, matches[0]),
            (0, ImportKind::Named) => self.symbol_fallback(record, importer_dir),
            (0, ImportKind::SideEffect) => Resolution::Failed(ResolutionFailure::NotFound {
                specifier: record.specifier.clone(),
            }),
            _ => Resolution::Failed(ResolutionFailure::Ambiguous {
                specifier: record.specifier.clone(),
                candidates: matches.into_iter().cloned().collect(),
            }),
        }
    }

    /// Intersect the candidate sets of every imported symbol. Exactly one
    /// file in the intersection wins; an absent symbol fails immediately.
    fn symbol_fallback(&self, record: &ImportRecord, importer_dir: &Path) -> Resolution {
        if record.symbols.is_empty() {
            return Resolution::Failed(ResolutionFailure::NotFound {
                specifier: record.specifier.clone(),
            });
        }

        let mut intersection: Option<Vec<PathBuf>> = None;
        for symbol in &record.symbols {
            let Some(candidates) = self.index.candidates(symbol) else {
                return Resolution::Failed(ResolutionFailure::SymbolNotIndexed {
                    specifier: record.specifier.clone(),
                    symbol: symbol.clone(),
                });
            };
            intersection = Some(match intersection {
                None => candidates.to_vec(),
                Some(current) => current
                    .into_iter()
                    .filter(|p| candidates.contains(p))
                    .collect(),
            });
        }

        let intersection = intersection.unwrap_or_default();
        debug!(
            specifier = %record.specifier,
            symbols = ?record.symbols,
            candidates = intersection.len(),
            "symbol fallback"
        );
        match intersection.len() {
            1 => self.make_fix(record, importer_dir, &intersection[0]),
            0 => Resolution::Failed(ResolutionFailure::NotFound {
                specifier: record.specifier.clone(),
            }),
            _ => Resolution::Failed(ResolutionFailure::Ambiguous {
                specifier: record.specifier.clone(),
                candidates: intersection,
            }),
        }
    }

    fn make_fix(&self, record: &ImportRecord, importer_dir: &Path, target: &Path) -> Resolution {
        let new = relative_specifier(importer_dir, target);
        Resolution::Fixed {
            schedule: canonicalize_or_owned(target),
            edit: specifier_edit(record, &new),
            old: record.specifier.clone(),
            new,
        }
    }
}

fn specifier_edit(record: &ImportRecord, new_text: &str) -> Edit {
    Edit {
        start: record.spec_offset,
        end: record.spec_offset + record.specifier.len(),
        text: new_text.to_string(),
    }
}

/// Whether a project file satisfies a filename search for `base`.
///
/// An extensionless target matches on the file stem (`./util` finds
/// `util.js`); a target carrying an extension must match the full name.
fn base_name_matches(file: &Path, base: &str) -> bool {
    if base.contains('.') {
        file.file_name().is_some_and(|n| n == base)
    } else {
        file.file_stem().is_some_and(|s| s == base)
    }
}

/// Join a specifier onto a directory, resolving `.` and `..` lexically.
pub fn normalize_join(dir: &Path, specifier: &str) -> PathBuf {
    let mut out = dir.to_path_buf();
    for component in Path::new(specifier).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
            Component::RootDir | Component::Prefix(_) => {}
        }
    }
    out
}

/// Specifier text for `target` as imported from `from_dir`: forward
/// slashes, `./`-prefixed unless already dotted.
pub fn relative_specifier(from_dir: &Path, target: &Path) -> String {
    let relative =
        pathdiff::diff_paths(target, from_dir).unwrap_or_else(|| target.to_path_buf());
    let mut text = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if !text.starts_with('.') {
        text = format!("./{text}");
    }
    text
}

/// Canonicalize when the path exists on disk, otherwise keep it as-is.
pub fn canonicalize_or_owned(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_relative() {
        assert_eq!(classify("./util.js"), PathClass::Relative);
        assert_eq!(classify("../shared/api.js"), PathClass::Relative);
    }

    #[test]
    fn classify_dotless_local() {
        assert_eq!(classify("src/util.js"), PathClass::DotlessLocal);
        assert_eq!(classify("helpers/dom/query.js"), PathClass::DotlessLocal);
    }

    #[test]
    fn classify_external() {
        assert_eq!(classify("lodash"), PathClass::External);
        assert_eq!(classify("react-dom"), PathClass::External);
    }

    #[test]
    fn normalize_join_resolves_dots() {
        let joined = normalize_join(Path::new("/proj/src/views"), "../db/loader.js");
        assert_eq!(joined, PathBuf::from("/proj/src/db/loader.js"));

        let joined = normalize_join(Path::new("/proj"), "./util.js");
        assert_eq!(joined, PathBuf::from("/proj/util.js"));
    }

    #[test]
    fn relative_specifier_is_dot_prefixed_forward_slash() {
        let text = relative_specifier(
            Path::new("/proj"),
            Path::new("/proj/src/helpers/util.js"),
        );
        assert_eq!(text, "./src/helpers/util.js");
    }

    #[test]
    fn relative_specifier_walks_up() {
        let text = relative_specifier(
            Path::new("/proj/src/views"),
            Path::new("/proj/src/db/loader.js"),
        );
        assert_eq!(text, "../db/loader.js");
    }

    #[test]
    fn extensionless_base_matches_on_stem() {
        assert!(base_name_matches(Path::new("/p/src/util.js"), "util"));
        assert!(!base_name_matches(Path::new("/p/src/utility.js"), "util"));
    }

    #[test]
    fn base_with_extension_matches_full_name() {
        assert!(base_name_matches(Path::new("/p/src/util.js"), "util.js"));
        assert!(!base_name_matches(Path::new("/p/src/util.mjs"), "util.js"));
    }

    #[test]
    fn failure_messages_name_the_specifier() {
        let failure = ResolutionFailure::Ambiguous {
            specifier: "./util".to_string(),
            candidates: vec![PathBuf::from("/a/util.js"), PathBuf::from("/b/util.js")],
        };
        assert!(failure.message().contains("./util"));
        assert!(failure.message().contains("2 candidates"));
        assert_eq!(failure.candidates().map(<[PathBuf]>::len), Some(2));
    }
}
