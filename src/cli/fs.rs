//! Project file discovery and ignore patterns.

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use crate::resolver::canonicalize_or_owned;

/// The dependency directory is always excluded.
pub const DEFAULT_IGNORE: &str = "**/node_modules/**";

/// Compiled ignore patterns: the default dependency-directory pattern plus
/// any user-supplied `--exclude` globs.
///
/// Two match layers exist because the reporter accounts for them
/// separately: `default` (dependency directory only) and `full` (default +
/// user patterns).
pub struct IgnoreSpec {
    default: GlobSet,
    full: GlobSet,
    patterns: Vec<String>,
}

impl IgnoreSpec {
    pub fn new(extra: &[String]) -> Result<Self> {
        let mut default_builder = GlobSetBuilder::new();
        default_builder.add(
            Glob::new(DEFAULT_IGNORE).context("invalid default ignore pattern")?,
        );
        let default = default_builder
            .build()
            .context("failed to compile default ignore pattern")?;

        let mut patterns = vec![DEFAULT_IGNORE.to_string()];
        let mut full_builder = GlobSetBuilder::new();
        full_builder.add(Glob::new(DEFAULT_IGNORE).context("invalid default ignore pattern")?);
        for pattern in extra {
            let glob = Glob::new(pattern)
                .with_context(|| format!("invalid exclude pattern '{pattern}'"))?;
            full_builder.add(glob);
            patterns.push(pattern.clone());
        }
        let full = full_builder
            .build()
            .context("failed to compile exclude patterns")?;

        Ok(IgnoreSpec {
            default,
            full,
            patterns,
        })
    }

    /// Matched by any pattern, default or user-supplied.
    pub fn is_ignored(&self, relative: &Path) -> bool {
        self.full.is_match(relative)
    }

    /// Matched by the default dependency-directory pattern alone.
    pub fn is_default_ignored(&self, relative: &Path) -> bool {
        self.default.is_match(relative)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

/// The project's module files, canonicalized and sorted.
#[derive(Debug, Default)]
pub struct ProjectListing {
    /// Filtered by the full IgnoreSpec; this is what indexing, filename
    /// search, and orphan accounting operate on.
    pub files: Vec<PathBuf>,
    /// Filtered by the default ignore only; the reporter derives the
    /// "excluded" list from the difference.
    pub default_filtered: Vec<PathBuf>,
}

/// Whether a path is a module source file the tool cares about.
pub fn is_module_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("js" | "mjs")
    )
}

/// Walk the project root and collect module files under both ignore
/// layers. Unreadable directory entries are logged and skipped.
pub fn discover_module_files(root: &Path, ignore: &IgnoreSpec) -> Result<ProjectListing> {
    let mut listing = ProjectListing::default();

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%err, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_module_file(entry.path()) {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if ignore.is_default_ignored(relative) {
            continue;
        }
        let canonical = canonicalize_or_owned(entry.path());
        if !ignore.is_ignored(relative) {
            listing.files.push(canonical.clone());
        }
        listing.default_filtered.push(canonical);
    }

    listing.files.sort();
    listing.default_filtered.sort();
    Ok(listing)
}
