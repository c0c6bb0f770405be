//! Project-Wide Symbol Index
//!
//! Maps every declared or exported identifier to the set of files declaring
//! it. The index is built once per run, before traversal, and is read-only
//! afterwards; a fix that moves a symbol's declaration does NOT update it.
//! This staleness is a documented limitation: the index is valid for the
//! initial state of the project only.
//!
//! Two declaration shapes are indexed, matching what the resolver's symbol
//! fallback can make use of:
//!
//! - identifiers following a `function` keyword (covers `export function f`,
//!   `export default function f`, `async function f`, generators)
//! - identifiers listed in an `export { a, b as c }` block, pre-alias names
//!   only (applies equally to `export { x } from './y'` re-exports)
//!
//! A symbol declared in five files simply has five candidates; ambiguity is
//! the resolver's problem, not the index's.

use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::comments::CommentMask;
use crate::extractor::{find_keyword, is_ident_byte, read_identifier, skip_trivia};

/// Symbol name → files declaring it.
#[derive(Debug, Default)]
pub struct SymbolIndex {
    map: FxHashMap<String, Vec<PathBuf>>,
}

impl SymbolIndex {
    /// Build the index over the given project files.
    ///
    /// Files that cannot be read are skipped and returned as
    /// `(path, error)` pairs for the caller to report; a bad file never
    /// aborts the build.
    pub fn build(files: &[PathBuf]) -> (Self, Vec<(PathBuf, String)>) {
        let mut index = SymbolIndex::default();
        let mut skipped = Vec::new();

        for path in files {
            let text = match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(err) => {
                    warn!(path = %path.display(), %err, "skipping unreadable file");
                    skipped.push((path.clone(), err.to_string()));
                    continue;
                }
            };
            for name in collect_symbols(&text) {
                index.add(name, path);
            }
        }

        debug!(symbols = index.map.len(), files = files.len(), "symbol index built");
        (index, skipped)
    }

    fn add(&mut self, name: String, path: &Path) {
        let candidates = self.map.entry(name).or_default();
        if !candidates.iter().any(|p| p == path) {
            candidates.push(path.to_path_buf());
        }
    }

    /// Candidate files for a symbol, or `None` if it was never declared.
    pub fn candidates(&self, name: &str) -> Option<&[PathBuf]> {
        self.map.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Scan one file's text for declared/exported identifiers.
pub(crate) fn collect_symbols(source: &str) -> Vec<String> {
    let mask = CommentMask::scan(source);
    let bytes = source.as_bytes();
    let mut names = Vec::new();

    // function declarations
    let mut search = 0usize;
    while let Some(found) = find_keyword(source, "function", search) {
        search = found + "function".len();
        if mask.contains(found) {
            continue;
        }
        let mut pos = skip_trivia(source, &mask, search);
        // generator: function* name()
        if bytes.get(pos) == Some(&b'*') {
            pos = skip_trivia(source, &mask, pos + 1);
        }
        let name = read_identifier(source, pos);
        if !name.is_empty() {
            names.push(name.to_string());
        }
    }

    // export { a, b as c } blocks
    let mut search = 0usize;
    while let Some(found) = find_keyword(source, "export", search) {
        search = found + "export".len();
        if mask.contains(found) {
            continue;
        }
        let open = skip_trivia(source, &mask, search);
        if bytes.get(open) != Some(&b'{') {
            continue;
        }
        let mut pos = open + 1;
        let mut expect_name = true;
        loop {
            pos = skip_trivia(source, &mask, pos);
            match bytes.get(pos) {
                None | Some(&b'}') => break,
                Some(&b',') => {
                    expect_name = true;
                    pos += 1;
                }
                Some(&b) if is_ident_byte(b) => {
                    let word = read_identifier(source, pos);
                    if expect_name {
                        names.push(word.to_string());
                        expect_name = false;
                    }
                    pos += word.len();
                }
                Some(_) => pos += 1,
            }
        }
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_and_exported_functions() {
        let names = collect_symbols("function alpha() {}\nexport function beta(x) { return x; }\n");
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn default_export_function() {
        let names = collect_symbols("export default function gamma() {}\n");
        assert_eq!(names, vec!["gamma"]);
    }

    #[test]
    fn anonymous_function_contributes_nothing() {
        let names = collect_symbols("const f = function () {};\nexport default function () {}\n");
        assert!(names.is_empty());
    }

    #[test]
    fn generator_name_after_star() {
        let names = collect_symbols("function* rows() {}\n");
        assert_eq!(names, vec!["rows"]);
    }

    #[test]
    fn export_block_takes_pre_alias_names() {
        let names = collect_symbols("export { loadTable, saveTable as persist };\n");
        assert_eq!(names, vec!["loadTable", "saveTable"]);
    }

    #[test]
    fn export_block_with_comments_inside() {
        let names = collect_symbols("export {\n  one, // first\n  two as deux, /* alias */\n};\n");
        assert_eq!(names, vec!["one", "two"]);
    }

    #[test]
    fn re_export_block_is_indexed() {
        let names = collect_symbols("export { helper } from './helpers.js';\n");
        assert_eq!(names, vec!["helper"]);
    }

    #[test]
    fn commented_declarations_are_skipped() {
        let names = collect_symbols("// function ghost() {}\n/* export { phantom } */\n");
        assert!(names.is_empty());
    }

    #[test]
    fn export_const_is_not_indexed() {
        let names = collect_symbols("export const limit = 10;\n");
        assert!(names.is_empty());
    }

    #[test]
    fn duplicate_symbol_keeps_one_candidate_per_file() {
        let mut index = SymbolIndex::default();
        let path = PathBuf::from("/proj/a.js");
        index.add("dup".to_string(), &path);
        index.add("dup".to_string(), &path);
        assert_eq!(index.candidates("dup").map(<[PathBuf]>::len), Some(1));
    }
}
