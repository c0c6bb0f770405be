//! File discovery and ignore pattern tests.

use std::path::Path;
use tempfile::TempDir;

use crate::cli::fs::{IgnoreSpec, discover_module_files, is_module_file};
use crate::resolver::canonicalize_or_owned;

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create parent directory");
    }
    std::fs::write(path, contents).expect("failed to write file");
}

#[test]
fn module_files_are_js_and_mjs() {
    assert!(is_module_file(Path::new("src/app.js")));
    assert!(is_module_file(Path::new("src/worker.mjs")));
    assert!(!is_module_file(Path::new("style.css")));
    assert!(!is_module_file(Path::new("data.json")));
    assert!(!is_module_file(Path::new("README.md")));
}

#[test]
fn dependency_directory_is_ignored_by_default() {
    let spec = IgnoreSpec::new(&[]).unwrap();
    assert!(spec.is_ignored(Path::new("node_modules/pkg/index.js")));
    assert!(spec.is_default_ignored(Path::new("a/node_modules/deep/x.js")));
    assert!(!spec.is_ignored(Path::new("src/app.js")));
}

#[test]
fn user_patterns_extend_but_do_not_replace_the_default() {
    let spec = IgnoreSpec::new(&["drafts/**".to_string()]).unwrap();
    assert!(spec.is_ignored(Path::new("drafts/wip.js")));
    assert!(!spec.is_default_ignored(Path::new("drafts/wip.js")));
    assert!(spec.is_ignored(Path::new("node_modules/pkg/index.js")));
    assert_eq!(spec.patterns().len(), 2);
}

#[test]
fn invalid_pattern_is_an_error() {
    assert!(IgnoreSpec::new(&["[".to_string()]).is_err());
}

#[test]
fn discovery_applies_both_ignore_layers() {
    let dir = TempDir::new().unwrap();
    write_file(&dir.path().join("main.js"), "");
    write_file(&dir.path().join("src/app.js"), "");
    write_file(&dir.path().join("drafts/wip.js"), "");
    write_file(&dir.path().join("node_modules/pkg/index.js"), "");
    write_file(&dir.path().join("style.css"), "");

    let spec = IgnoreSpec::new(&["drafts/**".to_string()]).unwrap();
    let listing = discover_module_files(dir.path(), &spec).unwrap();

    let main = canonicalize_or_owned(&dir.path().join("main.js"));
    let app = canonicalize_or_owned(&dir.path().join("src/app.js"));
    let wip = canonicalize_or_owned(&dir.path().join("drafts/wip.js"));

    assert_eq!(listing.files, vec![main.clone(), app.clone()]);
    assert_eq!(listing.default_filtered, vec![wip, main, app]);
}

#[test]
fn listing_is_sorted() {
    let dir = TempDir::new().unwrap();
    write_file(&dir.path().join("z.js"), "");
    write_file(&dir.path().join("a.js"), "");
    write_file(&dir.path().join("m/b.js"), "");

    let spec = IgnoreSpec::new(&[]).unwrap();
    let listing = discover_module_files(dir.path(), &spec).unwrap();

    let mut sorted = listing.files.clone();
    sorted.sort();
    assert_eq!(listing.files, sorted);
}
