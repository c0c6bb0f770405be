//! importfix: module-import graph checker and repair tool.
//!
//! Given an entry source file, the library discovers every file the
//! program transitively imports, verifies that each import statement
//! resolves to a real file or an external package, and optionally repairs
//! broken relative imports using two heuristics: exact filename search and
//! declared-symbol resolution over a project-wide symbol index.
//!
//! All run state is owned by explicit per-invocation values (see
//! [`graph::Traversal`] and [`cli::driver::run`]); nothing is
//! process-global, so the tool is callable as a library.

pub mod cli;
pub mod comments;
pub mod extractor;
pub mod graph;
pub mod resolver;
pub mod symbol_index;
pub mod tracing_config;

pub use extractor::{ImportKind, ImportRecord};
pub use graph::{RunDiagnostic, RunTally, Traversal};
pub use resolver::{PathClass, ResolutionFailure, classify};
pub use symbol_index::SymbolIndex;
