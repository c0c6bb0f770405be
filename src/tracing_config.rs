//! Tracing configuration for debugging traversal and resolution decisions.
//!
//! Supports three output formats controlled by `IMPORTFIX_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`
//! - `json`: One JSON object per span/event, machine-readable
//!
//! ## Quick start
//!
//! ```bash
//! # Human-readable tree
//! IMPORTFIX_LOG=debug IMPORTFIX_LOG_FORMAT=tree importfix app.js
//!
//! # Fine-grained filtering
//! IMPORTFIX_LOG="importfix::resolver=debug" importfix app.js
//! ```
//!
//! The subscriber is only initialised when `IMPORTFIX_LOG` (or `RUST_LOG`)
//! is set, so there is zero overhead in normal runs.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse from the `IMPORTFIX_LOG_FORMAT` environment variable.
    fn from_env() -> Self {
        match std::env::var("IMPORTFIX_LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Build an `EnvFilter` from `IMPORTFIX_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("IMPORTFIX_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `IMPORTFIX_LOG` nor `RUST_LOG` is set.
/// All output goes to stderr so it never interferes with the report on
/// stdout.
pub fn init_tracing() {
    let has_importfix_log = std::env::var("IMPORTFIX_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_importfix_log && !has_rust_log {
        return;
    }

    let filter = build_filter();
    let format = LogFormat::from_env();

    match format {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
