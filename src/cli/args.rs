use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the importfix binary.
#[derive(Parser, Debug)]
#[command(
    name = "importfix",
    version,
    about = "Checks and repairs the module import graph of a JavaScript project"
)]
pub struct CliArgs {
    /// Entry source file for the import graph walk.
    #[arg(default_value = "main.js")]
    pub entry: PathBuf,

    /// Rewrite broken relative imports in place when exactly one
    /// unambiguous candidate is found.
    #[arg(long = "fix-imports")]
    pub fix_imports: bool,

    /// Extra glob patterns excluded from indexing, filename search, and
    /// orphan accounting (comma-separated; the dependency directory is
    /// always excluded).
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Print every file visited by the traversal after the report.
    #[arg(long = "list-files")]
    pub list_files: bool,
}
