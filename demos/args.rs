//! Command-line argument parsing for the demo search CLI.

use clap::Parser;
use std::path::PathBuf;

/// Register one or more files as sources, then run a single query against
/// them, printing each match with a line of surrounding context.
#[derive(Debug, Parser)]
#[command(
    name = "search-cli",
    author,
    version,
    about = "Register files as sources and run a single exact-substring query"
)]
pub(crate) struct Args {
    /// Query string to search for.
    #[arg(value_name = "QUERY")]
    query: String,

    /// File paths to register as sources.
    #[arg(value_name = "PATHS", required = true)]
    paths: Vec<PathBuf>,

    /// Number of characters of context to print before and after a match.
    #[arg(short, long, default_value_t = 20, value_name = "CHARS")]
    context: usize,

    /// Print the engine's effective configuration and per-source policy.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    pub(crate) fn query(&self) -> &str {
        &self.query
    }

    pub(crate) fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub(crate) const fn context(&self) -> usize {
        self.context
    }

    pub(crate) const fn verbose(&self) -> bool {
        self.verbose
    }
}
