use std::path::PathBuf;

use crate::cli::Args;

/// Normalized configuration for one run, built once from parsed CLI
/// arguments.
#[derive(Clone, Debug)]
pub struct Config {
    pub source: String,
    pub output: Option<PathBuf>,
    pub pretty: bool,
    pub force_gzip: bool,
}

impl Config {
    /// Builds a run configuration from CLI arguments.
    pub fn from_args(args: &Args) -> Self {
        Self {
            source: args.source.clone(),
            output: args.output.clone(),
            pretty: args.pretty,
            force_gzip: args.gzipped,
        }
    }
}
