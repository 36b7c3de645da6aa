//! Structural statistics for GFF3 genome annotations.
//!
//! Start by providing a local path or an `http(s)://` URL with the
//! positional `source` argument; gzip-compressed input is detected
//! automatically or can be forced with `--gzipped`.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

#[derive(Parser, Debug)]
#[clap(
    name = "gffstat",
    version = env!("CARGO_PKG_VERSION"),
    author = "Alejandro Gonzales-Irribarren <alejandrxgzi@gmail.com>",
    about = "structural statistics for GFF3 genome annotations"
)]
pub struct Args {
    /// Local path or http(s):// URL to a GFF3 file.
    #[clap(value_name = "SOURCE")]
    pub source: String,

    /// Where to write the JSON report; defaults to stdout.
    #[clap(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Pretty-print the report with 2-space indentation.
    #[clap(long)]
    pub pretty: bool,

    /// Force-treat the source as gzip-compressed, bypassing suffix/magic-byte detection.
    #[clap(long)]
    pub gzipped: bool,
}

impl Args {
    /// Validates arguments that are cheap to check before any I/O happens.
    pub fn check(&self) -> Result<(), ArgError> {
        if self.source.trim().is_empty() {
            return Err(ArgError::InvalidSource("source must not be empty".to_string()));
        }
        if let Some(output) = &self.output {
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    return Err(ArgError::InvalidOutput(format!(
                        "output directory {parent:?} does not exist"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ArgError {
    #[error("invalid source: {0}")]
    InvalidSource(String),

    #[error("invalid output: {0}")]
    InvalidOutput(String),
}
