//! # gffstat
//!
//! Computes aggregate structural statistics — gene, transcript, exon,
//! intron and coding-segment counts and length distributions — from GFF3
//! genome annotation files, categorized into coding, long non-coding, short
//! non-coding, and pseudogene genes.
//!
//! The hard part is building the gene → transcript → exon/CDS tree from a
//! stream whose rows may name a parent that has not been seen yet. This
//! crate resolves that with an event-driven deferred-child queue rather
//! than re-scanning an orphan list to a fixed point, so throughput stays
//! linear even on genomes where out-of-order rows cluster.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! gffstat = "0.1"
//! ```
//!
//! ```rust
//! use gffstat::process_lines;
//!
//! let rows = [
//!     ".\t.\tgene\t1000\t2000\t.\t.\t.\tID=g1;biotype=protein_coding",
//!     ".\t.\tmRNA\t1000\t2000\t.\t.\t.\tID=t1;Parent=g1",
//!     ".\t.\texon\t1000\t1200\t.\t.\t.\tID=e1;Parent=t1",
//! ];
//! let (report, diagnostics) = process_lines(rows.iter().map(|l| l.to_string()));
//! assert_eq!(diagnostics.malformed_rows, 0);
//! assert!(!report.is_empty());
//! ```

#![cfg_attr(doc, warn(missing_docs))]

pub mod aggregate;
#[cfg(feature = "cli")]
pub mod cli;
pub mod classify;
#[cfg(feature = "cli")]
pub mod config;
pub mod error;
pub mod graph;
pub mod intern;
pub mod line;
pub mod report;
pub mod source;
pub mod summary;

use graph::{FeatureGraph, UnresolvedSummary};
use intern::Interner;
use line::SkipReason;
use report::Report;

pub use error::{GffStatError, Result};

/// Non-fatal counters accumulated while building a report: rows skipped for
/// malformed attributes, and features that never found a parent.
#[derive(Debug, Default)]
pub struct Diagnostics {
    pub malformed_rows: u64,
    pub unresolved: UnresolvedSummary,
}

/// Runs the full core pipeline — line parsing, graph building, deferred
/// resolution, classification, aggregation and summary — over an already
/// decoded line iterator.
pub fn process_lines<I>(lines: I) -> (Report, Diagnostics)
where
    I: IntoIterator<Item = String>,
{
    let mut interner = Interner::new();
    let mut graph = FeatureGraph::new();
    let mut malformed_rows = 0u64;

    for line in lines {
        match line::parse_line(&line, &mut interner) {
            Ok(row) => {
                graph.ingest_row(row.feature_id, row.feature_type, row.length, row.parent_ids, row.biotype);
            }
            Err(SkipReason::MalformedAttribute) => malformed_rows += 1,
            Err(_) => {}
        }
    }

    classify::classify_all(graph.genes_mut());
    let aggregation = aggregate::aggregate(graph.genes(), graph.transcripts());
    let report = report::build_report(aggregation);
    let unresolved = graph.unresolved();

    (
        report,
        Diagnostics {
            malformed_rows,
            unresolved,
        },
    )
}

/// Acquires `source` (local path or `http(s)://` URL, optionally
/// gzip-compressed) and runs [`process_lines`] over it. A mid-stream
/// transport or decompression failure is fatal: the accumulated report is
/// discarded and the failure surfaces as [`GffStatError::Decompression`]
/// rather than a silently truncated result.
pub fn process_source(source: &str, force_gzip: bool) -> Result<(Report, Diagnostics)> {
    let lines = source::open_lines(source, force_gzip)?;
    let failure = lines.failure_handle();
    let (report, diagnostics) = process_lines(lines);
    if let Some(message) = failure.borrow_mut().take() {
        return Err(GffStatError::Decompression(message));
    }
    Ok((report, diagnostics))
}

/// Runs one full CLI invocation: acquires the source, builds the report,
/// logs diagnostics, and writes JSON to the configured destination.
/// Returns whether the report came back empty, which the caller maps to an
/// exit code.
#[cfg(feature = "cli")]
pub fn run(config: &config::Config) -> Result<bool> {
    let (report, diagnostics) = process_source(&config.source, config.force_gzip)?;

    if diagnostics.malformed_rows > 0 {
        log::warn!("skipped {} malformed row(s)", diagnostics.malformed_rows);
    }
    if diagnostics.unresolved.count > 0 {
        log::warn!(
            "{} feature(s) never resolved a parent; examples: {:?}",
            diagnostics.unresolved.count,
            diagnostics.unresolved.samples
        );
    }

    let json = if config.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match &config.output {
        Some(path) => std::fs::write(path, json)?,
        None => {
            use std::io::Write;
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(json.as_bytes())?;
            handle.write_all(b"\n")?;
        }
    }

    Ok(report.is_empty())
}
