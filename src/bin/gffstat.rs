//! Structural statistics for GFF3 genome annotations.
//!
//! ```text
//! gffstat annotations.gff3 --pretty -o stats.json
//! gffstat https://example.org/annotations.gff3.gz
//! ```

use clap::Parser;
use log::Level;

use gffstat::cli::Args;
use gffstat::config::Config;

fn main() {
    simple_logger::init_with_level(Level::Info).expect("failed to initialize logger");

    let args = Args::parse();
    if let Err(e) = args.check() {
        log::error!("{e}");
        std::process::exit(1);
    }

    let config = Config::from_args(&args);
    log::info!("reading {}", config.source);

    match gffstat::run(&config) {
        Ok(true) => {
            log::warn!("report is empty: no genes in any category");
            std::process::exit(1);
        }
        Ok(false) => {
            log::info!("done");
        }
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    }
}
