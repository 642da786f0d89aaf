//! Exposure Table Builder CLI
//!
//! Command-line tool that reads a declarative config file, expands its file
//! patterns into exposure records, resolves per-record parameters, and
//! writes the assembled table as CSV or JSON.

use clap::Parser;
use exptab_core::{
    assemble, build_extensions, expand_file_patterns, parse_config, resolve, write_table,
    DEFAULT_OUTFILE,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "exptab")]
#[command(about = "Build an exposure metadata table from a config file", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the config file
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => {
            eprintln!("Must specify input file");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&config_path) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(config_path: &Path) -> exptab_core::Result<()> {
    let config = parse_config(config_path)?;

    let files = expand_file_patterns(&config.file_patterns)?;
    let mut extensions = build_extensions(&files, &config.params)?;
    resolve(&mut extensions, &config)?;

    let table = assemble(&extensions, &config.params)?;

    let outfile = config.outfile.as_deref().unwrap_or(DEFAULT_OUTFILE);
    write_table(&table, outfile)?;

    println!(
        "Wrote {} rows, {} columns to {}",
        table.row_count(),
        table.column_count(),
        outfile
    );

    Ok(())
}
