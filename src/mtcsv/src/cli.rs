//! CLI argument definitions for mtcsv

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mtcsv")]
#[command(about = "Convert Movietone newsreel XML metadata to an ingestion CSV")]
#[command(version)]
pub struct Args {
    /// Directory of XML metadata files (walked recursively)
    pub input: PathBuf,

    /// Output CSV file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report each file as it is parsed or skipped
    #[arg(short, long)]
    pub verbose: bool,
}
