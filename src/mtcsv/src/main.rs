//! mtcsv - Movietone newsreel XML metadata to CSV converter

use std::fs;
use std::io;

use anyhow::{bail, Context, Result};
use clap::Parser;

use mtcsv::convert::convert_dir;

mod cli;

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    if !args.input.is_dir() {
        bail!("input path {:?} is not a directory", args.input);
    }

    let report = match &args.output {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file {:?}", path))?;
            convert_dir(&args.input, io::BufWriter::new(file), args.verbose)?
        }
        None => {
            let stdout = io::stdout();
            convert_dir(&args.input, stdout.lock(), args.verbose)?
        }
    };

    eprintln!("{} rows written, {} files skipped", report.rows, report.skipped);
    Ok(())
}
