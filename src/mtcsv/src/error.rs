//! Error types for extraction and conversion.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parse error: {0}")]
    Parse(#[from] quick_xml::Error),

    #[error("undefined entity reference: &{0};")]
    UndefinedEntity(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid totalduration value: {0:?}")]
    BadDuration(String),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        source: Box<ExtractError>,
    },
}

impl ExtractError {
    /// Attach the offending input file's path to a per-file failure.
    pub fn at(self, path: &Path) -> Self {
        ExtractError::File {
            path: path.to_path_buf(),
            source: Box::new(self),
        }
    }
}
