//! mtcsv library - Movietone newsreel metadata extraction
//!
//! Walks a directory of XML asset descriptions and emits one CSV row per
//! eligible file, matching the fixed 17-column ingestion schema:
//! - `xml` parses documents into a case-normalized element tree
//! - `record` extracts the per-file fields
//! - `writer` serializes rows as CSV
//! - `convert` ties the walk, extraction, and output together

pub mod convert;
pub mod error;
pub mod record;
pub mod writer;
pub mod xml;
