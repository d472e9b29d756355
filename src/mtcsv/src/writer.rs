//! CSV emission for the fixed 17-column ingestion schema.

use std::io::Write;

use crate::error::ExtractError;
use crate::record::Record;

/// Column names, fixed order. The ingestion side matches on these verbatim.
pub const HEADER: [&str; 17] = [
    "Source",
    "Unique ID",
    "namespace",
    "Title",
    "Description",
    "Date",
    "Duration",
    "Keywords",
    "Price category (1= stock, 2=news, 3=brand)",
    "Sounds",
    "Color",
    "Location",
    "Country",
    "State",
    "City",
    "Region",
    "Alternative ID",
];

/// Write the header row plus one row per record, in the given order.
///
/// Descriptions carry embedded newlines, so rows go through a real CSV
/// writer rather than string concatenation.
pub fn write_csv<W: Write>(records: &[Record], out: W) -> Result<(), ExtractError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record(&record.to_row())?;
    }
    writer.flush()?;
    Ok(())
}
