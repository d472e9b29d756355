//! Per-file field extraction.
//!
//! One `Record` is built from each metadata document and serialized as one
//! CSV row. Extraction returns the record by value; callers collect rows in
//! traversal order.

use crate::error::ExtractError;
use crate::xml::Element;

/// Constant `Source` column value; also the namespace prefix.
pub const SOURCE: &str = "Movietone";

/// Paragraphs starting with this prefix are boilerplate, not description.
const DISCLAIMER_PREFIX: &str = "Disclaimer:";

/// One output row. The nine placeholder columns of the ingestion schema are
/// always empty and carried only at serialization time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub unique_id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub duration: String,
    pub keywords: String,
}

impl Record {
    /// Derived namespace column: `"Movietone:" + Unique ID`.
    pub fn namespace(&self) -> String {
        format!("{}:{}", SOURCE, self.unique_id)
    }

    /// Extract a record from a parsed document.
    ///
    /// `Ok(None)` means the file carries no `totalduration` attribute and is
    /// excluded from the output without error. A missing id or title aborts
    /// the whole run.
    pub fn extract(doc: &Element) -> Result<Option<Record>, ExtractError> {
        let unique_id = doc
            .find("id")
            .map(|el| el.text())
            .ok_or(ExtractError::MissingField("id"))?;

        let title = doc
            .find("headline")
            .or_else(|| doc.find("title"))
            .map(|el| el.text())
            .ok_or(ExtractError::MissingField("title"))?;

        let description = match doc.find("body.content") {
            Some(body) => {
                let mut out = String::new();
                for p in body.find_all("p") {
                    let text = p.text();
                    if !text.starts_with(DISCLAIMER_PREFIX) {
                        out.push_str(&text);
                        out.push('\n');
                    }
                }
                out
            }
            None => String::new(),
        };

        let date = doc
            .find("firstcreated")
            .map(|el| el.text().chars().take(10).collect())
            .unwrap_or_default();

        // Files without a duration are deliberately dropped, not failed.
        let Some(raw_ms) = doc
            .find_all("characteristics")
            .into_iter()
            .find_map(|el| el.attr("totalduration"))
        else {
            return Ok(None);
        };
        let ms: u64 = raw_ms
            .trim()
            .parse()
            .map_err(|_| ExtractError::BadDuration(raw_ms.to_string()))?;
        let duration = format_duration(ms);

        let mut values: Vec<&str> = Vec::new();
        for el in doc.find_all("entityclassification") {
            if let Some(value) = el.attr("value") {
                values.push(value);
            }
        }
        for el in doc.find_all("subjectclassification") {
            if let Some(value) = el.attr("value") {
                values.push(value);
            }
        }
        let keywords = values.join(", ");

        Ok(Some(Record {
            unique_id,
            title,
            description,
            date,
            duration,
            keywords,
        }))
    }

    /// Serialize into the fixed 17-column ingestion row.
    pub fn to_row(&self) -> [String; 17] {
        [
            SOURCE.to_string(),
            self.unique_id.clone(),
            self.namespace(),
            self.title.clone(),
            self.description.clone(),
            self.date.clone(),
            self.duration.clone(),
            self.keywords.clone(),
            String::new(), // Price category
            String::new(), // Sounds
            String::new(), // Color
            String::new(), // Location
            String::new(), // Country
            String::new(), // State
            String::new(), // City
            String::new(), // Region
            String::new(), // Alternative ID
        ]
    }
}

/// Format a millisecond count as `HH:MM:SS`.
///
/// Durations of 24 hours or more wrap modulo 24; the upstream sheets have
/// always been fed that way and the quirk is kept.
pub fn format_duration(ms: u64) -> String {
    let seconds = (ms / 1_000) % 60;
    let minutes = (ms / 60_000) % 60;
    let hours = (ms / 3_600_000) % 24;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
