//! Directory walk and end-to-end conversion.

use std::fs;
use std::io::Write;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::ExtractError;
use crate::record::Record;
use crate::writer::write_csv;
use crate::xml;

/// Counts reported after a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Rows written, excluding the header.
    pub rows: usize,
    /// Files dropped for lacking a totalduration attribute.
    pub skipped: usize,
}

/// Walk `input` recursively and write one CSV to `out`.
///
/// Traversal is sorted by file name at every level so row order is stable
/// across platforms and repeated runs. Every file is considered regardless of
/// extension. The first fatal error aborts the run; there is no per-file
/// isolation.
pub fn convert_dir<W: Write>(
    input: &Path,
    out: W,
    verbose: bool,
) -> Result<Report, ExtractError> {
    let mut records = Vec::new();
    let mut skipped = 0;

    for entry in WalkDir::new(input)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        match convert_file(path).map_err(|e| e.at(path))? {
            Some(record) => {
                if verbose {
                    eprintln!("{}: {}", path.display(), record.unique_id);
                }
                records.push(record);
            }
            None => {
                skipped += 1;
                if verbose {
                    eprintln!("{}: no totalduration, skipped", path.display());
                }
            }
        }
    }

    let rows = records.len();
    write_csv(&records, out)?;
    Ok(Report { rows, skipped })
}

/// Parse and extract a single file. `Ok(None)` is the duration soft skip.
pub fn convert_file(path: &Path) -> Result<Option<Record>, ExtractError> {
    let data = fs::read(path)?;
    let doc = xml::parse(&data)?;
    Record::extract(&doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn valid_doc(id: &str, ms: u64) -> String {
        format!(
            r#"<item><nitf:id>{id}</nitf:id><nitf:headline>REEL {id}</nitf:headline>
               <media:characteristics totalduration="{ms}"/></item>"#
        )
    }

    fn doc_without_duration(id: &str) -> String {
        format!(r#"<item><nitf:id>{id}</nitf:id><title>REEL {id}</title></item>"#)
    }

    fn run(dir: &Path) -> (Report, String) {
        let mut out = Vec::new();
        let report = convert_dir(dir, &mut out, false).unwrap();
        (report, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_one_row_per_eligible_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_file(temp_dir.path(), "a.xml", &valid_doc("BM1", 61_000));
        write_file(temp_dir.path(), "b.xml", &valid_doc("BM2", 3_723_000));

        let (report, csv_text) = run(temp_dir.path());
        assert_eq!(report, Report { rows: 2, skipped: 0 });

        let lines: Vec<&str> = csv_text.lines().collect();
        assert_eq!(lines.len(), 3); // header + 2 rows
        assert!(lines[1].contains("BM1") && lines[1].contains("Movietone:BM1"));
        assert!(lines[1].contains("00:01:01"));
        assert!(lines[2].contains("01:02:03"));
    }

    #[test]
    fn test_missing_duration_skips_file_only() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_file(temp_dir.path(), "a.xml", &valid_doc("BM1", 1_000));
        write_file(temp_dir.path(), "b.xml", &doc_without_duration("BM2"));
        write_file(temp_dir.path(), "c.xml", &valid_doc("BM3", 2_000));

        let (report, csv_text) = run(temp_dir.path());
        assert_eq!(report, Report { rows: 2, skipped: 1 });
        assert!(!csv_text.contains("BM2"));
        assert!(csv_text.contains("BM1") && csv_text.contains("BM3"));
    }

    #[test]
    fn test_missing_id_aborts_run() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_file(temp_dir.path(), "a.xml", &valid_doc("BM1", 1_000));
        write_file(
            temp_dir.path(),
            "b.xml",
            r#"<item><title>NO ID</title><characteristics totalduration="1"/></item>"#,
        );

        let mut out = Vec::new();
        let result = convert_dir(temp_dir.path(), &mut out, false);
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            ExtractError::File { ref source, .. }
                if matches!(**source, ExtractError::MissingField("id"))
        ));
        // Nothing was written: the run failed before serialization
        assert!(out.is_empty());
    }

    #[test]
    fn test_unparseable_file_aborts_run() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_file(temp_dir.path(), "a.xml", "<item><open></item>");

        let mut out = Vec::new();
        let err = convert_dir(temp_dir.path(), &mut out, false).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::File { ref source, .. }
                if matches!(**source, ExtractError::Parse(_))
        ));
    }

    #[test]
    fn test_walk_is_recursive_and_sorted() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("1957")).unwrap();
        write_file(&temp_dir.path().join("1957"), "reel.xml", &valid_doc("BM9", 1_000));
        write_file(temp_dir.path(), "a.xml", &valid_doc("BM1", 1_000));

        let (report, csv_text) = run(temp_dir.path());
        assert_eq!(report.rows, 2);

        // "1957" sorts before "a.xml", so the nested file's row comes first
        let lines: Vec<&str> = csv_text.lines().collect();
        assert!(lines[1].contains("BM9"));
        assert!(lines[2].contains("BM1"));
    }

    #[test]
    fn test_repeated_runs_are_byte_identical() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_file(temp_dir.path(), "a.xml", &valid_doc("BM1", 61_000));
        write_file(temp_dir.path(), "b.xml", &doc_without_duration("BM2"));
        write_file(temp_dir.path(), "c.xml", &valid_doc("BM3", 90_000_000));

        let (first_report, first) = run(temp_dir.path());
        let (second_report, second) = run(temp_dir.path());
        assert_eq!(first_report, second_report);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_directory_yields_header_only() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (report, csv_text) = run(temp_dir.path());
        assert_eq!(report, Report { rows: 0, skipped: 0 });
        assert_eq!(csv_text.lines().count(), 1);
    }
}
