//! Reading page request sequences from CSV sources.
//!
//! The first record is the header. Page ids are taken from a single named
//! column, trimmed, and kept as opaque strings. Quoted fields may span lines.

use std::io::Read;

use log::debug;

use crate::error::Result;
use crate::parse_err;

/// Default name of the column holding the page ids.
pub const PAGE_COLUMN: &str = "page";

/// Read the page ids stored in `column` of the CSV data in `r`.
///
/// Records made only of empty fields are skipped. A record too short to have
/// the column, or with an empty page id, fails with `Parse` naming its line.
pub fn read_pages<R: Read>(r: R, column: &str) -> Result<Vec<String>> {
    let mut reader =
        csv::ReaderBuilder::new().trim(csv::Trim::All).flexible(true).from_reader(r);

    let headers = reader.headers()?.clone();
    if headers.iter().all(str::is_empty) {
        return Err(parse_err!("CSV input is empty, expected a header with a '{}' column", column));
    }
    let Some(index) = headers.iter().position(|name| name == column) else {
        return Err(parse_err!(
            "CSV must contain a column named '{}', found [{}]",
            column,
            headers.iter().collect::<Vec<_>>().join(", ")
        ));
    };

    let mut pages = vec![];
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map_or(0, |pos| pos.line());
        let Some(page) = record.get(index) else {
            return Err(parse_err!(
                "row at line {} has {} fields, no '{}' column",
                line,
                record.len(),
                column
            ));
        };
        if page.is_empty() {
            return Err(parse_err!("empty page id at line {}", line));
        }
        pages.push(page.to_string());
    }
    debug!("read {} page requests from column '{}'", pages.len(), column);
    Ok(pages)
}
