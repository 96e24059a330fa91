//! CSV export of report rows.
//!
//! The report has a fixed column order:
//!
//! ```text
//! PubmedID,Title,Publication Date,Non-academic Author(s),Company Affiliation(s),Corresponding Author Email
//! ```
//!
//! Fields containing a comma, a quote or a line break are quoted, so the output reads back
//! field-for-field with any standard CSV reader. An empty row slice produces no output at
//! all, not even a header.

use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::*;

/// Column headers of the report, in output order.
pub const HEADERS: [&str; 6] = [
  "PubmedID",
  "Title",
  "Publication Date",
  "Non-academic Author(s)",
  "Company Affiliation(s)",
  "Corresponding Author Email",
];

/// Exports `rows` either to `destination` or to a returned string.
///
/// - Without a destination the CSV text is returned as `Some(text)`; an empty slice gives
///   `Some(String::new())`.
/// - With a destination the file is written and `None` is returned; an empty slice writes
///   nothing.
///
/// # Examples
///
/// ```
/// use pharmapapers::{export::export, processor::ReportRow};
///
/// let rows = vec![ReportRow { pubmed_id: "1".into(), ..Default::default() }];
/// let csv = export(&rows, None).unwrap().unwrap();
/// assert!(csv.starts_with("PubmedID,Title"));
/// ```
pub fn export(rows: &[ReportRow], destination: Option<&Path>) -> Result<Option<String>> {
  match destination {
    Some(path) => {
      write_csv(rows, path)?;
      Ok(None)
    },
    None => to_csv_string(rows).map(Some),
  }
}

/// Formats `rows` as CSV text, header first. Returns an empty string for an empty slice.
pub fn to_csv_string(rows: &[ReportRow]) -> Result<String> {
  if rows.is_empty() {
    debug!("No papers to export");
    return Ok(String::new());
  }

  let mut buf = Vec::new();
  write_rows(rows, &mut buf)?;
  String::from_utf8(buf)
    .map_err(|e| PharmaError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Writes `rows` as CSV to the file at `path`, replacing it.
///
/// Returns `false` without touching the file system when `rows` is empty, `true` once the
/// file has been written.
pub fn write_csv(rows: &[ReportRow], path: &Path) -> Result<bool> {
  if rows.is_empty() {
    debug!("No papers to export, not writing {}", path.display());
    return Ok(false);
  }

  let file = fs::File::create(path)?;
  write_rows(rows, file)?;
  debug!("Exported {} papers to {}", rows.len(), path.display());
  Ok(true)
}

/// Serializes the header and `rows` into `writer`.
fn write_rows<W: Write>(rows: &[ReportRow], writer: W) -> Result<()> {
  let mut writer = WriterBuilder::new()
    .has_headers(true)
    .quote_style(QuoteStyle::Necessary)
    .terminator(Terminator::Any(b'\n'))
    .from_writer(writer);

  for row in rows {
    writer.serialize(row)?;
  }
  writer.flush()?;
  Ok(())
}
