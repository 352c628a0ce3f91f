//! Turns an uploaded sheet into row mappings keyed by the header row.
//!
//! Excel workbooks (`.xlsx`, `.xls`, `.xlsb`, `.ods`) are read from their
//! first sheet; anything else is read as delimited text. Cells are kept as
//! the text found in the file. Recognized columns
//! are looked up by exact header name; other columns are carried along in
//! [`ImportedRow::cells`] and otherwise ignored.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use indexmap::IndexMap;
use serde::Serialize;

/// Column name → cell text, in sheet column order. Empty cells are omitted.
pub type RowMap = IndexMap<String, String>;

const PATIENT_NAME: &[&str] = &["Patient Name", "Patient"];
const CONTACT_NUMBER: &[&str] = &["Contact Number", "Phone"];
const RESOURCE: &[&str] = &["Resource", "Doctor"];
const APPOINTMENT_DATE: &[&str] = &["Appointment Date", "Date"];
const START_TIME: &[&str] = &["Start Time", "Time"];
const BOOKED_USER: &[&str] = &["Booked User", "Booked By"];

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("The uploaded file is empty.")]
    Empty,

    #[error("The uploaded file has no header row.")]
    NoHeader,

    #[error("The uploaded workbook contains no sheets.")]
    NoSheets,

    #[error("Could not read the uploaded workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Could not read the uploaded file: {0}")]
    Malformed(#[from] csv::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportedRow {
    pub patient_name: Option<String>,
    pub contact_number: Option<String>,
    pub resource: Option<String>,
    /// Free text, possibly with a time-of-day suffix.
    pub appointment_date: Option<String>,
    pub start_time: Option<String>,
    pub booked_user: Option<String>,
    pub cells: RowMap,
}

impl ImportedRow {
    pub fn from_cells(cells: RowMap) -> Self {
        let pick = |names: &[&str]| names.iter().find_map(|n| cells.get(*n).cloned());
        Self {
            patient_name: pick(PATIENT_NAME),
            contact_number: pick(CONTACT_NUMBER),
            resource: pick(RESOURCE),
            appointment_date: pick(APPOINTMENT_DATE),
            start_time: pick(START_TIME),
            booked_user: pick(BOOKED_USER),
            cells,
        }
    }
}

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Parses an uploaded sheet. The first row is the header, blank rows are
/// skipped and rows may be shorter or longer than the header.
pub fn parse_sheet(bytes: &[u8]) -> Result<Vec<ImportedRow>, ImportError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ImportError::Empty);
    }

    let rows = if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
        parse_workbook(bytes)?
    } else {
        parse_delimited(bytes)?
    };

    tracing::debug!(rows = rows.len(), "parsed spreadsheet");
    Ok(rows)
}

fn build_rows<I, R>(headers: &[String], records: I) -> Vec<ImportedRow>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = String>,
{
    records
        .into_iter()
        .filter_map(|record| {
            let cells: RowMap = headers
                .iter()
                .zip(record)
                .filter(|(header, cell)| !header.is_empty() && !cell.is_empty())
                .map(|(header, cell)| (header.clone(), cell))
                .collect();
            (!cells.is_empty()).then(|| ImportedRow::from_cells(cells))
        })
        .collect()
}

fn check_headers(headers: &[String]) -> Result<(), ImportError> {
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ImportError::NoHeader);
    }
    Ok(())
}

fn parse_delimited(bytes: &[u8]) -> Result<Vec<ImportedRow>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    check_headers(&headers)?;

    let records = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect::<Vec<_>>()))
        .collect::<Result<Vec<_>, csv::Error>>()?;
    Ok(build_rows(&headers, records))
}

fn parse_workbook(bytes: &[u8]) -> Result<Vec<ImportedRow>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Err(ImportError::NoSheets),
    };
    rows_from_range(&range)
}

fn rows_from_range(range: &Range<Data>) -> Result<Vec<ImportedRow>, ImportError> {
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(cell_text).collect(),
        None => return Err(ImportError::NoHeader),
    };
    check_headers(&headers)?;

    Ok(build_rows(
        &headers,
        rows.map(|row| row.iter().map(cell_text).collect::<Vec<_>>()),
    ))
}

/// Text of a workbook cell. Date cells become `YYYY-MM-DD`, with a
/// `THH:MM:SS` suffix when they carry a time; bare times become `HH:MM`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::DateTime(value) => match value.as_datetime() {
            Some(dt) if value.as_f64() < 1.0 => dt.format("%H:%M").to_string(),
            Some(dt) if value.as_f64().fract() == 0.0 => dt.format("%Y-%m-%d").to_string(),
            Some(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            None => value.as_f64().to_string(),
        },
        other => other.to_string(),
    }
}
