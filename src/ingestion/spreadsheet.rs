//! # Spreadsheet Reader
//!
//! Reads the first worksheet of an uploaded workbook into plain text rows and
//! applies the row scan policy.
//!
//! ## Row Scan Policy
//!
//! - Row 0 is the header and is always skipped.
//! - Columns are `[userID, submitDate, messageText]` in that order.
//! - Scanning stops at the first data row whose first cell is empty. Nothing
//!   after that row is examined, even if it has content.
//! - Missing trailing cells read as empty strings; no other validation.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Range, Reader};
use chrono::{NaiveDateTime, NaiveTime};
use tracing::debug;

use super::errors::{IngestionError, IngestionResult};
use super::sanitize::strip_markup;
use crate::models::Record;

const USER_ID_COLUMN: usize = 0;
const SUBMIT_DATE_COLUMN: usize = 1;
const MESSAGE_TEXT_COLUMN: usize = 2;

/// Parse workbook bytes (xlsx, xlsm, xls or ods) into ordered records
pub fn parse_workbook(bytes: Vec<u8>) -> IngestionResult<Vec<Record>> {
    let rows = read_first_sheet(bytes)?;
    Ok(records_from_rows(&rows))
}

/// Read the first worksheet as text rows, aligned to cell A1
pub fn read_first_sheet(bytes: Vec<u8>) -> IngestionResult<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| IngestionError::malformed(format!("not a readable workbook: {e}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| IngestionError::malformed("workbook has no worksheets"))?;

    let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
        IngestionError::malformed(format!("failed to read worksheet {sheet_name}: {e}"))
    })?;

    let rows = rows_from_range(&range);
    debug!(sheet = %sheet_name, rows = rows.len(), "Read worksheet");
    Ok(rows)
}

// calamine ranges begin at the first used cell; pad back to A1 so the header
// is always row 0 and userID is always column 0.
fn rows_from_range(range: &Range<Data>) -> Vec<Vec<String>> {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    let mut rows: Vec<Vec<String>> = (0..start_row).map(|_| Vec::new()).collect();
    rows.extend(range.rows().map(|cells| {
        std::iter::repeat(String::new())
            .take(start_col as usize)
            .chain(cells.iter().map(cell_text))
            .collect()
    }));
    rows
}

/// Render a cell the way it reads in the spreadsheet
///
/// Date cells are stored as serial numbers; they are rendered as
/// `YYYY-MM-DD`, with the time appended only when it is not midnight.
/// Durations and everything else use calamine's text form.
fn cell_text(cell: &Data) -> String {
    let datetime = match cell {
        Data::DateTime(dt) if dt.is_datetime() => cell.as_datetime(),
        Data::DateTimeIso(_) => cell.as_datetime(),
        _ => None,
    };
    match datetime {
        Some(dt) => format_datetime(dt),
        None => cell.to_string(),
    }
}

fn format_datetime(dt: NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Apply the row scan policy to already-read rows
pub fn records_from_rows<R, S>(rows: &[R]) -> Vec<Record>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    rows.iter()
        .skip(1)
        .map_while(|row| {
            let row = row.as_ref();
            let user_id = cell(row, USER_ID_COLUMN);
            if user_id.is_empty() {
                return None;
            }
            Some(Record::new(
                user_id,
                cell(row, SUBMIT_DATE_COLUMN),
                strip_markup(cell(row, MESSAGE_TEXT_COLUMN)),
            ))
        })
        .collect()
}

fn cell<S: AsRef<str>>(row: &[S], index: usize) -> &str {
    row.get(index).map(AsRef::as_ref).unwrap_or("")
}
