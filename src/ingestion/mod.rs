//! # Record Ingestion
//!
//! Turns an inbound upload into the ordered record sequence a task carries.
//!
//! ## Sources
//!
//! - [`RecordSource::Spreadsheet`]: workbook bytes from an upload
//! - [`RecordSource::File`]: a workbook on disk
//! - [`RecordSource::Inline`]: one text, wrapped as a single record with
//!   placeholder identity fields
//!
//! Every message text passes through [`strip_markup`]. Row order is preserved.

mod errors;
mod sanitize;
mod spreadsheet;

use std::path::PathBuf;

use tracing::debug;

use crate::constants::placeholder;
use crate::models::Record;

pub use errors::{IngestionError, IngestionResult};
pub use sanitize::{contains_markup, strip_markup};
pub use spreadsheet::{parse_workbook, read_first_sheet, records_from_rows};

/// Where the records of a task come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSource {
    Spreadsheet(Vec<u8>),
    File(PathBuf),
    Inline(String),
}

impl RecordSource {
    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            RecordSource::Spreadsheet(_) => "spreadsheet",
            RecordSource::File(_) => "file",
            RecordSource::Inline(_) => "inline",
        }
    }
}

/// Ingest a source into ordered records
///
/// Workbook parsing is CPU bound and runs on the blocking pool.
pub async fn ingest(source: RecordSource) -> IngestionResult<Vec<Record>> {
    let label = source.label();
    let records = match source {
        RecordSource::Inline(text) => vec![inline_record(&text)],
        RecordSource::Spreadsheet(bytes) => parse_off_runtime(bytes).await?,
        RecordSource::File(path) => {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|e| IngestionError::io(path.display().to_string(), e))?;
            parse_off_runtime(bytes).await?
        }
    };

    debug!(source = label, record_count = records.len(), "Ingested records");
    Ok(records)
}

/// Wrap one inline text as a record with placeholder identity fields
pub fn inline_record(text: &str) -> Record {
    Record::new(
        placeholder::USER_ID,
        placeholder::SUBMIT_DATE,
        strip_markup(text),
    )
}

async fn parse_off_runtime(bytes: Vec<u8>) -> IngestionResult<Vec<Record>> {
    tokio::task::spawn_blocking(move || parse_workbook(bytes))
        .await
        .map_err(|e| IngestionError::malformed(format!("workbook parser aborted: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_inline_source_yields_single_placeholder_record() {
        let records = ingest(RecordSource::Inline("<i>hello</i>&nbsp;there".to_string()))
            .await
            .unwrap();

        assert_eq!(records, vec![Record::new("1", "1", "hellothere")]);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let result = ingest(RecordSource::File(PathBuf::from(
            "/nonexistent/task-bridge/upload.xlsx",
        )))
        .await;

        assert!(matches!(result, Err(IngestionError::Io { .. })));
    }

    #[tokio::test]
    async fn test_unparseable_upload_is_malformed() {
        let result = ingest(RecordSource::Spreadsheet(b"userID,submitDate".to_vec())).await;
        assert!(matches!(result, Err(IngestionError::MalformedInput { .. })));
    }
}
