//! # Record Models
//!
//! One input line of text with its identity metadata, before and after the
//! external worker annotates it.
//!
//! ## Wire Format
//!
//! Field names follow the worker contract exactly:
//!
//! ```json
//! { "userID": "u1", "submitDate": "d1", "messageText": "hi", "result": 1 }
//! ```
//!
//! `result` is only present on [`AnnotatedRecord`].

use serde::{Deserialize, Serialize};

/// A canonical work record produced by ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "submitDate")]
    pub submit_date: String,
    #[serde(rename = "messageText")]
    pub message_text: String,
}

impl Record {
    pub fn new(
        user_id: impl Into<String>,
        submit_date: impl Into<String>,
        message_text: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            submit_date: submit_date.into(),
            message_text: message_text.into(),
        }
    }
}

/// A record after the worker assigned its classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedRecord {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "submitDate")]
    pub submit_date: String,
    #[serde(rename = "messageText")]
    pub message_text: String,
    pub result: i64,
}

impl AnnotatedRecord {
    /// Attach a worker result to an input record
    pub fn from_record(record: Record, result: i64) -> Self {
        Self {
            user_id: record.user_id,
            submit_date: record.submit_date,
            message_text: record.message_text,
            result,
        }
    }
}
