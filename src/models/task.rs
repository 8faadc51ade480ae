//! # Task Envelopes
//!
//! The outbound [`Task`] published onto the queue and its annotated counterpart,
//! the [`ResultTask`], written back by the worker under the same identifier.
//!
//! ## Correlation Contract
//!
//! - `ResultTask.id == Task.id`
//! - `ResultTask.messages.len() == Task.messages.len()`, in the same order
//!
//! [`ResultTask::verify_against`] checks the contract for a given task.
//!
//! ## Identifiers
//!
//! Task identifiers are random UUID v4 values minted by [`Task::new`]. Nothing
//! else in the crate creates them.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::record::{AnnotatedRecord, Record};

/// Closed set of task kinds understood by the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    /// Spreadsheet upload with many records
    FullTask,
    /// A single inline text
    ShortTask,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::FullTask => "FullTask",
            TaskKind::ShortTask => "ShortTask",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of submitted work
///
/// Fields are private so a task cannot be mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: Uuid,
    #[serde(rename = "type")]
    kind: TaskKind,
    messages: Vec<Record>,
}

impl Task {
    /// Build a task with a freshly minted correlation identifier
    pub fn new(kind: TaskKind, records: Vec<Record>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            messages: records,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn records(&self) -> &[Record] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// The annotated counterpart of a [`Task`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTask {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    pub messages: Vec<AnnotatedRecord>,
}

/// Ways a result can fail to match the task that produced it
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CorrelationMismatch {
    #[error("result id {found} does not match task id {expected}")]
    Id { expected: Uuid, found: Uuid },

    #[error("result kind {found} does not match task kind {expected}")]
    Kind { expected: TaskKind, found: TaskKind },

    #[error("result has {found} records, task has {expected}")]
    Length { expected: usize, found: usize },
}

impl ResultTask {
    /// Check the correlation contract against the task that produced this result
    pub fn verify_against(&self, task: &Task) -> Result<(), CorrelationMismatch> {
        if self.id != task.id() {
            return Err(CorrelationMismatch::Id {
                expected: task.id(),
                found: self.id,
            });
        }
        if self.kind != task.kind() {
            return Err(CorrelationMismatch::Kind {
                expected: task.kind(),
                found: self.kind,
            });
        }
        if self.messages.len() != task.len() {
            return Err(CorrelationMismatch::Length {
                expected: task.len(),
                found: self.messages.len(),
            });
        }
        Ok(())
    }
}
