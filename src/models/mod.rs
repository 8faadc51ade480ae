pub mod record;
pub mod task;

// Re-export models for easy access
pub use record::{AnnotatedRecord, Record};
pub use task::{CorrelationMismatch, ResultTask, Task, TaskKind};
