pub mod publisher;
pub mod task_service;

pub use publisher::{submit, TaskPublisher};
pub use task_service::{HealthReport, ProcessOptions, TaskService};
