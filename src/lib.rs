#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Task Bridge
//!
//! A synchronous request/response front for an asynchronous worker that is
//! reachable only through a task queue and a key-value result store.
//!
//! ## Overview
//!
//! Each inbound request becomes one task. The bridge turns the submitted input
//! into records, wraps them in an envelope with a fresh identifier, publishes
//! the envelope to RabbitMQ, and then waits for the worker to write the
//! annotated result to Redis under that identifier.
//!
//! ```text
//! HTTP ──> TaskService ──> ingestion ──> TaskPublisher ──> RabbitMQ ──> worker
//!              │                                                          │
//!              └──────────── ResultCorrelator <──── Redis <───────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`ingestion`] - Spreadsheet and inline text to sanitized records
//! - [`models`] - Records, tasks, and result envelopes in their wire format
//! - [`messaging`] - Outbound queue abstraction (RabbitMQ, in-memory)
//! - [`store`] - Result store abstraction (Redis, in-memory)
//! - [`correlation`] - Bounded, cancellable result polling
//! - [`services`] - Task publisher and the `process` façade
//! - [`web`] - Axum routes for task submission and health
//! - [`config`] - Layered configuration
//! - [`bootstrap`] - Wiring and lifecycle of a running bridge
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use task_bridge::bootstrap::BridgeBootstrap;
//! use task_bridge::config::BridgeConfig;
//! use task_bridge::ingestion::RecordSource;
//! use task_bridge::models::TaskKind;
//!
//! # async fn example() -> Result<(), task_bridge::TaskError> {
//! let handle = BridgeBootstrap::bootstrap(BridgeConfig::default()).await?;
//!
//! let result = handle
//!     .service
//!     .process(TaskKind::ShortTask, RecordSource::Inline("hello".into()))
//!     .await?;
//! println!("worker said {}", result.messages[0].result);
//!
//! handle.stop().await?;
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod correlation;
pub mod error;
pub mod ingestion;
pub mod logging;
pub mod messaging;
pub mod models;
pub mod services;
pub mod store;
pub mod web;

pub use bootstrap::{BridgeBootstrap, BridgeSystemHandle};
pub use config::BridgeConfig;
pub use error::{TaskError, TaskResult};
pub use models::{AnnotatedRecord, Record, ResultTask, Task, TaskKind};
pub use services::{ProcessOptions, TaskService};
