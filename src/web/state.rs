//! Shared state for the HTTP handlers

use tokio_util::sync::CancellationToken;

use crate::services::{ProcessOptions, TaskService};

#[derive(Debug, Clone)]
pub struct AppState {
    pub service: TaskService,
    /// Cancelled on shutdown; in-flight result waits end with `Cancelled`
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(service: TaskService, shutdown: CancellationToken) -> Self {
        Self { service, shutdown }
    }

    /// Options for one request, tied to the server's shutdown signal
    pub fn process_options(&self) -> ProcessOptions {
        ProcessOptions::default().with_cancellation(self.shutdown.child_token())
    }
}
