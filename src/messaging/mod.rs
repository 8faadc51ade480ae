//! # Messaging Module
//!
//! Outbound queue abstraction for task envelopes.
//!
//! ```text
//! MessagingProvider (enum)
//!   ├── RabbitMq(RabbitMqMessagingService)   durable queue, persistent messages
//!   └── InMemory(InMemoryMessagingService)   tests and local development
//! ```

mod errors;
mod provider;
pub mod providers;
mod traits;
mod types;

pub use errors::{MessagingError, MessagingResult};
pub use provider::MessagingProvider;
pub use providers::{InMemoryMessagingService, RabbitMqMessagingService};
pub use traits::{MessagingService, QueueMessage};
pub use types::{QueuedMessage, ReceiptHandle};
