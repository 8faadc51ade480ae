//! # RabbitMQ Messaging Service
//!
//! `MessagingService` over AMQP 0.9.1 using the `lapin` crate.
//!
//! ## Durability
//!
//! - Queues are declared `durable` so they survive a broker restart
//! - Messages are published with delivery mode 2 (persistent)
//! - The channel runs in confirm mode; a broker nack fails the publish
//!
//! ## Usage
//!
//! ```ignore
//! use task_bridge::config::RabbitMqConfig;
//! use task_bridge::messaging::providers::RabbitMqMessagingService;
//! use task_bridge::messaging::MessagingService;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = RabbitMqMessagingService::connect(&RabbitMqConfig::default()).await?;
//! service.ensure_queue("task_queue").await?;
//! service.send_message("task_queue", &serde_json::json!({"key": "value"})).await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashSet;

use async_trait::async_trait;
use lapin::options::{BasicPublishOptions, ConfirmSelectOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::config::RabbitMqConfig;
use crate::constants::TASK_CONTENT_TYPE;
use crate::messaging::errors::MessagingError;
use crate::messaging::traits::{MessagingService, QueueMessage};

const PERSISTENT_DELIVERY: u8 = 2;
const REPLY_SUCCESS: u16 = 200;

/// RabbitMQ-backed messaging service
///
/// One connection and one confirm-mode channel, shared by every request.
#[derive(Debug)]
pub struct RabbitMqMessagingService {
    connection: Connection,
    channel: Channel,
    config: RabbitMqConfig,
    declared_queues: RwLock<HashSet<String>>,
}

impl RabbitMqMessagingService {
    /// Open a connection and a confirm-mode channel
    pub async fn connect(config: &RabbitMqConfig) -> Result<Self, MessagingError> {
        let connection = Connection::connect(
            &config.url,
            ConnectionProperties::default().with_connection_name(config.connection_name.clone().into()),
        )
        .await
        .map_err(|e| MessagingError::connection(format!("RabbitMQ connection failed: {e}")))?;

        let channel = connection.create_channel().await.map_err(|e| {
            MessagingError::connection(format!("RabbitMQ channel creation failed: {e}"))
        })?;

        channel
            .confirm_select(ConfirmSelectOptions::default())
            .await
            .map_err(|e| {
                MessagingError::connection(format!("Failed to enable publisher confirms: {e}"))
            })?;

        info!(
            broker = %redact_url(&config.url),
            connection_name = %config.connection_name,
            "Connected to RabbitMQ"
        );

        Ok(Self {
            connection,
            channel,
            config: config.clone(),
            declared_queues: RwLock::new(HashSet::new()),
        })
    }

    pub fn config(&self) -> &RabbitMqConfig {
        &self.config
    }

    /// Close the channel and the connection
    pub async fn close(&self) -> Result<(), MessagingError> {
        self.channel
            .close(REPLY_SUCCESS, "task-bridge shutdown")
            .await
            .map_err(|e| MessagingError::connection(format!("Failed to close channel: {e}")))?;
        self.connection
            .close(REPLY_SUCCESS, "task-bridge shutdown")
            .await
            .map_err(|e| MessagingError::connection(format!("Failed to close connection: {e}")))?;

        info!("RabbitMQ connection closed");
        Ok(())
    }
}

#[async_trait]
impl MessagingService for RabbitMqMessagingService {
    async fn ensure_queue(&self, queue_name: &str) -> Result<(), MessagingError> {
        if self.declared_queues.read().contains(queue_name) {
            return Ok(());
        }

        self.channel
            .queue_declare(
                queue_name,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await
            .map_err(|e| {
                MessagingError::queue_creation(queue_name, format!("Queue declare failed: {e}"))
            })?;

        self.declared_queues.write().insert(queue_name.to_string());
        debug!(queue = queue_name, "Declared durable queue");
        Ok(())
    }

    async fn send_message<T: QueueMessage>(
        &self,
        queue_name: &str,
        message: &T,
    ) -> Result<(), MessagingError> {
        let bytes = message.to_bytes()?;

        let confirm = self
            .channel
            .basic_publish(
                "",
                queue_name,
                BasicPublishOptions::default(),
                &bytes,
                BasicProperties::default()
                    .with_delivery_mode(PERSISTENT_DELIVERY)
                    .with_content_type(TASK_CONTENT_TYPE.into()),
            )
            .await
            .map_err(|e| MessagingError::send(queue_name, format!("Publish failed: {e}")))?;

        let confirmation = confirm.await.map_err(|e| {
            MessagingError::send(queue_name, format!("Publish confirmation failed: {e}"))
        })?;

        if confirmation.is_nack() {
            return Err(MessagingError::rejected(queue_name));
        }

        debug!(queue = queue_name, bytes = bytes.len(), "Message confirmed by broker");
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, MessagingError> {
        if self.connection.status().connected() {
            Ok(true)
        } else {
            Err(MessagingError::health_check(
                "RabbitMQ connection is not connected",
            ))
        }
    }

    fn provider_name(&self) -> &'static str {
        "rabbitmq"
    }
}

/// Hide credentials from a broker URL for logging
fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}***{}", &url[..scheme_end + 3], &url[at..])
        }
        _ => url.to_string(),
    }
}
