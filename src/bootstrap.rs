//! # Bridge Bootstrap
//!
//! Connects the backends named in [`BridgeConfig`], declares the task queue,
//! and wires the task service, correlator, and HTTP router together.
//!
//! Handles are created here and released explicitly through
//! [`BridgeSystemHandle::stop`]; nothing is deferred to process exit.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::BridgeConfig;
use crate::correlation::ResultCorrelator;
use crate::error::{TaskError, TaskResult};
use crate::messaging::{MessagingProvider, RabbitMqMessagingService};
use crate::services::{TaskPublisher, TaskService};
use crate::store::{RedisResultStore, StoreProvider};
use crate::web::{self, AppState};

/// Running bridge with its shared handles
#[derive(Debug)]
pub struct BridgeSystemHandle {
    pub config: Arc<BridgeConfig>,
    pub service: TaskService,
    messaging: Arc<MessagingProvider>,
    store: Arc<StoreProvider>,
    shutdown: CancellationToken,
}

/// Snapshot of the running system
#[derive(Debug, Clone)]
pub struct SystemStatus {
    pub running: bool,
    pub environment: String,
    pub messaging_provider: &'static str,
    pub store_provider: &'static str,
    pub task_queue: String,
}

impl BridgeSystemHandle {
    pub fn is_running(&self) -> bool {
        !self.shutdown.is_cancelled()
    }

    pub fn messaging(&self) -> &Arc<MessagingProvider> {
        &self.messaging
    }

    pub fn store(&self) -> &Arc<StoreProvider> {
        &self.store
    }

    /// Token cancelled by [`stop`](Self::stop); in-flight waits observe it
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn app_state(&self) -> Arc<AppState> {
        Arc::new(AppState::new(self.service.clone(), self.shutdown.clone()))
    }

    pub fn router(&self) -> Router {
        web::create_app(self.app_state())
    }

    pub fn status(&self) -> SystemStatus {
        SystemStatus {
            running: self.is_running(),
            environment: self.config.environment.clone(),
            messaging_provider: self.messaging.provider_name(),
            store_provider: self.store.provider_name(),
            task_queue: self.config.messaging.task_queue.clone(),
        }
    }

    /// Serve HTTP on the configured address until [`stop`](Self::stop) is called
    pub async fn serve(&self) -> TaskResult<()> {
        let bind_address = &self.config.web.bind_address;
        let listener = TcpListener::bind(bind_address)
            .await
            .map_err(|e| TaskError::startup("web server", e))?;

        info!(bind_address = %bind_address, "🌐 Web server listening");

        let shutdown = self.shutdown.clone();
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .map_err(|e| TaskError::startup("web server", e))?;

        info!("Web server stopped");
        Ok(())
    }

    /// Cancel in-flight waits and close backend connections
    pub async fn stop(&self) -> TaskResult<()> {
        if self.shutdown.is_cancelled() {
            warn!("Bridge system already stopped");
            return Ok(());
        }

        self.shutdown.cancel();
        info!("🛑 Bridge system shutdown requested");

        if let Err(e) = self.messaging.close().await {
            error!(error = %e, "Failed to close messaging provider cleanly");
        }
        Ok(())
    }
}

/// Assembles a [`BridgeSystemHandle`] from configuration
#[derive(Debug)]
pub struct BridgeBootstrap;

impl BridgeBootstrap {
    /// Connect to RabbitMQ and Redis and declare the task queue
    pub async fn bootstrap(config: BridgeConfig) -> TaskResult<BridgeSystemHandle> {
        info!(environment = %config.environment, "🚀 BOOTSTRAP: Starting task bridge");
        config.validate()?;

        let rabbitmq = RabbitMqMessagingService::connect(&config.messaging)
            .await
            .map_err(|e| TaskError::startup("messaging", e))?;
        let messaging = MessagingProvider::new_rabbitmq(rabbitmq);

        let redis = RedisResultStore::connect(&config.store)
            .await
            .map_err(|e| TaskError::startup("result store", e))?;
        let store = StoreProvider::new_redis(redis);

        Self::assemble(config, messaging, store).await
    }

    /// Same wiring over in-process queue and store, for tests and local runs
    pub async fn bootstrap_in_memory(config: BridgeConfig) -> TaskResult<BridgeSystemHandle> {
        config.validate()?;
        Self::assemble(
            config,
            MessagingProvider::new_in_memory(),
            StoreProvider::new_in_memory(),
        )
        .await
    }

    async fn assemble(
        config: BridgeConfig,
        messaging: MessagingProvider,
        store: StoreProvider,
    ) -> TaskResult<BridgeSystemHandle> {
        let config = Arc::new(config);
        let messaging = Arc::new(messaging);
        let store = Arc::new(store);

        let publisher = TaskPublisher::new(Arc::clone(&messaging), &config.messaging.task_queue);
        publisher
            .ensure_queue()
            .await
            .map_err(|e| TaskError::startup("messaging", e))?;

        let correlator = ResultCorrelator::new(
            Arc::clone(&store),
            config.store.key_prefix.clone(),
            &config.correlation,
        );

        info!(
            messaging = messaging.provider_name(),
            store = store.provider_name(),
            task_queue = %config.messaging.task_queue,
            "✅ BOOTSTRAP: Task bridge ready"
        );

        Ok(BridgeSystemHandle {
            service: TaskService::new(publisher, correlator),
            config,
            messaging,
            store,
            shutdown: CancellationToken::new(),
        })
    }
}
