//! Booking server runtime.
//!
//! [`ServerHandle`] owns the full lifecycle: seeding the in-memory store,
//! the event bus, the REST/WebSocket router and graceful shutdown. The CLI
//! and the integration tests both start the server through it.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::api::{create_api_router, AppState, AuthState};
use crate::application::BookingService;
use crate::config::AppConfig;
use crate::infrastructure::InMemoryStorage;
use crate::notifications::{create_event_bus, SharedEventBus};
use crate::shared::errors::{AppResult, InfraError};
use crate::shared::shutdown::{listen_for_shutdown_signals, ShutdownSignal};

/// Handle to a running booking server.
///
/// ```rust,no_run
/// use court_booking::config::AppConfig;
/// use court_booking::server::ServerHandle;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let handle = ServerHandle::start(AppConfig::default()).await?;
/// handle.install_signal_handler();
/// handle.wait().await;
/// # Ok(())
/// # }
/// ```
pub struct ServerHandle {
    pub event_bus: SharedEventBus,
    pub service: Arc<BookingService>,
    pub config: AppConfig,

    local_addr: SocketAddr,
    shutdown: ShutdownSignal,
    api_task: JoinHandle<()>,
}

impl ServerHandle {
    /// Seed storage from `config.courts`, bind `server.host:server.port`
    /// (port 0 picks a free one) and start serving.
    pub async fn start(config: AppConfig) -> AppResult<Self> {
        config.validate()?;

        let storage = Arc::new(InMemoryStorage::with_courts(config.courts.clone()));
        info!(courts = config.courts.len(), "Court catalog seeded");

        let event_bus = create_event_bus();
        let service = Arc::new(BookingService::new(
            storage.clone(),
            storage,
            event_bus.clone(),
            config.booking.clone(),
        ));

        let auth = AuthState::new(config.server.api_tokens.iter().cloned());
        if !auth.is_enabled() {
            warn!("No api_tokens configured, booking routes are unauthenticated");
        }

        let router = create_api_router(AppState::new(service.clone()), auth, event_bus.clone());

        let listener = TcpListener::bind(config.server.address())
            .await
            .map_err(InfraError::Io)?;
        let local_addr = listener.local_addr().map_err(InfraError::Io)?;
        info!(%local_addr, "Booking API listening");

        let shutdown = ShutdownSignal::new();
        let api_shutdown = shutdown.clone();
        let api_server = axum::serve(listener, router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("Booking API received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!(error = %e, "Booking API server error");
            }
        });

        Ok(Self {
            event_bus,
            service,
            config,
            local_addr,
            shutdown,
            api_task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Base URL of the API, e.g. `http://127.0.0.1:8080/api`
    pub fn api_url(&self) -> String {
        format!("http://{}/api", self.local_addr)
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Trigger shutdown on SIGTERM or SIGINT.
    pub fn install_signal_handler(&self) {
        tokio::spawn(listen_for_shutdown_signals(self.shutdown.clone()));
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.trigger();
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }

    /// Wait for the server to stop. After shutdown is triggered, in-flight
    /// requests get `server.shutdown_timeout` seconds before the task is
    /// abandoned.
    pub async fn wait(self) {
        let grace = Duration::from_secs(self.config.server.shutdown_timeout);
        let shutdown = self.shutdown.clone();
        let mut api_task = self.api_task;

        tokio::select! {
            result = &mut api_task => {
                log_task_result(result);
                return;
            }
            _ = shutdown.wait() => {}
        }

        match tokio::time::timeout(grace, &mut api_task).await {
            Ok(result) => log_task_result(result),
            Err(_) => {
                warn!(timeout_secs = grace.as_secs(), "Shutdown timed out, aborting server task");
                api_task.abort();
            }
        }
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("Shutting down booking server");
        self.trigger_shutdown();
        self.wait().await;
    }
}

fn log_task_result(result: Result<(), tokio::task::JoinError>) {
    match result {
        Ok(()) => info!("Booking API stopped"),
        Err(e) => error!(error = %e, "Booking API task panicked"),
    }
}

/// Initialize tracing from the logging config. `RUST_LOG` wins over
/// `logging.level`. Later calls are no-ops.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let result = if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
    };

    if result.is_err() {
        warn!("Tracing subscriber already installed");
    }
}
