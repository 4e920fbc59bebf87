#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

pub mod api;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod storage;
pub mod telemetry;

use crate::api::ServiceContainer;
use crate::config::Config;
use crate::domain::allow_list::AllowList;
use crate::services::chat_service::ChatService;
use crate::services::health_service::HealthService;
use crate::services::rate_limit_service::RateLimitService;
use crate::storage::MessageStore;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Fully wired application, ready to be mounted on routers.
#[derive(Debug)]
pub struct App {
    pub services: ServiceContainer,
    pub health_service: HealthService,
}

#[derive(Debug)]
pub struct AppBuilder {
    config: Config,
    store: Option<Arc<dyn MessageStore>>,
}

impl AppBuilder {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config, store: None }
    }

    /// Uses the given store instead of opening the configured backend.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn MessageStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Opens the store (unless one was supplied) and wires the services.
    ///
    /// # Errors
    /// Returns an error if the allow-list is invalid or the store cannot be opened.
    pub async fn build(self) -> anyhow::Result<App> {
        let allow_list = AllowList::new(&self.config.chat.allowed_users)?;
        tracing::info!(allowed_users = %allow_list, "allow-list loaded");

        let store = match self.store {
            Some(store) => store,
            None => storage::init_store(&self.config.storage).await?,
        };

        let chat_service = ChatService::new(Arc::clone(&store), allow_list, &self.config.chat);
        let rate_limit_service = RateLimitService::new(self.config.server.trusted_proxies.clone());
        let health_service = HealthService::new(store, self.config.health.clone());

        Ok(App { services: ServiceContainer { chat_service, rate_limit_service }, health_service })
    }
}

/// Serves a router until the shutdown flag flips to `true`.
///
/// # Errors
/// Returns an I/O error if the server fails while accepting connections.
pub async fn serve(listener: TcpListener, router: Router, mut shutdown_rx: watch::Receiver<bool>) -> std::io::Result<()> {
    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.wait_for(|&s| s).await;
        })
        .await
}

/// Routes panics through tracing before the default hook runs.
pub fn setup_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info.location().map(ToString::to_string).unwrap_or_default();
        tracing::error!(panic = %info, location = %location, "Panic occurred");
        default_hook(info);
    }));
}

/// Flips the shutdown flag on SIGINT or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to listen for SIGTERM");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => {}
            () = terminate => {}
        }

        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });
}
