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

use homechat_server::api::MgmtState;
use homechat_server::config::Config;
use homechat_server::{AppBuilder, telemetry};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::watch;
use tracing::Instrument;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    let telemetry_guard = telemetry::init_telemetry(&config.telemetry)?;

    homechat_server::setup_panic_hook();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let boot_span = tracing::info_span!("boot_server");
    let (api_listener, mgmt_listener, app_router, mgmt_app) = async {
        homechat_server::spawn_signal_handler(shutdown_tx.clone());

        let app = AppBuilder::new(config.clone()).build().await?;

        let app_router = homechat_server::api::app_router(&config, app.services);
        let mgmt_app = homechat_server::api::mgmt_router(MgmtState { health_service: app.health_service });

        let api_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
        let mgmt_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.mgmt_port).parse()?;

        let api_listener = tokio::net::TcpListener::bind(api_addr).await?;
        let mgmt_listener = tokio::net::TcpListener::bind(mgmt_addr).await?;

        tracing::info!(address = %api_addr, "listening");
        tracing::info!(address = %mgmt_addr, "management server listening");

        Ok::<_, anyhow::Error>((api_listener, mgmt_listener, app_router, mgmt_app))
    }
    .instrument(boot_span)
    .await?;

    let api_server = homechat_server::serve(api_listener, app_router, shutdown_rx.clone());
    let mgmt_server = homechat_server::serve(mgmt_listener, mgmt_app, shutdown_rx.clone());

    let mut wait_rx = shutdown_rx.clone();
    let servers = async { tokio::try_join!(api_server, mgmt_server) };
    tokio::pin!(servers);

    tokio::select! {
        res = &mut servers => {
            if let Err(e) = res {
                tracing::error!(error = %e, "Server error");
            }
        }
        _ = wait_rx.wait_for(|&s| s) => {
            // Give in-flight requests a bounded window to drain.
            match tokio::time::timeout(Duration::from_secs(config.server.shutdown_timeout_secs), &mut servers).await {
                Ok(Ok(_)) => tracing::info!("Servers drained"),
                Ok(Err(e)) => tracing::error!(error = %e, "Server error during shutdown"),
                Err(_) => tracing::warn!("Timeout waiting for in-flight requests to finish"),
            }
        }
    }

    let _ = shutdown_tx.send(true);
    telemetry_guard.shutdown();
    Ok(())
}
