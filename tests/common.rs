#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc, clippy::must_use_candidate, unreachable_pub)]
use clap::Parser;
use homechat_server::api::MgmtState;
use homechat_server::config::Config;
use homechat_server::storage::{MemoryStore, MessageStore};
use homechat_server::{AppBuilder, serve};
use reqwest::Client;
use serde_json::json;
use std::sync::{Arc, Once};
use tokio::net::TcpListener;
use tokio::sync::watch;

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("homechat_server=debug".parse().unwrap())
            .add_directive("sqlx=warn".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().init();
    });
}

/// Defaults with rate limits high enough not to interfere with functional tests.
pub fn get_test_config() -> Config {
    let mut config = Config::parse_from(["homechat-server", "--host", "127.0.0.1", "--port", "0", "--mgmt-port", "0"]);
    config.rate_limit.per_second = 10000;
    config.rate_limit.burst = 10000;
    config.rate_limit.login_per_second = 10000;
    config.rate_limit.login_burst = 10000;
    config.chat.max_message_chars = 500;
    config
}

pub struct TestApp {
    pub client: Client,
    pub server_url: String,
    pub mgmt_url: String,
    pub config: Config,
    pub store: Arc<dyn MessageStore>,
    pub shutdown_tx: watch::Sender<bool>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_config(get_test_config()).await
    }

    pub async fn spawn_with_config(config: Config) -> Self {
        Self::spawn_with_store(config, Arc::new(MemoryStore::new())).await
    }

    pub async fn spawn_with_store(config: Config, store: Arc<dyn MessageStore>) -> Self {
        setup_tracing();

        let app = AppBuilder::new(config.clone()).with_store(Arc::clone(&store)).build().await.unwrap();
        let app_router = homechat_server::api::app_router(&config, app.services);
        let mgmt_router = homechat_server::api::mgmt_router(MgmtState { health_service: app.health_service });

        let api_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mgmt_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server_url = format!("http://{}", api_listener.local_addr().unwrap());
        let mgmt_url = format!("http://{}", mgmt_listener.local_addr().unwrap());

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(serve(api_listener, app_router, shutdown_rx.clone()));
        tokio::spawn(serve(mgmt_listener, mgmt_router, shutdown_rx));

        Self { client: Client::new(), server_url, mgmt_url, config, store, shutdown_tx }
    }

    pub async fn login(&self, username: &str) -> reqwest::Response {
        self.client.post(format!("{}/api/login", self.server_url)).json(&json!({ "username": username })).send().await.unwrap()
    }

    pub async fn send(&self, sender: &str, text: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/messages", self.server_url))
            .json(&json!({ "sender": sender, "text": text }))
            .send()
            .await
            .unwrap()
    }

    pub async fn messages(&self) -> Vec<serde_json::Value> {
        let resp = self.client.get(format!("{}/api/messages", self.server_url)).send().await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let body: serde_json::Value = resp.json().await.unwrap();
        body["messages"].as_array().unwrap().clone()
    }

    pub async fn delete_all(&self) -> reqwest::Response {
        self.client.delete(format!("{}/api/messages", self.server_url)).send().await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}
