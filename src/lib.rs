pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod health;
pub mod http_client;
pub mod models;
pub mod services;
pub mod session;

use std::sync::Arc;
use config::Config;
use http_client::HttpClient;
use services::Services;
use session::SessionStore;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub services: Arc<Services>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Wires the fetch client, per-resource caches and session store from `config`.
    pub fn new(config: Config) -> Self {
        let client = HttpClient::new(config.data_base_url.clone(), config.fetch.clone());
        let services = Services::new(client, config.cache_ttl);

        let sessions = SessionStore::new();
        sessions.subscribe(|event| tracing::debug!(?event, "session changed"));

        Self {
            config: Arc::new(config),
            services: Arc::new(services),
            sessions: Arc::new(sessions),
        }
    }
}
