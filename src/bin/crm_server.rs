//! Demo server binary: in-memory store behind the HTTP exposure

use anyhow::Result;
use crm::config::ApiConfig;
use crm::server::{AppState, serve};
use crm::storage::InMemoryStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::var("CRM_CONFIG") {
        Ok(path) => ApiConfig::from_yaml_file(&path)?,
        Err(_) => ApiConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log)),
        )
        .init();

    let state = AppState {
        store: Arc::new(InMemoryStore::new()),
    };
    serve(state, &config.bind).await
}
