//! `TaskHub` API server -- owner-scoped task management over HTTP.
//!
//! An axum server exposing task CRUD behind bearer-token authentication,
//! with a WebSocket endpoint pushing change events to live clients.
//!
//! # Usage
//!
//! ```bash
//! # Run on the default address 0.0.0.0:5000 with an in-memory store
//! JWT_SECRET=change-me cargo run --bin taskhub-server
//!
//! # Run on a custom address with a persistent JSON store
//! JWT_SECRET=change-me cargo run --bin taskhub-server -- \
//!     --bind 127.0.0.1:8080 --store-path /var/lib/taskhub/tasks.json
//! ```

use clap::Parser;

use taskhub_server::config::{ServerCliArgs, ServerConfig};
use taskhub_server::persist::JsonFileStore;
use taskhub_server::routes::{self, AppState};
use taskhub_server::store::{MemoryStore, TaskStore};

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(addr = %config.bind_addr, "starting taskhub api server");

    match config.store_path.clone() {
        Some(path) => {
            let store = match JsonFileStore::open(path.clone()).await {
                Ok(store) => store,
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "failed to open task store");
                    std::process::exit(1);
                }
            };
            run(store, &config).await;
        }
        None => {
            tracing::info!("no store path configured; tasks are held in memory only");
            run(MemoryStore::new(), &config).await;
        }
    }
}

/// Builds the app state around the chosen store and serves until the
/// listener task ends.
async fn run<S: TaskStore + 'static>(store: S, config: &ServerConfig) {
    let state = AppState::new(store, config.jwt_secret.clone());

    match routes::start_server(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "taskhub api server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start taskhub api server");
            std::process::exit(1);
        }
    }
}
