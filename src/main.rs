use std::sync::Arc;

use config::Config;
use dotenvy::dotenv;
use slack::{DialogClient, SlackApp};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod error;
mod router;
mod slack;

/// Shared by every handler. Both halves are read-only after startup.
#[derive(Clone)]
pub struct ServerState {
    config: Arc<Config>,
    slack: Arc<dyn DialogClient>,
}

impl ServerState {
    pub fn new(config: Config, slack: Arc<dyn DialogClient>) -> Self {
        Self {
            config: Arc::new(config),
            slack,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv().is_ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slack_modals=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if dotenv_loaded {
        info!("Loaded .env file");
    } else {
        info!(".env file not found, ignoring...");
    }

    let config = Config::from_env()?;
    if !config.has_signing_secret() {
        warn!("SLACK_SIGNING_SECRET is not set; every signed request will be rejected");
    }

    let slack = SlackApp::new(&config)?;
    let state = ServerState::new(config, Arc::new(slack));

    let listener = tokio::net::TcpListener::bind(&state.config.bind).await?;
    info!(
        "Running {} v{} on: {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        listener.local_addr()?
    );

    axum::serve(listener, router::get_router().with_state(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(err) => {
            error!("Could not listen for shutdown signal: {err}");
            std::future::pending::<()>().await
        }
    }
}
