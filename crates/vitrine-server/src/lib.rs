//! Vitrine Article Relay
//!
//! Accepts articles over REST and pushes them to every connected viewer.
//!
//! ## Endpoints
//!
//! - `POST /api/article` with `{ "name": "Milk", "price": 2.5 }`
//! - `GET /api/articles`
//! - `DELETE /api/articles`
//! - `GET /ws` for the event stream (`initial-snapshot`, `article-added`,
//!   `articles-cleared`)
//! - `GET /health`

pub mod config;
pub mod routes;
pub mod state;

pub use config::{ConfigError, Settings};
pub use routes::build_router;
pub use state::AppState;

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Startup errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bind and serve until the process is stopped.
pub async fn run(settings: Settings) -> Result<(), ServerError> {
    let state = Arc::new(AppState::new(settings.channel_capacity));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.bind).await?;
    info!("Vitrine relay server listening on {}", listener.local_addr()?);
    info!("WebSocket endpoint: ws://{}/ws", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
