// ABOUTME: Server library entry point: config, handlers, and the start_server bootstrap.
// ABOUTME: Builds the rendering backend per config and serves the scrape API over axum.

//! HTTP API for the Prensa news-article extractor.
//!
//! Exposes the scraping pipeline over three routes: `GET /` (liveness),
//! `POST /scrape` (one URL), and `POST /batch-scrape` (up to ten URLs,
//! sequential). See [`start_server`].

pub mod config;
pub mod handlers;

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use prensa_extractor::{HttpBackend, ProfileError, Scraper};

#[cfg(feature = "browser")]
use prensa_extractor::ChromiumBackend;

use crate::config::{BackendKind, ConfigError, ServerConfig};
use crate::handlers::{create_router, AppState};

/// Server startup and runtime failures.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The built-in profile table failed to load.
    #[error("profile table error: {0}")]
    Profiles(#[from] ProfileError),

    /// The listen socket could not be bound.
    #[error("failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// The rendering backend could not be started.
    #[error("rendering backend error: {0}")]
    Backend(String),

    /// The HTTP server failed while running.
    #[error("server error: {0}")]
    Serve(String),
}

/// Builds the scraper configured by `config`, launching the rendering
/// backend it names.
async fn build_scraper(config: &ServerConfig) -> Result<Scraper, ServerError> {
    let opts = config.scrape_options();
    match config.backend {
        BackendKind::Http => Ok(Scraper::builder(HttpBackend::new()).options(opts).build()?),
        BackendKind::Chromium => {
            #[cfg(feature = "browser")]
            {
                let backend = ChromiumBackend::launch(&opts.session)
                    .await
                    .map_err(|err| ServerError::Backend(err.to_string()))?;
                Ok(Scraper::builder(backend).options(opts).build()?)
            }
            #[cfg(not(feature = "browser"))]
            Err(ServerError::Backend(
                "chromium backend requested but this build lacks the \"browser\" feature"
                    .to_string(),
            ))
        }
    }
}

/// Starts the HTTP server and blocks until it exits.
///
/// Initializes tracing, builds the configured rendering backend, and
/// serves the scrape API on the configured address.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    tracing_subscriber::fmt::init();

    info!("starting prensa server");
    info!("bind address: {}", config.bind_addr());

    let scraper = build_scraper(&config).await?;
    let state = AppState {
        scraper: Arc::new(scraper),
    };
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|err| ServerError::Serve(err.to_string()))?;

    Ok(())
}
