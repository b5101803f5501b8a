//! HTTP surface for the article scraper.

pub mod auth;
pub mod config;
pub mod routes;
pub mod store;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use gleaner_core::{ScrapeConfig, Scraper};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{Authenticator, TokenAuthenticator};
use crate::config::ServerConfig;
use crate::store::Store;

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub scraper: Arc<Scraper>,
    pub auth: Arc<dyn Authenticator>,
    pub store: Arc<Store>,
}

impl AppState {
    pub fn new(scraper: Scraper, auth: Arc<dyn Authenticator>, store: Store) -> Self {
        Self { scraper: Arc::new(scraper), auth, store: Arc::new(store) }
    }

    /// State for `config` with the given store.
    pub fn from_config(config: &ServerConfig, store: Store) -> Self {
        let scraper = Scraper::with_config(ScrapeConfig::builder().timeout(config.fetch_timeout).build());
        let auth = Arc::new(TokenAuthenticator::new(config.api_tokens.clone()));
        Self::new(scraper, auth, store)
    }
}

pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/articles", post(routes::create_article))
        .route("/api/articles/scrape", post(routes::scrape_article))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
