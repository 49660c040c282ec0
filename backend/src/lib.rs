//! Barista backend library.
//!
//! Exposes the router and its building blocks so the binary and the
//! integration tests assemble the service the same way.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod middleware;
pub mod services;

use std::sync::Arc;

use axum::Router;

use crate::auth::TokenVerifier;
use crate::config::ServerConfig;
use crate::database::DrinkStore;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub drinks: Arc<DrinkStore>,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(verifier: Arc<TokenVerifier>) -> Self {
        Self {
            drinks: Arc::new(DrinkStore::new()),
            verifier,
        }
    }
}

pub fn app(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .merge(api::drinks::routes::drinks_router(state.verifier.clone()))
        .fallback(errors::not_found)
        .method_not_allowed_fallback(errors::method_not_allowed)
        .layer(middleware::cors_layer(&server.cors_origins))
        .layer(middleware::trace_layer())
        .with_state(state)
}
