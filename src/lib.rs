//! RS Car Point back office
//!
//! Library half of the service: the axum API over PostgreSQL, a typed
//! client for it, and the pure services both sides share.

pub mod cache;
pub mod client;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use client::{ApiClient, ClientError};
pub use state::AppState;

/// Full application: API routes, request tracing and CORS
pub fn build_app(state: AppState) -> Router {
    let cors = middleware::cors::cors_layer(&state.config.cors_origins);

    routes::create_api_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
