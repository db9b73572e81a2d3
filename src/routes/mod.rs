//! HTTP routes
//!
//! Every router is mounted under `/api`. Protected routers get the JWT
//! middleware through `route_layer`, so unknown paths still answer 404.

pub mod analytics_routes;
pub mod auth_routes;
pub mod data_routes;
pub mod deal_routes;
pub mod user_routes;
pub mod vehicle_routes;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

/// Main API router
pub fn create_api_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_routes::create_auth_router())
        .nest("/users", user_routes::create_user_router(state.clone()))
        .nest("/vehicles", vehicle_routes::create_vehicle_router(state.clone()))
        .nest("/deals", deal_routes::create_deal_router(state.clone()))
        .nest("/analytics", analytics_routes::create_analytics_router(state.clone()))
        .nest("/data", data_routes::create_data_router(state.clone()));

    Router::new().nest("/api", api).with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
