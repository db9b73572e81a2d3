use axum::{
    extract::State,
    middleware,
    routing::{delete, post},
    Json, Router,
};

use crate::controllers::data_controller::DataController;
use crate::dto::api_response::{ApiResponse, CountResponse};
use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Sample data management, admins only
pub fn create_data_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/seed-vehicles", post(seed_vehicles))
        .route("/seed-deals", post(seed_deals))
        .route("/clear-vehicles", delete(clear_vehicles))
        .route("/clear-deals", delete(clear_deals))
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

type CountResult = Result<Json<ApiResponse<CountResponse>>, AppError>;

async fn seed_vehicles(State(state): State<AppState>) -> CountResult {
    let controller = DataController::new(state.pool.clone());
    let count = controller.seed_vehicles().await?;
    Ok(Json(ApiResponse::success_with_message(
        count,
        "Sample vehicles created successfully".to_string(),
    )))
}

async fn seed_deals(State(state): State<AppState>) -> CountResult {
    let controller = DataController::new(state.pool.clone());
    let count = controller.seed_deals(&state.notifier).await?;
    Ok(Json(ApiResponse::success_with_message(
        count,
        "Sample deals created successfully".to_string(),
    )))
}

async fn clear_vehicles(State(state): State<AppState>) -> CountResult {
    let controller = DataController::new(state.pool.clone());
    let count = controller.clear_vehicles().await?;
    Ok(Json(ApiResponse::success_with_message(
        count,
        "All vehicles deleted successfully".to_string(),
    )))
}

async fn clear_deals(State(state): State<AppState>) -> CountResult {
    let controller = DataController::new(state.pool.clone());
    let count = controller.clear_deals().await?;
    Ok(Json(ApiResponse::success_with_message(
        count,
        "All deals deleted successfully".to_string(),
    )))
}
