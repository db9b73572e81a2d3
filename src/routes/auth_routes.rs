use axum::{extract::State, routing::post, Json, Router};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterBrokerRequest};
use crate::models::user::UserResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register-broker", post(register_broker))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.jwt_config());
    let response = controller.login(request).await?;
    Ok(Json(response))
}

async fn register_broker(
    State(state): State<AppState>,
    Json(request): Json<RegisterBrokerRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let controller = AuthController::new(state.pool.clone(), state.jwt_config());
    let response = controller.register_broker(request).await?;
    Ok(Json(response))
}
