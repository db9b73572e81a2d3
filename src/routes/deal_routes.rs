use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::deal_controller::DealController;
use crate::dto::api_response::ApiResponse;
use crate::dto::deal_dto::{CreateDealRequest, DealQuery, UpdateDealRequest};
use crate::middleware::auth::{admin_only_middleware, auth_middleware, AuthenticatedUser};
use crate::models::deal::{Deal, DealStatus};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_deal_router(state: AppState) -> Router<AppState> {
    let authenticated = Router::new()
        .route("/", get(list_deals).post(create_deal))
        .route("/:id", get(get_deal))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin = Router::new()
        .route("/:id", put(update_deal).delete(delete_deal))
        .route("/:id/approve", put(approve_deal))
        .route("/:id/complete", put(complete_deal))
        .route("/:id/reject", put(reject_deal))
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    authenticated.merge(admin)
}

async fn list_deals(
    State(state): State<AppState>,
    Query(query): Query<DealQuery>,
) -> Result<Json<Vec<Deal>>, AppError> {
    let controller = DealController::new(state.pool.clone());
    let deals = controller.list(query.broker_id).await?;
    Ok(Json(deals))
}

async fn get_deal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deal>, AppError> {
    let controller = DealController::new(state.pool.clone());
    let deal = controller.get_by_id(id).await?;
    Ok(Json(deal))
}

async fn create_deal(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateDealRequest>,
) -> Result<(StatusCode, Json<Deal>), AppError> {
    let controller = DealController::new(state.pool.clone());
    let deal = controller.create(request, user.broker_id()).await?;
    Ok((StatusCode::CREATED, Json(deal)))
}

async fn update_deal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDealRequest>,
) -> Result<Json<Deal>, AppError> {
    let controller = DealController::new(state.pool.clone());
    let deal = controller.update(id, request, &state.notifier).await?;
    Ok(Json(deal))
}

async fn delete_deal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = DealController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(ApiResponse::message("Deal deleted successfully".to_string())))
}

async fn transition(state: AppState, id: Uuid, status: DealStatus) -> Result<Json<Deal>, AppError> {
    let controller = DealController::new(state.pool.clone());
    let deal = controller.set_status(id, status, &state.notifier).await?;
    Ok(Json(deal))
}

async fn approve_deal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deal>, AppError> {
    transition(state, id, DealStatus::Approved).await
}

async fn complete_deal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deal>, AppError> {
    transition(state, id, DealStatus::Completed).await
}

async fn reject_deal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deal>, AppError> {
    transition(state, id, DealStatus::Rejected).await
}
