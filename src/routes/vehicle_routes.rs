use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use tracing::debug;
use uuid::Uuid;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::api_response::ApiResponse;
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, StatusSignalResponse, UpdateVehicleRequest, VehicleSearchQuery,
};
use crate::middleware::auth::{auth_middleware, seller_only_middleware, AuthenticatedUser};
use crate::models::vehicle::Vehicle;
use crate::services::sale_service::SaleOutcome;
use crate::services::vehicle_filter::FilterResult;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Multipart field carrying the image
const IMAGE_FIELD: &str = "file";

pub fn create_vehicle_router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(list_vehicles))
        .route("/search", get(search_vehicles))
        .route("/status-signal", get(status_signal))
        .route("/:id", get(get_vehicle));

    let sellers = Router::new()
        .route("/:id/mark-sold", post(mark_sold))
        .route_layer(middleware::from_fn(seller_only_middleware))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let authenticated = Router::new()
        .route("/", post(create_vehicle))
        .route("/:id", put(update_vehicle).delete(delete_vehicle))
        .route("/:id/upload-image", post(upload_image))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(sellers).merge(authenticated)
}

async fn list_vehicles(State(state): State<AppState>) -> Result<Json<Vec<Vehicle>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let vehicles = controller.list().await?;
    Ok(Json(vehicles))
}

async fn search_vehicles(
    State(state): State<AppState>,
    Query(query): Query<VehicleSearchQuery>,
) -> Result<Json<FilterResult>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let result = controller.search(query).await?;
    Ok(Json(result))
}

async fn status_signal(
    State(state): State<AppState>,
) -> Result<Json<StatusSignalResponse>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let signal = controller.status_signal(&state.notifier).await?;
    Ok(Json(signal))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vehicle>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let vehicle = controller.get_by_id(id).await?;
    Ok(Json(vehicle))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<Vehicle>), AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let vehicle = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<Json<Vehicle>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let vehicle = controller.update(id, request, &state.notifier).await?;
    Ok(Json(vehicle))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(ApiResponse::message("Vehicle deleted successfully".to_string())))
}

async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<Vehicle>, AppError> {
    let bad_upload = |e: axum::extract::multipart::MultipartError| {
        AppError::BadRequest(format!("Invalid multipart body: {}", e))
    };

    while let Some(field) = multipart.next_field().await.map_err(bad_upload)? {
        if field.name() != Some(IMAGE_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let bytes = field.bytes().await.map_err(bad_upload)?;
        let controller = VehicleController::new(state.pool.clone());
        let vehicle = controller.upload_image(id, &bytes).await?;
        return Ok(Json(vehicle));
    }

    Err(AppError::BadRequest(format!("Missing multipart field '{}'", IMAGE_FIELD)))
}

async fn mark_sold(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<SaleOutcome>, AppError> {
    let controller = VehicleController::new(state.pool.clone());
    let outcome = controller.mark_sold(id, user.broker_id(), &state.notifier).await?;
    Ok(Json(outcome))
}
