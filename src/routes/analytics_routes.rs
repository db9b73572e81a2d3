use axum::{
    extract::{Query, State},
    middleware,
    routing::get,
    Json, Router,
};

use crate::controllers::analytics_controller::AnalyticsController;
use crate::dto::analytics_dto::AnalyticsQuery;
use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::models::analytics::{
    DealerPerformance, InventoryShare, RevenueMetrics, SalesAnalytics, SalesReport,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Dashboard analytics, admins only
pub fn create_analytics_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/sales", get(sales))
        .route("/vehicle-types", get(vehicle_types))
        .route("/dealer-performance", get(dealer_performance))
        .route("/revenue", get(revenue))
        .route("/report", get(report))
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn sales(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<SalesAnalytics>, AppError> {
    let controller = AnalyticsController::new(state.pool.clone());
    Ok(Json(controller.sales(&query).await?))
}

async fn vehicle_types(State(state): State<AppState>) -> Result<Json<Vec<InventoryShare>>, AppError> {
    let controller = AnalyticsController::new(state.pool.clone());
    Ok(Json(controller.vehicle_types().await?))
}

async fn dealer_performance(
    State(state): State<AppState>,
) -> Result<Json<Vec<DealerPerformance>>, AppError> {
    let controller = AnalyticsController::new(state.pool.clone());
    Ok(Json(controller.dealer_performance().await?))
}

async fn revenue(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<RevenueMetrics>, AppError> {
    let controller = AnalyticsController::new(state.pool.clone());
    Ok(Json(controller.revenue(&query).await?))
}

async fn report(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<SalesReport>, AppError> {
    let controller = AnalyticsController::new(state.pool.clone());
    Ok(Json(controller.report(&query).await?))
}
