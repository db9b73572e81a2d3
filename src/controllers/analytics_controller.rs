use chrono::{Datelike, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::dto::analytics_dto::AnalyticsQuery;
use crate::models::analytics::{
    DealerPerformance, InventoryShare, RevenueMetrics, SalesAnalytics, SalesReport,
};
use crate::models::deal::Deal;
use crate::models::user::UserRole;
use crate::repositories::deal_repository::DealRepository;
use crate::repositories::user_repository::UserRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::deal_aggregator;
use crate::utils::errors::AppError;

/// Dashboard figures, computed from the stored deals and vehicles
pub struct AnalyticsController {
    deals: DealRepository,
    vehicles: VehicleRepository,
    users: UserRepository,
}

impl AnalyticsController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            deals: DealRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    async fn all_deals(&self) -> Result<Vec<Deal>, AppError> {
        let rows = self.deals.find_all(None).await?;
        Ok(rows.into_iter().map(Deal::from).collect())
    }

    fn year(query: &AnalyticsQuery) -> i32 {
        query.year.unwrap_or_else(|| Utc::now().year())
    }

    pub async fn sales(&self, query: &AnalyticsQuery) -> Result<SalesAnalytics, AppError> {
        let deals = self.all_deals().await?;
        Ok(deal_aggregator::aggregate_deals(&deals, Self::year(query)))
    }

    pub async fn vehicle_types(&self) -> Result<Vec<InventoryShare>, AppError> {
        let vehicles = self.vehicles.find_all().await?;
        Ok(deal_aggregator::inventory_distribution(&vehicles))
    }

    pub async fn dealer_performance(&self) -> Result<Vec<DealerPerformance>, AppError> {
        let deals = self.all_deals().await?;
        let names: HashMap<Uuid, String> = self
            .users
            .find_by_role(UserRole::Broker)
            .await?
            .into_iter()
            .map(|user| (user.id, user.name))
            .collect();

        Ok(deal_aggregator::dealer_performance(&deals, &names))
    }

    pub async fn revenue(&self, query: &AnalyticsQuery) -> Result<RevenueMetrics, AppError> {
        let deals = self.all_deals().await?;
        Ok(deal_aggregator::revenue_metrics(&deals, Self::year(query)))
    }

    pub async fn report(&self, query: &AnalyticsQuery) -> Result<SalesReport, AppError> {
        let deals = self.all_deals().await?;
        let vehicles = self.vehicles.find_all().await?;

        Ok(deal_aggregator::sales_report(
            &deals,
            &vehicles,
            &query.period_label(),
            Self::year(query),
        ))
    }
}
