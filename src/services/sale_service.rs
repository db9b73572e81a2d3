//! Mark-as-sold workflow
//!
//! Three independent steps, with no transaction around them: persist the
//! `Sold` status, try to record a completed deal, then notify. A failed
//! deal is logged and dropped; the status change is never rolled back and
//! the notification goes out either way.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use tracing::{info, warn};
use uuid::Uuid;

use super::deal_aggregator::ESTIMATED_COST_RATE;
use super::status_notifier::StatusNotifier;
use crate::dto::deal_dto::CreateDealRequest;
use crate::models::deal::{commission_for, Deal, DealStatus};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::repositories::deal_repository::{DealRepository, NewDeal};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::parse_date;

pub const SOLD_FROM_DASHBOARD_NOTE: &str = "Marked as sold from dashboard";

/// The two backend calls the workflow needs
#[async_trait]
pub trait SaleBackend: Send + Sync {
    type Error: fmt::Display + Send;

    async fn update_vehicle_status(
        &self,
        vehicle_id: Uuid,
        status: VehicleStatus,
    ) -> Result<Vehicle, Self::Error>;

    async fn create_deal(&self, request: CreateDealRequest) -> Result<Deal, Self::Error>;
}

/// Result of a sale: the updated vehicle and, if recorded, its deal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaleOutcome {
    pub vehicle: Vehicle,
    pub deal: Option<Deal>,
}

/// Completed deal for a vehicle sold at its listed price
pub fn sale_deal_request(vehicle: &Vehicle, completed_date: String) -> CreateDealRequest {
    CreateDealRequest {
        vehicle_id: vehicle.id,
        broker_id: None,
        sale_price: vehicle.price,
        estimated_purchase_price: Some(vehicle.price * ESTIMATED_COST_RATE),
        date: None,
        completed_date: Some(completed_date),
        status: Some(DealStatus::Completed),
        notes: Some(SOLD_FROM_DASHBOARD_NOTE.to_string()),
    }
}

/// Mark a vehicle sold.
///
/// Fails only when the status update fails, and then nothing is notified.
pub async fn mark_vehicle_sold<B: SaleBackend>(
    backend: &B,
    notifier: &StatusNotifier,
    vehicle_id: Uuid,
) -> Result<SaleOutcome, B::Error> {
    let vehicle = backend
        .update_vehicle_status(vehicle_id, VehicleStatus::Sold)
        .await?;

    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let deal = match backend.create_deal(sale_deal_request(&vehicle, today)).await {
        Ok(deal) => {
            info!("🧾 Deal {} recorded for {}", deal.id, vehicle.display_name());
            Some(deal)
        }
        Err(e) => {
            warn!("⚠️ Vehicle {} marked sold but deal creation failed: {}", vehicle_id, e);
            None
        }
    };

    notifier.notify(vehicle.id, VehicleStatus::Sold).await;

    Ok(SaleOutcome { vehicle, deal })
}

/// Server-side backend, straight on the repositories
pub struct RepositoryBackend {
    vehicles: VehicleRepository,
    deals: DealRepository,
    broker_id: Option<Uuid>,
}

impl RepositoryBackend {
    pub fn new(pool: PgPool) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone()),
            deals: DealRepository::new(pool),
            broker_id: None,
        }
    }

    /// Attribute deals without a broker to `broker_id`
    pub fn with_broker(mut self, broker_id: Option<Uuid>) -> Self {
        self.broker_id = broker_id;
        self
    }
}

#[async_trait]
impl SaleBackend for RepositoryBackend {
    type Error = AppError;

    async fn update_vehicle_status(
        &self,
        vehicle_id: Uuid,
        status: VehicleStatus,
    ) -> Result<Vehicle, AppError> {
        self.vehicles
            .update_status(vehicle_id, status)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &vehicle_id.to_string()))
    }

    async fn create_deal(&self, request: CreateDealRequest) -> Result<Deal, AppError> {
        let today = Utc::now().date_naive();
        let completed_date = request
            .completed_date
            .as_deref()
            .map(parse_date)
            .transpose()
            .map_err(|_| AppError::BadRequest("completedDate must be YYYY-MM-DD".to_string()))?;

        let row = self
            .deals
            .create(NewDeal {
                vehicle_id: request.vehicle_id,
                broker_id: request.broker_id.or(self.broker_id),
                sale_price: request.sale_price,
                estimated_purchase_price: request.estimated_purchase_price,
                commission: commission_for(request.sale_price),
                deal_date: today,
                completed_date,
                status: request.status.unwrap_or(DealStatus::Completed),
                notes: request.notes,
            })
            .await?;

        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct FakeError(&'static str);

    impl fmt::Display for FakeError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    struct FakeBackend {
        fail_status: bool,
        fail_deal: bool,
        deals: Mutex<Vec<CreateDealRequest>>,
    }

    impl FakeBackend {
        fn new(fail_status: bool, fail_deal: bool) -> Self {
            Self {
                fail_status,
                fail_deal,
                deals: Mutex::new(Vec::new()),
            }
        }
    }

    fn listed_vehicle(id: Uuid, status: VehicleStatus) -> Vehicle {
        Vehicle {
            id,
            make: "Honda".to_string(),
            model: "Vezel".to_string(),
            year: 2020,
            price: Decimal::new(6_500_000, 0),
            mileage: 25_000,
            fuel_type: "Hybrid".to_string(),
            transmission: "Auto".to_string(),
            category: Default::default(),
            status,
            condition: None,
            location: None,
            engine_capacity: None,
            manufacture_date: None,
            description: None,
            image_base64: None,
            created_at: None,
        }
    }

    #[async_trait]
    impl SaleBackend for FakeBackend {
        type Error = FakeError;

        async fn update_vehicle_status(
            &self,
            vehicle_id: Uuid,
            status: VehicleStatus,
        ) -> Result<Vehicle, FakeError> {
            if self.fail_status {
                return Err(FakeError("vehicle update rejected"));
            }
            Ok(listed_vehicle(vehicle_id, status))
        }

        async fn create_deal(&self, request: CreateDealRequest) -> Result<Deal, FakeError> {
            self.deals.lock().unwrap().push(request.clone());
            if self.fail_deal {
                return Err(FakeError("deal service down"));
            }
            Ok(Deal {
                id: Uuid::new_v4(),
                vehicle_id: request.vehicle_id,
                broker_id: None,
                sale_price: request.sale_price,
                estimated_purchase_price: request.estimated_purchase_price,
                commission: commission_for(request.sale_price),
                date: None,
                completed_date: request.completed_date,
                status: DealStatus::Completed,
                notes: request.notes,
                vehicle_category: None,
            })
        }
    }

    #[tokio::test]
    async fn test_sale_records_deal_and_notifies() {
        let backend = FakeBackend::new(false, false);
        let notifier = StatusNotifier::in_memory();
        let mut events = notifier.subscribe();
        let vehicle_id = Uuid::new_v4();

        let outcome = mark_vehicle_sold(&backend, &notifier, vehicle_id).await.unwrap();

        assert!(outcome.vehicle.is_sold());
        let deal = outcome.deal.unwrap();
        assert_eq!(deal.sale_price, Decimal::new(6_500_000, 0));
        assert_eq!(deal.estimated_purchase_price, Some(Decimal::new(4_550_000, 0)));
        assert_eq!(deal.notes.as_deref(), Some(SOLD_FROM_DASHBOARD_NOTE));

        let sent = backend.deals.lock().unwrap()[0].clone();
        assert_eq!(sent.status, Some(DealStatus::Completed));
        assert_eq!(
            sent.completed_date,
            Some(Utc::now().date_naive().format("%Y-%m-%d").to_string())
        );

        assert_eq!(events.recv().await.unwrap().vehicle_id, vehicle_id);
    }

    #[tokio::test]
    async fn test_failed_deal_still_notifies() {
        let backend = FakeBackend::new(false, true);
        let notifier = StatusNotifier::in_memory();
        let mut events = notifier.subscribe();

        let outcome = mark_vehicle_sold(&backend, &notifier, Uuid::new_v4()).await.unwrap();

        assert!(outcome.deal.is_none());
        assert!(outcome.vehicle.is_sold());
        assert_eq!(events.recv().await.unwrap().status, VehicleStatus::Sold);
        assert!(notifier.last_signal().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failed_status_update_propagates_without_notifying() {
        let backend = FakeBackend::new(true, false);
        let notifier = StatusNotifier::in_memory();
        let mut events = notifier.subscribe();

        let result = mark_vehicle_sold(&backend, &notifier, Uuid::new_v4()).await;

        assert_eq!(result.unwrap_err().to_string(), "vehicle update rejected");
        assert!(backend.deals.lock().unwrap().is_empty());
        assert!(events.try_recv().is_err());
        assert!(notifier.last_signal().await.unwrap().is_none());
    }
}
