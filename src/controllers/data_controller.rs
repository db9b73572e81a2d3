use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use crate::dto::api_response::CountResponse;
use crate::dto::vehicle_dto::CreateVehicleRequest;
use crate::models::deal::{commission_for, DealStatus};
use crate::models::user::UserRole;
use crate::models::vehicle::{VehicleCategory, VehicleStatus};
use crate::repositories::deal_repository::{DealRepository, NewDeal};
use crate::repositories::user_repository::UserRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::status_notifier::StatusNotifier;
use crate::utils::errors::AppError;

/// Sample deals get 5% off the listed price
const SEED_DISCOUNT: Decimal = Decimal::from_parts(95, 0, 0, false, 2);
const SEED_DEALS: usize = 3;
const SEED_DEAL_SPACING_DAYS: i64 = 5;

#[allow(clippy::too_many_arguments)]
fn sample_vehicle(
    make: &str,
    model: &str,
    year: i32,
    price: i64,
    mileage: i32,
    fuel_type: &str,
    engine_capacity: &str,
    condition: &str,
    description: &str,
) -> CreateVehicleRequest {
    CreateVehicleRequest {
        make: make.to_string(),
        model: model.to_string(),
        year,
        price: Decimal::new(price, 0),
        mileage,
        fuel_type: fuel_type.to_string(),
        transmission: "Auto".to_string(),
        category: Some(VehicleCategory::Car),
        status: Some(VehicleStatus::Available),
        condition: Some(condition.to_string()),
        location: Some("Colombo".to_string()),
        engine_capacity: Some(engine_capacity.to_string()),
        manufacture_date: None,
        description: Some(description.to_string()),
        image_base64: None,
    }
}

/// Demo inventory
pub fn sample_vehicles() -> Vec<CreateVehicleRequest> {
    vec![
        sample_vehicle(
            "Toyota",
            "Aqua",
            2018,
            4_250_000,
            45_000,
            "Hybrid",
            "1500cc",
            "Used",
            "Well maintained Toyota Aqua hybrid vehicle",
        ),
        sample_vehicle(
            "Honda",
            "Vezel",
            2020,
            6_500_000,
            25_000,
            "Hybrid",
            "1500cc",
            "Used",
            "Premium Honda Vezel with low mileage",
        ),
        sample_vehicle(
            "Suzuki",
            "Wagon R",
            2017,
            2_850_000,
            52_000,
            "Petrol",
            "1000cc",
            "Used",
            "Reliable family car with good fuel economy",
        ),
        sample_vehicle(
            "Nissan",
            "Leaf",
            2019,
            3_800_000,
            28_000,
            "Electric",
            "Electric",
            "Reconditioned",
            "Eco-friendly electric vehicle",
        ),
        sample_vehicle(
            "BMW",
            "X1",
            2021,
            8_500_000,
            15_000,
            "Petrol",
            "2000cc",
            "Brand New",
            "Luxury SUV with premium features",
        ),
    ]
}

/// Status of the `index`-th seeded deal
fn seed_status(index: usize) -> DealStatus {
    match index {
        0 => DealStatus::Completed,
        1 => DealStatus::Approved,
        _ => DealStatus::Pending,
    }
}

pub struct DataController {
    vehicles: VehicleRepository,
    deals: DealRepository,
    users: UserRepository,
}

impl DataController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            vehicles: VehicleRepository::new(pool.clone()),
            deals: DealRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    pub async fn seed_vehicles(&self) -> Result<CountResponse, AppError> {
        let mut count = 0;
        for request in sample_vehicles() {
            self.vehicles.create(request).await?;
            count += 1;
        }

        info!("🌱 Seeded {} vehicles", count);
        Ok(CountResponse { count })
    }

    /// A few deals over the first vehicles, attributed to the first broker.
    /// The completed one sells its vehicle.
    pub async fn seed_deals(&self, notifier: &StatusNotifier) -> Result<CountResponse, AppError> {
        let vehicles = self.vehicles.find_all().await?;
        if vehicles.is_empty() {
            return Err(AppError::BadRequest("Please seed vehicles first".to_string()));
        }

        let broker_id = self
            .users
            .find_by_role(UserRole::Broker)
            .await?
            .first()
            .map(|user| user.id);

        let today = Utc::now().date_naive();
        let mut count = 0;

        for (index, vehicle) in vehicles.iter().take(SEED_DEALS).enumerate() {
            let sale_price = vehicle.price * SEED_DISCOUNT;
            let deal_date = today - Duration::days(index as i64 * SEED_DEAL_SPACING_DAYS);
            let status = seed_status(index);

            self.deals
                .create(NewDeal {
                    vehicle_id: vehicle.id,
                    broker_id,
                    sale_price,
                    estimated_purchase_price: None,
                    commission: commission_for(sale_price),
                    deal_date,
                    completed_date: (status == DealStatus::Completed).then_some(deal_date),
                    status,
                    notes: None,
                })
                .await?;

            if status == DealStatus::Completed {
                self.vehicles.update_status(vehicle.id, VehicleStatus::Sold).await?;
                notifier.notify(vehicle.id, VehicleStatus::Sold).await;
            }
            count += 1;
        }

        info!("🌱 Seeded {} deals", count);
        Ok(CountResponse { count })
    }

    pub async fn clear_vehicles(&self) -> Result<CountResponse, AppError> {
        let count = self.vehicles.delete_all().await?;
        info!("🧹 Cleared {} vehicles", count);
        Ok(CountResponse { count })
    }

    pub async fn clear_deals(&self) -> Result<CountResponse, AppError> {
        let count = self.deals.delete_all().await?;
        info!("🧹 Cleared {} deals", count);
        Ok(CountResponse { count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_sample_vehicles_are_valid() {
        let samples = sample_vehicles();
        assert_eq!(samples.len(), 5);
        assert!(samples.iter().all(|v| v.validate().is_ok()));
    }

    #[test]
    fn test_seed_pricing_and_statuses() {
        assert_eq!(Decimal::new(1_000_000, 0) * SEED_DISCOUNT, Decimal::new(950_000, 0));
        assert_eq!(seed_status(0), DealStatus::Completed);
        assert_eq!(seed_status(1), DealStatus::Approved);
        assert_eq!(seed_status(2), DealStatus::Pending);
    }
}
