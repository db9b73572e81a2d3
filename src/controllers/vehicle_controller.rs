use base64::{engine::general_purpose::STANDARD, Engine as _};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::vehicle_dto::{
    CreateVehicleRequest, StatusSignalResponse, UpdateVehicleRequest, VehicleSearchQuery,
};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::sale_service::{mark_vehicle_sold, RepositoryBackend, SaleOutcome};
use crate::services::status_notifier::StatusNotifier;
use crate::services::vehicle_filter::{filter_vehicles, FilterResult};
use crate::utils::errors::{not_found_error, AppError};

pub struct VehicleController {
    pool: PgPool,
    repository: VehicleRepository,
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn list(&self) -> Result<Vec<Vehicle>, AppError> {
        self.repository.find_all().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Vehicle, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))
    }

    /// Filter and sort the whole inventory
    pub async fn search(&self, query: VehicleSearchQuery) -> Result<FilterResult, AppError> {
        let vehicles = self.repository.find_all().await?;
        Ok(filter_vehicles(&vehicles, &query.criteria, query.sort))
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> Result<Vehicle, AppError> {
        request.validate()?;

        let vehicle = self.repository.create(request).await?;
        info!("🚗 Vehicle listed: {} ({})", vehicle.display_name(), vehicle.id);

        Ok(vehicle)
    }

    /// Partial update. Moving a vehicle into `Sold` notifies listeners.
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateVehicleRequest,
        notifier: &StatusNotifier,
    ) -> Result<Vehicle, AppError> {
        request.validate()?;

        let previous = self.get_by_id(id).await?;
        let vehicle = self
            .repository
            .update(id, request)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        if vehicle.is_sold() && !previous.is_sold() {
            notifier.notify(vehicle.id, VehicleStatus::Sold).await;
        }

        Ok(vehicle)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Vehicle", &id.to_string()));
        }

        info!("🗑️ Vehicle deleted: {}", id);
        Ok(())
    }

    /// Store an uploaded image as base64
    pub async fn upload_image(&self, id: Uuid, bytes: &[u8]) -> Result<Vehicle, AppError> {
        if bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }

        let encoded = STANDARD.encode(bytes);
        let vehicle = self
            .repository
            .set_image(id, encoded)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", &id.to_string()))?;

        info!("🖼️ Image attached to vehicle {} ({} bytes)", id, bytes.len());
        Ok(vehicle)
    }

    /// Run the sale workflow against the database
    pub async fn mark_sold(
        &self,
        id: Uuid,
        broker_id: Option<Uuid>,
        notifier: &StatusNotifier,
    ) -> Result<SaleOutcome, AppError> {
        let backend = RepositoryBackend::new(self.pool.clone()).with_broker(broker_id);
        mark_vehicle_sold(&backend, notifier, id).await
    }

    pub async fn status_signal(
        &self,
        notifier: &StatusNotifier,
    ) -> Result<StatusSignalResponse, AppError> {
        let last_changed = notifier.last_signal().await.unwrap_or_else(|e| {
            warn!("⚠️ Could not read status signal: {}", e);
            None
        });

        Ok(StatusSignalResponse { last_changed })
    }
}
