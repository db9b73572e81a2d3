use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::utils::errors::AppError;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, make, model, year, price, mileage, fuel_type, transmission, category, status,
                condition, location, engine_capacity, manufacture_date, description, image_base64, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.make.trim())
        .bind(request.model.trim())
        .bind(request.year)
        .bind(request.price)
        .bind(request.mileage)
        .bind(request.fuel_type)
        .bind(request.transmission)
        .bind(request.category.unwrap_or_default())
        .bind(request.status.unwrap_or_default())
        .bind(request.condition)
        .bind(request.location)
        .bind(request.engine_capacity)
        .bind(request.manufacture_date)
        .bind(request.description)
        .bind(request.image_base64)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    /// Newest listings first
    pub async fn find_all(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles ORDER BY created_at DESC NULLS LAST",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehicles WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    /// Partial update; `None` fields keep the stored value
    pub async fn update(
        &self,
        id: Uuid,
        changes: UpdateVehicleRequest,
    ) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles SET
                make = COALESCE($2, make),
                model = COALESCE($3, model),
                year = COALESCE($4, year),
                price = COALESCE($5, price),
                mileage = COALESCE($6, mileage),
                fuel_type = COALESCE($7, fuel_type),
                transmission = COALESCE($8, transmission),
                category = COALESCE($9, category),
                status = COALESCE($10, status),
                condition = COALESCE($11, condition),
                location = COALESCE($12, location),
                engine_capacity = COALESCE($13, engine_capacity),
                manufacture_date = COALESCE($14, manufacture_date),
                description = COALESCE($15, description),
                image_base64 = COALESCE($16, image_base64)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.make)
        .bind(changes.model)
        .bind(changes.year)
        .bind(changes.price)
        .bind(changes.mileage)
        .bind(changes.fuel_type)
        .bind(changes.transmission)
        .bind(changes.category)
        .bind(changes.status)
        .bind(changes.condition)
        .bind(changes.location)
        .bind(changes.engine_capacity)
        .bind(changes.manufacture_date)
        .bind(changes.description)
        .bind(changes.image_base64)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: VehicleStatus,
    ) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn set_image(&self, id: Uuid, image_base64: String) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET image_base64 = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(image_base64)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove every vehicle (and, by cascade, its deals)
    pub async fn delete_all(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM vehicles").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
