use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::deal_dto::{CreateDealRequest, UpdateDealRequest};
use crate::models::deal::{commission_for, Deal, DealStatus};
use crate::models::user::UserRole;
use crate::models::vehicle::VehicleStatus;
use crate::repositories::deal_repository::{DealChanges, DealRepository, NewDeal};
use crate::repositories::user_repository::UserRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::status_notifier::StatusNotifier;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::validation::parse_date;

pub struct DealController {
    deals: DealRepository,
    vehicles: VehicleRepository,
    users: UserRepository,
}

fn parse_optional_date(value: Option<&str>, field: &str) -> Result<Option<NaiveDate>, AppError> {
    value
        .map(parse_date)
        .transpose()
        .map_err(|_| AppError::BadRequest(format!("{} must be a YYYY-MM-DD date", field)))
}

fn known_status(status: Option<DealStatus>) -> Result<Option<DealStatus>, AppError> {
    match status {
        Some(DealStatus::Unknown) => Err(AppError::BadRequest(
            "status must be one of pending, approved, completed, rejected".to_string(),
        )),
        other => Ok(other),
    }
}

impl DealController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            deals: DealRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }

    pub async fn list(&self, broker_id: Option<Uuid>) -> Result<Vec<Deal>, AppError> {
        let rows = self.deals.find_all(broker_id).await?;
        Ok(rows.into_iter().map(Deal::from).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Deal, AppError> {
        self.deals
            .find_by_id(id)
            .await?
            .map(Deal::from)
            .ok_or_else(|| not_found_error("Deal", &id.to_string()))
    }

    async fn ensure_broker(&self, broker_id: Uuid) -> Result<(), AppError> {
        match self.users.find_by_id(broker_id).await? {
            Some(user) if user.role == UserRole::Broker => Ok(()),
            Some(_) => Err(AppError::BadRequest(format!("User {} is not a broker", broker_id))),
            None => Err(AppError::BadRequest(format!("Broker {} does not exist", broker_id))),
        }
    }

    /// Record a deal. `default_broker` is used when the request names none.
    pub async fn create(
        &self,
        request: CreateDealRequest,
        default_broker: Option<Uuid>,
    ) -> Result<Deal, AppError> {
        request.validate()?;
        let status = known_status(request.status)?.unwrap_or_default();

        if !self.vehicles.exists(request.vehicle_id).await? {
            return Err(AppError::BadRequest(format!(
                "Vehicle {} does not exist",
                request.vehicle_id
            )));
        }

        let broker_id = request.broker_id.or(default_broker);
        if let Some(broker_id) = request.broker_id {
            self.ensure_broker(broker_id).await?;
        }

        let today = Utc::now().date_naive();
        let deal_date = parse_optional_date(request.date.as_deref(), "date")?.unwrap_or(today);
        let mut completed_date =
            parse_optional_date(request.completed_date.as_deref(), "completedDate")?;
        if status == DealStatus::Completed && completed_date.is_none() {
            completed_date = Some(today);
        }

        let row = self
            .deals
            .create(NewDeal {
                vehicle_id: request.vehicle_id,
                broker_id,
                sale_price: request.sale_price,
                estimated_purchase_price: request.estimated_purchase_price,
                commission: commission_for(request.sale_price),
                deal_date,
                completed_date,
                status,
                notes: request.notes,
            })
            .await?;

        info!("🧾 Deal {} created ({}) for vehicle {}", row.id, row.status, row.vehicle_id);

        Ok(row.into())
    }

    /// Partial update. Completing a deal sells its vehicle.
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateDealRequest,
        notifier: &StatusNotifier,
    ) -> Result<Deal, AppError> {
        request.validate()?;
        let status = known_status(request.status)?;

        if let Some(broker_id) = request.broker_id {
            self.ensure_broker(broker_id).await?;
        }

        let existing = self.get_by_id(id).await?;
        let completing =
            status == Some(DealStatus::Completed) && existing.status != DealStatus::Completed;

        let mut completed_date =
            parse_optional_date(request.completed_date.as_deref(), "completedDate")?;
        if completing && completed_date.is_none() && existing.completed_date.is_none() {
            completed_date = Some(Utc::now().date_naive());
        }

        let changes = DealChanges {
            broker_id: request.broker_id,
            sale_price: request.sale_price,
            estimated_purchase_price: request.estimated_purchase_price,
            commission: request.sale_price.map(commission_for),
            completed_date,
            status,
            notes: request.notes,
        };

        let deal: Deal = self
            .deals
            .update(id, changes)
            .await?
            .ok_or_else(|| not_found_error("Deal", &id.to_string()))?
            .into();

        if completing {
            self.sell_vehicle(&deal, notifier).await?;
        }

        Ok(deal)
    }

    /// Move a deal to `status`. Completion also sells its vehicle.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: DealStatus,
        notifier: &StatusNotifier,
    ) -> Result<Deal, AppError> {
        let completed_date = (status == DealStatus::Completed).then(|| Utc::now().date_naive());

        let deal: Deal = self
            .deals
            .set_status(id, status, completed_date)
            .await?
            .ok_or_else(|| not_found_error("Deal", &id.to_string()))?
            .into();

        info!("🧾 Deal {} is now {}", deal.id, deal.status);

        if status == DealStatus::Completed {
            self.sell_vehicle(&deal, notifier).await?;
        }

        Ok(deal)
    }

    async fn sell_vehicle(&self, deal: &Deal, notifier: &StatusNotifier) -> Result<(), AppError> {
        match self
            .vehicles
            .update_status(deal.vehicle_id, VehicleStatus::Sold)
            .await?
        {
            Some(vehicle) => {
                notifier.notify(vehicle.id, VehicleStatus::Sold).await;
            }
            None => warn!("⚠️ Deal {} completed but vehicle {} is gone", deal.id, deal.vehicle_id),
        }

        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.deals.delete(id).await? {
            return Err(not_found_error("Deal", &id.to_string()));
        }

        info!("🗑️ Deal deleted: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_is_rejected() {
        assert!(known_status(Some(DealStatus::Unknown)).is_err());
        assert_eq!(known_status(Some(DealStatus::Approved)).unwrap(), Some(DealStatus::Approved));
        assert_eq!(known_status(None).unwrap(), None);
    }

    #[test]
    fn test_optional_date_parsing() {
        assert_eq!(
            parse_optional_date(Some("2024-03-01"), "date").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(parse_optional_date(None, "date").unwrap(), None);
        let err = parse_optional_date(Some("01/03/2024"), "completedDate").unwrap_err();
        assert!(err.to_string().contains("completedDate"));
    }
}
