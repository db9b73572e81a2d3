use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::deal::{DealRow, DealStatus};
use crate::utils::errors::AppError;

/// Deals joined with the category of their vehicle
const DEAL_SELECT: &str = r#"
    SELECT d.id, d.vehicle_id, d.broker_id, d.sale_price, d.estimated_purchase_price,
           d.commission, d.deal_date, d.completed_date, d.status, d.notes,
           v.category AS vehicle_category, d.created_at
    FROM deals d
    LEFT JOIN vehicles v ON v.id = d.vehicle_id
"#;

/// Fields of a new deal, commission already computed
#[derive(Debug, Clone)]
pub struct NewDeal {
    pub vehicle_id: Uuid,
    pub broker_id: Option<Uuid>,
    pub sale_price: Decimal,
    pub estimated_purchase_price: Option<Decimal>,
    pub commission: Decimal,
    pub deal_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
    pub status: DealStatus,
    pub notes: Option<String>,
}

/// Partial update of a stored deal
#[derive(Debug, Clone, Default)]
pub struct DealChanges {
    pub broker_id: Option<Uuid>,
    pub sale_price: Option<Decimal>,
    pub estimated_purchase_price: Option<Decimal>,
    pub commission: Option<Decimal>,
    pub completed_date: Option<NaiveDate>,
    pub status: Option<DealStatus>,
    pub notes: Option<String>,
}

pub struct DealRepository {
    pool: PgPool,
}

impl DealRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, deal: NewDeal) -> Result<DealRow, AppError> {
        let sql = format!(
            r#"
            WITH d AS (
                INSERT INTO deals (
                    id, vehicle_id, broker_id, sale_price, estimated_purchase_price, commission,
                    deal_date, completed_date, status, notes, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                RETURNING *
            )
            {}
            "#,
            DEAL_SELECT.replace("FROM deals d", "FROM d")
        );

        let row = sqlx::query_as::<_, DealRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(deal.vehicle_id)
            .bind(deal.broker_id)
            .bind(deal.sale_price)
            .bind(deal.estimated_purchase_price)
            .bind(deal.commission)
            .bind(deal.deal_date)
            .bind(deal.completed_date)
            .bind(deal.status)
            .bind(deal.notes)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DealRow>, AppError> {
        let sql = format!("{} WHERE d.id = $1", DEAL_SELECT);
        let row = sqlx::query_as::<_, DealRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// All deals, optionally only those of one broker, newest first
    pub async fn find_all(&self, broker_id: Option<Uuid>) -> Result<Vec<DealRow>, AppError> {
        let sql = format!(
            "{} WHERE ($1::uuid IS NULL OR d.broker_id = $1) ORDER BY d.deal_date DESC, d.created_at DESC",
            DEAL_SELECT
        );
        let rows = sqlx::query_as::<_, DealRow>(&sql)
            .bind(broker_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn update(&self, id: Uuid, changes: DealChanges) -> Result<Option<DealRow>, AppError> {
        let sql = format!(
            r#"
            WITH d AS (
                UPDATE deals SET
                    broker_id = COALESCE($2, broker_id),
                    sale_price = COALESCE($3, sale_price),
                    estimated_purchase_price = COALESCE($4, estimated_purchase_price),
                    commission = COALESCE($5, commission),
                    completed_date = COALESCE($6, completed_date),
                    status = COALESCE($7, status),
                    notes = COALESCE($8, notes)
                WHERE id = $1
                RETURNING *
            )
            {}
            "#,
            DEAL_SELECT.replace("FROM deals d", "FROM d")
        );

        let row = sqlx::query_as::<_, DealRow>(&sql)
            .bind(id)
            .bind(changes.broker_id)
            .bind(changes.sale_price)
            .bind(changes.estimated_purchase_price)
            .bind(changes.commission)
            .bind(changes.completed_date)
            .bind(changes.status)
            .bind(changes.notes)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Move a deal to `status`. `completed_date` only fills an empty date.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: DealStatus,
        completed_date: Option<NaiveDate>,
    ) -> Result<Option<DealRow>, AppError> {
        let sql = format!(
            r#"
            WITH d AS (
                UPDATE deals SET
                    status = $2,
                    completed_date = COALESCE(completed_date, $3)
                WHERE id = $1
                RETURNING *
            )
            {}
            "#,
            DEAL_SELECT.replace("FROM deals d", "FROM d")
        );

        let row = sqlx::query_as::<_, DealRow>(&sql)
            .bind(id)
            .bind(status)
            .bind(completed_date)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM deals WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_all(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM deals").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cte_select_reads_from_inserted_rows() {
        let select = DEAL_SELECT.replace("FROM deals d", "FROM d");
        assert!(select.contains("FROM d\n"));
        assert!(select.contains("LEFT JOIN vehicles v ON v.id = d.vehicle_id"));
        assert!(!select.contains("FROM deals"));
    }
}
