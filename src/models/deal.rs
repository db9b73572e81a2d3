//! Deal model
//!
//! A deal records the sale of one vehicle. `DealRow` maps the `deals`
//! table joined with the vehicle category; `Deal` is the wire shape.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use uuid::Uuid;

use super::vehicle::VehicleCategory;

/// Broker commission, as a fraction of the sale price
pub const COMMISSION_RATE: Decimal = Decimal::from_parts(2, 0, 0, false, 1);

/// Deal lifecycle - maps to ENUM deal_status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "deal_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    #[default]
    Pending,
    Approved,
    Completed,
    Rejected,
    /// Any value this build does not know about
    #[serde(other)]
    Unknown,
}

impl DealStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStatus::Pending => "pending",
            DealStatus::Approved => "approved",
            DealStatus::Completed => "completed",
            DealStatus::Rejected => "rejected",
            DealStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deal as exchanged over the API.
///
/// `completed_date` stays a string: records coming from other backends may
/// carry malformed dates, which consumers are expected to skip rather than
/// reject.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    #[serde(default)]
    pub broker_id: Option<Uuid>,
    pub sale_price: Decimal,
    #[serde(default)]
    pub estimated_purchase_price: Option<Decimal>,
    #[serde(default)]
    pub commission: Decimal,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub completed_date: Option<String>,
    #[serde(default)]
    pub status: DealStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub vehicle_category: Option<VehicleCategory>,
}

/// Row of `deals` LEFT JOIN `vehicles`
#[derive(Debug, Clone, FromRow)]
pub struct DealRow {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub broker_id: Option<Uuid>,
    pub sale_price: Decimal,
    pub estimated_purchase_price: Option<Decimal>,
    pub commission: Decimal,
    pub deal_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
    pub status: DealStatus,
    pub notes: Option<String>,
    pub vehicle_category: Option<VehicleCategory>,
    pub created_at: DateTime<Utc>,
}

impl From<DealRow> for Deal {
    fn from(row: DealRow) -> Self {
        Self {
            id: row.id,
            vehicle_id: row.vehicle_id,
            broker_id: row.broker_id,
            sale_price: row.sale_price,
            estimated_purchase_price: row.estimated_purchase_price,
            commission: row.commission,
            date: Some(row.deal_date),
            completed_date: row.completed_date.map(|d| d.format("%Y-%m-%d").to_string()),
            status: row.status,
            notes: row.notes,
            vehicle_category: row.vehicle_category,
        }
    }
}

/// Commission owed to the broker for a sale
pub fn commission_for(sale_price: Decimal) -> Decimal {
    sale_price * COMMISSION_RATE
}
