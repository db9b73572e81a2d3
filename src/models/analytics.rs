//! Analytics models
//!
//! Aggregates derived from deals and inventory for the admin dashboard.
//! None of these are stored; they are recomputed on demand.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One calendar month of sales
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySales {
    /// Short month name, "Jan" to "Dec"
    pub month: String,
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
    pub units_sold: u32,
}

/// Units sold for one vehicle category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    /// Category wire name, or "other" for deals without one
    #[serde(rename = "type")]
    pub category: String,
    pub units: u32,
    pub percentage: f64,
}

/// Headline figures for the summary cards
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesTotals {
    pub revenue: Decimal,
    pub cost: Decimal,
    pub profit: Decimal,
    pub units_sold: u32,
    pub profit_margin: f64,
    pub average_sale_price: Decimal,
    /// Last six months against the first six, in percent
    pub revenue_growth: f64,
    pub profit_growth: f64,
}

/// Full sales picture for one year
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesAnalytics {
    pub year: i32,
    pub monthly: Vec<MonthlySales>,
    pub vehicle_types: Vec<CategoryShare>,
    pub totals: SalesTotals,
}

/// Inventory count for one vehicle category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryShare {
    #[serde(rename = "type")]
    pub category: String,
    pub count: u32,
    pub percentage: f64,
}

/// Sales attributed to one broker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DealerPerformance {
    pub broker_id: Uuid,
    pub broker_name: String,
    pub total_sales: Decimal,
    pub deal_count: u32,
}

/// Revenue metrics over every deal on record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RevenueMetrics {
    pub total_revenue: Decimal,
    pub total_commission: Decimal,
    pub average_deal_value: Decimal,
    pub deal_count: u32,
    pub growth_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopMonth {
    pub month: String,
    pub revenue: Decimal,
}

/// Printable summary report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub period: String,
    pub generated_at: DateTime<Utc>,
    pub total_deals: u32,
    pub total_vehicles: u32,
    pub total_revenue: Decimal,
    pub average_deal_value: Decimal,
    pub top_performing_months: Vec<TopMonth>,
}
