//! Deal aggregation
//!
//! Derives the sales dashboard figures from a plain list of deals. Only
//! completed deals whose completion date falls in the requested year are
//! counted; records with missing or malformed dates are skipped without
//! error. Everything here is a pure function of its input.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::analytics::{
    CategoryShare, DealerPerformance, InventoryShare, MonthlySales, RevenueMetrics, SalesAnalytics,
    SalesReport, SalesTotals, TopMonth,
};
use crate::models::deal::{Deal, DealStatus};
use crate::models::vehicle::{Vehicle, VehicleCategory};

/// Share of the sale price assumed as purchase cost when a deal has none
pub const ESTIMATED_COST_RATE: Decimal = Decimal::from_parts(7, 0, 0, false, 1);

/// Label for deals that carry no vehicle category
pub const OTHER_CATEGORY: &str = "other";

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const TOP_MONTHS: usize = 3;

/// Parse a completion date in any of the accepted forms
pub fn parse_completed_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(datetime.date());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Purchase cost of a deal, imputed when unknown
pub fn estimated_cost(deal: &Deal) -> Decimal {
    deal.estimated_purchase_price
        .unwrap_or(deal.sale_price * ESTIMATED_COST_RATE)
}

/// Month index (0-based) a deal counts towards, if it counts at all
fn counted_month(deal: &Deal, year: i32) -> Option<usize> {
    if deal.status != DealStatus::Completed {
        return None;
    }
    let date = parse_completed_date(deal.completed_date.as_deref()?)?;
    (date.year() == year).then(|| date.month0() as usize)
}

fn category_label(category: Option<VehicleCategory>) -> &'static str {
    category.map(|c| c.as_str()).unwrap_or(OTHER_CATEGORY)
}

fn percentage(part: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(part) * 100.0 / f64::from(total)
}

/// `part / whole` as a percentage, 0 when `whole` is zero
fn ratio_percent(part: Decimal, whole: Decimal) -> f64 {
    if whole.is_zero() {
        return 0.0;
    }
    (part * Decimal::ONE_HUNDRED / whole).to_f64().unwrap_or(0.0)
}

fn growth_percent(previous: Decimal, recent: Decimal) -> f64 {
    ratio_percent(recent - previous, previous)
}

/// Aggregate a year of deals into monthly buckets, a category
/// distribution and summary totals
pub fn aggregate_deals(deals: &[Deal], year: i32) -> SalesAnalytics {
    let mut monthly: Vec<MonthlySales> = MONTH_LABELS
        .iter()
        .map(|label| MonthlySales {
            month: label.to_string(),
            revenue: Decimal::ZERO,
            cost: Decimal::ZERO,
            profit: Decimal::ZERO,
            units_sold: 0,
        })
        .collect();
    let mut category_units: HashMap<&'static str, u32> = HashMap::new();

    for deal in deals {
        let Some(month) = counted_month(deal, year) else {
            continue;
        };

        let bucket = &mut monthly[month];
        bucket.revenue += deal.sale_price;
        bucket.cost += estimated_cost(deal);
        bucket.units_sold += 1;

        *category_units.entry(category_label(deal.vehicle_category)).or_default() += 1;
    }

    for bucket in &mut monthly {
        bucket.profit = bucket.revenue - bucket.cost;
    }

    let units_total: u32 = category_units.values().sum();
    let vehicle_types = VehicleCategory::ALL
        .iter()
        .map(|c| c.as_str())
        .chain(std::iter::once(OTHER_CATEGORY))
        .filter_map(|label| {
            let units = category_units.get(label).copied().unwrap_or(0);
            (units > 0).then(|| CategoryShare {
                category: label.to_string(),
                units,
                percentage: percentage(units, units_total),
            })
        })
        .collect();

    let totals = summarize(&monthly);

    SalesAnalytics {
        year,
        monthly,
        vehicle_types,
        totals,
    }
}

/// [`aggregate_deals`] for the current UTC year
pub fn aggregate_for_current_year(deals: &[Deal]) -> SalesAnalytics {
    aggregate_deals(deals, Utc::now().year())
}

fn summarize(monthly: &[MonthlySales]) -> SalesTotals {
    let revenue: Decimal = monthly.iter().map(|m| m.revenue).sum();
    let cost: Decimal = monthly.iter().map(|m| m.cost).sum();
    let profit = revenue - cost;
    let units_sold: u32 = monthly.iter().map(|m| m.units_sold).sum();

    let average_sale_price = if units_sold == 0 {
        Decimal::ZERO
    } else {
        revenue / Decimal::from(units_sold)
    };

    let half = monthly.len() / 2;
    let (first, last) = monthly.split_at(half);

    SalesTotals {
        revenue,
        cost,
        profit,
        units_sold,
        profit_margin: ratio_percent(profit, revenue),
        average_sale_price,
        revenue_growth: growth_percent(sum_by(first, |m| m.revenue), sum_by(last, |m| m.revenue)),
        profit_growth: growth_percent(sum_by(first, |m| m.profit), sum_by(last, |m| m.profit)),
    }
}

fn sum_by(months: &[MonthlySales], field: impl Fn(&MonthlySales) -> Decimal) -> Decimal {
    months.iter().map(field).sum()
}

/// Best months by revenue. Months without revenue are left out and ties
/// keep calendar order.
pub fn top_months(monthly: &[MonthlySales], limit: usize) -> Vec<TopMonth> {
    let mut ranked: Vec<&MonthlySales> = monthly.iter().filter(|m| m.revenue > Decimal::ZERO).collect();
    ranked.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    ranked
        .into_iter()
        .take(limit)
        .map(|m| TopMonth {
            month: m.month.clone(),
            revenue: m.revenue,
        })
        .collect()
}

/// Sales per broker, best first. Deals without a broker are ignored;
/// brokers missing from `names` get a generated label.
pub fn dealer_performance(deals: &[Deal], names: &HashMap<Uuid, String>) -> Vec<DealerPerformance> {
    let mut per_broker: HashMap<Uuid, (Decimal, u32)> = HashMap::new();
    for deal in deals {
        if let Some(broker_id) = deal.broker_id {
            let entry = per_broker.entry(broker_id).or_default();
            entry.0 += deal.sale_price;
            entry.1 += 1;
        }
    }

    let mut performance: Vec<DealerPerformance> = per_broker
        .into_iter()
        .map(|(broker_id, (total_sales, deal_count))| DealerPerformance {
            broker_id,
            broker_name: names.get(&broker_id).cloned().unwrap_or_else(|| {
                let id = broker_id.simple().to_string();
                format!("Broker {}", &id[..8])
            }),
            total_sales,
            deal_count,
        })
        .collect();

    performance.sort_by(|a, b| {
        b.total_sales
            .cmp(&a.total_sales)
            .then_with(|| a.broker_name.cmp(&b.broker_name))
    });
    performance
}

/// Revenue figures over every deal on record, whatever its status
pub fn revenue_metrics(deals: &[Deal], year: i32) -> RevenueMetrics {
    let total_revenue: Decimal = deals.iter().map(|d| d.sale_price).sum();
    let total_commission: Decimal = deals.iter().map(|d| d.commission).sum();
    let deal_count = deals.len() as u32;

    RevenueMetrics {
        total_revenue,
        total_commission,
        average_deal_value: average(total_revenue, deal_count),
        deal_count,
        growth_rate: aggregate_deals(deals, year).totals.revenue_growth,
    }
}

/// Vehicles in stock per category. Sold vehicles are not counted.
pub fn inventory_distribution(vehicles: &[Vehicle]) -> Vec<InventoryShare> {
    let in_stock: Vec<&Vehicle> = vehicles.iter().filter(|v| !v.is_sold()).collect();
    let total = in_stock.len() as u32;

    VehicleCategory::ALL
        .iter()
        .filter_map(|category| {
            let count = in_stock.iter().filter(|v| v.category == *category).count() as u32;
            (count > 0).then(|| InventoryShare {
                category: category.as_str().to_string(),
                count,
                percentage: percentage(count, total),
            })
        })
        .collect()
}

/// Summary report over all deals and vehicles
pub fn sales_report(deals: &[Deal], vehicles: &[Vehicle], period: &str, year: i32) -> SalesReport {
    let total_revenue: Decimal = deals.iter().map(|d| d.sale_price).sum();
    let total_deals = deals.len() as u32;
    let analytics = aggregate_deals(deals, year);

    SalesReport {
        period: period.to_string(),
        generated_at: Utc::now(),
        total_deals,
        total_vehicles: vehicles.len() as u32,
        total_revenue,
        average_deal_value: average(total_revenue, total_deals),
        top_performing_months: top_months(&analytics.monthly, TOP_MONTHS),
    }
}

fn average(total: Decimal, count: u32) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}
