//! Invariants of the pure search and aggregation functions over a
//! generated inventory.

use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use rs_car_point::models::deal::{commission_for, Deal, DealStatus};
use rs_car_point::models::vehicle::{Vehicle, VehicleCategory, VehicleStatus};
use rs_car_point::services::deal_aggregator::{aggregate_deals, dealer_performance, revenue_metrics};
use rs_car_point::services::vehicle_filter::{Criterion, PriceBucket};
use rs_car_point::services::{filter_vehicles, FilterCriteria, SortKey};

const MAKES: [&str; 4] = ["Toyota", "Honda", "Suzuki", "Nissan"];
const FUELS: [&str; 3] = ["Petrol", "Hybrid", "Electric"];
const CATEGORIES: [&str; 4] = ["car", "bike", "scooter", "three-wheeler"];
const STATUSES: [&str; 3] = ["available", "reserved", "sold"];

fn inventory() -> Vec<Vehicle> {
    (0..48)
        .map(|i: i64| {
            serde_json::from_value(json!({
                "id": Uuid::new_v4(),
                "make": MAKES[(i % 4) as usize],
                "model": format!("Model {}", i % 5),
                "year": 2005 + (i * 7) % 20,
                "price": 500_000 + (i * 733_333) % 14_000_000,
                "mileage": (i * 9_871) % 120_000,
                "fuelType": FUELS[(i % 3) as usize],
                "transmission": if i % 2 == 0 { "Automatic" } else { "Manual" },
                "category": CATEGORIES[((i / 3) % 4) as usize],
                "status": STATUSES[((i / 5) % 3) as usize],
                "location": "Colombo"
            }))
            .unwrap()
        })
        .collect()
}

#[test]
fn test_filter_partitions_the_inventory() {
    let vehicles = inventory();
    let criteria = FilterCriteria {
        category: Criterion::Only(VehicleCategory::Car),
        price_range: Criterion::Only(PriceBucket::From2mTo5m),
        status: Criterion::Only(VehicleStatus::Available),
        ..FilterCriteria::default()
    };

    let result = filter_vehicles(&vehicles, &criteria, None);

    assert!(result.filters_active);
    assert_eq!(result.total, result.vehicles.len());
    assert_eq!(result.is_empty, result.vehicles.is_empty());

    let kept: Vec<Uuid> = result.vehicles.iter().map(|v| v.id).collect();
    for vehicle in &vehicles {
        assert_eq!(criteria.matches(vehicle), kept.contains(&vehicle.id));
    }

    // Without a sort key the input order survives
    let positions: Vec<usize> = kept
        .iter()
        .map(|id| vehicles.iter().position(|v| v.id == *id).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_sort_is_monotonic_and_stable() {
    let vehicles = inventory();
    let result = filter_vehicles(&vehicles, &FilterCriteria::default(), Some(SortKey::YearDesc));

    assert!(!result.filters_active);
    assert_eq!(result.total, vehicles.len());

    for pair in result.vehicles.windows(2) {
        assert!(pair[0].year >= pair[1].year);
        if pair[0].year == pair[1].year {
            let first = vehicles.iter().position(|v| v.id == pair[0].id).unwrap();
            let second = vehicles.iter().position(|v| v.id == pair[1].id).unwrap();
            assert!(first < second, "ties keep their original order");
        }
    }
}

fn deals() -> Vec<Deal> {
    let brokers = [Uuid::new_v4(), Uuid::new_v4()];

    (0..30)
        .map(|i: i64| {
            let price = Decimal::from(1_000_000 + i * 250_000);
            let status = match i % 4 {
                0 => DealStatus::Pending,
                3 => DealStatus::Rejected,
                _ => DealStatus::Completed,
            };
            let completed_date = match i % 7 {
                0 => None,
                1 => Some("not a date".to_string()),
                2 => Some(format!("2023-{:02}-10", i % 12 + 1)),
                _ => Some(format!("2024-{:02}-{:02}T10:00:00", i % 12 + 1, i % 28 + 1)),
            };

            Deal {
                id: Uuid::new_v4(),
                vehicle_id: Uuid::new_v4(),
                broker_id: (i % 3 != 0).then(|| brokers[(i % 2) as usize]),
                sale_price: price,
                estimated_purchase_price: (i % 2 == 0).then(|| price * Decimal::new(6, 1)),
                commission: commission_for(price),
                date: None,
                completed_date,
                status,
                notes: None,
                vehicle_category: None,
            }
        })
        .collect()
}

#[test]
fn test_aggregate_totals_match_monthly_buckets() {
    let deals = deals();
    let analytics = aggregate_deals(&deals, 2024);

    assert_eq!(analytics.monthly.len(), 12);

    let revenue: Decimal = analytics.monthly.iter().map(|m| m.revenue).sum();
    let units: u32 = analytics.monthly.iter().map(|m| m.units_sold).sum();
    assert_eq!(analytics.totals.revenue, revenue);
    assert_eq!(analytics.totals.units_sold, units);

    for month in &analytics.monthly {
        assert_eq!(month.profit, month.revenue - month.cost);
        if month.units_sold == 0 {
            assert_eq!(month.revenue, Decimal::ZERO);
        }
    }
    assert_eq!(analytics.totals.profit, analytics.totals.revenue - analytics.totals.cost);

    let category_units: u32 = analytics.vehicle_types.iter().map(|c| c.units).sum();
    assert_eq!(category_units, units);

    let expected_units = deals
        .iter()
        .filter(|d| d.status == DealStatus::Completed)
        .filter(|d| d.completed_date.as_deref().is_some_and(|c| c.starts_with("2024-")))
        .count() as u32;
    assert_eq!(units, expected_units);
}

#[test]
fn test_broker_and_revenue_figures_cover_their_deals() {
    let deals = deals();

    let performance = dealer_performance(&deals, &Default::default());
    let attributed: Decimal = deals
        .iter()
        .filter(|d| d.broker_id.is_some())
        .map(|d| d.sale_price)
        .sum();
    assert_eq!(performance.len(), 2);
    assert_eq!(performance.iter().map(|p| p.total_sales).sum::<Decimal>(), attributed);
    assert!(performance[0].total_sales >= performance[1].total_sales);

    let metrics = revenue_metrics(&deals, 2024);
    assert_eq!(metrics.deal_count, deals.len() as u32);
    assert_eq!(
        metrics.total_commission,
        metrics.total_revenue * Decimal::new(2, 1)
    );
}
