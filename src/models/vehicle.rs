//! Vehicle model
//!
//! The `Vehicle` struct maps one row of the `vehicles` table and is also the
//! JSON shape exchanged with API clients. Its category and status map to
//! the `vehicle_category` and `vehicle_status` PostgreSQL enums.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Kind of vehicle on the lot - maps to ENUM vehicle_category
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "vehicle_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VehicleCategory {
    #[default]
    Car,
    Bike,
    Scooter,
    #[sqlx(rename = "three-wheeler")]
    #[serde(rename = "three-wheeler")]
    ThreeWheeler,
}

impl VehicleCategory {
    /// All categories in display order
    pub const ALL: [VehicleCategory; 4] = [
        VehicleCategory::Car,
        VehicleCategory::Bike,
        VehicleCategory::Scooter,
        VehicleCategory::ThreeWheeler,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleCategory::Car => "car",
            VehicleCategory::Bike => "bike",
            VehicleCategory::Scooter => "scooter",
            VehicleCategory::ThreeWheeler => "three-wheeler",
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VehicleCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown vehicle category '{}'", s))
    }
}

/// Sales status of a vehicle - maps to ENUM vehicle_status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_status")]
pub enum VehicleStatus {
    #[default]
    #[serde(alias = "available")]
    Available,
    #[serde(alias = "reserved")]
    Reserved,
    #[serde(alias = "sold")]
    Sold,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "Available",
            VehicleStatus::Reserved => "Reserved",
            VehicleStatus::Sold => "Sold",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(VehicleStatus::Available),
            "reserved" => Ok(VehicleStatus::Reserved),
            "sold" => Ok(VehicleStatus::Sold),
            _ => Err(format!("unknown vehicle status '{}'", s)),
        }
    }
}

/// A vehicle listed by the dealership
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: Decimal,
    #[serde(default)]
    pub mileage: i32,
    #[serde(default)]
    pub fuel_type: String,
    #[serde(default)]
    pub transmission: String,
    #[serde(default)]
    pub category: VehicleCategory,
    #[serde(default)]
    pub status: VehicleStatus,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub engine_capacity: Option<String>,
    #[serde(default)]
    pub manufacture_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Vehicle {
    /// "2018 Toyota Aqua"
    pub fn display_name(&self) -> String {
        format!("{} {} {}", self.year, self.make, self.model)
    }

    pub fn is_sold(&self) -> bool {
        self.status == VehicleStatus::Sold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_wire_names() {
        assert_eq!(
            serde_json::to_value(VehicleCategory::ThreeWheeler).unwrap(),
            json!("three-wheeler")
        );
        let parsed: VehicleCategory = serde_json::from_value(json!("scooter")).unwrap();
        assert_eq!(parsed, VehicleCategory::Scooter);
        assert_eq!(
            "Three-Wheeler".parse::<VehicleCategory>(),
            Ok(VehicleCategory::ThreeWheeler)
        );
        assert!("truck".parse::<VehicleCategory>().is_err());
        assert_eq!("sold".parse::<VehicleStatus>(), Ok(VehicleStatus::Sold));
    }

    #[test]
    fn test_vehicle_from_sparse_json() {
        let vehicle: Vehicle = serde_json::from_value(json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "make": "Toyota",
            "model": "Aqua",
            "year": 2018,
            "price": 4250000,
            "status": "Sold"
        }))
        .unwrap();

        assert_eq!(vehicle.price, Decimal::new(4_250_000, 0));
        assert_eq!(vehicle.category, VehicleCategory::Car);
        assert!(vehicle.is_sold());
        assert_eq!(vehicle.display_name(), "2018 Toyota Aqua");
    }

    #[test]
    fn test_status_accepts_both_spellings() {
        for (raw, expected) in [
            ("Available", VehicleStatus::Available),
            ("available", VehicleStatus::Available),
            ("Reserved", VehicleStatus::Reserved),
            ("reserved", VehicleStatus::Reserved),
            ("Sold", VehicleStatus::Sold),
            ("sold", VehicleStatus::Sold),
        ] {
            let parsed: VehicleStatus = serde_json::from_value(json!(raw)).unwrap();
            assert_eq!(parsed, expected, "{}", raw);
        }

        assert_eq!(serde_json::to_value(VehicleStatus::Sold).unwrap(), json!("Sold"));
        assert!(serde_json::from_value::<VehicleStatus>(json!("SOLD")).is_err());
    }
}
