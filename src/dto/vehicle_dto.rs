use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::vehicle::{VehicleCategory, VehicleStatus};
use crate::services::vehicle_filter::{FilterCriteria, SortKey};
use crate::utils::validation::{validate_amount, validate_not_empty, validate_vehicle_year};

/// New vehicle listing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[validate(custom = "validate_not_empty")]
    pub make: String,
    #[validate(custom = "validate_not_empty")]
    pub model: String,
    #[validate(custom = "validate_vehicle_year")]
    pub year: i32,
    #[validate(custom = "validate_amount")]
    pub price: Decimal,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub mileage: i32,
    #[serde(default)]
    pub fuel_type: String,
    #[serde(default)]
    pub transmission: String,
    #[serde(default)]
    pub category: Option<VehicleCategory>,
    #[serde(default)]
    pub status: Option<VehicleStatus>,
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
    #[serde(default)]
    pub image_base64: Option<String>,
}

/// Partial vehicle update. Absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    #[validate(custom = "validate_not_empty")]
    pub make: Option<String>,
    #[validate(custom = "validate_not_empty")]
    pub model: Option<String>,
    #[validate(custom = "validate_vehicle_year")]
    pub year: Option<i32>,
    #[validate(custom = "validate_amount")]
    pub price: Option<Decimal>,
    #[validate(range(min = 0))]
    pub mileage: Option<i32>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub category: Option<VehicleCategory>,
    pub status: Option<VehicleStatus>,
    pub condition: Option<String>,
    pub location: Option<String>,
    pub engine_capacity: Option<String>,
    pub manufacture_date: Option<String>,
    pub description: Option<String>,
    pub image_base64: Option<String>,
}

impl UpdateVehicleRequest {
    /// Status-only update, as sent by the sale workflow
    pub fn status(status: VehicleStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

/// Query string of `GET /api/vehicles/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleSearchQuery {
    #[serde(flatten)]
    pub criteria: FilterCriteria,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortKey>,
}

/// Last status-change sentinel, if any change was recorded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusSignalResponse {
    pub last_changed: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::vehicle_filter::{Criterion, PriceBucket};
    use axum::extract::Query;
    use axum::http::Uri;
    use serde_json::json;

    #[test]
    fn test_create_vehicle_validation() {
        let request: CreateVehicleRequest = serde_json::from_value(json!({
            "make": "Toyota",
            "model": "Aqua",
            "year": 2018,
            "price": 4250000,
            "mileage": 45000,
            "fuelType": "Hybrid",
            "transmission": "Auto",
            "category": "car"
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let mut broken = request.clone();
        broken.make = "  ".to_string();
        broken.price = Decimal::new(-10, 0);
        broken.year = 1900;
        let errors = broken.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("make"));
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("year"));
    }

    #[test]
    fn test_status_only_update() {
        let update = UpdateVehicleRequest::status(VehicleStatus::Sold);
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body["status"], "Sold");
        assert!(body["price"].is_null());
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_search_query_from_uri() {
        let uri: Uri = "/api/vehicles/search?brand=Toyota&priceRange=2m-5m&category=all&sort=price-desc"
            .parse()
            .unwrap();
        let Query(query) = Query::<VehicleSearchQuery>::try_from_uri(&uri).unwrap();

        assert_eq!(query.criteria.brand, Criterion::Only("Toyota".to_string()));
        assert_eq!(query.criteria.price_range, Criterion::Only(PriceBucket::From2mTo5m));
        assert_eq!(query.criteria.category, Criterion::All);
        assert_eq!(query.sort, Some(SortKey::PriceDesc));
    }

    #[test]
    fn test_empty_search_query() {
        let uri: Uri = "/api/vehicles/search".parse().unwrap();
        let Query(query) = Query::<VehicleSearchQuery>::try_from_uri(&uri).unwrap();
        assert!(!query.criteria.is_active());
        assert!(query.sort.is_none());
    }
}
