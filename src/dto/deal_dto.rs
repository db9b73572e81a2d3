use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::deal::DealStatus;
use crate::utils::validation::{validate_amount, validate_date};

/// New deal. The commission is always computed server-side.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDealRequest {
    pub vehicle_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker_id: Option<Uuid>,
    #[validate(custom = "validate_amount")]
    pub sale_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_amount")]
    pub estimated_purchase_price: Option<Decimal>,
    /// `YYYY-MM-DD`, today when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_date")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_date")]
    pub completed_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DealStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial deal update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDealRequest {
    pub broker_id: Option<Uuid>,
    #[validate(custom = "validate_amount")]
    pub sale_price: Option<Decimal>,
    #[validate(custom = "validate_amount")]
    pub estimated_purchase_price: Option<Decimal>,
    #[validate(custom = "validate_date")]
    pub completed_date: Option<String>,
    pub status: Option<DealStatus>,
    pub notes: Option<String>,
}

/// Query string of `GET /api/deals`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealQuery {
    pub broker_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_deal_wire_shape() {
        let request = CreateDealRequest {
            vehicle_id: Uuid::nil(),
            broker_id: None,
            sale_price: Decimal::new(1_000_000, 0),
            estimated_purchase_price: Some(Decimal::new(700_000, 0)),
            date: None,
            completed_date: Some("2024-03-01".to_string()),
            status: Some(DealStatus::Completed),
            notes: None,
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["status"], "completed");
        assert_eq!(body["completedDate"], "2024-03-01");
        assert!(body.get("brokerId").is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_deal_rejects_bad_date() {
        let request: CreateDealRequest = serde_json::from_value(json!({
            "vehicleId": Uuid::nil(),
            "salePrice": 500000,
            "completedDate": "03/01/2024"
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("completed_date"));
    }
}
