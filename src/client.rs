//! HTTP client for the RS Car Point API
//!
//! Typed wrapper over every REST endpoint. A 403 from the server always
//! surfaces as [`ClientError::PermissionDenied`] so callers can show a
//! permission message instead of a generic failure.

use async_trait::async_trait;
use reqwest::{multipart, Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::dto::analytics_dto::AnalyticsQuery;
use crate::dto::api_response::{ApiResponse, CountResponse};
use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterBrokerRequest};
use crate::dto::deal_dto::{CreateDealRequest, DealQuery, UpdateDealRequest};
use crate::dto::user_dto::{CreateUserRequest, UpdateUserRequest, UserQuery};
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, StatusSignalResponse, UpdateVehicleRequest, VehicleSearchQuery,
};
use crate::models::analytics::{
    DealerPerformance, InventoryShare, RevenueMetrics, SalesAnalytics, SalesReport,
};
use crate::models::deal::Deal;
use crate::models::user::{UserResponse, UserRole};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::services::analytics_view::AnalyticsSource;
use crate::services::sale_service::{SaleBackend, SaleOutcome};
use crate::services::vehicle_filter::FilterResult;

/// Environment variable holding the API base URL
pub const API_BASE_ENV: &str = "RS_CAR_POINT_API_BASE";
pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error for a non-2xx response. The message comes from the body's
/// `message` field when there is one.
pub fn error_for_status(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

    match status {
        StatusCode::FORBIDDEN => ClientError::PermissionDenied(message),
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        _ => ClientError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Typed client for every `/api` endpoint
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        // Trailing slash so joined paths stay under the base
        let normalized = format!("{}/", base_url.trim().trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| ClientError::Config(format!("invalid base URL '{}': {}", base_url, e)))?;

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Client for the base URL in `RS_CAR_POINT_API_BASE`
    pub fn from_env() -> Result<Self, ClientError> {
        let base = std::env::var(API_BASE_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self::new(&base)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::Config(format!("invalid path '{}': {}", path, e)))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.url(path)?;
        debug!("➡️ {} {}", method, url);

        let builder = self.client.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(error_for_status(status, &body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let response = Self::check(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn send<T: DeserializeOwned>(&self, method: Method, path: &str) -> Result<T, ClientError> {
        let response = self.request(method, path)?.send().await?;
        Self::decode(response).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self.request(method, path)?.json(body).send().await?;
        Self::decode(response).await
    }

    async fn send_query<Q: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, ClientError> {
        let response = self.request(Method::GET, path)?.query(query).send().await?;
        Self::decode(response).await
    }

    async fn send_empty(&self, method: Method, path: &str) -> Result<(), ClientError> {
        let response = self.request(method, path)?.send().await?;
        Self::check(response).await.map(|_| ())
    }

    // Auth

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send_json(Method::POST, "auth/login", &body).await
    }

    pub async fn register_broker(
        &self,
        request: &RegisterBrokerRequest,
    ) -> Result<UserResponse, ClientError> {
        self.send_json(Method::POST, "auth/register-broker", request).await
    }

    // Users

    pub async fn list_users(&self, role: Option<UserRole>) -> Result<Vec<UserResponse>, ClientError> {
        self.send_query("users", &UserQuery { role }).await
    }

    pub async fn get_user(&self, id: Uuid) -> Result<UserResponse, ClientError> {
        self.send(Method::GET, &format!("users/{}", id)).await
    }

    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<UserResponse, ClientError> {
        self.send_json(Method::POST, "users", request).await
    }

    pub async fn update_user(
        &self,
        id: Uuid,
        request: &UpdateUserRequest,
    ) -> Result<UserResponse, ClientError> {
        self.send_json(Method::PUT, &format!("users/{}", id), request).await
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<(), ClientError> {
        self.send_empty(Method::DELETE, &format!("users/{}", id)).await
    }

    // Vehicles

    pub async fn list_vehicles(&self) -> Result<Vec<Vehicle>, ClientError> {
        self.send(Method::GET, "vehicles").await
    }

    pub async fn search_vehicles(&self, query: &VehicleSearchQuery) -> Result<FilterResult, ClientError> {
        self.send_query("vehicles/search", query).await
    }

    pub async fn get_vehicle(&self, id: Uuid) -> Result<Vehicle, ClientError> {
        self.send(Method::GET, &format!("vehicles/{}", id)).await
    }

    pub async fn create_vehicle(&self, request: &CreateVehicleRequest) -> Result<Vehicle, ClientError> {
        self.send_json(Method::POST, "vehicles", request).await
    }

    pub async fn update_vehicle(
        &self,
        id: Uuid,
        request: &UpdateVehicleRequest,
    ) -> Result<Vehicle, ClientError> {
        self.send_json(Method::PUT, &format!("vehicles/{}", id), request).await
    }

    pub async fn delete_vehicle(&self, id: Uuid) -> Result<(), ClientError> {
        self.send_empty(Method::DELETE, &format!("vehicles/{}", id)).await
    }

    /// Upload an image as the multipart field `file`
    pub async fn upload_image(
        &self,
        id: Uuid,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Vehicle, ClientError> {
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .request(Method::POST, &format!("vehicles/{}/upload-image", id))?
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Server-side sale workflow
    pub async fn mark_sold(&self, id: Uuid) -> Result<SaleOutcome, ClientError> {
        self.send(Method::POST, &format!("vehicles/{}/mark-sold", id)).await
    }

    pub async fn status_signal(&self) -> Result<StatusSignalResponse, ClientError> {
        self.send(Method::GET, "vehicles/status-signal").await
    }

    // Deals

    pub async fn list_deals(&self, broker_id: Option<Uuid>) -> Result<Vec<Deal>, ClientError> {
        self.send_query("deals", &DealQuery { broker_id }).await
    }

    pub async fn get_deal(&self, id: Uuid) -> Result<Deal, ClientError> {
        self.send(Method::GET, &format!("deals/{}", id)).await
    }

    pub async fn create_deal(&self, request: &CreateDealRequest) -> Result<Deal, ClientError> {
        self.send_json(Method::POST, "deals", request).await
    }

    pub async fn update_deal(&self, id: Uuid, request: &UpdateDealRequest) -> Result<Deal, ClientError> {
        self.send_json(Method::PUT, &format!("deals/{}", id), request).await
    }

    pub async fn delete_deal(&self, id: Uuid) -> Result<(), ClientError> {
        self.send_empty(Method::DELETE, &format!("deals/{}", id)).await
    }

    pub async fn approve_deal(&self, id: Uuid) -> Result<Deal, ClientError> {
        self.send(Method::PUT, &format!("deals/{}/approve", id)).await
    }

    pub async fn complete_deal(&self, id: Uuid) -> Result<Deal, ClientError> {
        self.send(Method::PUT, &format!("deals/{}/complete", id)).await
    }

    pub async fn reject_deal(&self, id: Uuid) -> Result<Deal, ClientError> {
        self.send(Method::PUT, &format!("deals/{}/reject", id)).await
    }

    // Analytics

    pub async fn sales_analytics(&self, year: Option<i32>) -> Result<SalesAnalytics, ClientError> {
        let query = AnalyticsQuery { year, period: None };
        self.send_query("analytics/sales", &query).await
    }

    pub async fn vehicle_types(&self) -> Result<Vec<InventoryShare>, ClientError> {
        self.send(Method::GET, "analytics/vehicle-types").await
    }

    pub async fn dealer_performance(&self) -> Result<Vec<DealerPerformance>, ClientError> {
        self.send(Method::GET, "analytics/dealer-performance").await
    }

    pub async fn revenue_metrics(&self, year: Option<i32>) -> Result<RevenueMetrics, ClientError> {
        let query = AnalyticsQuery { year, period: None };
        self.send_query("analytics/revenue", &query).await
    }

    pub async fn sales_report(&self, period: Option<&str>) -> Result<SalesReport, ClientError> {
        let query = AnalyticsQuery {
            year: None,
            period: period.map(str::to_string),
        };
        self.send_query("analytics/report", &query).await
    }

    // Sample data

    pub async fn seed_vehicles(&self) -> Result<ApiResponse<CountResponse>, ClientError> {
        self.send(Method::POST, "data/seed-vehicles").await
    }

    pub async fn seed_deals(&self) -> Result<ApiResponse<CountResponse>, ClientError> {
        self.send(Method::POST, "data/seed-deals").await
    }

    pub async fn clear_vehicles(&self) -> Result<ApiResponse<CountResponse>, ClientError> {
        self.send(Method::DELETE, "data/clear-vehicles").await
    }

    pub async fn clear_deals(&self) -> Result<ApiResponse<CountResponse>, ClientError> {
        self.send(Method::DELETE, "data/clear-deals").await
    }
}

#[async_trait]
impl SaleBackend for ApiClient {
    type Error = ClientError;

    async fn update_vehicle_status(
        &self,
        vehicle_id: Uuid,
        status: VehicleStatus,
    ) -> Result<Vehicle, ClientError> {
        self.update_vehicle(vehicle_id, &UpdateVehicleRequest::status(status))
            .await
    }

    async fn create_deal(&self, request: CreateDealRequest) -> Result<Deal, ClientError> {
        ApiClient::create_deal(self, &request).await
    }
}

#[async_trait]
impl AnalyticsSource for ApiClient {
    type Error = ClientError;

    async fn sales_analytics(&self, year: i32) -> Result<SalesAnalytics, ClientError> {
        ApiClient::sales_analytics(self, Some(year)).await
    }

    async fn list_deals(&self, broker_id: Option<Uuid>) -> Result<Vec<Deal>, ClientError> {
        ApiClient::list_deals(self, broker_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_is_permission_denied() {
        let err = error_for_status(
            StatusCode::FORBIDDEN,
            r#"{"error":"Forbidden","message":"Administrator permissions required","code":"FORBIDDEN"}"#,
        );
        match err {
            ClientError::PermissionDenied(message) => {
                assert_eq!(message, "Administrator permissions required")
            }
            other => panic!("expected permission denied, got {:?}", other),
        }
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            error_for_status(StatusCode::UNAUTHORIZED, ""),
            ClientError::Unauthorized(_)
        ));
        assert!(matches!(
            error_for_status(StatusCode::NOT_FOUND, "gone"),
            ClientError::NotFound(m) if m == "gone"
        ));
        match error_for_status(StatusCode::INTERNAL_SERVER_ERROR, "") {
            ClientError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[test]
    fn test_paths_stay_under_base() {
        let client = ApiClient::new("http://localhost:8080/api").unwrap();
        assert_eq!(
            client.url("vehicles/search").unwrap().as_str(),
            "http://localhost:8080/api/vehicles/search"
        );
        assert_eq!(client.url("/deals").unwrap().as_str(), "http://localhost:8080/api/deals");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(ApiClient::new("not a url"), Err(ClientError::Config(_))));
    }
}
