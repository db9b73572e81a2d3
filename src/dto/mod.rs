//! Request and response bodies
//!
//! Types that only exist on the wire. Persisted records live in `models`.

pub mod analytics_dto;
pub mod api_response;
pub mod auth_dto;
pub mod deal_dto;
pub mod user_dto;
pub mod vehicle_dto;

pub use api_response::{ApiResponse, CountResponse};
