//! Controllers
//!
//! One controller per resource, built per request from the pool. Handlers
//! in `routes` do the HTTP plumbing and call into these.

pub mod analytics_controller;
pub mod auth_controller;
pub mod data_controller;
pub mod deal_controller;
pub mod user_controller;
pub mod vehicle_controller;
