//! Domain models
//!
//! Rows of the PostgreSQL schema and the JSON shapes built from them.

pub mod analytics;
pub mod auth;
pub mod deal;
pub mod user;
pub mod vehicle;

pub use deal::{Deal, DealStatus};
pub use user::{UserRole, UserStatus};
pub use vehicle::{Vehicle, VehicleCategory, VehicleStatus};
