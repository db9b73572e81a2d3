//! Repositories module
//!
//! Acceso a PostgreSQL, one repository per table.

pub mod deal_repository;
pub mod user_repository;
pub mod vehicle_repository;

pub use deal_repository::DealRepository;
pub use user_repository::UserRepository;
pub use vehicle_repository::VehicleRepository;
