//! Módulo de base de datos
//!
//! Creación del pool y migraciones de PostgreSQL.

pub mod connection;

pub use connection::{create_pool, run_migrations};
