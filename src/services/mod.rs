//! Services module
//!
//! Business logic: aggregation and filtering over plain lists, the
//! status-change notifier with the mark-as-sold workflow built on top of
//! it, and the startup admin bootstrap.

pub mod admin_bootstrap;
pub mod analytics_view;
pub mod deal_aggregator;
pub mod sale_service;
pub mod status_notifier;
pub mod vehicle_filter;

pub use admin_bootstrap::{ensure_admin, AdminBootstrap};
pub use analytics_view::{AnalyticsOrigin, AnalyticsSource, AnalyticsState, AnalyticsView};
pub use sale_service::{mark_vehicle_sold, RepositoryBackend, SaleBackend, SaleOutcome};
pub use status_notifier::{MemorySignalStore, SignalStore, StatusChange, StatusNotifier};
pub use vehicle_filter::{filter_vehicles, FilterCriteria, FilterResult, SortKey};
