//! Sales analytics view
//!
//! Holds the latest sales figures. The dedicated analytics endpoint is
//! preferred; when it fails the figures are recomputed from the raw deal
//! list, and when that fails too the view goes empty. No retries.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::deal_aggregator::aggregate_deals;
use super::status_notifier::StatusNotifier;
use crate::models::analytics::SalesAnalytics;
use crate::models::deal::Deal;

/// Where the view gets its data
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    type Error: fmt::Display + Send;

    async fn sales_analytics(&self, year: i32) -> Result<SalesAnalytics, Self::Error>;

    async fn list_deals(&self, broker_id: Option<Uuid>) -> Result<Vec<Deal>, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsOrigin {
    Endpoint,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum AnalyticsState {
    Ready {
        analytics: SalesAnalytics,
        origin: AnalyticsOrigin,
    },
    Empty {
        reason: String,
    },
}

impl AnalyticsState {
    pub fn is_ready(&self) -> bool {
        matches!(self, AnalyticsState::Ready { .. })
    }

    pub fn origin(&self) -> Option<AnalyticsOrigin> {
        match self {
            AnalyticsState::Ready { origin, .. } => Some(*origin),
            AnalyticsState::Empty { .. } => None,
        }
    }
}

pub struct AnalyticsView<S> {
    source: Arc<S>,
    year: Option<i32>,
    state: Arc<RwLock<AnalyticsState>>,
}

impl<S> Clone for AnalyticsView<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            year: self.year,
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: AnalyticsSource + 'static> AnalyticsView<S> {
    /// View over the current UTC year. Starts empty until the first refresh.
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            year: None,
            state: Arc::new(RwLock::new(AnalyticsState::Empty {
                reason: "not loaded yet".to_string(),
            })),
        }
    }

    /// Pin the view to one year instead of following the clock
    pub fn for_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    fn year(&self) -> i32 {
        self.year.unwrap_or_else(|| Utc::now().year())
    }

    pub async fn state(&self) -> AnalyticsState {
        self.state.read().await.clone()
    }

    /// Reload the figures and return the new state
    pub async fn refresh(&self) -> AnalyticsState {
        let year = self.year();

        let next = match self.source.sales_analytics(year).await {
            Ok(analytics) => AnalyticsState::Ready {
                analytics,
                origin: AnalyticsOrigin::Endpoint,
            },
            Err(e) => {
                warn!("⚠️ Analytics endpoint unavailable, aggregating deals: {}", e);
                match self.source.list_deals(None).await {
                    Ok(deals) => {
                        info!("📊 Aggregated {} deals for {}", deals.len(), year);
                        AnalyticsState::Ready {
                            analytics: aggregate_deals(&deals, year),
                            origin: AnalyticsOrigin::Fallback,
                        }
                    }
                    Err(e) => {
                        error!("❌ Could not load deals for analytics: {}", e);
                        AnalyticsState::Empty {
                            reason: e.to_string(),
                        }
                    }
                }
            }
        };

        *self.state.write().await = next.clone();
        next
    }

    /// Refresh on every status change until the notifier goes away
    pub fn watch(&self, notifier: &StatusNotifier) -> JoinHandle<()> {
        let mut receiver = notifier.subscribe();
        let view = self.clone();

        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(change) => {
                        debug!("🔄 Vehicle {} changed, refreshing analytics", change.vehicle_id);
                        view.refresh().await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("🔄 Missed {} status changes, refreshing once", skipped);
                        view.refresh().await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::deal::DealStatus;
    use crate::models::vehicle::VehicleStatus;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct FakeSource {
        endpoint_up: bool,
        deals_up: bool,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(endpoint_up: bool, deals_up: bool) -> Self {
            Self {
                endpoint_up,
                deals_up,
                calls: AtomicUsize::new(0),
            }
        }
    }

    fn completed_deal(date: &str) -> Deal {
        Deal {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            broker_id: None,
            sale_price: Decimal::new(1_000_000, 0),
            estimated_purchase_price: None,
            commission: Decimal::new(200_000, 0),
            date: None,
            completed_date: Some(date.to_string()),
            status: DealStatus::Completed,
            notes: None,
            vehicle_category: None,
        }
    }

    #[async_trait]
    impl AnalyticsSource for FakeSource {
        type Error = String;

        async fn sales_analytics(&self, year: i32) -> Result<SalesAnalytics, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.endpoint_up {
                Ok(aggregate_deals(&[], year))
            } else {
                Err("404 Not Found".to_string())
            }
        }

        async fn list_deals(&self, _broker_id: Option<Uuid>) -> Result<Vec<Deal>, String> {
            if self.deals_up {
                Ok(vec![completed_deal("2024-03-01")])
            } else {
                Err("connection refused".to_string())
            }
        }
    }

    #[tokio::test]
    async fn test_prefers_endpoint() {
        let view = AnalyticsView::new(FakeSource::new(true, true)).for_year(2024);
        let state = view.refresh().await;
        assert_eq!(state.origin(), Some(AnalyticsOrigin::Endpoint));
    }

    #[tokio::test]
    async fn test_falls_back_to_aggregation() {
        let view = AnalyticsView::new(FakeSource::new(false, true)).for_year(2024);

        match view.refresh().await {
            AnalyticsState::Ready { analytics, origin } => {
                assert_eq!(origin, AnalyticsOrigin::Fallback);
                assert_eq!(analytics.monthly[2].revenue, Decimal::new(1_000_000, 0));
                assert_eq!(analytics.monthly[2].units_sold, 1);
            }
            other => panic!("expected ready state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_when_everything_fails() {
        let view = AnalyticsView::new(FakeSource::new(false, false)).for_year(2024);
        view.refresh().await;

        assert_eq!(
            view.state().await,
            AnalyticsState::Empty {
                reason: "connection refused".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_watch_refreshes_on_status_change() {
        let view = AnalyticsView::new(FakeSource::new(true, true)).for_year(2024);
        let notifier = StatusNotifier::in_memory();
        let handle = view.watch(&notifier);

        assert!(!view.state().await.is_ready());
        notifier.notify(Uuid::new_v4(), VehicleStatus::Sold).await;

        for _ in 0..50 {
            if view.state().await.is_ready() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(view.state().await.is_ready());
        assert_eq!(view.source.calls.load(Ordering::SeqCst), 1);

        drop(notifier);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }
}
