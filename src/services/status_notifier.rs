//! Vehicle status-change notifications
//!
//! A status change is announced twice: a sentinel timestamp goes to shared
//! storage, readable by other processes, and a `StatusChange` is broadcast
//! to every subscriber inside this process.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::vehicle::VehicleStatus;

const CHANNEL_CAPACITY: usize = 64;

/// Storage shared between processes for the last-change sentinel
#[async_trait]
pub trait SignalStore: Send + Sync {
    async fn write_signal(&self, value: &str) -> Result<()>;
    async fn read_signal(&self) -> Result<Option<String>>;
}

/// Single-process store
#[derive(Debug, Default)]
pub struct MemorySignalStore {
    value: RwLock<Option<String>>,
}

impl MemorySignalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SignalStore for MemorySignalStore {
    async fn write_signal(&self, value: &str) -> Result<()> {
        *self.value.write().await = Some(value.to_string());
        Ok(())
    }

    async fn read_signal(&self) -> Result<Option<String>> {
        Ok(self.value.read().await.clone())
    }
}

/// In-process event carried on the broadcast channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub vehicle_id: Uuid,
    pub status: VehicleStatus,
    pub changed_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct StatusNotifier {
    sender: broadcast::Sender<StatusChange>,
    store: Arc<dyn SignalStore>,
}

impl StatusNotifier {
    pub fn new(store: Arc<dyn SignalStore>) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender, store }
    }

    /// Notifier backed by a [`MemorySignalStore`]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySignalStore::new()))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusChange> {
        self.sender.subscribe()
    }

    /// Write the sentinel and broadcast the change.
    ///
    /// Neither a failed sentinel write nor an empty subscriber list stops
    /// the other half of the notification.
    pub async fn notify(&self, vehicle_id: Uuid, status: VehicleStatus) -> StatusChange {
        let change = StatusChange {
            vehicle_id,
            status,
            changed_at: Utc::now(),
        };

        if let Err(e) = self.store.write_signal(&change.changed_at.to_rfc3339()).await {
            warn!("⚠️ Could not write status signal for vehicle {}: {}", vehicle_id, e);
        }

        match self.sender.send(change.clone()) {
            Ok(receivers) => {
                info!("📣 Vehicle {} is now {} ({} listeners)", vehicle_id, status, receivers);
            }
            Err(_) => {
                debug!("📣 Vehicle {} is now {} (no listeners)", vehicle_id, status);
            }
        }

        change
    }

    /// Last sentinel written to shared storage
    pub async fn last_signal(&self) -> Result<Option<String>> {
        self.store.read_signal().await
    }
}
