use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::broadcast;

use crate::domain::courier::Courier;
use crate::domain::kernel::AggregateRoot;
use crate::domain::order::Order;

// ============================================================================
// Change Envelope - Aggregate change notification with metadata
// ============================================================================
//
// Repositories emit one envelope per successful write so that other
// bounded contexts can react to persisted changes.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Added,
    Updated,
}

/// State of the aggregate right after the write
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum AggregateSnapshot {
    Courier(Courier),
    Order(Order),
}

impl From<Courier> for AggregateSnapshot {
    fn from(courier: Courier) -> Self {
        AggregateSnapshot::Courier(courier)
    }
}

impl From<Order> for AggregateSnapshot {
    fn from(order: Order) -> Self {
        AggregateSnapshot::Order(order)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEnvelope {
    // Change Identity
    pub change_id: Uuid,
    pub aggregate_id: Uuid,
    pub aggregate_type: String,
    pub kind: ChangeKind,

    // Payload
    pub snapshot: AggregateSnapshot,

    // Timing
    pub timestamp: DateTime<Utc>,

    // Additional Metadata
    pub metadata: HashMap<String, String>,
}

impl ChangeEnvelope {
    pub fn new<A>(kind: ChangeKind, aggregate: &A) -> Self
    where
        A: AggregateRoot + Into<AggregateSnapshot>,
    {
        Self {
            change_id: Uuid::now_v7(),
            aggregate_id: aggregate.aggregate_id(),
            aggregate_type: A::AGGREGATE_TYPE.to_string(),
            kind,
            snapshot: aggregate.clone().into(),
            timestamp: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: String, value: String) -> Self {
        self.metadata.insert(key, value);
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// ============================================================================
// Notifiers
// ============================================================================

pub trait ChangeNotifier: Send + Sync {
    fn notify(&self, change: ChangeEnvelope);
}

/// Fans changes out to every subscriber over a tokio broadcast channel
pub struct BroadcastNotifier {
    sender: broadcast::Sender<ChangeEnvelope>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEnvelope> {
        self.sender.subscribe()
    }
}

impl ChangeNotifier for BroadcastNotifier {
    fn notify(&self, change: ChangeEnvelope) {
        let aggregate_id = change.aggregate_id;
        if self.sender.send(change).is_err() {
            tracing::trace!(aggregate_id = %aggregate_id, "No change subscribers");
        }
    }
}

/// Drops every change
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl ChangeNotifier for NoopNotifier {
    fn notify(&self, _change: ChangeEnvelope) {}
}

// ============================================================================
// Tests
// ============================================================================
