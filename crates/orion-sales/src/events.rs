//! # Domain Events
//!
//! Announcements the engine makes after a sale changes state. Events are
//! fire-and-forget: the sale is already persisted by the time one is
//! published, so a failing or absent listener never rolls anything back.
//!
//! ```text
//! ┌────────────┐  emit   ┌──────────────┐  publish   ┌────────────────┐
//! │ SaleEngine │ ───────▶│ EventEmitter │ ──────────▶│ EventPublisher │
//! └────────────┘         └──────┬───────┘            └───────┬────────┘
//!                               │ warn + continue            │
//!                               ▼  on failure                ▼
//!                          (tracing log)            subscribers, if any
//! ```
//!
//! [`BroadcastPublisher`] is the in-process implementation over a tokio
//! broadcast channel. Receivers that fall behind lose the oldest events;
//! anything needing durable delivery belongs behind its own
//! [`EventPublisher`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Buffered events per subscriber before the oldest are dropped.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Payload announcing a newly created sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleCreated {
    pub sale_id: String,
    pub sale_number: String,
    pub customer_id: String,
    pub branch_id: String,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// Payload announcing a cancelled sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleCancelled {
    pub sale_id: String,
    pub sale_number: String,
    pub reason: String,
    pub cancelled_at: DateTime<Utc>,
}

/// Everything the engine announces.
///
/// Serializes with a `type` tag so listeners can dispatch on one field:
/// `{"type": "sale_created", "sale_id": ..., ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SaleEvent {
    SaleCreated(SaleCreated),
    SaleCancelled(SaleCancelled),
}

impl SaleEvent {
    /// Stable name for logs and dispatch tables.
    pub fn name(&self) -> &'static str {
        match self {
            SaleEvent::SaleCreated(_) => "sale_created",
            SaleEvent::SaleCancelled(_) => "sale_cancelled",
        }
    }
}

/// Errors a publisher can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    /// The transport behind the publisher is gone.
    #[error("Event channel closed: {0}")]
    ChannelClosed(String),

    /// The publisher is temporarily unable to accept events.
    #[error("Publisher unavailable: {0}")]
    Unavailable(String),
}

/// Destination for domain events.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: SaleEvent) -> Result<(), PublishError>;
}

/// Hands events to a publisher and absorbs its failures.
///
/// The engine calls [`EventEmitter::emit`] after state is already saved, so
/// a publish failure is logged and swallowed rather than surfaced.
#[derive(Clone)]
pub struct EventEmitter {
    publisher: Arc<dyn EventPublisher>,
}

impl EventEmitter {
    pub fn new(publisher: Arc<dyn EventPublisher>) -> Self {
        EventEmitter { publisher }
    }

    /// Publishes an event, logging instead of failing.
    pub async fn emit(&self, event: SaleEvent) {
        let name = event.name();
        match self.publisher.publish(event).await {
            Ok(()) => debug!(event = name, "Event published"),
            Err(e) => warn!(event = name, error = %e, "Event publish failed, continuing"),
        }
    }
}

/// In-process publisher over a tokio broadcast channel.
pub struct BroadcastPublisher {
    tx: broadcast::Sender<SaleEvent>,
}

impl BroadcastPublisher {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        BroadcastPublisher { tx }
    }

    /// Opens a new subscription. Only events published after this call are
    /// delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<SaleEvent> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

#[async_trait]
impl EventPublisher for BroadcastPublisher {
    async fn publish(&self, event: SaleEvent) -> Result<(), PublishError> {
        // A send error only means nobody is listening right now.
        let _ = self.tx.send(event);
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
