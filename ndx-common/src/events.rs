//! Event types for the NatureDex event system
//!
//! Provides the shared event definitions and EventBus used by the engine.
//! Every state transition and best-effort I/O outcome is broadcast as a typed
//! event, which keeps the progression state machine separate from whatever
//! surface renders notifications (CLI, UI, test harness).

use crate::types::DiscoveryCategory;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// NatureDex event types
///
/// Events are broadcast via [`EventBus`] and can be serialized for
/// transmission to a display surface. One submit action produces a
/// `ClassificationCompleted`/`ClassificationFailed` event, zero or one
/// metering event, zero or one discovery persistence event, and exactly one
/// of `ItemCollected` / `CategoryFull` / `AchievementUnlocked` when the
/// category maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NdxEvent {
    /// Classifier returned a usable result
    ClassificationCompleted {
        /// Submission this event belongs to
        submission_id: Uuid,
        /// Raw category string as returned by the classifier (pre-mapping)
        raw_category: String,
        /// Item label, e.g. "sunflower"
        label: String,
        /// When classification completed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Classifier call failed; the submit action halts
    ClassificationFailed {
        submission_id: Uuid,
        /// Human-readable failure description
        error_message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Discovery persisted to the backend store
    DiscoveryRecorded {
        submission_id: Uuid,
        category: DiscoveryCategory,
        label: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Discovery persistence failed (best-effort, never blocks the flow)
    DiscoveryPersistFailed {
        submission_id: Uuid,
        category: DiscoveryCategory,
        error_message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Usage meter accepted the increment
    UsageRecorded {
        submission_id: Uuid,
        /// Total requests consumed after the increment
        used: u32,
        /// Allowance remaining, clamped at zero
        remaining: u32,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Usage metering failed (logged, never user-facing)
    UsageMeteringFailed {
        submission_id: Uuid,
        error_message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The full request allowance has been consumed
    QuotaExhausted {
        submission_id: Uuid,
        used: u32,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A category count advanced by one
    ItemCollected {
        submission_id: Uuid,
        category: DiscoveryCategory,
        new_count: u8,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Collect attempted at the ceiling; state unchanged
    CategoryFull {
        submission_id: Uuid,
        category: DiscoveryCategory,
        count: u8,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Category reached the ceiling for the first time
    ///
    /// Supersedes the plain `ItemCollected` notification for the same
    /// submission; emitted at most once per category.
    AchievementUnlocked {
        submission_id: Uuid,
        category: DiscoveryCategory,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Collection state reconciled from the authoritative store
    CollectionReconciled {
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Reconciliation failed; engine fell back to the initial local state
    CollectionReconcileFailed {
        error_message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

// ========================================
// EventBus Implementation
// ========================================

/// Central event distribution bus
///
/// Uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
/// - Lagged message detection for slow subscribers
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<NdxEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<NdxEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists,
    /// `Err` otherwise.
    #[allow(clippy::result_large_err)]
    pub fn emit(&self, event: NdxEvent) -> Result<usize, broadcast::error::SendError<NdxEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// Used for events where it is acceptable that no component is
    /// currently listening (the engine never requires a subscriber).
    pub fn emit_lossy(&self, event: NdxEvent) {
        let _ = self.tx.send(event);
    }

    /// Current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
