//! Progression orchestrator
//!
//! Sequences one "submit image" action end to end:
//! 1. Classify via the recognizer. A failure here is the only user-visible
//!    error: it halts the sequence with no metering, no discovery, and no
//!    state change.
//! 2. Run usage metering and discovery persistence as two independent
//!    best-effort branches. Each failure is logged and broadcast on its own
//!    event channel and cannot affect the other branch or the
//!    classification result already in hand.
//! 3. Advance the local collection count and feed the transition to the
//!    achievement evaluator.
//! 4. Produce exactly one notification; an achievement unlock supersedes
//!    the plain collected message.
//!
//! The orchestrator owns the [`ProgressionState`] for the session; an
//! exclusive borrow of `self` per submit keeps the cache single-writer.

use crate::progression::{evaluator, Notification};
use crate::progression::tracker::{CollectionEvent, ProgressionState};
use crate::types::{
    CollectionStore, DiscoveryStore, Recognizer, RecognizerError, UsageError, UsageMeter,
};
use ndx_common::events::{EventBus, NdxEvent};
use ndx_common::{DiscoveryCategory, UsageRecord, MAX_PER_TYPE};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Result of one submit action
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// Description shown to the user verbatim, whatever else failed
    pub description: String,
    /// Item label from the classifier
    pub label: String,
    /// Mapped category; `None` when the classifier output is outside the
    /// taxonomy (nothing persisted or counted)
    pub category: Option<DiscoveryCategory>,
    /// The single user-facing notification (`None` for unmapped categories)
    pub notification: Option<Notification>,
}

/// Sequences classification, metering, recording, and notification for one
/// user action
pub struct Orchestrator {
    recognizer: Arc<dyn Recognizer>,
    usage_meter: Arc<dyn UsageMeter>,
    discovery_store: Arc<dyn DiscoveryStore>,
    collection_store: Arc<dyn CollectionStore>,
    state: ProgressionState,
    event_bus: EventBus,
}

impl Orchestrator {
    pub fn new(
        recognizer: Arc<dyn Recognizer>,
        usage_meter: Arc<dyn UsageMeter>,
        discovery_store: Arc<dyn DiscoveryStore>,
        collection_store: Arc<dyn CollectionStore>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            recognizer,
            usage_meter,
            discovery_store,
            collection_store,
            state: ProgressionState::new(),
            event_bus,
        }
    }

    /// Current session collection state
    pub fn state(&self) -> &ProgressionState {
        &self.state
    }

    /// Event bus the engine broadcasts on
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Reconcile local state from the authoritative store
    ///
    /// On failure the session keeps its current state (initially all-zero,
    /// all-locked) so the engine stays usable offline.
    pub async fn load(&mut self) {
        match self.collection_store.fetch_collection().await {
            Ok(snapshot) => {
                self.state.apply_snapshot(&snapshot);
                info!("Collection state reconciled from store");
                self.event_bus.emit_lossy(NdxEvent::CollectionReconciled {
                    timestamp: chrono::Utc::now(),
                });
            }
            Err(e) => {
                warn!("Collection state unavailable, keeping local state: {}", e);
                self.event_bus
                    .emit_lossy(NdxEvent::CollectionReconcileFailed {
                        error_message: e.to_string(),
                        timestamp: chrono::Utc::now(),
                    });
            }
        }
    }

    /// Read-only usage passthrough for display surfaces
    pub async fn usage(&self) -> Result<UsageRecord, UsageError> {
        self.usage_meter.get_usage().await
    }

    /// Run one submit action
    pub async fn submit(
        &mut self,
        image: Vec<u8>,
        file_name: &str,
    ) -> Result<SubmitOutcome, RecognizerError> {
        let submission_id = Uuid::new_v4();
        info!(%submission_id, file_name, "Submitting image for classification");

        let classification = match self
            .recognizer
            .classify(image, file_name.to_string())
            .await
        {
            Ok(classification) => classification,
            Err(e) => {
                warn!(%submission_id, "Classification failed: {}", e);
                self.event_bus.emit_lossy(NdxEvent::ClassificationFailed {
                    submission_id,
                    error_message: e.to_string(),
                    timestamp: chrono::Utc::now(),
                });
                return Err(e);
            }
        };

        self.event_bus.emit_lossy(NdxEvent::ClassificationCompleted {
            submission_id,
            raw_category: classification.category.clone(),
            label: classification.label.clone(),
            timestamp: chrono::Utc::now(),
        });

        let category = DiscoveryCategory::from_raw(&classification.category);
        if category.is_none() {
            debug!(
                %submission_id,
                raw_category = %classification.category,
                "Category outside taxonomy, discovery skipped"
            );
        }

        // Metering and persistence are independent branches. Neither can
        // fail the submit or the other branch; each reports on its own
        // event channel.
        tokio::join!(
            self.meter_usage(submission_id),
            self.persist_discovery(submission_id, category, &classification.label),
        );

        let notification =
            category.map(|cat| self.advance(submission_id, cat, &classification.label));

        Ok(SubmitOutcome {
            description: classification.description,
            label: classification.label,
            category,
            notification,
        })
    }

    /// Fire the at-most-one usage increment for this submission
    async fn meter_usage(&self, submission_id: Uuid) {
        match self.usage_meter.record_usage().await {
            Ok(record) => {
                info!(
                    %submission_id,
                    used = record.used,
                    remaining = record.remaining(),
                    "Usage recorded"
                );
                self.event_bus.emit_lossy(NdxEvent::UsageRecorded {
                    submission_id,
                    used: record.used,
                    remaining: record.remaining(),
                    timestamp: chrono::Utc::now(),
                });

                if record.exhausted() {
                    warn!(%submission_id, used = record.used, "Request allowance exhausted");
                    self.event_bus.emit_lossy(NdxEvent::QuotaExhausted {
                        submission_id,
                        used: record.used,
                        timestamp: chrono::Utc::now(),
                    });
                }
            }
            Err(e) => {
                // Console-warning severity only; never retried
                match &e {
                    UsageError::Unauthorized => {
                        warn!(%submission_id, "Usage metering unauthorized")
                    }
                    UsageError::UserNotFound => {
                        warn!(%submission_id, "Usage metering: user not found")
                    }
                    other => warn!(%submission_id, "Usage metering failed: {}", other),
                }
                self.event_bus.emit_lossy(NdxEvent::UsageMeteringFailed {
                    submission_id,
                    error_message: e.to_string(),
                    timestamp: chrono::Utc::now(),
                });
            }
        }
    }

    /// Persist the discovery when the category maps
    async fn persist_discovery(
        &self,
        submission_id: Uuid,
        category: Option<DiscoveryCategory>,
        label: &str,
    ) {
        let Some(category) = category else {
            return;
        };

        match self.discovery_store.record_discovery(category, label).await {
            Ok(()) => {
                info!(%submission_id, %category, label, "Discovery recorded");
                self.event_bus.emit_lossy(NdxEvent::DiscoveryRecorded {
                    submission_id,
                    category,
                    label: label.to_string(),
                    timestamp: chrono::Utc::now(),
                });
            }
            Err(e) => {
                warn!(%submission_id, %category, "Failed to save discovery: {}", e);
                self.event_bus.emit_lossy(NdxEvent::DiscoveryPersistFailed {
                    submission_id,
                    category,
                    error_message: e.to_string(),
                    timestamp: chrono::Utc::now(),
                });
            }
        }
    }

    /// Advance the local count and map the transition to the single
    /// notification for this submission
    fn advance(
        &mut self,
        submission_id: Uuid,
        category: DiscoveryCategory,
        label: &str,
    ) -> Notification {
        match self.state.collect(category) {
            CollectionEvent::Collected {
                previous_count,
                new_count,
                ..
            } => {
                let already_unlocked = self.state.unlocked(category);
                match evaluator::evaluate(category, previous_count, new_count, already_unlocked) {
                    Some(transition) => {
                        self.state.latch_unlock(transition.category);
                        info!(%submission_id, %category, "Achievement unlocked");
                        self.event_bus.emit_lossy(NdxEvent::AchievementUnlocked {
                            submission_id,
                            category,
                            timestamp: chrono::Utc::now(),
                        });
                        Notification::AchievementUnlocked { category }
                    }
                    None => {
                        self.event_bus.emit_lossy(NdxEvent::ItemCollected {
                            submission_id,
                            category,
                            new_count,
                            timestamp: chrono::Utc::now(),
                        });
                        Notification::Collected {
                            category,
                            label: label.to_string(),
                            new_count,
                        }
                    }
                }
            }
            CollectionEvent::CategoryFull { .. } => {
                debug!(%submission_id, %category, "Category already at ceiling");
                self.event_bus.emit_lossy(NdxEvent::CategoryFull {
                    submission_id,
                    category,
                    count: MAX_PER_TYPE,
                    timestamp: chrono::Utc::now(),
                });
                Notification::CategoryFull { category }
            }
        }
    }
}
