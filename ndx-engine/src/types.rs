//! Core types and trait definitions for the discovery engine
//!
//! Defines the seams between the orchestrator and its collaborators:
//! - **Recognizer** - remote image classification (stateless, no quota use)
//! - **UsageMeter** - per-user request quota tracking
//! - **DiscoveryStore** - durable discovery persistence
//! - **CollectionStore** - authoritative collection-state readback
//!
//! HTTP implementations live in [`crate::services`]; tests substitute
//! in-memory doubles at the same seams.

use ndx_common::{DiscoveryCategory, UsageRecord, MAX_PER_TYPE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// ============================================================================
// Common Types
// ============================================================================

/// Classification result from the external recognizer
///
/// `category` is the raw classifier output and must be mapped through the
/// synonym table ([`DiscoveryCategory::from_raw`]) before persistence; the
/// description is displayable regardless of whether the category maps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// Raw category string, e.g. "flower" (pre-mapping)
    pub category: String,
    /// Specific item label, e.g. "sunflower"
    pub label: String,
    /// Human-readable description shown to the user verbatim
    pub description: String,
}

/// Point-in-time collection state as reported by the authoritative store
#[derive(Debug, Clone, Default)]
pub struct CollectionSnapshot {
    /// Per-category collected counts
    pub counts: HashMap<DiscoveryCategory, u8>,
    /// Per-category achievement flags
    pub achievements: HashMap<DiscoveryCategory, bool>,
}

impl CollectionSnapshot {
    /// Count for one category, clamped into `0..=MAX_PER_TYPE`
    pub fn count(&self, category: DiscoveryCategory) -> u8 {
        self.counts
            .get(&category)
            .copied()
            .unwrap_or(0)
            .min(MAX_PER_TYPE)
    }

    /// Achievement flag for one category (absent = locked)
    pub fn unlocked(&self, category: DiscoveryCategory) -> bool {
        self.achievements.get(&category).copied().unwrap_or(false)
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Recognizer client errors
///
/// The only errors in the engine that are user-visible and halt the submit
/// sequence.
#[derive(Debug, Error)]
pub enum RecognizerError {
    /// Transport failure or non-2xx response from the recognizer
    #[error("Recognizer unavailable: {0}")]
    Unavailable(String),

    /// Response could not be parsed into {category, label, description}
    #[error("Malformed recognizer response: {0}")]
    Malformed(String),
}

/// Usage meter errors
///
/// All variants are recovered locally: logged, broadcast as an event, never
/// surfaced as a user-facing error and never a rollback of a recorded
/// discovery.
#[derive(Debug, Error)]
pub enum UsageError {
    /// Missing or invalid credential (401)
    #[error("Unauthorized")]
    Unauthorized,

    /// User unknown to the metering store (404)
    #[error("User not found")]
    UserNotFound,

    /// Any other non-2xx response
    #[error("Metering failure {0}: {1}")]
    Api(u16, String),

    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Failed to parse metering response
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Discovery persistence errors (best-effort, recovered locally)
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Backend rejected the discovery
    #[error("Discovery persist failure {0}: {1}")]
    Api(u16, String),
}

/// Collection state readback errors
///
/// A failed readback falls back to the all-zero / all-locked initial state;
/// it never makes the engine unusable.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Backend returned a non-2xx response
    #[error("Collection state unavailable {0}: {1}")]
    Api(u16, String),

    /// Failed to parse collection state response
    #[error("Parse error: {0}")]
    Parse(String),
}

// ============================================================================
// Collaborator Traits
// ============================================================================

/// Remote image recognizer
///
/// Stateless request/response; a single attempt per invocation, no retry,
/// and no quota consumption.
#[async_trait::async_trait]
pub trait Recognizer: Send + Sync {
    /// Classify raw image bytes
    ///
    /// No size or content validation is performed here; that is the
    /// caller's concern.
    async fn classify(
        &self,
        image: Vec<u8>,
        file_name: String,
    ) -> Result<Classification, RecognizerError>;
}

/// Per-user request quota meter
#[async_trait::async_trait]
pub trait UsageMeter: Send + Sync {
    /// Increment the user's consumed-request count by one remotely
    ///
    /// Invoked at most once per successful classification, never retried.
    async fn record_usage(&self) -> Result<UsageRecord, UsageError>;

    /// Read-only usage query
    async fn get_usage(&self) -> Result<UsageRecord, UsageError>;
}

/// Durable discovery persistence
#[async_trait::async_trait]
pub trait DiscoveryStore: Send + Sync {
    /// Persist one discovery event
    ///
    /// Callers must only pass a mapped category; unmapped classifier output
    /// is dropped before this seam.
    async fn record_discovery(
        &self,
        category: DiscoveryCategory,
        label: &str,
    ) -> Result<(), DiscoveryError>;
}

/// Authoritative collection-state readback
#[async_trait::async_trait]
pub trait CollectionStore: Send + Sync {
    /// Fetch the user's current counts and achievement flags
    async fn fetch_collection(&self) -> Result<CollectionSnapshot, CollectionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_missing_categories_default_to_zero_locked() {
        let snapshot = CollectionSnapshot::default();
        assert_eq!(snapshot.count(DiscoveryCategory::Flowers), 0);
        assert!(!snapshot.unlocked(DiscoveryCategory::Rocks));
    }

    #[test]
    fn test_snapshot_count_clamped_to_ceiling() {
        let mut snapshot = CollectionSnapshot::default();
        snapshot.counts.insert(DiscoveryCategory::Trees, 9);
        assert_eq!(snapshot.count(DiscoveryCategory::Trees), MAX_PER_TYPE);
    }
}
