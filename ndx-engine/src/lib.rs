//! ndx-engine - Discovery & Progression Engine
//!
//! Turns a submitted photo into a classified discovery and tracks it against
//! the user's collection:
//! - Classify the image via the external recognizer (single attempt)
//! - Meter usage and persist the discovery (independent, best-effort)
//! - Advance the per-category collection count (clamped at the ceiling)
//! - Evaluate achievement unlock transitions (one-shot monotonic latch)
//! - Emit exactly one user-facing notification per submit action
//!
//! All state is a session cache; the backend store is authoritative and the
//! engine reconciles from it on load.

pub mod orchestrator;
pub mod progression;
pub mod services;
pub mod types;

pub use orchestrator::{Orchestrator, SubmitOutcome};
pub use progression::notify::Notification;
pub use progression::tracker::{CollectionEvent, ProgressionState};
pub use types::{
    Classification, CollectionError, CollectionSnapshot, CollectionStore, DiscoveryError,
    DiscoveryStore, Recognizer, RecognizerError, UsageError, UsageMeter,
};
