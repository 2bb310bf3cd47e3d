//! Service clients for the discovery engine
//!
//! HTTP implementations of the collaborator traits in [`crate::types`]:
//! - Recognizer (external image classification service)
//! - Usage meter (backend quota endpoints)
//! - Discovery store (backend discovery persistence)
//! - Collection store (backend collection-state readback)

pub mod collection_client;
pub mod discovery_client;
pub mod recognizer_client;
pub mod usage_client;

pub use collection_client::CollectionClient;
pub use discovery_client::DiscoveryClient;
pub use recognizer_client::RecognizerClient;
pub use usage_client::UsageClient;

/// User agent sent on every outbound request
pub(crate) const USER_AGENT: &str = "NatureDex/0.1.0";

/// Transport timeout applied by every client (no engine-level timeout exists)
pub(crate) const REQUEST_TIMEOUT_SECS: u64 = 30;
