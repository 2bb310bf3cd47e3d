//! Shared in-memory doubles for the engine's collaborator seams
#![allow(dead_code)]

use async_trait::async_trait;
use ndx_common::{DiscoveryCategory, UsageRecord};
use ndx_engine::{
    Classification, CollectionError, CollectionSnapshot, CollectionStore, DiscoveryError,
    DiscoveryStore, Recognizer, RecognizerError, UsageError, UsageMeter,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Canned recognizer behavior
pub enum RecognizerBehavior {
    Classify(Classification),
    Unavailable(String),
    Malformed(String),
}

pub struct StubRecognizer {
    behavior: RecognizerBehavior,
    pub calls: AtomicU32,
}

impl StubRecognizer {
    pub fn returning(classification: Classification) -> Self {
        Self {
            behavior: RecognizerBehavior::Classify(classification),
            calls: AtomicU32::new(0),
        }
    }

    pub fn unavailable(message: &str) -> Self {
        Self {
            behavior: RecognizerBehavior::Unavailable(message.to_string()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn malformed(message: &str) -> Self {
        Self {
            behavior: RecognizerBehavior::Malformed(message.to_string()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Recognizer for StubRecognizer {
    async fn classify(
        &self,
        _image: Vec<u8>,
        _file_name: String,
    ) -> Result<Classification, RecognizerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            RecognizerBehavior::Classify(c) => Ok(c.clone()),
            RecognizerBehavior::Unavailable(m) => Err(RecognizerError::Unavailable(m.clone())),
            RecognizerBehavior::Malformed(m) => Err(RecognizerError::Malformed(m.clone())),
        }
    }
}

/// Usage meter double tracking every increment attempt
pub struct RecordingMeter {
    used: AtomicU32,
    pub record_calls: AtomicU32,
    fail: Option<fn() -> UsageError>,
}

impl RecordingMeter {
    pub fn with_used(used: u32) -> Self {
        Self {
            used: AtomicU32::new(used),
            record_calls: AtomicU32::new(0),
            fail: None,
        }
    }

    pub fn failing(error: fn() -> UsageError) -> Self {
        Self {
            used: AtomicU32::new(0),
            record_calls: AtomicU32::new(0),
            fail: Some(error),
        }
    }

    pub fn record_call_count(&self) -> u32 {
        self.record_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UsageMeter for RecordingMeter {
    async fn record_usage(&self) -> Result<UsageRecord, UsageError> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(make_error) = self.fail {
            return Err(make_error());
        }
        let used = self.used.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(UsageRecord::new(used))
    }

    async fn get_usage(&self) -> Result<UsageRecord, UsageError> {
        Ok(UsageRecord::new(self.used.load(Ordering::SeqCst)))
    }
}

/// Discovery store double recording every persisted event
pub struct RecordingDiscoveryStore {
    pub recorded: Mutex<Vec<(DiscoveryCategory, String)>>,
    fail: bool,
}

impl RecordingDiscoveryStore {
    pub fn new() -> Self {
        Self {
            recorded: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            recorded: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn recorded(&self) -> Vec<(DiscoveryCategory, String)> {
        self.recorded.lock().unwrap().clone()
    }
}

#[async_trait]
impl DiscoveryStore for RecordingDiscoveryStore {
    async fn record_discovery(
        &self,
        category: DiscoveryCategory,
        label: &str,
    ) -> Result<(), DiscoveryError> {
        if self.fail {
            return Err(DiscoveryError::Api(500, "store unavailable".to_string()));
        }
        self.recorded
            .lock()
            .unwrap()
            .push((category, label.to_string()));
        Ok(())
    }
}

/// Collection store double serving one snapshot (or failing)
pub struct StubCollectionStore {
    snapshot: Option<CollectionSnapshot>,
}

impl StubCollectionStore {
    pub fn with_snapshot(snapshot: CollectionSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
        }
    }

    pub fn empty() -> Self {
        Self {
            snapshot: Some(CollectionSnapshot::default()),
        }
    }

    pub fn unavailable() -> Self {
        Self { snapshot: None }
    }
}

#[async_trait]
impl CollectionStore for StubCollectionStore {
    async fn fetch_collection(&self) -> Result<CollectionSnapshot, CollectionError> {
        match &self.snapshot {
            Some(snapshot) => Ok(snapshot.clone()),
            None => Err(CollectionError::Network("connection refused".to_string())),
        }
    }
}

/// Snapshot builder for one pre-set category
pub fn snapshot_with(category: DiscoveryCategory, count: u8, unlocked: bool) -> CollectionSnapshot {
    let mut snapshot = CollectionSnapshot::default();
    snapshot.counts.insert(category, count);
    snapshot.achievements.insert(category, unlocked);
    snapshot
}

/// The classification used by most scenarios
pub fn flower_classification() -> Classification {
    Classification {
        category: "flower".to_string(),
        label: "sunflower".to_string(),
        description: "A bright flower".to_string(),
    }
}
