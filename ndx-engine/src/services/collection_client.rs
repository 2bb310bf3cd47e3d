//! Collection state API client
//!
//! Read-only projection of the authoritative per-user collection state via
//! `GET /api/ai/naturedex`. The wire format keys categories by their
//! singular names; the snapshot returned here is keyed by
//! [`DiscoveryCategory`].

use super::{REQUEST_TIMEOUT_SECS, USER_AGENT};
use crate::types::{CollectionError, CollectionSnapshot, CollectionStore};
use ndx_common::DiscoveryCategory;
use serde::Deserialize;
use std::time::Duration;

/// `GET /api/ai/naturedex` response body
#[derive(Debug, Clone, Deserialize)]
struct CollectionStateResponse {
    #[serde(default)]
    counts: CategoryCounts,
    #[serde(default)]
    achievements: CategoryFlags,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CategoryCounts {
    #[serde(default)]
    flower: u8,
    #[serde(default)]
    tree: u8,
    #[serde(default)]
    rock: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CategoryFlags {
    #[serde(default)]
    flower: bool,
    #[serde(default)]
    tree: bool,
    #[serde(default)]
    rock: bool,
}

impl From<CollectionStateResponse> for CollectionSnapshot {
    fn from(response: CollectionStateResponse) -> Self {
        let mut snapshot = CollectionSnapshot::default();
        snapshot
            .counts
            .insert(DiscoveryCategory::Flowers, response.counts.flower);
        snapshot
            .counts
            .insert(DiscoveryCategory::Trees, response.counts.tree);
        snapshot
            .counts
            .insert(DiscoveryCategory::Rocks, response.counts.rock);
        snapshot
            .achievements
            .insert(DiscoveryCategory::Flowers, response.achievements.flower);
        snapshot
            .achievements
            .insert(DiscoveryCategory::Trees, response.achievements.tree);
        snapshot
            .achievements
            .insert(DiscoveryCategory::Rocks, response.achievements.rock);
        snapshot
    }
}

/// Collection state client
pub struct CollectionClient {
    http_client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl CollectionClient {
    pub fn new(
        base_url: impl Into<String>,
        auth_token: Option<String>,
    ) -> Result<Self, CollectionError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CollectionError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            auth_token,
        })
    }
}

#[async_trait::async_trait]
impl CollectionStore for CollectionClient {
    async fn fetch_collection(&self) -> Result<CollectionSnapshot, CollectionError> {
        let url = format!("{}/api/ai/naturedex", self.base_url);

        let mut request = self.http_client.get(&url);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CollectionError::Network(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CollectionError::Api(status.as_u16(), error_text));
        }

        let payload: CollectionStateResponse = response
            .json()
            .await
            .map_err(|e| CollectionError::Parse(e.to_string()))?;

        Ok(payload.into())
    }
}
