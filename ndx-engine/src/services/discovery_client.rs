//! Discovery recorder API client
//!
//! Persists one discovery event per successful, mapped classification via
//! `POST /api/ai/item`. Best-effort: the orchestrator logs failures and the
//! already-displayed classification is never unwound. No idempotency key is
//! sent; duplicate submissions count as independent discoveries.

use super::{REQUEST_TIMEOUT_SECS, USER_AGENT};
use crate::types::{DiscoveryError, DiscoveryStore};
use ndx_common::DiscoveryCategory;
use serde::Serialize;
use std::time::Duration;

/// `POST /api/ai/item` request body
#[derive(Debug, Serialize)]
struct RecordDiscoveryRequest<'a> {
    /// Wire category name ("flowers" | "trees" | "rocks")
    category: &'static str,
    /// Item label, e.g. "sunflower"
    label: &'a str,
}

/// Discovery persistence client
pub struct DiscoveryClient {
    http_client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl DiscoveryClient {
    pub fn new(
        base_url: impl Into<String>,
        auth_token: Option<String>,
    ) -> Result<Self, DiscoveryError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| DiscoveryError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            auth_token,
        })
    }
}

#[async_trait::async_trait]
impl DiscoveryStore for DiscoveryClient {
    async fn record_discovery(
        &self,
        category: DiscoveryCategory,
        label: &str,
    ) -> Result<(), DiscoveryError> {
        let url = format!("{}/api/ai/item", self.base_url);
        let body = RecordDiscoveryRequest {
            category: category.as_str(),
            label,
        };

        let mut request = self.http_client.post(&url).json(&body);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DiscoveryError::Network(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DiscoveryError::Api(status.as_u16(), error_text));
        }

        // Success body is ignored
        Ok(())
    }
}
