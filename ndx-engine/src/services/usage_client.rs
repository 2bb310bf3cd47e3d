//! Usage meter API client
//!
//! Tracks the per-user classification request quota against the backend:
//! - `POST /api/auth/add` increments used-by-one for the bearer-identified
//!   user and returns the new total
//! - `GET /api/auth/get?id=<id>` is the read-only query
//!
//! Metering is fire-and-forget per submission: the orchestrator logs a
//! failure and keeps going, so no error here ever blocks the discovery flow
//! or rolls back a recorded discovery.

use super::{REQUEST_TIMEOUT_SECS, USER_AGENT};
use crate::types::{UsageError, UsageMeter};
use ndx_common::UsageRecord;
use serde::Deserialize;
use std::time::Duration;

/// `POST /api/auth/add` response body (extra fields ignored)
#[derive(Debug, Clone, Deserialize)]
struct AddUsageResponse {
    used: u32,
}

/// `GET /api/auth/get` response body
#[derive(Debug, Clone, Deserialize)]
struct GetUsageResponse {
    amount: u32,
}

/// Usage meter client, bound to one user's credentials
pub struct UsageClient {
    http_client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
    user_id: Option<String>,
}

impl UsageClient {
    pub fn new(
        base_url: impl Into<String>,
        auth_token: Option<String>,
        user_id: Option<String>,
    ) -> Result<Self, UsageError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| UsageError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            auth_token,
            user_id,
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait::async_trait]
impl UsageMeter for UsageClient {
    async fn record_usage(&self) -> Result<UsageRecord, UsageError> {
        let url = format!("{}/api/auth/add", self.base_url);

        let response = self
            .authorize(self.http_client.post(&url))
            .send()
            .await
            .map_err(|e| UsageError::Network(e.to_string()))?;

        let status = response.status();

        if status == 401 {
            return Err(UsageError::Unauthorized);
        }
        if status == 404 {
            return Err(UsageError::UserNotFound);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(UsageError::Api(status.as_u16(), error_text));
        }

        let payload: AddUsageResponse = response
            .json()
            .await
            .map_err(|e| UsageError::Parse(e.to_string()))?;

        Ok(UsageRecord::new(payload.used))
    }

    async fn get_usage(&self) -> Result<UsageRecord, UsageError> {
        let Some(user_id) = &self.user_id else {
            // No id to query with; same semantics as a missing credential
            return Err(UsageError::Unauthorized);
        };

        let url = format!("{}/api/auth/get", self.base_url);

        let response = self
            .authorize(self.http_client.get(&url).query(&[("id", user_id.as_str())]))
            .send()
            .await
            .map_err(|e| UsageError::Network(e.to_string()))?;

        let status = response.status();

        if status == 401 {
            return Err(UsageError::Unauthorized);
        }
        if status == 404 {
            return Err(UsageError::UserNotFound);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(UsageError::Api(status.as_u16(), error_text));
        }

        let payload: GetUsageResponse = response
            .json()
            .await
            .map_err(|e| UsageError::Parse(e.to_string()))?;

        Ok(UsageRecord::new(payload.amount))
    }
}
