//! Recognizer API client
//!
//! Wraps the remote image recognizer call: multipart POST of the raw image
//! bytes, one attempt per invocation, no retry, no local state, no quota
//! consumption. Image size/type validation is the caller's concern.

use super::{REQUEST_TIMEOUT_SECS, USER_AGENT};
use crate::types::{Classification, Recognizer, RecognizerError};
use std::time::Duration;

/// Remote recognizer client
pub struct RecognizerClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl RecognizerClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, RecognizerError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| RecognizerError::Unavailable(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait::async_trait]
impl Recognizer for RecognizerClient {
    async fn classify(
        &self,
        image: Vec<u8>,
        file_name: String,
    ) -> Result<Classification, RecognizerError> {
        let part = reqwest::multipart::Part::bytes(image).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);

        tracing::debug!(endpoint = %self.endpoint, "Submitting image to recognizer");

        let response = self
            .http_client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RecognizerError::Unavailable(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RecognizerError::Unavailable(format!(
                "HTTP {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let classification: Classification = response
            .json()
            .await
            .map_err(|e| RecognizerError::Malformed(e.to_string()))?;

        tracing::info!(
            raw_category = %classification.category,
            label = %classification.label,
            "Recognizer returned classification"
        );

        Ok(classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = RecognizerClient::new("http://127.0.0.1:8000/describe");
        assert!(client.is_ok());
    }
}
