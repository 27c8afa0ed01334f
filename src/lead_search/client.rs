// src/lead_search/client.rs
//! HTTP client for the upstream lead lookup service.

use anyhow::{Context, Result};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use std::time::Duration;
use tracing::{error, info, trace, warn};

use super::request_builder::UpstreamPayload;
use super::types::{FetchResult, RawLeadRecord, UpstreamError, UpstreamResponse};
use crate::core::config_manager::UpstreamConfig;

#[derive(Clone)]
pub struct LeadApiClient {
    client: reqwest::Client,
    api_url: String,
    user_agent: String,
}

impl LeadApiClient {
    /// Create a client; the timeout is fixed for the lifetime of the client
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let timeout = config.timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        info!(
            "Lead API client ready: {} (timeout {}s, {})",
            config.api_url,
            timeout.as_secs(),
            config.timeout_profile.as_str()
        );

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            user_agent: config.user_agent.clone(),
        })
    }

    /// Client with an explicit URL and timeout, mostly for tests and tools
    pub fn with_url(api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let config = UpstreamConfig {
            api_url: api_url.into(),
            timeout_seconds: Some(timeout.as_secs().max(1)),
            ..UpstreamConfig::default()
        };
        Self::new(&config)
    }

    /// Single upstream call. Failures come back as a tagged [`FetchResult`];
    /// nothing is retried.
    pub async fn fetch(&self, payload: &UpstreamPayload) -> FetchResult {
        match self.try_fetch(payload).await {
            Ok(results) => {
                info!("API returned {} leads", results.len());
                FetchResult::ok(results)
            }
            Err(e) => {
                error!("Lead API call failed ({:?}): {}", e.kind(), e);
                FetchResult::failure(&e)
            }
        }
    }

    async fn try_fetch(&self, payload: &UpstreamPayload) -> Result<Vec<RawLeadRecord>, UpstreamError> {
        let body = serde_json::to_string(payload)
            .map_err(|e| UpstreamError::Connection(format!("Failed to encode request: {}", e)))?;

        info!("Calling lead API: {}", self.api_url);
        trace!("Request body: {}", body);

        // The upstream reads its filters from a JSON body on a GET
        let response = self
            .client
            .get(&self.api_url)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, &self.user_agent)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        trace!("Response status: {}", status);

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(UpstreamError::HttpStatus {
                status,
                body: error_text,
            });
        }

        let response_text = response.text().await?;
        let envelope: UpstreamResponse = serde_json::from_str(&response_text)
            .map_err(|e| UpstreamError::InvalidResponse(e.to_string()))?;

        let mut records = Vec::with_capacity(envelope.results.len());
        for (index, value) in envelope.results.into_iter().enumerate() {
            match RawLeadRecord::try_from(value) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Dropping upstream result #{}: {}", index, e),
            }
        }

        Ok(records)
    }
}
