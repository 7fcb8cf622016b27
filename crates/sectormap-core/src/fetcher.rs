//! Rate-limited page fetching.
//!
//! One GET per call, no retries. Every failure cause collapses into a single
//! [`FetchFailure`]; callers only need to know that the page is unavailable.

use std::sync::Arc;

use thiserror::Error;

use crate::fetch_policy::FetchPolicy;
use crate::http_client::{HttpClient, HttpRequest};
use crate::throttling::RequestGate;

/// The page could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("fetch of {url} failed: {message}")]
pub struct FetchFailure {
    pub url: String,
    pub message: String,
}

impl FetchFailure {
    fn new(url: &str, message: impl Into<String>) -> Self {
        Self {
            url: url.to_owned(),
            message: message.into(),
        }
    }
}

/// HTTP client wrapper enforcing the source's request spacing and identity.
#[derive(Clone)]
pub struct FetchClient {
    http: Arc<dyn HttpClient>,
    gate: RequestGate,
    policy: FetchPolicy,
}

impl FetchClient {
    /// Builds a client whose gate spaces requests by `policy.min_interval`.
    pub fn new(http: Arc<dyn HttpClient>, policy: FetchPolicy) -> Self {
        let gate = RequestGate::fixed_interval(policy.min_interval);
        Self { http, gate, policy }
    }

    pub fn with_gate(mut self, gate: RequestGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn policy(&self) -> &FetchPolicy {
        &self.policy
    }

    pub async fn fetch(&self, url: &str) -> Result<String, FetchFailure> {
        self.gate.wait().await;

        let request = HttpRequest::get(url)
            .with_header("user-agent", self.policy.user_agent.as_str())
            .with_header("accept-language", self.policy.accept_language.as_str())
            .with_timeout_ms(self.policy.timeout_ms);

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|error| FetchFailure::new(url, error.message()))?;

        if !response.is_success() {
            return Err(FetchFailure::new(
                url,
                format!("upstream answered HTTP {}", response.status),
            ));
        }

        Ok(response.body)
    }
}
