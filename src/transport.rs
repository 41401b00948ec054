use async_trait::async_trait;
use reqwest::Client;

use crate::error::{Result, WayfarerError};
use crate::models::{ProviderRequest, ProviderResponse};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

#[async_trait]
pub trait Transport: Send + Sync {
    async fn chat(&self, req: &ProviderRequest) -> Result<ProviderResponse>;
}

/// Single-attempt OpenAI chat-completions client. Retrying and all waiting
/// belong to `RetryPolicy`; this adapter only classifies failures.
pub struct OpenAiTransport {
    client: Client,
    api_key: String,
}

impl OpenAiTransport {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    /// Rate-limit signature in an error body from providers that report
    /// quota exhaustion with a 200-family status or a vague 4xx.
    fn body_is_rate_limited(body: &str) -> bool {
        let lower = body.to_lowercase();
        lower.contains("exceeded your current quota")
            || lower.contains("rate limit")
            || lower.contains("429")
    }
}

#[async_trait]
impl Transport for OpenAiTransport {
    async fn chat(&self, req: &ProviderRequest) -> Result<ProviderResponse> {
        let response = self
            .client
            .post(OPENAI_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(req)
            .send()
            .await
            .map_err(|e| WayfarerError::Provider(format!("Failed to send request: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(|e| {
                WayfarerError::Provider(format!("Failed to parse provider response: {e}"))
            });
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        // Classification happens once, here. Everything downstream matches
        // on the error kind instead of scanning message text.
        if status.as_u16() == 429 || Self::body_is_rate_limited(&body) {
            return Err(WayfarerError::RateLimited {
                message: format!("{status}: {body}"),
            });
        }

        Err(WayfarerError::Provider(format!(
            "Provider returned {status}: {body}"
        )))
    }
}
