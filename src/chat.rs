use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{Result, WayfarerError};
use crate::models::{ChatMessage, ProviderRequest, WireMessage};
use crate::retry::RetryPolicy;
use crate::transport::Transport;

const ADVISOR_PERSONA: &str = "You are a friendly and knowledgeable travel advisor. Be concise \
     but informative, and always maintain a positive, encouraging tone. Focus on practical \
     advice and unique experiences.";

#[async_trait]
pub trait ChatResponder: Send + Sync {
    async fn respond(&self, history: &[ChatMessage]) -> Result<String>;
}

/// Free-text advisor replies over the full conversation history. No caching:
/// conversational context is unique per call by construction.
pub struct OpenAiChat {
    tx: Arc<dyn Transport>,
    retry: RetryPolicy,
    model: String,
}

impl OpenAiChat {
    pub fn new(tx: Arc<dyn Transport>, retry: RetryPolicy, model: String) -> Self {
        Self { tx, retry, model }
    }
}

#[async_trait]
impl ChatResponder for OpenAiChat {
    async fn respond(&self, history: &[ChatMessage]) -> Result<String> {
        tracing::info!(turns = history.len(), "Processing chat response");

        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(WireMessage {
            role: "system".to_string(),
            content: ADVISOR_PERSONA.to_string(),
        });
        messages.extend(history.iter().map(|m| WireMessage {
            role: m.role.as_wire_role().to_string(),
            content: m.content.clone(),
        }));

        let request = ProviderRequest {
            model: self.model.clone(),
            messages,
            temperature: 0.7,
            max_tokens: 1500,
            response_format: None,
        };

        let response = self.retry.execute(|| self.tx.chat(&request)).await?;

        response
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| WayfarerError::Provider("Failed to get AI response".to_string()))
    }
}
