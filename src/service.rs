use std::sync::Arc;

use crate::cache::RecommendationCache;
use crate::chat::{ChatResponder, OpenAiChat};
use crate::config::Config;
use crate::error::{Result, WayfarerError};
use crate::models::{ChatMessage, Conversation, MessageRole, TravelPreferences};
use crate::recommend::{OpenAiRecommender, Recommender, welcome_message};
use crate::retry::RetryPolicy;
use crate::storage::ConversationStore;
use crate::transport::{OpenAiTransport, Transport};
use crate::validation::InputValidator;

/// Conversation orchestrator: sequences store appends around the chat
/// responder and recommendation generator. All shared state (cache, store)
/// is injected here at startup rather than living in module globals.
pub struct AdvisorService {
    store: Arc<dyn ConversationStore>,
    recommender: Arc<dyn Recommender>,
    chat: Arc<dyn ChatResponder>,
    provider_configured: bool,
}

impl AdvisorService {
    pub fn new(cfg: &Config, store: Arc<dyn ConversationStore>) -> Self {
        let transport = Arc::new(OpenAiTransport::new(cfg.openai.api_key.clone()));
        let retry = RetryPolicy::from_config(&cfg.retry);
        let cache = Arc::new(RecommendationCache::new(cfg.get_cache_ttl()));

        let recommender = Arc::new(OpenAiRecommender::new(
            Arc::clone(&transport) as Arc<dyn Transport>,
            cache,
            retry.clone(),
            cfg.openai.model.clone(),
        ));
        let chat = Arc::new(OpenAiChat::new(
            Arc::clone(&transport) as Arc<dyn Transport>,
            retry,
            cfg.openai.model.clone(),
        ));

        Self {
            store,
            recommender,
            chat,
            provider_configured: cfg.openai.is_configured(),
        }
    }

    #[cfg(test)]
    pub fn with_parts(
        store: Arc<dyn ConversationStore>,
        recommender: Arc<dyn Recommender>,
        chat: Arc<dyn ChatResponder>,
    ) -> Self {
        Self {
            store,
            recommender,
            chat,
            provider_configured: true,
        }
    }

    #[cfg(test)]
    pub fn set_provider_configured(&mut self, configured: bool) {
        self.provider_configured = configured;
    }

    /// Short-circuit provider-dependent operations before any network call.
    pub fn ensure_provider_configured(&self) -> Result<()> {
        if self.provider_configured {
            Ok(())
        } else {
            Err(WayfarerError::Config(
                "OpenAI API key is not configured".to_string(),
            ))
        }
    }

    pub async fn create_conversation(
        &self,
        messages: Vec<ChatMessage>,
        preferences: TravelPreferences,
    ) -> Result<Conversation> {
        InputValidator::validate_preferences(&preferences)?;
        self.store.create(messages, preferences).await
    }

    pub async fn get_conversation(&self, id: i64) -> Result<Conversation> {
        self.store
            .find(id)
            .await?
            .ok_or(WayfarerError::NotFound(id))
    }

    /// Append a message; for user-originated messages, follow with a chat
    /// responder turn and append the assistant reply. If the responder
    /// fails, the user append is NOT rolled back: the orphaned user message
    /// stays in history and the error surfaces to the caller.
    pub async fn post_message(
        &self,
        id: i64,
        content: String,
        role: MessageRole,
    ) -> Result<Conversation> {
        InputValidator::validate_message_content(&content)?;

        let conversation = self.store.append(id, ChatMessage::new(role, content)).await?;

        if role != MessageRole::User {
            return Ok(conversation);
        }

        self.ensure_provider_configured()?;
        let reply = self.chat.respond(&conversation.messages).await?;
        self.store
            .append(id, ChatMessage::new(MessageRole::Assistant, reply))
            .await
    }

    /// Stateless recommendation welcome for a raw preference set.
    pub async fn recommendations_message(&self, preferences: &TravelPreferences) -> Result<String> {
        self.ensure_provider_configured()?;
        InputValidator::validate_preferences(preferences)?;
        let result = self.recommender.generate(preferences).await?;
        Ok(welcome_message(&result))
    }

    /// Generate recommendations from a conversation's stored preferences and
    /// append the welcome as a system-originated assistant message, so it is
    /// never re-submitted to the chat responder. Triggered once per
    /// conversation by convention; not enforced here.
    pub async fn request_recommendations(&self, id: i64) -> Result<Conversation> {
        self.ensure_provider_configured()?;
        let conversation = self.get_conversation(id).await?;
        let result = self.recommender.generate(&conversation.preferences).await?;
        self.store
            .append(
                id,
                ChatMessage::new(MessageRole::SystemWelcome, welcome_message(&result)),
            )
            .await
    }
}
