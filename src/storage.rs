use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

#[cfg(test)]
use mockall::automock;

use crate::error::{Result, WayfarerError};
use crate::models::{ChatMessage, Conversation, TravelPreferences};

/// Conversation storage collaborator. Append-only from the pipeline's
/// perspective: messages are never deleted or reordered.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ConversationStore: Send + Sync + 'static {
    async fn create(
        &self,
        messages: Vec<ChatMessage>,
        preferences: TravelPreferences,
    ) -> Result<Conversation>;
    async fn find(&self, id: i64) -> Result<Option<Conversation>>;
    async fn append(&self, id: i64, message: ChatMessage) -> Result<Conversation>;
    async fn update_preferences(
        &self,
        id: i64,
        preferences: TravelPreferences,
    ) -> Result<Conversation>;
}

/// In-memory store with auto-incrementing identifiers. State lifetime is the
/// process lifetime. The single lock serializes appends to a conversation;
/// mutation is replace-the-whole-value and never spans an await.
pub struct MemoryStore {
    conversations: Mutex<HashMap<i64, Conversation>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            conversations: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn create(
        &self,
        messages: Vec<ChatMessage>,
        preferences: TravelPreferences,
    ) -> Result<Conversation> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let conversation = Conversation {
            id,
            messages,
            preferences,
        };
        self.conversations
            .lock()
            .expect("store mutex should not be poisoned")
            .insert(id, conversation.clone());
        Ok(conversation)
    }

    async fn find(&self, id: i64) -> Result<Option<Conversation>> {
        Ok(self
            .conversations
            .lock()
            .expect("store mutex should not be poisoned")
            .get(&id)
            .cloned())
    }

    async fn append(&self, id: i64, message: ChatMessage) -> Result<Conversation> {
        let mut conversations = self
            .conversations
            .lock()
            .expect("store mutex should not be poisoned");
        let conversation = conversations
            .get_mut(&id)
            .ok_or(WayfarerError::NotFound(id))?;
        conversation.messages.push(message);
        Ok(conversation.clone())
    }

    async fn update_preferences(
        &self,
        id: i64,
        preferences: TravelPreferences,
    ) -> Result<Conversation> {
        let mut conversations = self
            .conversations
            .lock()
            .expect("store mutex should not be poisoned");
        let conversation = conversations
            .get_mut(&id)
            .ok_or(WayfarerError::NotFound(id))?;
        conversation.preferences = preferences;
        Ok(conversation.clone())
    }
}
