use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User travel preferences. Doubles as the cache-key source for
/// recommendations; two values with identical fields are the same entry.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct TravelPreferences {
    pub budget: Option<f64>,
    pub region: Option<String>,
    pub activities: Option<Vec<String>>,
}

/// One recommended destination as returned by the provider.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub name: String,
    pub description: String,
    pub estimated_cost: f64,
    pub recommended_activities: Vec<String>,
}

/// Structured recommendation payload. Immutable once cached.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub destinations: Vec<Destination>,
    pub suggested_itinerary: String,
    pub travel_tips: Vec<String>,
}

/// Message origin tag. `SystemWelcome` marks the generated recommendation
/// welcome so it never re-triggers the chat responder.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MessageRole {
    User,
    Assistant,
    SystemWelcome,
}

impl MessageRole {
    /// Role string for the provider wire format. A stored welcome message
    /// reads as an earlier assistant turn in the conversation.
    pub fn as_wire_role(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant | Self::SystemWelcome => "assistant",
        }
    }
}

/// A single conversation turn. Immutable once appended.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Conversation {
    pub id: i64,
    pub messages: Vec<ChatMessage>,
    pub preferences: TravelPreferences,
}

// OpenAI chat message wire format
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

// OpenAI chat-completions request format
#[derive(Debug, Serialize, Clone)]
pub struct ProviderRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub temperature: f32,
    pub max_tokens: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<serde_json::Value>,
}

// OpenAI chat-completions response format
#[derive(Debug, Deserialize)]
pub struct ProviderResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: WireMessage,
}

// --- HTTP request/response bodies ---

#[derive(Debug, Deserialize, Default)]
pub struct CreateConversationRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub preferences: TravelPreferences,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequest {
    pub content: String,
    #[serde(default)]
    pub is_system_message: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub message: String,
}
