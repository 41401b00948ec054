use super::*;
use crate::chat::ChatResponder;
use crate::error::{Result, WayfarerError};
use crate::models::{
    ChatMessage, Conversation, Destination, MessageRole, RecommendationResult, TravelPreferences,
};
use crate::recommend::Recommender;
use crate::storage::{ConversationStore, MemoryStore, MockConversationStore};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use std::sync::Mutex;
use tower::ServiceExt;

struct StubRecommender {
    result: RecommendationResult,
}

#[async_trait]
impl Recommender for StubRecommender {
    async fn generate(&self, _preferences: &TravelPreferences) -> Result<RecommendationResult> {
        Ok(self.result.clone())
    }
}

struct StubChat {
    replies: Mutex<Vec<Result<String>>>,
}

#[async_trait]
impl ChatResponder for StubChat {
    async fn respond(&self, _history: &[ChatMessage]) -> Result<String> {
        self.replies
            .lock()
            .expect("stub mutex should not be poisoned")
            .remove(0)
    }
}

fn sample_result() -> RecommendationResult {
    RecommendationResult {
        destinations: vec![Destination {
            name: "Luang Prabang".to_string(),
            description: "Riverside temples in Asia".to_string(),
            estimated_cost: 1100.0,
            recommended_activities: vec!["Hiking".to_string()],
        }],
        suggested_itinerary: "A slow week along the Mekong".to_string(),
        travel_tips: vec!["Mornings are for alms-giving".to_string()],
    }
}

fn app_with(store: Arc<dyn ConversationStore>, chat_replies: Vec<Result<String>>) -> Router {
    let service = AdvisorService::with_parts(
        store,
        Arc::new(StubRecommender {
            result: sample_result(),
        }),
        Arc::new(StubChat {
            replies: Mutex::new(chat_replies),
        }),
    );
    router(Arc::new(AppState { service }))
}

fn default_app() -> Router {
    app_with(
        Arc::new(MemoryStore::new()),
        vec![Ok("Sounds like a great trip!".to_string())],
    )
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

#[tokio::test]
async fn test_create_conversation_returns_stored_entity() {
    let app = default_app();
    let response = app
        .oneshot(post_json(
            "/api/conversations",
            serde_json::json!({"preferences": {"budget": 2000, "region": "asia"}}),
        ))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::OK);
    let conversation: Conversation = serde_json::from_value(body_json(response).await)
        .expect("conversation should deserialize");
    assert_eq!(conversation.id, 1);
    assert_eq!(conversation.preferences.budget, Some(2000.0));
    assert!(conversation.messages.is_empty());
}

#[tokio::test]
async fn test_create_conversation_rejects_invalid_budget() {
    let app = default_app();
    let response = app
        .oneshot(post_json(
            "/api/conversations",
            serde_json::json!({"preferences": {"budget": -10}}),
        ))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_missing_conversation_is_404() {
    let app = default_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/conversations/99")
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_message_appends_user_and_assistant_turns() {
    let store = Arc::new(MemoryStore::new());
    let app = app_with(
        store.clone(),
        vec![Ok("Laos is lovely in December.".to_string())],
    );

    store
        .create(vec![], TravelPreferences::default())
        .await
        .expect("create should succeed");

    let response = app
        .oneshot(post_json(
            "/api/conversations/1/messages",
            serde_json::json!({"content": "When should I visit Laos?"}),
        ))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::OK);
    let conversation: Conversation = serde_json::from_value(body_json(response).await)
        .expect("conversation should deserialize");
    assert_eq!(conversation.messages.len(), 2);
    assert_eq!(conversation.messages[0].role, MessageRole::User);
    assert_eq!(conversation.messages[1].role, MessageRole::Assistant);
}

#[tokio::test]
async fn test_post_system_message_skips_responder() {
    let store = Arc::new(MemoryStore::new());
    // Responder stub would panic if invoked.
    let app = app_with(store.clone(), vec![]);

    store
        .create(vec![], TravelPreferences::default())
        .await
        .expect("create should succeed");

    let response = app
        .oneshot(post_json(
            "/api/conversations/1/messages",
            serde_json::json!({"content": "Welcome!", "isSystemMessage": true}),
        ))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::OK);
    let conversation: Conversation = serde_json::from_value(body_json(response).await)
        .expect("conversation should deserialize");
    assert_eq!(conversation.messages.len(), 1);
    assert_eq!(conversation.messages[0].role, MessageRole::SystemWelcome);
}

#[tokio::test]
async fn test_rate_limit_exhaustion_maps_to_429() {
    let store = Arc::new(MemoryStore::new());
    let app = app_with(
        store.clone(),
        vec![Err(WayfarerError::RateLimitExceeded(
            "Rate limit exceeded.".to_string(),
        ))],
    );

    store
        .create(vec![], TravelPreferences::default())
        .await
        .expect("create should succeed");

    let response = app
        .oneshot(post_json(
            "/api/conversations/1/messages",
            serde_json::json!({"content": "Hello"}),
        ))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = body_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .expect("error should be a string")
            .contains("rate limit")
    );

    // The user message survives the failed responder turn.
    let stored = store
        .find(1)
        .await
        .expect("find should succeed")
        .expect("conversation should exist");
    assert_eq!(stored.messages.len(), 1);
    assert_eq!(stored.messages[0].role, MessageRole::User);
}

#[tokio::test]
async fn test_unconfigured_provider_maps_to_500() {
    let mut service = AdvisorService::with_parts(
        Arc::new(MemoryStore::new()),
        Arc::new(StubRecommender {
            result: sample_result(),
        }),
        Arc::new(StubChat {
            replies: Mutex::new(vec![]),
        }),
    );
    service.set_provider_configured(false);
    let app = router(Arc::new(AppState { service }));

    let response = app
        .oneshot(post_json(
            "/api/recommendations",
            serde_json::json!({"budget": 2000}),
        ))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(
        body["error"]
            .as_str()
            .expect("error should be a string")
            .contains("not properly configured")
    );
}

#[tokio::test]
async fn test_recommendations_route_returns_welcome_message() {
    let app = default_app();
    let response = app
        .oneshot(post_json(
            "/api/recommendations",
            serde_json::json!({"budget": 2000, "region": "asia", "activities": ["Hiking"]}),
        ))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let message = body["message"].as_str().expect("message should be a string");
    assert!(message.contains("Luang Prabang"));
    assert!(message.contains("Asia"));
    assert!(message.contains("Suggested Itinerary"));
}

#[tokio::test]
async fn test_conversation_recommendations_appends_welcome() {
    let store = Arc::new(MemoryStore::new());
    let app = app_with(store.clone(), vec![]);

    store
        .create(
            vec![],
            TravelPreferences {
                budget: Some(2000.0),
                region: Some("asia".to_string()),
                activities: Some(vec!["Hiking".to_string()]),
            },
        )
        .await
        .expect("create should succeed");

    let response = app
        .oneshot(post_json(
            "/api/conversations/1/recommendations",
            serde_json::json!({}),
        ))
        .await
        .expect("request should complete");

    assert_eq!(response.status(), StatusCode::OK);
    let conversation: Conversation = serde_json::from_value(body_json(response).await)
        .expect("conversation should deserialize");
    assert_eq!(conversation.messages.len(), 1);
    assert_eq!(conversation.messages[0].role, MessageRole::SystemWelcome);
}

#[tokio::test]
async fn test_store_not_found_propagates_through_append() {
    let mut store = MockConversationStore::new();
    store
        .expect_append()
        .returning(|id, _| Err(WayfarerError::NotFound(id)));

    let app = app_with(Arc::new(store), vec![]);

    let response = app
        .oneshot(post_json(
            "/api/conversations/7/messages",
            serde_json::json!({"content": "Hi", "isSystemMessage": true}),
        ))
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = default_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::OK);
}
