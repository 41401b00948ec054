use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WayfarerError>;

/// Error taxonomy for the advisor service. Rate-limit classification is
/// structural: the transport tags provider failures at the adapter boundary
/// so the retry policy never has to scan message text.
#[derive(Error, Debug)]
pub enum WayfarerError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Single rate-limit signal from the provider adapter (HTTP 429 or
    /// quota-exhaustion error body). The original provider message is kept
    /// as a diagnostic.
    #[error("Provider rate limited: {message}")]
    RateLimited { message: String },

    /// Retry budget exhausted while still rate-limited.
    #[error("{0}")]
    RateLimitExceeded(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conversation not found: {0}")]
    NotFound(i64),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WayfarerError {
    /// True for the one error kind the retry policy reacts to.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

impl IntoResponse for WayfarerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "OpenAI API key is not properly configured.".to_string(),
            ),
            Self::RateLimited { .. } | Self::RateLimitExceeded(_) => (
                StatusCode::TOO_MANY_REQUESTS,
                "API rate limit exceeded. Please try again later.".to_string(),
            ),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "Conversation not found".to_string()),
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Provider(_) | Self::MalformedResponse(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        // Full detail goes to the log, not the client.
        tracing::error!(status = %status, "request failed: {self}");

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
