use axum::Json;
use axum::extract::State;
use std::sync::Arc;

use super::AppState;
use crate::error::Result;
use crate::models::{RecommendationsResponse, TravelPreferences};

pub async fn generate_recommendations(
    State(state): State<Arc<AppState>>,
    Json(preferences): Json<TravelPreferences>,
) -> Result<Json<RecommendationsResponse>> {
    tracing::info!(?preferences, "Generating recommendations");
    let message = state.service.recommendations_message(&preferences).await?;
    Ok(Json(RecommendationsResponse { message }))
}
