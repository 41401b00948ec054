use async_trait::async_trait;
use std::sync::Arc;

use crate::cache::{RecommendationCache, fingerprint};
use crate::error::{Result, WayfarerError};
use crate::models::{ProviderRequest, RecommendationResult, TravelPreferences, WireMessage};
use crate::retry::RetryPolicy;
use crate::transport::Transport;

#[async_trait]
pub trait Recommender: Send + Sync {
    async fn generate(&self, preferences: &TravelPreferences) -> Result<RecommendationResult>;
}

pub struct OpenAiRecommender {
    tx: Arc<dyn Transport>,
    cache: Arc<RecommendationCache>,
    retry: RetryPolicy,
    model: String,
}

impl OpenAiRecommender {
    pub fn new(
        tx: Arc<dyn Transport>,
        cache: Arc<RecommendationCache>,
        retry: RetryPolicy,
        model: String,
    ) -> Self {
        Self {
            tx,
            cache,
            retry,
            model,
        }
    }

    fn build_prompt(preferences: &TravelPreferences) -> String {
        let budget = preferences
            .budget
            .map(|b| b.to_string())
            .unwrap_or_else(|| "flexible".to_string());
        let region = preferences.region.as_deref().unwrap_or("anywhere");
        let activities = preferences
            .activities
            .as_deref()
            .filter(|a| !a.is_empty())
            .map(|a| a.join(", "))
            .unwrap_or_else(|| "any".to_string());

        format!(
            r#"Generate travel recommendations based on these preferences:
Budget: {budget}
Region: {region}
Activities: {activities}

Please provide recommendations in JSON format with the following structure:
{{
  "destinations": [
    {{
      "name": string,
      "description": string,
      "estimatedCost": number,
      "recommendedActivities": string[]
    }}
  ],
  "suggestedItinerary": string,
  "travelTips": string[]
}}"#
        )
    }
}

#[async_trait]
impl Recommender for OpenAiRecommender {
    async fn generate(&self, preferences: &TravelPreferences) -> Result<RecommendationResult> {
        let key = fingerprint(preferences);

        if let Some(cached) = self.cache.get(&key) {
            tracing::info!("Serving travel recommendations from cache");
            return Ok(cached);
        }

        tracing::info!("Generating new travel recommendations");

        let request = ProviderRequest {
            model: self.model.clone(),
            messages: vec![WireMessage {
                role: "user".to_string(),
                content: Self::build_prompt(preferences),
            }],
            temperature: 0.7,
            max_tokens: 1500,
            response_format: Some(serde_json::json!({"type": "json_object"})),
        };

        let response = self.retry.execute(|| self.tx.chat(&request)).await?;

        let content = response
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| WayfarerError::Provider("Failed to get AI response".to_string()))?;

        let recommendations: RecommendationResult =
            serde_json::from_str(content).map_err(|e| {
                WayfarerError::MalformedResponse(format!(
                    "Recommendation JSON did not match the expected schema: {e}"
                ))
            })?;

        // Cache only a validated result, never a partial or failed response.
        self.cache.put(key, recommendations.clone());

        Ok(recommendations)
    }
}

/// Format a recommendation payload as the advisor's welcome message.
pub fn welcome_message(result: &RecommendationResult) -> String {
    let destinations = result
        .destinations
        .iter()
        .map(|d| {
            format!(
                "{}: {} (Estimated Cost: ${})",
                d.name, d.description, d.estimated_cost
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let tips = result.travel_tips.join("\n");

    format!(
        "\u{1f44b} Hello! Based on your preferences, here are some personalized travel recommendations:\n\n\
         \u{1f30d} Recommended Destinations:\n{destinations}\n\n\
         \u{2708}\u{fe0f} Suggested Itinerary:\n{itinerary}\n\n\
         \u{1f4a1} Travel Tips:\n{tips}\n\n\
         Feel free to ask me any questions about these recommendations or explore other travel options!",
        itinerary = result.suggested_itinerary,
    )
}
