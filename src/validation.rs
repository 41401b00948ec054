use crate::error::{Result, WayfarerError};
use crate::models::TravelPreferences;

const MAX_MESSAGE_LENGTH: usize = 10_000;
const MAX_REGION_LENGTH: usize = 100;
const MAX_ACTIVITIES: usize = 20;
const MAX_ACTIVITY_LENGTH: usize = 100;

/// Request-body validation producing `Validation` errors (HTTP 400).
pub struct InputValidator;

impl InputValidator {
    pub fn validate_message_content(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(WayfarerError::Validation(
                "Message content cannot be empty".to_string(),
            ));
        }
        if content.len() > MAX_MESSAGE_LENGTH {
            return Err(WayfarerError::Validation(format!(
                "Message content exceeds maximum length of {MAX_MESSAGE_LENGTH} characters"
            )));
        }
        Ok(())
    }

    pub fn validate_preferences(preferences: &TravelPreferences) -> Result<()> {
        if let Some(budget) = preferences.budget {
            if !budget.is_finite() || budget < 0.0 {
                return Err(WayfarerError::Validation(
                    "Budget must be a non-negative number".to_string(),
                ));
            }
        }

        if let Some(region) = &preferences.region {
            if region.len() > MAX_REGION_LENGTH {
                return Err(WayfarerError::Validation(format!(
                    "Region exceeds maximum length of {MAX_REGION_LENGTH} characters"
                )));
            }
        }

        if let Some(activities) = &preferences.activities {
            if activities.len() > MAX_ACTIVITIES {
                return Err(WayfarerError::Validation(format!(
                    "At most {MAX_ACTIVITIES} activities are supported"
                )));
            }
            for activity in activities {
                if activity.trim().is_empty() {
                    return Err(WayfarerError::Validation(
                        "Activity names cannot be empty".to_string(),
                    ));
                }
                if activity.len() > MAX_ACTIVITY_LENGTH {
                    return Err(WayfarerError::Validation(format!(
                        "Activity name exceeds maximum length of {MAX_ACTIVITY_LENGTH} characters"
                    )));
                }
            }
        }

        Ok(())
    }
}
