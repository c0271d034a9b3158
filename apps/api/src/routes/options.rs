use axum::Json;
use serde::Serialize;

use crate::models::preferences::{
    goal_options, OptionEntry, Preferences, DIETARY_RESTRICTION_OPTIONS, MAX_CALORIES,
    MAX_MEALS_PER_DAY, MAX_PREMIUM_DAYS, MIN_CALORIES, MIN_MEALS_PER_DAY,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Limits {
    pub min_calories: u32,
    pub max_calories: u32,
    pub min_meals_per_day: u32,
    pub max_meals_per_day: u32,
    pub free_days: u32,
    pub max_premium_days: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsResponse {
    pub goals: Vec<OptionEntry>,
    pub dietary_restrictions: &'static [OptionEntry],
    pub defaults: Preferences,
    pub limits: Limits,
}

/// GET /api/v1/options
/// Everything a form renderer needs to build the preferences form.
pub async fn options_handler() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        goals: goal_options(),
        dietary_restrictions: DIETARY_RESTRICTION_OPTIONS,
        defaults: Preferences::default(),
        limits: Limits {
            min_calories: MIN_CALORIES,
            max_calories: MAX_CALORIES,
            min_meals_per_day: MIN_MEALS_PER_DAY,
            max_meals_per_day: MAX_MEALS_PER_DAY,
            free_days: 1,
            max_premium_days: MAX_PREMIUM_DAYS,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_options_expose_catalogues_and_defaults() {
        let Json(options) = options_handler().await;
        let body = serde_json::to_value(&options).unwrap();

        assert_eq!(body["goals"].as_array().unwrap().len(), 3);
        assert_eq!(body["dietaryRestrictions"].as_array().unwrap().len(), 6);
        assert_eq!(body["defaults"]["goal"], "MAINTAIN_WEIGHT");
        assert_eq!(body["defaults"]["calories"], 2000);
        assert_eq!(body["defaults"]["days"], 1);
        assert_eq!(body["limits"]["maxPremiumDays"], 7);
    }
}
