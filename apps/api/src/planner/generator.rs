//! Generation Client: the three schema-constrained generation operations.
//!
//! Flow per operation: build prompt → one `TextGenerator` call with the
//! operation's schema and temperature → strip fences → parse → validate.
//! No retries: any failure discards the response and surfaces a single
//! `GenerationFailure` carrying a message fit to show the end user.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::llm_client::schema::{dish_list_schema, dish_schema, meal_plan_schema};
use crate::llm_client::{call_json, GenerationRequest, LlmError, TextGenerator};
use crate::models::plan::{Dish, MealPlan};
use crate::models::preferences::Preferences;
use crate::models::Validate;
use crate::planner::prompts::{
    build_alternative_dish_prompt, build_plan_prompt, build_search_prompt, exclusion_names,
    SEARCH_RESULT_COUNT,
};

pub const PLAN_TEMPERATURE: f32 = 0.7;
/// Higher than the plan temperature: single-dish suggestions should vary more.
pub const ALTERNATIVE_TEMPERATURE: f32 = 0.8;

/// Relative calorie drift between reported and summed day totals that gets logged.
const TOTALS_DRIFT_WARN_RATIO: f64 = 0.1;

/// The uniform failure of every generation operation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct GenerationFailure {
    message: &'static str,
    #[source]
    cause: LlmError,
}

impl GenerationFailure {
    /// Human-readable message safe to show to the end user.
    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn cause(&self) -> &LlmError {
        &self.cause
    }
}

/// The three operations share one pipeline, parameterized here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Plan,
    Alternative,
    Search,
}

impl Operation {
    fn name(self) -> &'static str {
        match self {
            Operation::Plan => "meal plan",
            Operation::Alternative => "alternative dish",
            Operation::Search => "recipe search",
        }
    }

    fn schema(self) -> Value {
        match self {
            Operation::Plan => meal_plan_schema(),
            Operation::Alternative => dish_schema(),
            Operation::Search => dish_list_schema(),
        }
    }

    fn temperature(self) -> Option<f32> {
        match self {
            Operation::Plan => Some(PLAN_TEMPERATURE),
            Operation::Alternative => Some(ALTERNATIVE_TEMPERATURE),
            Operation::Search => None,
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Operation::Plan => {
                "Failed to generate meal plan. The model might be overloaded or the request is invalid. Please try again later."
            }
            Operation::Alternative => "Failed to suggest an alternative dish. Please try again.",
            Operation::Search => "Failed to search for recipes. Please try again.",
        }
    }
}

async fn run<T>(
    generator: &dyn TextGenerator,
    operation: Operation,
    prompt: &str,
) -> Result<T, GenerationFailure>
where
    T: DeserializeOwned + Validate,
{
    let schema = operation.schema();
    let request = GenerationRequest {
        prompt,
        schema: &schema,
        temperature: operation.temperature(),
    };

    call_json(generator, &request).await.map_err(|cause| {
        error!("Error generating {}: {cause}", operation.name());
        GenerationFailure {
            message: operation.failure_message(),
            cause,
        }
    })
}

/// Generates a full meal plan for the given preferences.
pub async fn generate_plan(
    generator: &dyn TextGenerator,
    preferences: &Preferences,
) -> Result<MealPlan, GenerationFailure> {
    let prompt = build_plan_prompt(preferences);
    let plan: MealPlan = run(generator, Operation::Plan, &prompt).await?;

    info!(
        "Generated plan '{}' with {} day(s) ({} requested)",
        plan.plan_title,
        plan.daily_plans.len(),
        preferences.days
    );
    warn_on_totals_drift(&plan);

    Ok(plan)
}

/// Suggests a replacement for `dish_to_replace`. `context` is every dish
/// currently planned for that day; the model is told to avoid those names,
/// but a collision is passed through to the caller unchanged.
pub async fn generate_alternative(
    generator: &dyn TextGenerator,
    preferences: &Preferences,
    context: &[Dish],
    dish_to_replace: &Dish,
) -> Result<Dish, GenerationFailure> {
    let prompt = build_alternative_dish_prompt(preferences, context, dish_to_replace);
    let dish: Dish = run(generator, Operation::Alternative, &prompt).await?;

    if dish.name == dish_to_replace.name
        || exclusion_names(context, dish_to_replace).contains(&dish.name.as_str())
    {
        warn!(
            "Alternative for '{}' reused an excluded name: '{}'",
            dish_to_replace.name, dish.name
        );
    }

    Ok(dish)
}

/// Finds candidate dishes for a free-text query.
pub async fn search_dishes(
    generator: &dyn TextGenerator,
    preferences: &Preferences,
    query: &str,
) -> Result<Vec<Dish>, GenerationFailure> {
    let prompt = build_search_prompt(preferences, query);
    let dishes: Vec<Dish> = run(generator, Operation::Search, &prompt).await?;

    if dishes.len() != SEARCH_RESULT_COUNT {
        debug!(
            "Recipe search returned {} dishes ({} requested)",
            dishes.len(),
            SEARCH_RESULT_COUNT
        );
    }

    Ok(dishes)
}

/// Day totals come from the model's arithmetic and are never corrected; large
/// drift is only logged.
fn warn_on_totals_drift(plan: &MealPlan) {
    for day in &plan.daily_plans {
        let reported = day.daily_totals.calories;
        let summed = day.summed_totals().calories;
        let baseline = reported.max(summed);
        if baseline > 0.0 && (reported - summed).abs() / baseline > TOTALS_DRIFT_WARN_RATIO {
            warn!(
                "Day {} reports {reported} kcal but its dishes sum to {summed} kcal",
                day.day
            );
        }
    }
}
