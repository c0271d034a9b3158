//! Axum route handlers for the planning API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::plan::{Dish, MealPlan};
use crate::models::preferences::Preferences;
use crate::planner::generator::{generate_alternative, generate_plan, search_dishes};
use crate::planner::swap::{locate, swap_dish, DishCoordinate};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlanRequest {
    pub preferences: Preferences,
    /// Elevated tier: unlocks plans longer than one day.
    #[serde(default)]
    pub premium: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeRequest {
    pub preferences: Preferences,
    /// Every dish currently planned for the day of `dish_to_replace`.
    #[serde(default)]
    pub context: Vec<Dish>,
    pub dish_to_replace: Dish,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub preferences: Preferences,
    pub plan: MealPlan,
    pub coordinate: DishCoordinate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    pub plan: MealPlan,
    pub coordinate: DishCoordinate,
    pub replaced: Dish,
    pub replacement: Dish,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub preferences: Preferences,
    pub query: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/plans/generate
///
/// Generates a fresh plan. Multi-day plans require `premium: true`.
pub async fn handle_generate_plan(
    State(state): State<AppState>,
    Json(request): Json<GeneratePlanRequest>,
) -> Result<Json<MealPlan>, AppError> {
    request.preferences.validate().map_err(AppError::Validation)?;
    request
        .preferences
        .check_tier(request.premium)
        .map_err(AppError::Validation)?;

    let plan = generate_plan(state.generator.as_ref(), &request.preferences).await?;
    Ok(Json(plan))
}

/// POST /api/v1/plans/swap
///
/// Asks for an alternative to the dish at `coordinate` (avoiding every other
/// dish of that day) and returns the plan with that one dish replaced.
/// Day totals are returned as they were.
pub async fn handle_swap_dish(
    State(state): State<AppState>,
    Json(request): Json<SwapRequest>,
) -> Result<Json<SwapResponse>, AppError> {
    request.preferences.validate().map_err(AppError::Validation)?;

    // Resolve the coordinate before spending a generation on it.
    let (day, replaced) = locate(&request.plan, request.coordinate)?;
    let context: Vec<Dish> = day.dishes().cloned().collect();
    let replaced = replaced.clone();

    let replacement = generate_alternative(
        state.generator.as_ref(),
        &request.preferences,
        &context,
        &replaced,
    )
    .await?;

    let plan = swap_dish(&request.plan, request.coordinate, replacement.clone())?;
    info!(
        "Swapped '{}' for '{}' at {:?}",
        replaced.name, replacement.name, request.coordinate
    );

    Ok(Json(SwapResponse {
        plan,
        coordinate: request.coordinate,
        replaced,
        replacement,
    }))
}

/// POST /api/v1/dishes/alternative
///
/// Returns a single replacement dish without touching any plan.
pub async fn handle_alternative_dish(
    State(state): State<AppState>,
    Json(request): Json<AlternativeRequest>,
) -> Result<Json<Dish>, AppError> {
    request.preferences.validate().map_err(AppError::Validation)?;

    let dish = generate_alternative(
        state.generator.as_ref(),
        &request.preferences,
        &request.context,
        &request.dish_to_replace,
    )
    .await?;
    Ok(Json(dish))
}

/// POST /api/v1/dishes/search
pub async fn handle_search_dishes(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<Dish>>, AppError> {
    if request.query.trim().is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }
    request.preferences.validate().map_err(AppError::Validation)?;

    let dishes = search_dishes(state.generator.as_ref(), &request.preferences, &request.query).await?;
    Ok(Json(dishes))
}
